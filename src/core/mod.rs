// src/core/mod.rs

pub mod aggregator;
pub mod catalog;
pub mod engine;
pub mod interner;
pub mod matrix;
pub mod registry;
pub mod svo;
pub mod types;
