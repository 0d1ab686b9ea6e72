// src/lib.rs
//! Context co-occurrence matrices for category pairs.
//!
//! Given category instance lists, a list of category pairs and a corpus of
//! subject / verb phrase / object triples, builds for every pair a
//! row-normalized matrix of how often two verb phrases link the same
//! subject/object instantiation.

pub mod config;
pub mod core;
pub mod emitter;
pub mod error;

pub use crate::config::OntextConfig;
pub use crate::core::engine::{OntextEngine, Report};
pub use crate::core::matrix::{CoOccurrenceCounts, CoOccurrenceMatrix};
pub use crate::core::types::{CategoryPair, InstanceSet, SvoRecord};
pub use crate::emitter::OutputFormat;
pub use crate::error::{OntextError, OntextResult};
