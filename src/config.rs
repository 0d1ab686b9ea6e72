// File: src/config.rs
use crate::emitter::OutputFormat;
use crate::error::{OntextError, OntextResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Inputs and execution settings for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OntextConfig {
    pub categories_file: PathBuf,
    pub instances_dir: PathBuf,
    pub svo_file: PathBuf,
    /// Worker threads; rayon's default when unset.
    pub threads: Option<usize>,
    /// Also test the category pairs of each record in parallel.
    pub inner_parallel: bool,
    pub format: OutputFormat,
    /// Report destination; stdout when unset.
    pub output: Option<PathBuf>,
}

impl OntextConfig {
    pub fn new(
        categories_file: impl Into<PathBuf>,
        instances_dir: impl Into<PathBuf>,
        svo_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            categories_file: categories_file.into(),
            instances_dir: instances_dir.into(),
            svo_file: svo_file.into(),
            ..Self::default()
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_inner_parallel(mut self, enabled: bool) -> Self {
        self.inner_parallel = enabled;
        self
    }

    pub fn validate(&self) -> OntextResult<()> {
        if self.threads == Some(0) {
            return Err(OntextError::Config("thread count must be at least 1".into()));
        }
        Ok(())
    }
}
