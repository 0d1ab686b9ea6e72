use crate::config::OntextConfig;
use crate::core::aggregator::{aggregate, Corpus};
use crate::core::catalog::InstanceCatalog;
use crate::core::matrix::{self, CoOccurrenceMatrix};
use crate::core::types::CategoryPair;
use crate::core::{registry, svo};
use crate::error::{OntextError, OntextResult};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::info;

/// Category pairs with their matrices, in registry order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    blocks: Vec<(CategoryPair, CoOccurrenceMatrix)>,
}

impl Report {
    pub fn new(blocks: Vec<(CategoryPair, CoOccurrenceMatrix)>) -> Self {
        Self { blocks }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CategoryPair, &CoOccurrenceMatrix)> {
        self.blocks.iter().map(|(pair, matrix)| (pair, matrix))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<(&CategoryPair, &CoOccurrenceMatrix)> {
        self.blocks.get(idx).map(|(pair, matrix)| (pair, matrix))
    }
}

// The engine owns the catalog; everything else is built per run and dropped.
pub struct OntextEngine {
    config: OntextConfig,
    catalog: InstanceCatalog,
}

impl OntextEngine {
    pub fn new(config: OntextConfig) -> OntextResult<Self> {
        config.validate()?;
        let catalog = InstanceCatalog::new(&config.instances_dir);
        Ok(Self { config, catalog })
    }

    pub fn config(&self) -> &OntextConfig {
        &self.config
    }

    /// Runs catalog/registry loading, aggregation and matrix building on a
    /// dedicated worker pool. Any error aborts the whole run.
    pub fn run(&self) -> OntextResult<Report> {
        let pool = self.thread_pool()?;
        info!(threads = pool.current_num_threads(), "starting run");
        pool.install(|| self.run_stages())
    }

    fn thread_pool(&self) -> OntextResult<ThreadPool> {
        ThreadPoolBuilder::new()
            .num_threads(self.config.threads.unwrap_or(0))
            .build()
            .map_err(|e| OntextError::Config(e.to_string()))
    }

    fn run_stages(&self) -> OntextResult<Report> {
        let pairs = registry::load(&self.config.categories_file, &self.catalog)?;
        let corpus = Corpus::from_records(svo::read_file(&self.config.svo_file)?);
        let store = aggregate(corpus, &pairs, &self.catalog, self.config.inner_parallel)?;
        let matrices = matrix::build(&store, &pairs);

        info!(pairs = pairs.len(), "matrices built");
        Ok(Report::new(pairs.into_iter().zip(matrices).collect()))
    }
}
