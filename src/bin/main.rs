use anyhow::Context;
use clap::Parser;
use ontext_core::emitter::write_report;
use ontext_core::{OntextConfig, OntextEngine, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builds per category pair context co-occurrence matrices from an SVO corpus.
#[derive(Parser)]
#[command(name = "ontext")]
#[command(version)]
struct Cli {
    /// File of `category1 category2 tag` lines
    categories_file: PathBuf,

    /// Directory holding one instance file per category name
    instances_dir: PathBuf,

    /// Tab-separated `subject verb-phrase object frequency` file
    svo_file: PathBuf,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Also test the category pairs of each record in parallel
    #[arg(long)]
    inner_parallel: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_level.clone().into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = OntextConfig {
        categories_file: cli.categories_file,
        instances_dir: cli.instances_dir,
        svo_file: cli.svo_file,
        threads: cli.threads,
        inner_parallel: cli.inner_parallel,
        format: cli.format,
        output: cli.output,
    };

    let engine = OntextEngine::new(config)?;
    let report = engine.run()?;

    // TODO: cluster each matrix into relations instead of printing it.
    let config = engine.config();
    write_report(&report, config.format, config.output.as_deref())
        .context("failed to write report")?;
    Ok(())
}
