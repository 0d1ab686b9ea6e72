// File: src/emitter.rs
use crate::core::engine::Report;
use crate::core::matrix::CoOccurrenceMatrix;
use crate::core::types::CategoryPair;
use crate::error::{OntextError, OntextResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Output representation of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated labels followed by the matrix rows.
    #[default]
    Text,
    /// One JSON object per category pair per line.
    Json,
}

/// Receives each category pair's labels and matrix in registry order.
pub trait Emitter {
    fn emit(&mut self, pair: &CategoryPair, matrix: &CoOccurrenceMatrix) -> OntextResult<()>;

    fn finish(&mut self) -> OntextResult<()> {
        Ok(())
    }
}

fn write_err(e: io::Error) -> OntextError {
    OntextError::Emit(e.to_string())
}

/// Formats like a C stream with default precision (`%g`): six significant
/// digits, trailing zeros dropped, scientific notation for exponents below -4
/// or from 6 up.
pub fn format_value(v: f64) -> String {
    if v == 0.0 || !v.is_finite() {
        return format!("{v}");
    }
    let sci = format!("{v:.5e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    if !(-4..6).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.abs());
    }
    let decimals = (5 - exp) as usize;
    trim_fraction(&format!("{v:.decimals$}")).to_string()
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

pub struct TextEmitter<W: Write> {
    out: W,
}

impl<W: Write> TextEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_block(&mut self, pair: &CategoryPair, matrix: &CoOccurrenceMatrix) -> io::Result<()> {
        writeln!(self.out, "# {} {}", pair.first, pair.second)?;
        for label in matrix.labels() {
            write!(self.out, "{label}\t")?;
        }
        writeln!(self.out)?;
        for row in matrix.rows() {
            for value in row {
                write!(self.out, "{}\t", format_value(value))?;
            }
            writeln!(self.out)?;
        }
        writeln!(self.out)?;
        writeln!(self.out)
    }
}

impl<W: Write> Emitter for TextEmitter<W> {
    fn emit(&mut self, pair: &CategoryPair, matrix: &CoOccurrenceMatrix) -> OntextResult<()> {
        self.write_block(pair, matrix).map_err(write_err)
    }

    fn finish(&mut self) -> OntextResult<()> {
        self.out.flush().map_err(write_err)
    }
}

#[derive(Serialize)]
struct JsonBlock<'a> {
    #[serde(flatten)]
    pair: &'a CategoryPair,
    labels: &'a [String],
    matrix: Vec<Vec<f64>>,
}

pub struct JsonEmitter<W: Write> {
    out: W,
}

impl<W: Write> JsonEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Emitter for JsonEmitter<W> {
    fn emit(&mut self, pair: &CategoryPair, matrix: &CoOccurrenceMatrix) -> OntextResult<()> {
        let block = JsonBlock {
            pair,
            labels: matrix.labels(),
            matrix: matrix.rows().collect(),
        };
        serde_json::to_writer(&mut self.out, &block)?;
        writeln!(self.out).map_err(write_err)
    }

    fn finish(&mut self) -> OntextResult<()> {
        self.out.flush().map_err(write_err)
    }
}

/// Sends every block of `report` to `emitter` in registry order.
pub fn emit_report(report: &Report, emitter: &mut dyn Emitter) -> OntextResult<()> {
    for (pair, matrix) in report.iter() {
        emitter.emit(pair, matrix)?;
    }
    emitter.finish()
}

fn emit_to<W: Write>(report: &Report, format: OutputFormat, out: W) -> OntextResult<()> {
    match format {
        OutputFormat::Text => emit_report(report, &mut TextEmitter::new(out)),
        OutputFormat::Json => emit_report(report, &mut JsonEmitter::new(out)),
    }
}

/// Writes the report to `path`, or stdout when absent. File output goes
/// through a temp file in the same directory and is renamed into place.
pub fn write_report(report: &Report, format: OutputFormat, path: Option<&Path>) -> OntextResult<()> {
    let Some(path) = path else {
        let stdout = io::stdout();
        return emit_to(report, format, BufWriter::new(stdout.lock()));
    };

    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir).map_err(|e| OntextError::io(parent_dir, e))?;

    let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| OntextError::io(parent_dir, e))?;
    emit_to(report, format, BufWriter::new(&temp_file))?;
    temp_file
        .persist(path)
        .map_err(|e| OntextError::io(path, e.error))?;
    Ok(())
}
