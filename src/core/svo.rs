// File: src/core/svo.rs
use crate::core::types::SvoRecord;
use crate::error::{OntextError, OntextResult};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Reads the whole SVO file into memory.
pub fn read_file(path: &Path) -> OntextResult<Vec<SvoRecord>> {
    let bytes = fs::read(path).map_err(|e| OntextError::io(path, e))?;
    let records = parse(path, &bytes)?;
    info!(records = records.len(), path = %path.display(), "svo records read");
    Ok(records)
}

/// Parses `subject \t verb phrase \t object \t frequency` lines.
///
/// Invalid UTF-8 is replaced with U+FFFD per line rather than rejected, so
/// stray Latin-1 in a corpus only affects the strings it appears in. Lines
/// that are whitespace only are skipped; anything else malformed is fatal.
pub fn parse(path: &Path, bytes: &[u8]) -> OntextResult<Vec<SvoRecord>> {
    let mut records = Vec::new();
    let mut replaced = 0usize;
    for (idx, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        let line = String::from_utf8_lossy(raw);
        if matches!(line, Cow::Owned(_)) {
            replaced += 1;
        }
        if is_blank(&line) {
            continue;
        }
        let record = parse_line(&line).map_err(|msg| OntextError::parse(path, idx + 1, msg))?;
        records.push(record);
    }
    if replaced > 0 {
        warn!(lines = replaced, path = %path.display(), "invalid utf-8 replaced in svo lines");
    }
    Ok(records)
}

// A line holding any tab is a record, however empty its fields.
fn is_blank(line: &str) -> bool {
    !line.contains('\t') && line.trim().is_empty()
}

fn parse_line(line: &str) -> Result<SvoRecord, String> {
    let mut fields = line.splitn(4, '\t');
    let (Some(subject), Some(verb_phrase), Some(object), Some(frequency)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err("expected four tab-separated fields".to_string());
    };

    // The last field runs to end of line.
    let raw = frequency.trim();
    let frequency = raw
        .parse::<u64>()
        .map_err(|_| format!("frequency '{raw}' is not a non-negative integer"))?;

    Ok(SvoRecord {
        subject: subject.to_string(),
        verb_phrase: verb_phrase.to_string(),
        object: object.to_string(),
        frequency,
    })
}
