// File: src/core/registry.rs
use crate::core::catalog::InstanceCatalog;
use crate::core::types::CategoryPair;
use crate::error::{OntextError, OntextResult};
use std::fs;
use std::path::Path;
use tracing::info;

/// Reads the category pair file in source order.
///
/// Each non-blank line is `category1 category2 tag`. Both categories are
/// resolved through the catalog as they are read, so a missing instance file
/// fails the load. Duplicate pairs are kept.
pub fn load(path: &Path, catalog: &InstanceCatalog) -> OntextResult<Vec<CategoryPair>> {
    let text = fs::read_to_string(path).map_err(|e| OntextError::io(path, e))?;
    let pairs = parse(path, &text)?;

    for pair in &pairs {
        catalog.load_or_get(&pair.first)?;
        catalog.load_or_get(&pair.second)?;
    }

    info!(
        pairs = pairs.len(),
        categories = catalog.loaded(),
        "category pairs loaded"
    );
    Ok(pairs)
}

/// Parses category pair records without touching the catalog.
pub fn parse(path: &Path, text: &str) -> OntextResult<Vec<CategoryPair>> {
    let mut pairs = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [first, second, tag] => {
                let tag = tag.parse::<i64>().map_err(|_| {
                    OntextError::parse(path, idx + 1, format!("tag '{tag}' is not an integer"))
                })?;
                pairs.push(CategoryPair::new(*first, *second, tag));
            }
            other => {
                return Err(OntextError::parse(
                    path,
                    idx + 1,
                    format!("expected 'category1 category2 tag', found {} fields", other.len()),
                ))
            }
        }
    }
    Ok(pairs)
}
