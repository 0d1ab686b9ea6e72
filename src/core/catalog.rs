// File: src/core/catalog.rs
use crate::core::types::InstanceSet;
use crate::error::{OntextError, OntextResult};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

type Slot = Arc<Mutex<Option<Arc<InstanceSet>>>>;

/// Lazily loaded, per-category instance sets.
///
/// Each category has its own slot. The first caller for a category holds the
/// slot lock while reading the file, so concurrent callers for the same
/// category wait and then share the loaded set; callers for other categories
/// are not blocked.
pub struct InstanceCatalog {
    directory: PathBuf,
    slots: DashMap<String, Slot>,
}

impl InstanceCatalog {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            slots: DashMap::new(),
        }
    }

    /// Returns the instance set of `category`, reading it on first request.
    pub fn load_or_get(&self, category: &str) -> OntextResult<Arc<InstanceSet>> {
        // Clone the slot out so the map shard is released before file IO.
        let slot: Slot = self.slots.entry(category.to_string()).or_default().clone();

        let mut guard = slot.lock();
        if let Some(set) = guard.as_ref() {
            return Ok(Arc::clone(set));
        }

        let set = Arc::new(self.read_instances(category)?);
        debug!(category, instances = set.len(), "loaded instance set");
        *guard = Some(Arc::clone(&set));
        Ok(set)
    }

    /// Number of categories loaded so far.
    pub fn loaded(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.value().lock().is_some())
            .count()
    }

    fn read_instances(&self, category: &str) -> OntextResult<InstanceSet> {
        let path = self.directory.join(category);
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => OntextError::MissingCategory {
                category: category.to_string(),
                path: path.clone(),
            },
            _ => OntextError::io(&path, e),
        })?;
        // Decoded the same lossy way as the SVO corpus so non-UTF-8 instances still match.
        Ok(String::from_utf8_lossy(&bytes).split_whitespace().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn catalog_with(files: &[(&str, &str)]) -> (tempfile::TempDir, InstanceCatalog) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            fs::write(dir.path().join(name), body).unwrap();
        }
        let catalog = InstanceCatalog::new(dir.path());
        (dir, catalog)
    }

    #[test]
    fn reads_whitespace_separated_instances() {
        let (_dir, catalog) = catalog_with(&[("city", "paris tokyo\n\n  berlin\tparis\n")]);
        let set = catalog.load_or_get("city").unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains("berlin"));
        assert!(!set.contains("france"));
    }

    #[test]
    fn second_request_returns_cached_set() {
        let (dir, catalog) = catalog_with(&[("city", "paris")]);
        let first = catalog.load_or_get("city").unwrap();
        fs::remove_file(dir.path().join("city")).unwrap();
        let second = catalog.load_or_get("city").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(catalog.loaded(), 1);
    }

    #[test]
    fn missing_file_is_fatal() {
        let (_dir, catalog) = catalog_with(&[]);
        let err = catalog.load_or_get("country").unwrap_err();
        assert!(matches!(err, OntextError::MissingCategory { ref category, .. } if category == "country"));
        assert_eq!(catalog.loaded(), 0);
    }

    #[test]
    fn empty_file_gives_empty_set() {
        let (_dir, catalog) = catalog_with(&[("empty", "")]);
        assert!(catalog.load_or_get("empty").unwrap().is_empty());
    }

    #[test]
    fn non_utf8_instances_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("city"), b"paris m\xfcnchen\n").unwrap();
        let catalog = InstanceCatalog::new(dir.path());
        let set = catalog.load_or_get("city").unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("m\u{fffd}nchen"));
    }

    #[test]
    fn concurrent_first_loads_share_one_set() {
        let (_dir, catalog) = catalog_with(&[("city", "paris tokyo")]);
        let sets: Vec<Arc<InstanceSet>> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| catalog.load_or_get("city").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(sets.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
