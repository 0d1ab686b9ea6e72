// src/core/types.rs
use serde::Serialize;
use std::collections::HashSet;

/// Interned handle for a subject, object or verb-phrase string.
pub type Symbol = u32;

/// Position of a category pair in registry order.
pub type PairIndex = usize;

/// A (subject, object) instantiation, scoped to one category pair.
pub type SubjectObjectKey = (Symbol, Symbol);

/// An ordered pair of category names read from the category pair file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CategoryPair {
    pub first: String,
    pub second: String,
    /// Numeric tag from the input file. Kept for format compatibility only.
    pub tag: i64,
}

impl CategoryPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>, tag: i64) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            tag,
        }
    }
}

/// One subject / verb phrase / object line of the SVO file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvoRecord {
    pub subject: String,
    pub verb_phrase: String,
    pub object: String,
    pub frequency: u64,
}

/// The known instances (seeds) of one category. Used only for membership tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceSet {
    instances: HashSet<String>,
}

impl InstanceSet {
    pub fn contains(&self, instance: &str) -> bool {
        self.instances.contains(instance)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.instances.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for InstanceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            instances: iter.into_iter().map(Into::into).collect(),
        }
    }
}
