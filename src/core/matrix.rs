// File: src/core/matrix.rs
use crate::core::aggregator::{ContextStore, PairCounters};
use crate::core::interner::Interner;
use crate::core::types::{CategoryPair, Symbol};
use ndarray::Array2;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Context-by-context co-occurrence counts of one category pair, before
/// normalization. Symmetric, with every diagonal cell at least 1.
#[derive(Debug, Clone, PartialEq)]
pub struct CoOccurrenceCounts {
    labels: Vec<String>,
    counts: Array2<u64>,
}

impl CoOccurrenceCounts {
    /// Counts, for every pair of contexts, the number of subject/object keys
    /// in which both were attested. Frequencies are ignored; only presence
    /// in a key's counter matters.
    pub fn from_counters(counters: &PairCounters, interner: &Interner) -> Self {
        let mut vocab: Vec<Symbol> = counters
            .values()
            .flat_map(|counter| counter.keys().copied())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        vocab.sort_unstable_by(|&a, &b| interner.resolve(a).cmp(interner.resolve(b)));

        let index: HashMap<Symbol, usize> =
            vocab.iter().enumerate().map(|(i, &verb)| (verb, i)).collect();

        let n = vocab.len();
        let mut counts = Array2::<u64>::zeros((n, n));
        let mut present = Vec::new();
        for counter in counters.values() {
            present.clear();
            present.extend(counter.keys().map(|verb| index[verb]));
            for &i in &present {
                for &j in &present {
                    counts[[i, j]] += 1;
                }
            }
        }

        Self {
            labels: vocab
                .into_iter()
                .map(|verb| interner.resolve(verb).to_string())
                .collect(),
            counts,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> u64 {
        self.counts[[row, col]]
    }

    pub fn counts(&self) -> &Array2<u64> {
        &self.counts
    }

    /// Divides every row by its sum. The result is no longer symmetric in
    /// general: rows with different totals scale differently.
    pub fn normalize(self) -> CoOccurrenceMatrix {
        let mut values = self.counts.mapv(|c| c as f64);
        for mut row in values.rows_mut() {
            let sum: f64 = row.iter().sum();
            if sum > 0.0 {
                row.mapv_inplace(|v| v / sum);
            }
        }
        CoOccurrenceMatrix {
            labels: self.labels,
            values,
        }
    }
}

/// Row-normalized co-occurrence matrix; rows and columns follow `labels`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoOccurrenceMatrix {
    labels: Vec<String>,
    values: Array2<f64>,
}

impl CoOccurrenceMatrix {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[[row, col]]
    }

    pub fn row_sum(&self, row: usize) -> f64 {
        self.values.row(row).sum()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        self.values.rows().into_iter().map(|row| row.to_vec())
    }
}

/// Builds the raw counts of every pair, in registry order.
pub fn build_counts(store: &ContextStore, pairs: &[CategoryPair]) -> Vec<CoOccurrenceCounts> {
    (0..pairs.len().min(store.pair_count()))
        .into_par_iter()
        .map(|idx| CoOccurrenceCounts::from_counters(store.counters(idx), store.interner()))
        .collect()
}

/// Builds the normalized matrix of every pair, in registry order.
pub fn build(store: &ContextStore, pairs: &[CategoryPair]) -> Vec<CoOccurrenceMatrix> {
    let matrices: Vec<CoOccurrenceMatrix> = build_counts(store, pairs)
        .into_par_iter()
        .map(CoOccurrenceCounts::normalize)
        .collect();

    for (pair, matrix) in pairs.iter().zip(&matrices) {
        debug!(
            first = %pair.first,
            second = %pair.second,
            contexts = matrix.len(),
            "matrix built"
        );
    }
    matrices
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn counters(entries: &[(&str, &str, &[(&str, u64)])]) -> (Interner, PairCounters) {
        let mut interner = Interner::new();
        let mut counters = PairCounters::new();
        for (s, o, verbs) in entries {
            let key = (interner.intern(s), interner.intern(o));
            let counter = counters.entry(key).or_default();
            for (verb, n) in verbs.iter() {
                counter.insert(interner.intern(verb), *n);
            }
        }
        (interner, counters)
    }

    #[test]
    fn single_context_is_identity() {
        let (interner, c) = counters(&[("paris", "france", &[("is capital of", 5)])]);
        let matrix = CoOccurrenceCounts::from_counters(&c, &interner).normalize();
        assert_eq!(matrix.labels(), ["is capital of"]);
        assert_eq!(matrix.values(), &array![[1.0]]);
    }

    #[test]
    fn two_contexts_same_key() {
        let (interner, c) = counters(&[(
            "paris",
            "france",
            &[("is capital of", 5), ("located in", 3)],
        )]);
        let counts = CoOccurrenceCounts::from_counters(&c, &interner);
        assert_eq!(counts.labels(), ["is capital of", "located in"]);
        assert_eq!(counts.counts(), &array![[1u64, 1], [1, 1]]);

        let matrix = counts.normalize();
        assert_eq!(matrix.values(), &array![[0.5, 0.5], [0.5, 0.5]]);
    }

    #[test]
    fn counts_keys_not_frequencies() {
        let (interner, c) = counters(&[
            ("paris", "france", &[("a", 100), ("b", 1)]),
            ("tokyo", "japan", &[("a", 7)]),
            ("lyon", "france", &[("a", 1), ("c", 2)]),
        ]);
        let counts = CoOccurrenceCounts::from_counters(&c, &interner);
        assert_eq!(counts.labels(), ["a", "b", "c"]);
        assert_eq!(counts.counts(), &array![[3u64, 1, 1], [1, 1, 0], [1, 0, 1]]);
    }

    #[test]
    fn normalized_rows_sum_to_one_but_lose_symmetry() {
        let (interner, c) = counters(&[
            ("paris", "france", &[("a", 1), ("b", 1)]),
            ("tokyo", "japan", &[("a", 1)]),
        ]);
        let counts = CoOccurrenceCounts::from_counters(&c, &interner);
        assert_eq!(counts.get(0, 1), counts.get(1, 0));

        let matrix = counts.normalize();
        for row in 0..matrix.len() {
            assert!((matrix.row_sum(row) - 1.0).abs() < 1e-9);
        }
        // Row "a" has total 3, row "b" total 2.
        assert!((matrix.get(0, 1) - 1.0 / 3.0).abs() < 1e-12);
        assert!((matrix.get(1, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn labels_are_lexicographic() {
        let (interner, c) = counters(&[("s", "o", &[("zeta", 1), ("alpha", 1), ("Mid", 1)])]);
        let counts = CoOccurrenceCounts::from_counters(&c, &interner);
        assert_eq!(counts.labels(), ["Mid", "alpha", "zeta"]);
    }

    #[test]
    fn empty_pair_gives_empty_matrix() {
        let matrix = CoOccurrenceCounts::from_counters(&PairCounters::new(), &Interner::new()).normalize();
        assert!(matrix.is_empty());
        assert_eq!(matrix.rows().count(), 0);
    }
}
