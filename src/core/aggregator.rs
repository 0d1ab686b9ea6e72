// File: src/core/aggregator.rs
use crate::core::catalog::InstanceCatalog;
use crate::core::interner::Interner;
use crate::core::types::{CategoryPair, PairIndex, SubjectObjectKey, SvoRecord, Symbol};
use crate::error::OntextResult;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Verb phrase -> accumulated frequency for one subject/object key.
pub type ContextCounter = HashMap<Symbol, u64>;

/// All context counters of one category pair.
pub type PairCounters = HashMap<SubjectObjectKey, ContextCounter>;

#[derive(Debug, Clone, Copy)]
struct InternedRecord {
    subject: Symbol,
    verb_phrase: Symbol,
    object: Symbol,
    frequency: u64,
}

/// SVO records with every string interned.
#[derive(Debug, Default)]
pub struct Corpus {
    interner: Interner,
    records: Vec<InternedRecord>,
}

impl Corpus {
    pub fn from_records(records: Vec<SvoRecord>) -> Self {
        let mut interner = Interner::new();
        let records = records
            .into_iter()
            .map(|r| InternedRecord {
                subject: interner.intern(&r.subject),
                verb_phrase: interner.intern(&r.verb_phrase),
                object: interner.intern(&r.object),
                frequency: r.frequency,
            })
            .collect();
        Self { interner, records }
    }
}

/// Instance sets of one category pair, projected onto the corpus symbols.
struct PairFilter {
    first: HashSet<Symbol>,
    second: HashSet<Symbol>,
}

impl PairFilter {
    /// How many subject/object role assignments the record satisfies.
    /// Each one adds the record's frequency, so a record matching both
    /// orientations is counted twice under the same key.
    fn orientations(&self, subject: Symbol, object: Symbol) -> usize {
        let forward = self.first.contains(&subject) && self.second.contains(&object);
        let backward = self.second.contains(&subject) && self.first.contains(&object);
        forward as usize + backward as usize
    }
}

/// Aggregated context counters, one slot per category pair in registry order.
#[derive(Debug, Default)]
pub struct ContextStore {
    interner: Interner,
    pairs: Vec<PairCounters>,
}

impl ContextStore {
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Raw counters of one pair, keyed by interned handles.
    pub fn counters(&self, pair: PairIndex) -> &PairCounters {
        &self.pairs[pair]
    }

    /// Subject/object keys recorded for `pair`.
    pub fn keys(&self, pair: PairIndex) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.pairs[pair]
            .keys()
            .map(|&(s, o)| (self.interner.resolve(s), self.interner.resolve(o)))
    }

    /// The context counter of `(subject, object)` under `pair`, resolved to strings.
    pub fn counter(&self, pair: PairIndex, subject: &str, object: &str) -> Option<HashMap<&str, u64>> {
        let key = (self.interner.lookup(subject)?, self.interner.lookup(object)?);
        let counter = self.pairs.get(pair)?.get(&key)?;
        Some(
            counter
                .iter()
                .map(|(&verb, &count)| (self.interner.resolve(verb), count))
                .collect(),
        )
    }

    /// Distinct verb phrases seen for `pair`, sorted lexicographically.
    pub fn vocabulary(&self, pair: PairIndex) -> Vec<&str> {
        let mut vocab: Vec<&str> = self.pairs[pair]
            .values()
            .flat_map(|counter| counter.keys())
            .collect::<HashSet<_>>()
            .into_iter()
            .map(|&verb| self.interner.resolve(verb))
            .collect();
        vocab.sort_unstable();
        vocab
    }
}

fn empty_partial(n: usize) -> Vec<PairCounters> {
    vec![PairCounters::new(); n]
}

fn add(partial: &mut [PairCounters], pair: PairIndex, record: &InternedRecord) {
    let counter = partial[pair]
        .entry((record.subject, record.object))
        .or_default();
    let slot = counter.entry(record.verb_phrase).or_insert(0);
    *slot = slot.saturating_add(record.frequency);
}

fn merge(mut into: Vec<PairCounters>, from: Vec<PairCounters>) -> Vec<PairCounters> {
    for (target, source) in into.iter_mut().zip(from) {
        for (key, counter) in source {
            let merged = target.entry(key).or_default();
            for (verb, count) in counter {
                let slot = merged.entry(verb).or_insert(0);
                *slot = slot.saturating_add(count);
            }
        }
    }
    into
}

/// Accumulates every record into the counters of every category pair it matches.
///
/// Records are folded into per-worker partial stores which are then reduced;
/// summation is commutative so the result does not depend on scheduling.
/// With `inner_parallel` the pairs of a single record are also tested in parallel.
pub fn aggregate(
    corpus: Corpus,
    pairs: &[CategoryPair],
    catalog: &InstanceCatalog,
    inner_parallel: bool,
) -> OntextResult<ContextStore> {
    let Corpus { interner, records } = corpus;

    let filters = pairs
        .iter()
        .map(|pair| -> OntextResult<PairFilter> {
            let first = catalog.load_or_get(&pair.first)?;
            let second = catalog.load_or_get(&pair.second)?;
            Ok(PairFilter {
                first: interner.project(&first),
                second: interner.project(&second),
            })
        })
        .collect::<OntextResult<Vec<_>>>()?;

    let n = filters.len();
    let counters = records
        .par_iter()
        .fold(
            || empty_partial(n),
            |mut partial, record| {
                if inner_parallel {
                    let hits: Vec<(PairIndex, usize)> = filters
                        .par_iter()
                        .enumerate()
                        .map(|(idx, f)| (idx, f.orientations(record.subject, record.object)))
                        .filter(|&(_, times)| times > 0)
                        .collect();
                    for (idx, times) in hits {
                        for _ in 0..times {
                            add(&mut partial, idx, record);
                        }
                    }
                } else {
                    for (idx, filter) in filters.iter().enumerate() {
                        for _ in 0..filter.orientations(record.subject, record.object) {
                            add(&mut partial, idx, record);
                        }
                    }
                }
                partial
            },
        )
        .reduce(|| empty_partial(n), merge);

    for (pair, pair_counters) in pairs.iter().zip(&counters) {
        debug!(
            first = %pair.first,
            second = %pair.second,
            keys = pair_counters.len(),
            "pair aggregated"
        );
    }
    info!(
        records = records.len(),
        pairs = n,
        "aggregation finished"
    );

    Ok(ContextStore {
        interner,
        pairs: counters,
    })
}
