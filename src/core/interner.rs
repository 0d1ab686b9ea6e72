// File: src/core/interner.rs
use crate::core::types::{InstanceSet, Symbol};
use std::collections::{HashMap, HashSet};

/// String table mapping corpus strings to dense `Symbol` handles.
#[derive(Debug, Default, Clone)]
pub struct Interner {
    ids: HashMap<String, Symbol>,
    strings: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&id) = self.ids.get(s) {
            return id;
        }
        let id = self.strings.len() as Symbol;
        self.strings.push(s.to_string());
        self.ids.insert(s.to_string(), id);
        id
    }

    pub fn lookup(&self, s: &str) -> Option<Symbol> {
        self.ids.get(s).copied()
    }

    pub fn resolve(&self, id: Symbol) -> &str {
        &self.strings[id as usize]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Symbols of the instances that occur in the corpus. Instances that were
    /// never interned cannot match any record and are dropped.
    pub fn project(&self, set: &InstanceSet) -> HashSet<Symbol> {
        set.iter().filter_map(|s| self.lookup(s)).collect()
    }
}
