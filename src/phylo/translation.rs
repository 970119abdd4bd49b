//! Name to index numbering used when trees are written with numeric tip
//! references, as in a NEXUS `TRANSLATE` command.

use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TranslationTableError {
    #[error("No name is registered under translation index {0}.")]
    IndexNotFound(usize),
}

/// Bijection between leaf names and the indices `1..=len()`.
///
/// Indices are only ever handed out by [add_name](TranslationTable::add_name)
/// and [alphabetize](TranslationTable::alphabetize), which keeps them dense.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TranslationTable {
    indices: FxHashMap<String, usize>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` under the next free index unless it is already
    /// present. Returns the index of `name` either way.
    pub fn add_name(&mut self, name: &str) -> usize {
        if let Some(&index) = self.indices.get(name) {
            return index;
        }
        let index = self.indices.len() + 1;
        let _ = self.indices.insert(name.to_string(), index);
        index
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    pub fn get_name(&self, index: usize) -> Result<&str, TranslationTableError> {
        self.indices
            .iter()
            .find(|&(_, &i)| i == index)
            .map(|(name, _)| name.as_str())
            .ok_or(TranslationTableError::IndexNotFound(index))
    }

    /// `(index, name)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        let mut entries: Vec<(usize, &str)> = self
            .indices
            .iter()
            .map(|(name, &index)| (index, name.as_str()))
            .collect();
        entries.sort_unstable_by_key(|&(index, _)| index);
        debug_assert!(entries.iter().enumerate().all(|(i, &(index, _))| index == i + 1));
        entries.into_iter()
    }

    /// Names in index order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|(_, name)| name).collect()
    }

    /// Renumbers every name in sorted order.
    pub fn alphabetize(&mut self) {
        let mut names: Vec<String> = self.indices.drain().map(|(name, _)| name).collect();
        names.sort();
        for (i, name) in names.into_iter().enumerate() {
            let _ = self.indices.insert(name, i + 1);
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }
}
