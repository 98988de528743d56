//! Seen-set for one aggregation pass.
//!
//! The same ability often reaches a unit twice: embedded in the unit and
//! again through a link to the army-wide rule. Entries are keyed by scope,
//! name and a description prefix. Detachment abilities get their own scope
//! so they never collide with a same-named unit or army entry.

use catalog_rules::Provenance;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DedupScope {
    Shared,
    Detachment,
}

impl From<Provenance> for DedupScope {
    fn from(source: Provenance) -> Self {
        match source {
            Provenance::Detachment => DedupScope::Detachment,
            Provenance::Unit | Provenance::ArmyRule | Provenance::ArmyAbility => DedupScope::Shared,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub scope: DedupScope,
    pub name: String,
    pub prefix: String,
}

impl DedupKey {
    pub fn new(source: Provenance, name: &str, description: &str, prefix_len: usize) -> Self {
        Self {
            scope: source.into(),
            name: name.to_string(),
            prefix: description.chars().take(prefix_len).collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SeenSet {
    keys: HashSet<DedupKey>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time a key is offered.
    pub fn insert(&mut self, key: DedupKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
