//! Catalog Index - merged, precedence-resolved lookups over loaded documents.
//!
//! The index is built from a primary catalog, the catalogs it imports and an
//! optional base rules document. Each table is filled in precedence order
//! and an existing key is never overwritten, so the primary catalog shadows
//! imports, which shadow the base rules.

mod library;
mod resolver;

pub use library::*;
pub use resolver::*;

use catalog_rules::{Document, Entry, Profile, Rule};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use crate::error::ReminderError;

/// Result of resolving a free-text unit name.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    Found(&'a Entry),
    /// Several units matched; carries their display names.
    Ambiguous(Vec<String>),
    NotFound,
}

impl<'a> Resolution<'a> {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    /// Turn the resolution into a `Result`, naming the query on failure.
    pub fn into_result(self, query: &str) -> Result<&'a Entry, ReminderError> {
        match self {
            Resolution::Found(entry) => Ok(entry),
            Resolution::Ambiguous(candidates) => Err(ReminderError::Ambiguous {
                query: query.to_string(),
                candidates,
            }),
            Resolution::NotFound => Err(ReminderError::NotFound {
                query: query.to_string(),
            }),
        }
    }
}

/// Unified lookup tables for one query session.
///
/// Units and detachments are keyed by lower-cased name, rules and profiles by
/// id. The index owns copies of everything it indexes and is read-only once
/// built.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    units: BTreeMap<String, Entry>,
    detachments: BTreeMap<String, Entry>,
    rules: HashMap<String, Rule>,
    profiles: HashMap<String, Profile>,
    /// Names of the documents merged, in precedence order.
    sources: Vec<String>,
}

impl CatalogIndex {
    /// Merge documents into one index.
    ///
    /// Units and detachments come from `primary` then `imported`; rules and
    /// profiles also fall through to `base`.
    pub fn build<'d, I>(primary: &Document, imported: I, base: Option<&Document>) -> Self
    where
        I: IntoIterator<Item = &'d Document>,
    {
        let mut index = Self::default();

        index.absorb_entries(primary);
        index.absorb_shared(primary);
        for doc in imported {
            index.absorb_entries(doc);
            index.absorb_shared(doc);
        }
        if let Some(base) = base {
            index.absorb_shared(base);
        }

        info!(
            sources = ?index.sources,
            units = index.units.len(),
            detachments = index.detachments.len(),
            rules = index.rules.len(),
            profiles = index.profiles.len(),
            "catalog index built"
        );

        index
    }

    fn absorb_entries(&mut self, doc: &Document) {
        for entry in doc.units() {
            let key = entry.name.to_lowercase();
            if !is_blank(&key) {
                self.units.entry(key).or_insert_with(|| entry.clone());
            }
        }
        for detachment in doc.detachments() {
            let key = detachment.name.to_lowercase();
            if !is_blank(&key) {
                self.detachments
                    .entry(key)
                    .or_insert_with(|| detachment.clone());
            }
        }
    }

    fn absorb_shared(&mut self, doc: &Document) {
        self.sources.push(doc.name().to_string());
        for rule in &doc.shared_rules {
            if !is_blank(&rule.id) {
                self.rules
                    .entry(rule.id.clone())
                    .or_insert_with(|| rule.clone());
            }
        }
        for profile in &doc.shared_profiles {
            if !is_blank(&profile.id) {
                self.profiles
                    .entry(profile.id.clone())
                    .or_insert_with(|| profile.clone());
            }
        }
    }

    /// Unit by exact (case-insensitive) name.
    pub fn unit(&self, name: &str) -> Option<&Entry> {
        self.units.get(&name.trim().to_lowercase())
    }

    /// Detachment by exact (case-insensitive) name.
    pub fn detachment(&self, name: &str) -> Option<&Entry> {
        self.detachments.get(&name.trim().to_lowercase())
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.get(id)
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.get(id)
    }

    /// All indexed units, ordered by lower-cased name.
    pub fn units(&self) -> impl Iterator<Item = &Entry> {
        self.units.values()
    }

    /// Display names of all units, ordered case-insensitively.
    pub fn unit_names(&self) -> Vec<&str> {
        self.units.values().map(|e| e.name.as_str()).collect()
    }

    /// Display names of all detachments, ordered case-insensitively.
    pub fn detachment_names(&self) -> Vec<&str> {
        self.detachments.values().map(|e| e.name.as_str()).collect()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Resolve a unit name with the standard tiers.
    pub fn resolve_unit(&self, name: &str) -> Resolution<'_> {
        self.resolve_unit_with(name, &NameMatcher::standard())
    }

    /// Resolve a unit name with a caller-supplied tier list.
    pub fn resolve_unit_with(&self, name: &str, matcher: &NameMatcher) -> Resolution<'_> {
        let pool: Vec<(&str, &Entry)> = self.units.iter().map(|(k, v)| (k.as_str(), v)).collect();
        match matcher.find(name, &pool) {
            NameMatch::Found { item, .. } => Resolution::Found(item),
            NameMatch::Ambiguous(hits) => {
                Resolution::Ambiguous(hits.into_iter().map(|e| e.name.clone()).collect())
            }
            NameMatch::NoMatch => Resolution::NotFound,
        }
    }
}

/// Blank keys cannot be looked up, so they are never indexed.
fn is_blank(key: &str) -> bool {
    key.trim().is_empty()
}

/// Build an index from a primary document, its imports and the base rules.
pub fn build_index<'d, I>(primary: &Document, imported: I, base: Option<&Document>) -> CatalogIndex
where
    I: IntoIterator<Item = &'d Document>,
{
    CatalogIndex::build(primary, imported, base)
}

/// Resolve a unit name against an index.
pub fn resolve_unit<'a>(index: &'a CatalogIndex, name: &str) -> Resolution<'a> {
    index.resolve_unit(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_rules::{EntryKind, Group};

    fn unit(id: &str, name: &str) -> Entry {
        Entry::new(id, name, EntryKind::Unit)
    }

    fn primary() -> Document {
        Document::new("sm", "Imperium - Space Marines")
            .with_entry(unit("u1", "Intercessor Squad"))
            .with_entry(Entry::new("u2", "Captain", EntryKind::Model))
            .with_entry(Entry::new("w1", "Bolt Rifle", EntryKind::Upgrade))
            .with_rule(Rule::new("r1", "Oath of Moment", "Primary text"))
            .with_group(
                Group::new("g1", "Detachment")
                    .with_entry(Entry::new("d1", "Gladius Task Force", EntryKind::Upgrade)),
            )
    }

    fn imported() -> Document {
        Document::new("aoi", "Imperium - Agents of the Imperium")
            .with_entry(unit("u9", "captain"))
            .with_entry(unit("u3", "Inquisitor"))
            .with_rule(Rule::new("r1", "Oath of Moment", "Imported text"))
            .with_rule(Rule::new("r2", "Assigned Agents", "Imported only"))
            .with_group(
                Group::new("g2", "Detachment")
                    .with_entry(Entry::new("d2", "Gladius Task Force", EntryKind::Upgrade))
                    .with_entry(Entry::new("d3", "Inquisitorial Retinue", EntryKind::Upgrade)),
            )
    }

    fn base() -> Document {
        Document::new("gst", "Warhammer 40,000")
            .with_rule(Rule::new("r2", "Assigned Agents", "Base text"))
            .with_rule(Rule::new("r3", "Deep Strike", "Base only"))
            .with_entry(unit("u99", "Base Unit"))
    }

    #[test]
    fn test_primary_shadows_imported_rule() {
        let (p, i) = (primary(), imported());
        let index = CatalogIndex::build(&p, [&i], None);
        assert_eq!(index.rule("r1").unwrap().description, "Primary text");
        assert_eq!(index.rule("r2").unwrap().description, "Imported only");
    }

    #[test]
    fn test_imported_shadows_base_rule() {
        let (p, i, b) = (primary(), imported(), base());
        let index = CatalogIndex::build(&p, [&i], Some(&b));
        assert_eq!(index.rule("r2").unwrap().description, "Imported only");
        assert_eq!(index.rule("r3").unwrap().description, "Base only");
        assert_eq!(index.rule_count(), 3);
    }

    #[test]
    fn test_base_contributes_no_units() {
        let (p, b) = (primary(), base());
        let index = CatalogIndex::build(&p, [], Some(&b));
        assert!(index.unit("Base Unit").is_none());
        assert_eq!(index.sources(), &["Imperium - Space Marines", "Warhammer 40,000"]);
    }

    #[test]
    fn test_units_keep_primary_definition() {
        let (p, i) = (primary(), imported());
        let index = CatalogIndex::build(&p, [&i], None);
        assert_eq!(index.unit("CAPTAIN").unwrap().id, "u2");
        assert_eq!(index.unit("inquisitor").unwrap().id, "u3");
        assert!(index.unit("Bolt Rifle").is_none());
        assert_eq!(index.unit_count(), 3);
    }

    #[test]
    fn test_detachments_merge_with_precedence() {
        let (p, i) = (primary(), imported());
        let index = CatalogIndex::build(&p, [&i], None);
        assert_eq!(index.detachment("gladius task force").unwrap().id, "d1");
        assert_eq!(
            index.detachment_names(),
            vec!["Gladius Task Force", "Inquisitorial Retinue"]
        );
    }

    #[test]
    fn test_unit_names_sorted() {
        let (p, i) = (primary(), imported());
        let index = CatalogIndex::build(&p, [&i], None);
        assert_eq!(index.unit_names(), vec!["Captain", "Inquisitor", "Intercessor Squad"]);
    }

    #[test]
    fn test_resolve_tiers() {
        let (p, i) = (primary(), imported());
        let index = CatalogIndex::build(&p, [&i], None);

        match index.resolve_unit("intercessor") {
            Resolution::Found(entry) => assert_eq!(entry.name, "Intercessor Squad"),
            other => panic!("unexpected {:?}", other),
        }
        match index.resolve_unit("s") {
            Resolution::Ambiguous(names) => {
                assert_eq!(names, vec!["Inquisitor", "Intercessor Squad"])
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(index.resolve_unit("Librarian"), Resolution::NotFound);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let p = primary();
        let index = CatalogIndex::build(&p, [], None);
        let first = index.resolve_unit("squad");
        let second = index.resolve_unit("squad");
        assert_eq!(first, second);
        if let (Resolution::Found(a), Resolution::Found(b)) = (first, second) {
            assert!(std::ptr::eq(a, b));
        } else {
            panic!("expected a match");
        }
    }

    #[test]
    fn test_into_result() {
        let p = primary();
        let index = CatalogIndex::build(&p, [], None);
        let err = index.resolve_unit("nobody").into_result("nobody").unwrap_err();
        assert_eq!(
            err,
            ReminderError::NotFound {
                query: "nobody".to_string()
            }
        );
    }
}
