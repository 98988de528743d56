//! Reminder Aggregator - everything a player must remember for one unit.
//!
//! The aggregator walks three sources in a fixed order:
//! 1. **Unit abilities**: ability profiles embedded in the unit entry
//! 2. **Linked rules**: visible info links resolved through the index
//! 3. **Detachment**: ability profiles of the selected detachment
//!
//! Each candidate is filtered (skip lists, length ceilings, empty text),
//! deduplicated against what the pass has already seen, classified to one
//! phase and appended to that phase's bucket.

mod dedup;
mod reminder;

pub use dedup::*;
pub use reminder::*;

use catalog_rules::{AggregatorConfig, Entry, LinkKind, Phase, Provenance, ReminderConfig};
use std::collections::BTreeMap;
use tracing::debug;

use crate::catalog_index::CatalogIndex;
use crate::classifier::PhaseClassifier;
use crate::error::ReminderError;

/// What to aggregate: a free-text name to resolve, or an entry already in
/// hand.
#[derive(Debug, Clone, Copy)]
pub enum UnitQuery<'q> {
    Name(&'q str),
    Entry(&'q Entry),
}

impl<'q> From<&'q str> for UnitQuery<'q> {
    fn from(name: &'q str) -> Self {
        UnitQuery::Name(name)
    }
}

impl<'q> From<&'q String> for UnitQuery<'q> {
    fn from(name: &'q String) -> Self {
        UnitQuery::Name(name.as_str())
    }
}

impl<'q> From<&'q Entry> for UnitQuery<'q> {
    fn from(entry: &'q Entry) -> Self {
        UnitQuery::Entry(entry)
    }
}

/// Buckets being filled during one pass.
struct Collector {
    seen: SeenSet,
    buckets: BTreeMap<Phase, Vec<Reminder>>,
    prefix_len: usize,
}

impl Collector {
    fn new(prefix_len: usize) -> Self {
        Self {
            seen: SeenSet::new(),
            buckets: BTreeMap::new(),
            prefix_len,
        }
    }

    fn push(&mut self, classifier: &PhaseClassifier, ability: &str, description: &str, source: Provenance) {
        let key = DedupKey::new(source, ability, description, self.prefix_len);
        if !self.seen.insert(key) {
            debug!(ability, %source, "duplicate ability dropped");
            return;
        }

        let phase = classifier.classify(description);
        self.buckets
            .entry(phase)
            .or_default()
            .push(Reminder::new(ability, description, phase, source));
    }
}

/// Aggregates reminders against one index.
pub struct ReminderAggregator<'a> {
    index: &'a CatalogIndex,
    classifier: PhaseClassifier,
    config: AggregatorConfig,
}

impl<'a> ReminderAggregator<'a> {
    /// Aggregator with the built-in classifier table and filters.
    pub fn new(index: &'a CatalogIndex) -> Self {
        Self::with_config(index, &ReminderConfig::default())
    }

    pub fn with_config(index: &'a CatalogIndex, config: &ReminderConfig) -> Self {
        Self {
            index,
            classifier: PhaseClassifier::new(&config.classifier),
            config: config.aggregator.clone(),
        }
    }

    pub fn index(&self) -> &'a CatalogIndex {
        self.index
    }

    pub fn classifier(&self) -> &PhaseClassifier {
        &self.classifier
    }

    /// Resolve `unit` and aggregate its reminders.
    ///
    /// An unknown detachment is not an error: the result simply carries no
    /// detachment reminders, while still echoing the requested name.
    pub fn reminders(&self, unit: &str, detachment: Option<&str>) -> Result<ReminderSet, ReminderError> {
        self.reminders_for(UnitQuery::Name(unit), detachment)
    }

    pub fn reminders_for(&self, query: UnitQuery<'_>, detachment: Option<&str>) -> Result<ReminderSet, ReminderError> {
        let entry = match query {
            UnitQuery::Name(name) => self.index.resolve_unit(name).into_result(name)?,
            UnitQuery::Entry(entry) => entry,
        };
        Ok(self.reminders_for_entry(entry, detachment))
    }

    /// Aggregate reminders for an already-resolved entry.
    pub fn reminders_for_entry(&self, entry: &Entry, detachment: Option<&str>) -> ReminderSet {
        let mut collector = Collector::new(self.config.dedup_prefix_len);

        self.collect_unit_abilities(entry, &mut collector);
        self.collect_linked(entry, &mut collector);
        if let Some(name) = detachment {
            self.collect_detachment(name, &mut collector);
        }

        debug!(
            unit = %entry.name,
            reminders = collector.seen.len(),
            phases = collector.buckets.len(),
            "reminders aggregated"
        );

        ReminderSet {
            unit_name: entry.name.clone(),
            unit_kind: entry.kind,
            cost: entry.cost(&self.config.cost_name),
            stats: entry.stats(&self.config.stat_profile_type),
            detachment: detachment.map(str::to_string),
            reminders: collector.buckets,
        }
    }

    fn collect_unit_abilities(&self, entry: &Entry, collector: &mut Collector) {
        for profile in entry.profiles_of_type(&self.config.ability_profile_type) {
            if self.config.skips_unit_ability(&profile.name) {
                debug!(ability = %profile.name, "unit ability on skip list");
                continue;
            }
            let Some(description) = profile.characteristic(catalog_rules::DESCRIPTION_CHARACTERISTIC) else {
                continue;
            };
            if char_len(description) > self.config.unit_ability_max_len {
                debug!(ability = %profile.name, "unit ability too long");
                continue;
            }
            collector.push(&self.classifier, &profile.name, description, Provenance::Unit);
        }
    }

    fn collect_linked(&self, entry: &Entry, collector: &mut Collector) {
        for link in entry.visible_links() {
            if self.config.skips_linked(&link.name) {
                debug!(link = %link.name, "linked rule skipped");
                continue;
            }

            let resolved = match link.kind {
                LinkKind::Rule => self
                    .index
                    .rule(&link.target_id)
                    .map(|rule| (rule.name.as_str(), rule.description.as_str(), Provenance::ArmyRule)),
                LinkKind::Profile => self
                    .index
                    .profile(&link.target_id)
                    .map(|profile| (profile.name.as_str(), profile.description(), Provenance::ArmyAbility)),
                LinkKind::Other => continue,
            };
            let Some((target_name, description, source)) = resolved else {
                debug!(link = %link.name, target = %link.target_id, "link target not indexed");
                continue;
            };

            if description.trim().is_empty() || char_len(description) > self.config.linked_max_len {
                debug!(link = %link.name, "linked text empty or too long");
                continue;
            }

            let ability = if link.name.trim().is_empty() {
                target_name
            } else {
                link.name.as_str()
            };
            collector.push(&self.classifier, ability, description, source);
        }
    }

    fn collect_detachment(&self, name: &str, collector: &mut Collector) {
        let Some(detachment) = self.index.detachment(name) else {
            debug!(detachment = name, "detachment not indexed; ignored");
            return;
        };

        for profile in detachment.profiles_of_type(&self.config.ability_profile_type) {
            let Some(description) = profile.characteristic(catalog_rules::DESCRIPTION_CHARACTERISTIC) else {
                continue;
            };
            if char_len(description) > self.config.linked_max_len {
                debug!(ability = %profile.name, "detachment ability too long");
                continue;
            }
            collector.push(&self.classifier, &profile.name, description, Provenance::Detachment);
        }
    }
}

/// Lengths are measured in characters, not bytes.
fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Resolve and aggregate with the built-in configuration.
pub fn get_reminders<'q>(
    index: &CatalogIndex,
    unit: impl Into<UnitQuery<'q>>,
    detachment: Option<&str>,
) -> Result<ReminderSet, ReminderError> {
    ReminderAggregator::new(index).reminders_for(unit.into(), detachment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_rules::{Document, EntryKind, Group, InfoLink, Profile, Rule};

    const OATH: &str = "At the start of your Command phase, select one unit from your \
                        opponent's army. Until the start of your next Command phase, that \
                        unit is your Oath of Moment target.";

    fn intercessors() -> Entry {
        Entry::new("u1", "Intercessor Squad", EntryKind::Unit)
            .with_cost("pts", 80.0)
            .with_profile(
                Profile::new("p0", "Intercessor", "Unit")
                    .with_characteristic("M", "6\"")
                    .with_characteristic("T", "4")
                    .with_characteristic("Sv", "3+"),
            )
            .with_profile(Profile::ability(
                "p1",
                "Bolter Discipline",
                "Each time this unit is selected to shoot, you can re-roll Hit rolls of 1.",
            ))
            .with_profile(Profile::ability("p2", "Oath of Moment", OATH))
            .with_profile(Profile::ability("p3", "Leader", "This model can be attached to..."))
            .with_link(InfoLink::new("Oath of Moment", LinkKind::Rule, "r-oath"))
            .with_link(InfoLink::new("Deep Strike", LinkKind::Rule, "r-ds"))
            .with_link(InfoLink::new("Secret Orders", LinkKind::Rule, "r-secret").hidden())
            .with_link(InfoLink::new("Lethal Hits", LinkKind::Rule, "r-lethal"))
            .with_link(InfoLink::new("Feel No Pain 5+", LinkKind::Rule, "r-fnp"))
            .with_link(InfoLink::new("Tactical Acumen", LinkKind::Profile, "p-acumen"))
            .with_link(InfoLink::new("Missing", LinkKind::Rule, "r-nowhere"))
    }

    fn catalog() -> Document {
        Document::new("sm", "Imperium - Space Marines")
            .with_entry(intercessors())
            .with_entry(Entry::new("u2", "Captain", EntryKind::Model).with_cost("pts", 80.0))
            .with_rule(Rule::new("r-oath", "Oath of Moment", OATH))
            .with_rule(Rule::new(
                "r-ds",
                "Deep Strike",
                "Units with Deep Strike can be set up in Reserves instead of on the battlefield.",
            ))
            .with_rule(Rule::new("r-secret", "Secret Orders", "In your Command phase, gain 1CP."))
            .with_rule(Rule::new("r-lethal", "Lethal Hits", "Critical hits auto-wound."))
            .with_rule(Rule::new("r-fnp", "Feel No Pain", "Ignore wounds on a 5+."))
            .with_profile(Profile::ability(
                "p-acumen",
                "Tactical Acumen",
                "When this unit charges, add 1 to the Charge roll.",
            ))
            .with_group(
                Group::new("g1", "Detachment").with_entry(
                    Entry::new("d1", "Gladius Task Force", EntryKind::Upgrade).with_profile(Profile::ability(
                        "dp1",
                        "Combat Doctrines",
                        "At the start of your Command phase, select one doctrine.",
                    )),
                ),
            )
    }

    fn index() -> CatalogIndex {
        CatalogIndex::build(&catalog(), [], None)
    }

    fn abilities(set: &ReminderSet, phase: Phase) -> Vec<&str> {
        set.bucket(phase).iter().map(|r| r.ability.as_str()).collect()
    }

    #[test]
    fn test_end_to_end_unit() {
        let index = index();
        let set = get_reminders(&index, "intercessor", None).unwrap();

        assert_eq!(set.unit_name, "Intercessor Squad");
        assert_eq!(set.unit_kind, EntryKind::Unit);
        assert_eq!(set.cost, 80.0);
        assert_eq!(set.stats.len(), 3);
        assert_eq!(set.stats[0].name, "M");
        assert_eq!(abilities(&set, Phase::Shooting), vec!["Bolter Discipline"]);
        assert_eq!(abilities(&set, Phase::Command), vec!["Oath of Moment"]);
        assert_eq!(abilities(&set, Phase::Movement), vec!["Deep Strike"]);
        assert_eq!(abilities(&set, Phase::Charge), vec!["Tactical Acumen"]);
        assert_eq!(set.detachment, None);

        assert_eq!(set.bucket(Phase::Shooting)[0].source, Provenance::Unit);
        assert_eq!(set.bucket(Phase::Movement)[0].source, Provenance::ArmyRule);
        assert_eq!(set.bucket(Phase::Charge)[0].source, Provenance::ArmyAbility);
    }

    #[test]
    fn test_unit_and_army_copy_deduplicated() {
        let index = index();
        let set = get_reminders(&index, "Intercessor Squad", None).unwrap();
        let oaths: Vec<_> = set.iter().filter(|r| r.ability == "Oath of Moment").collect();
        assert_eq!(oaths.len(), 1);
        assert_eq!(oaths[0].source, Provenance::Unit);
    }

    #[test]
    fn test_skip_lists_and_hidden_links() {
        let index = index();
        let set = get_reminders(&index, "intercessor", None).unwrap();
        let names: Vec<_> = set.iter().map(|r| r.ability.as_str()).collect();
        assert!(!names.contains(&"Leader"));
        assert!(!names.contains(&"Secret Orders"));
        assert!(!names.contains(&"Lethal Hits"));
        assert!(!names.contains(&"Feel No Pain 5+"));
        assert!(!names.contains(&"Missing"));
    }

    #[test]
    fn test_detachment_abilities() {
        let index = index();
        let set = get_reminders(&index, "intercessor", Some("Gladius Task Force")).unwrap();
        let command = set.bucket(Phase::Command);
        assert_eq!(command.len(), 2);
        assert_eq!(command[1].ability, "Combat Doctrines");
        assert_eq!(command[1].source, Provenance::Detachment);
        assert_eq!(set.detachment.as_deref(), Some("Gladius Task Force"));
    }

    #[test]
    fn test_unknown_detachment_only_echoed() {
        let index = index();
        let without = get_reminders(&index, "intercessor", None).unwrap();
        let unknown = get_reminders(&index, "intercessor", Some("Nonexistent")).unwrap();
        assert_eq!(unknown.reminders, without.reminders);
        assert_eq!(unknown.detachment.as_deref(), Some("Nonexistent"));
    }

    #[test]
    fn test_dedup_is_per_call() {
        let index = index();
        let aggregator = ReminderAggregator::new(&index);
        let first = aggregator.reminders("intercessor", Some("Gladius Task Force")).unwrap();
        let second = aggregator.reminders("intercessor", Some("Gladius Task Force")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_detachment_does_not_collide_with_unit() {
        let unit = Entry::new("u1", "Scout Squad", EntryKind::Unit)
            .with_profile(Profile::ability("p1", "Combat Doctrines", "Same text."));
        let doc = Document::new("sm", "SM").with_entry(unit).with_group(
            Group::new("g", "Detachment").with_entry(
                Entry::new("d", "Gladius", EntryKind::Upgrade)
                    .with_profile(Profile::ability("dp", "Combat Doctrines", "Same text.")),
            ),
        );
        let index = CatalogIndex::build(&doc, [], None);
        let set = get_reminders(&index, "scout", Some("gladius")).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_length_ceilings() {
        let at_limit = "a".repeat(500);
        let over_limit = "b".repeat(501);
        let long_link = "c".repeat(801);
        let unit = Entry::new("u1", "Lancer", EntryKind::Unit)
            .with_profile(Profile::ability("p1", "Exactly", at_limit))
            .with_profile(Profile::ability("p2", "Too Long", over_limit))
            .with_link(InfoLink::new("Wall Of Text", LinkKind::Rule, "r1"))
            .with_link(InfoLink::new("Blank", LinkKind::Rule, "r2"));
        let doc = Document::new("x", "X")
            .with_entry(unit)
            .with_rule(Rule::new("r1", "Wall Of Text", long_link))
            .with_rule(Rule::new("r2", "Blank", "   "));
        let index = CatalogIndex::build(&doc, [], None);

        let set = get_reminders(&index, "lancer", None).unwrap();
        let names: Vec<_> = set.iter().map(|r| r.ability.as_str()).collect();
        assert_eq!(names, vec!["Exactly"]);
    }

    #[test]
    fn test_detachment_length_ceiling() {
        let unit = Entry::new("u1", "Lancer", EntryKind::Unit);
        let doc = Document::new("x", "X").with_entry(unit).with_group(
            Group::new("g", "Detachment").with_entry(
                Entry::new("d", "Lance Host", EntryKind::Upgrade)
                    .with_profile(Profile::ability("dp1", "Long Oath", "a".repeat(800)))
                    .with_profile(Profile::ability("dp2", "Longer Oath", "b".repeat(801))),
            ),
        );
        let index = CatalogIndex::build(&doc, [], None);

        let set = get_reminders(&index, "lancer", Some("Lance Host")).unwrap();
        let kept: Vec<_> = set.iter().map(|r| (r.ability.as_str(), r.source)).collect();
        assert_eq!(kept, vec![("Long Oath", Provenance::Detachment)]);
    }

    #[test]
    fn test_length_counts_chars() {
        let accented = "é".repeat(500);
        let unit = Entry::new("u1", "Ranger", EntryKind::Unit)
            .with_profile(Profile::ability("p1", "Accented", accented));
        let doc = Document::new("x", "X").with_entry(unit);
        let index = CatalogIndex::build(&doc, [], None);
        assert_eq!(get_reminders(&index, "ranger", None).unwrap().len(), 1);
    }

    #[test]
    fn test_only_non_empty_buckets() {
        let index = index();
        let set = get_reminders(&index, "Captain", None).unwrap();
        assert_eq!(set.unit_kind, EntryKind::Model);
        assert!(set.is_empty());
        assert!(set.reminders.is_empty());
    }

    #[test]
    fn test_resolution_errors_propagate() {
        let index = index();
        assert_eq!(
            get_reminders(&index, "Librarian", None).unwrap_err(),
            ReminderError::NotFound {
                query: "Librarian".to_string()
            }
        );
        match get_reminders(&index, "a", None) {
            Err(ReminderError::Ambiguous { candidates, .. }) => {
                assert_eq!(candidates, vec!["Captain", "Intercessor Squad"])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_entry_query_skips_resolution() {
        let index = index();
        let entry = intercessors();
        let set = get_reminders(&index, &entry, None).unwrap();
        assert_eq!(set.unit_name, "Intercessor Squad");
    }

    #[test]
    fn test_custom_config() {
        let mut config = ReminderConfig::default();
        config.aggregator.unit_ability_skip.push("Bolter Discipline".to_string());
        let index = index();
        let set = ReminderAggregator::with_config(&index, &config)
            .reminders("intercessor", None)
            .unwrap();
        assert!(set.bucket(Phase::Shooting).is_empty());
    }
}
