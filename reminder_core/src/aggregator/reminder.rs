//! Reminder definitions - the aggregator's output.

use catalog_rules::{Characteristic, EntryKind, Phase, Provenance};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A classified ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Ability name as shown to the player.
    pub ability: String,

    /// Full rules text, unmodified.
    pub description: String,

    pub phase: Phase,

    pub source: Provenance,
}

impl Reminder {
    pub fn new(
        ability: impl Into<String>,
        description: impl Into<String>,
        phase: Phase,
        source: Provenance,
    ) -> Self {
        Self {
            ability: ability.into(),
            description: description.into(),
            phase,
            source,
        }
    }
}

/// Everything to remember for one unit, bucketed by phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderSet {
    pub unit_name: String,

    pub unit_kind: EntryKind,

    /// First "pts" cost component, or 0.
    pub cost: f64,

    /// Characteristics of the unit's stat profile, in document order.
    pub stats: Vec<Characteristic>,

    /// Detachment name as requested, whether or not it resolved.
    pub detachment: Option<String>,

    /// Non-empty buckets only, in canonical phase order.
    pub reminders: BTreeMap<Phase, Vec<Reminder>>,
}

impl ReminderSet {
    /// Buckets that hold at least one reminder, in canonical order.
    pub fn phases(&self) -> impl Iterator<Item = (Phase, &[Reminder])> {
        self.reminders
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(phase, bucket)| (*phase, bucket.as_slice()))
    }

    pub fn bucket(&self, phase: Phase) -> &[Reminder] {
        self.reminders
            .get(&phase)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every reminder, in canonical phase order.
    pub fn iter(&self) -> impl Iterator<Item = &Reminder> {
        self.reminders.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.reminders.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buckets restricted to reminders whose source passes `keep`.
    pub fn filtered<F>(&self, keep: F) -> BTreeMap<Phase, Vec<Reminder>>
    where
        F: Fn(&Reminder) -> bool,
    {
        let mut buckets: BTreeMap<Phase, Vec<Reminder>> = BTreeMap::new();
        for reminder in self.iter().filter(|r| keep(r)) {
            buckets
                .entry(reminder.phase)
                .or_default()
                .push(reminder.clone());
        }
        buckets
    }

    /// Army rules, army abilities and detachment abilities.
    pub fn army_wide(&self) -> BTreeMap<Phase, Vec<Reminder>> {
        self.filtered(|r| r.source.is_army_wide())
    }

    /// Abilities embedded in the unit itself.
    pub fn unit_specific(&self) -> BTreeMap<Phase, Vec<Reminder>> {
        self.filtered(|r| !r.source.is_army_wide())
    }

    /// Drop every bucket outside `phases`. An empty slice keeps everything.
    pub fn retain_phases(&mut self, phases: &[Phase]) {
        if !phases.is_empty() {
            self.reminders.retain(|phase, _| phases.contains(phase));
        }
    }
}
