//! Roster Reports - reminders for every unit of a roster at once.
//!
//! Army rules, army abilities and detachment abilities are the same for every
//! unit, so they are pulled out once into an army-wide section. Each unit
//! section then only lists what is specific to that unit.

use catalog_rules::{Phase, RosterSelection, RosterUnit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::aggregator::{Reminder, ReminderAggregator, ReminderSet};
use crate::error::ReminderError;

/// One roster unit with its unit-specific reminders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitReport {
    /// Name as written in the roster (custom name when given).
    pub label: String,

    /// Catalog name the unit resolved to.
    pub unit_name: String,

    pub count: u32,

    pub composition: Vec<String>,

    pub cost: f64,

    pub reminders: BTreeMap<Phase, Vec<Reminder>>,
}

impl UnitReport {
    fn new(unit: &RosterUnit, set: &ReminderSet) -> Self {
        Self {
            label: unit.display_name().to_string(),
            unit_name: set.unit_name.clone(),
            count: unit.number,
            composition: unit.composition.clone(),
            cost: set.cost,
            reminders: set.unit_specific(),
        }
    }

    /// Names of the always-active abilities.
    pub fn passive(&self) -> Vec<&str> {
        self.reminders
            .get(&Phase::AlwaysActive)
            .map(|bucket| bucket.iter().map(|r| r.ability.as_str()).collect())
            .unwrap_or_default()
    }

    /// Buckets for the turn phases, skipping Always Active.
    pub fn turn_phases(&self) -> impl Iterator<Item = (Phase, &[Reminder])> {
        self.reminders
            .iter()
            .filter(|(phase, bucket)| phase.is_turn_phase() && !bucket.is_empty())
            .map(|(phase, bucket)| (*phase, bucket.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.values().all(Vec::is_empty)
    }
}

/// Reminders for a whole roster.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RosterReport {
    pub title: Option<String>,

    pub army: Option<String>,

    pub detachment: Option<String>,

    /// Army-wide reminders, taken from the first unit that resolves.
    pub army_wide: BTreeMap<Phase, Vec<Reminder>>,

    pub units: Vec<UnitReport>,

    /// Roster names that matched no unit, or more than one.
    pub unresolved: Vec<String>,
}

impl RosterReport {
    pub fn build(aggregator: &ReminderAggregator<'_>, selection: &RosterSelection) -> Self {
        let detachment = selection.detachment.as_deref();
        let mut report = Self {
            title: selection.name.clone(),
            army: selection.army.clone(),
            detachment: selection.detachment.clone(),
            ..Default::default()
        };

        for unit in &selection.units {
            match lookup(aggregator, unit, detachment) {
                Ok(set) => {
                    if report.units.is_empty() {
                        report.army_wide = set.army_wide();
                    }
                    report.units.push(UnitReport::new(unit, &set));
                }
                Err(err) => {
                    warn!(unit = %unit.display_name(), error = %err, "roster unit skipped");
                    report.unresolved.push(unit.display_name().to_string());
                }
            }
        }

        report
    }

    /// Sum of unit costs.
    pub fn total_cost(&self) -> f64 {
        self.units.iter().map(|u| u.cost).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Try the custom name first, then the catalog name.
fn lookup(
    aggregator: &ReminderAggregator<'_>,
    unit: &RosterUnit,
    detachment: Option<&str>,
) -> Result<ReminderSet, ReminderError> {
    let first = aggregator.reminders(unit.display_name(), detachment);
    match (&first, &unit.custom_name) {
        (Err(_), Some(_)) => aggregator.reminders(&unit.name, detachment),
        _ => first,
    }
}

/// Build a roster report with the aggregator's configuration.
pub fn roster_report(aggregator: &ReminderAggregator<'_>, selection: &RosterSelection) -> RosterReport {
    RosterReport::build(aggregator, selection)
}
