//! Reminder heuristics as editable data.
//!
//! Phase classification and ability filtering are keyword heuristics tuned
//! against one ruleset's phrasing. They live here as an ordered table rather
//! than as inline conditionals; evaluation order is significant. Any section
//! may be overridden from a TOML file, e.g.:
//!
//! ```toml
//! [aggregator]
//! unit_ability_max_len = 600
//!
//! [[classifier.rules]]
//! phase = "Command Phase"
//! any = ["at the start of your command phase"]
//! ```
//!
//! Supplying `classifier.rules` replaces the whole built-in rule table.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{read_file, CatalogError, CatalogResult};
use crate::phases::Phase;

/// One row of the phase table. Phrases are matched against normalized
/// (lower-cased) text, so they must be written in lower case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRule {
    pub phase: Phase,

    /// Matches if the text contains at least one of these.
    #[serde(default)]
    pub any: Vec<String>,

    /// Matches only if the text contains every one of these.
    #[serde(default)]
    pub all: Vec<String>,
}

impl PhaseRule {
    pub fn any(phase: Phase, phrases: &[&str]) -> Self {
        Self {
            phase,
            any: phrases.iter().map(|p| p.to_string()).collect(),
            all: Vec::new(),
        }
    }

    pub fn all(phase: Phase, phrases: &[&str]) -> Self {
        Self {
            phase,
            any: Vec::new(),
            all: phrases.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// The same rule with every phrase lower-cased, ready to test against
    /// normalized text.
    pub fn lowercased(&self) -> Self {
        let lower = |phrases: &[String]| -> Vec<String> { phrases.iter().map(|p| p.to_lowercase()).collect() };
        Self {
            phase: self.phase,
            any: lower(&self.any),
            all: lower(&self.all),
        }
    }

    /// Test the rule against already-normalized text.
    pub fn matches(&self, text: &str) -> bool {
        if self.any.is_empty() && self.all.is_empty() {
            return false;
        }
        let any_ok = self.any.is_empty() || self.any.iter().any(|p| text.contains(p.as_str()));
        let all_ok = self.all.iter().all(|p| text.contains(p.as_str()));
        any_ok && all_ok
    }
}

/// Settings for the phase classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Markup sequences removed before matching.
    pub emphasis_markers: Vec<String>,

    /// Any of these short-circuits to Always Active.
    pub noise_phrases: Vec<String>,

    /// Ordered table; the first matching rule wins.
    pub rules: Vec<PhaseRule>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            emphasis_markers: strings(&["**", "^^"]),
            noise_phrases: strings(&[
                "can be attached to",
                "while this model is leading",
                "this model is attached",
                "bodyguard",
                "embark",
                "scouts",
                "stealth",
            ]),
            rules: vec![
                PhaseRule::any(Phase::Command, &["at the start of your command phase"]),
                PhaseRule::any(
                    Phase::Movement,
                    &["at the start of your movement phase", "in your movement phase"],
                ),
                PhaseRule::any(Phase::Command, &["in your command phase"]),
                PhaseRule::all(Phase::Command, &["in either player", "command phase"]),
                PhaseRule::any(Phase::Fight, &["at the start of the fight phase"]),
                PhaseRule::any(
                    Phase::Fight,
                    &["in the fight phase", "when this unit fights", "selected to fight"],
                ),
                PhaseRule::any(
                    Phase::Shooting,
                    &["in the shooting phase", "when this unit shoots", "selected to shoot"],
                ),
                PhaseRule::any(
                    Phase::Charge,
                    &["in the charge phase", "when this unit charges"],
                ),
                PhaseRule::any(Phase::Movement, &["deep strike"]),
            ],
        }
    }
}

/// Settings for gathering and filtering abilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Profile type of ability profiles.
    pub ability_profile_type: String,

    /// Profile type holding unit characteristics.
    pub stat_profile_type: String,

    /// Cost component reported as the unit's points.
    pub cost_name: String,

    /// Unit-embedded abilities longer than this are dropped.
    pub unit_ability_max_len: usize,

    /// Linked rules, linked profiles and detachment abilities longer than
    /// this are dropped.
    pub linked_max_len: usize,

    /// Description prefix length used in the dedup key.
    pub dedup_prefix_len: usize,

    /// Unit ability names never reported.
    pub unit_ability_skip: Vec<String>,

    /// Linked rule names never reported.
    pub linked_rule_skip: Vec<String>,

    /// Linked names containing any of these are never reported.
    pub banned_substrings: Vec<String>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            ability_profile_type: "Abilities".to_string(),
            stat_profile_type: "Unit".to_string(),
            cost_name: "pts".to_string(),
            unit_ability_max_len: 500,
            linked_max_len: 800,
            dedup_prefix_len: 50,
            unit_ability_skip: strings(&["Invulnerable Save", "Leader", "Transport"]),
            linked_rule_skip: strings(&[
                "Leader",
                "Transport",
                "Invulnerable Save",
                "Lone Operative",
                "Infiltrators",
                "Scouts",
                "Stealth",
                "Fights First",
                "Firing Deck",
                "Hover",
                "Assault",
                "Heavy",
                "Rapid Fire",
                "Pistol",
                "Torrent",
                "Blast",
                "Lethal Hits",
                "Sustained Hits",
                "Devastating Wounds",
                "Twin-linked",
                "Precision",
                "Melta",
                "Lance",
                "Ignores Cover",
                "Indirect Fire",
                "Hazardous",
                "Extra Attacks",
                "One Shot",
            ]),
            banned_substrings: strings(&["invulnerable", "deadly demise", "feel no pain"]),
        }
    }
}

impl AggregatorConfig {
    pub fn skips_unit_ability(&self, name: &str) -> bool {
        contains_ignore_case(&self.unit_ability_skip, name)
    }

    /// Skip-list hit or banned substring in the link's display name.
    pub fn skips_linked(&self, name: &str) -> bool {
        if contains_ignore_case(&self.linked_rule_skip, name) {
            return true;
        }
        let lowered = name.to_lowercase();
        self.banned_substrings
            .iter()
            .any(|banned| lowered.contains(&banned.to_lowercase()))
    }
}

/// Settings for report rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Display length for descriptions in a turn phase.
    pub phase_description_len: usize,

    /// Display length for descriptions in the Always Active bucket.
    pub passive_description_len: usize,

    /// Lines per page for the paged document.
    pub lines_per_page: usize,

    /// Wrap width for the paged document.
    pub page_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            phase_description_len: 150,
            passive_description_len: 100,
            lines_per_page: 60,
            page_width: 90,
        }
    }
}

/// Every tunable heuristic in one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReminderConfig {
    pub classifier: ClassifierConfig,
    pub aggregator: AggregatorConfig,
    pub render: RenderConfig,
}

impl ReminderConfig {
    /// Parse and validate a TOML override file's contents.
    pub fn from_toml_str(text: &str) -> CatalogResult<Self> {
        let config: ReminderConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> CatalogResult<Self> {
        Self::from_toml_str(&read_file(path)?)
    }

    pub fn validate(&self) -> CatalogResult<()> {
        for (position, rule) in self.classifier.rules.iter().enumerate() {
            if rule.any.is_empty() && rule.all.is_empty() {
                return Err(CatalogError::InvalidConfig(format!(
                    "classifier rule {} ({}) has no phrases",
                    position + 1,
                    rule.phase
                )));
            }
        }
        if self.render.lines_per_page < 3 {
            return Err(CatalogError::InvalidConfig(
                "render.lines_per_page must be at least 3".to_string(),
            ));
        }
        if self.render.page_width < 20 {
            return Err(CatalogError::InvalidConfig(
                "render.page_width must be at least 20".to_string(),
            ));
        }
        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn contains_ignore_case(list: &[String], name: &str) -> bool {
    let name = name.trim();
    list.iter().any(|item| item.eq_ignore_ascii_case(name))
}
