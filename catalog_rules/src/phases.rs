//! Game phases and reminder provenance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The bucket a reminder is filed under.
///
/// Variant order is the canonical display order; `Ord` follows it so a
/// `BTreeMap<Phase, _>` iterates Command first and Always Active last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "Command Phase")]
    Command,
    #[serde(rename = "Movement Phase")]
    Movement,
    #[serde(rename = "Shooting Phase")]
    Shooting,
    #[serde(rename = "Charge Phase")]
    Charge,
    #[serde(rename = "Fight Phase")]
    Fight,
    /// Fallback for passive abilities and anything the classifier cannot place.
    #[serde(rename = "Always Active")]
    AlwaysActive,
}

impl Phase {
    /// Every phase in canonical order.
    pub const ALL: [Phase; 6] = [
        Phase::Command,
        Phase::Movement,
        Phase::Shooting,
        Phase::Charge,
        Phase::Fight,
        Phase::AlwaysActive,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Command => "Command Phase",
            Phase::Movement => "Movement Phase",
            Phase::Shooting => "Shooting Phase",
            Phase::Charge => "Charge Phase",
            Phase::Fight => "Fight Phase",
            Phase::AlwaysActive => "Always Active",
        }
    }

    /// True for the five turn phases, false for the passive bucket.
    pub fn is_turn_phase(&self) -> bool {
        !matches!(self, Phase::AlwaysActive)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Phase::ALL
            .into_iter()
            .find(|phase| {
                phase.label().eq_ignore_ascii_case(wanted)
                    || phase
                        .label()
                        .trim_end_matches(" Phase")
                        .eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| format!("unknown phase '{}'", s))
    }
}

/// Where an ability came from while aggregating a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Ability profile embedded in the unit itself.
    Unit,
    /// Shared rule reached through a rule-kind info link.
    ArmyRule,
    /// Shared profile reached through a profile-kind info link.
    ArmyAbility,
    /// Ability of the selected detachment.
    Detachment,
}

impl Provenance {
    /// Army rules, army abilities and detachment abilities apply to the
    /// whole force rather than to the one unit.
    pub fn is_army_wide(&self) -> bool {
        !matches!(self, Provenance::Unit)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Unit => "unit",
            Provenance::ArmyRule => "army_rule",
            Provenance::ArmyAbility => "army_ability",
            Provenance::Detachment => "detachment",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
