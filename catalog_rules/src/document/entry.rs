//! Selectable entries: units, models, and everything else a roster can pick.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{lenient, Characteristic, Profile};

/// What kind of selection an entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Unit,
    Model,
    Upgrade,
    #[default]
    #[serde(other)]
    Other,
}

impl EntryKind {
    /// Only units and models take part in unit lookup.
    pub fn is_unit_like(&self) -> bool {
        matches!(self, EntryKind::Unit | EntryKind::Model)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Unit => "unit",
            EntryKind::Model => "model",
            EntryKind::Upgrade => "upgrade",
            EntryKind::Other => "other",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cost component, e.g. `pts = 85`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Cost {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub type_id: String,
    #[serde(deserialize_with = "lenient::number")]
    pub value: f64,
}

/// What an info link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Rule,
    Profile,
    #[default]
    #[serde(other)]
    Other,
}

/// Reference from an entry to a shared rule or profile, possibly defined in
/// another document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct InfoLink {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    /// Display name; usually the target's name.
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    #[serde(deserialize_with = "lenient::text")]
    pub target_id: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub hidden: bool,
}

impl InfoLink {
    pub fn new(name: impl Into<String>, kind: LinkKind, target_id: impl Into<String>) -> Self {
        let target_id = target_id.into();
        Self {
            id: format!("link-{}", target_id),
            name: name.into(),
            kind,
            target_id,
            hidden: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// A selectable entry. Detachments use the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Entry {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(deserialize_with = "lenient::flag")]
    pub hidden: bool,
    pub costs: Vec<Cost>,
    /// Profiles embedded directly in the entry.
    pub profiles: Vec<Profile>,
    pub info_links: Vec<InfoLink>,
}

impl Entry {
    /// Create an entry with no costs, profiles or links.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn with_cost(mut self, name: impl Into<String>, value: f64) -> Self {
        self.costs.push(Cost {
            name: name.into(),
            type_id: String::new(),
            value,
        });
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.push(profile);
        self
    }

    pub fn with_link(mut self, link: InfoLink) -> Self {
        self.info_links.push(link);
        self
    }

    /// Value of the first cost component with this name, or 0.
    pub fn cost(&self, cost_name: &str) -> f64 {
        self.costs
            .iter()
            .find(|c| c.name == cost_name)
            .map(|c| c.value)
            .unwrap_or(0.0)
    }

    /// Embedded profiles of one type, in document order.
    pub fn profiles_of_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a Profile> {
        self.profiles.iter().filter(move |p| p.is_type(type_name))
    }

    /// Characteristics of the first embedded profile of the stat type.
    pub fn stats(&self, stat_type: &str) -> Vec<Characteristic> {
        self.profiles_of_type(stat_type)
            .next()
            .map(|p| p.characteristics.clone())
            .unwrap_or_default()
    }

    /// Info links that are not hidden.
    pub fn visible_links(&self) -> impl Iterator<Item = &InfoLink> {
        self.info_links.iter().filter(|l| !l.hidden)
    }
}
