//! Roster-derived unit selections.
//!
//! Parsing a saved army list happens elsewhere; this module only describes
//! its output: a list of selected units plus an optional detachment.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{read_file, CatalogResult};

/// One unit selected in a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterUnit {
    pub name: String,

    /// Player-chosen name; empty strings are treated as absent.
    #[serde(default, deserialize_with = "crate::document::lenient::optional_text")]
    pub custom_name: Option<String>,

    /// How many copies of the unit were taken.
    #[serde(default = "default_number")]
    pub number: u32,

    /// Model breakdown, e.g. `["4x Intercessor", "Intercessor Sergeant"]`.
    #[serde(default)]
    pub composition: Vec<String>,
}

fn default_number() -> u32 {
    1
}

impl RosterUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            custom_name: None,
            number: 1,
            composition: Vec::new(),
        }
    }

    pub fn with_custom_name(mut self, custom_name: impl Into<String>) -> Self {
        self.custom_name = Some(custom_name.into());
        self
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = number;
        self
    }

    pub fn with_composition(mut self, composition: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.composition = composition.into_iter().map(Into::into).collect();
        self
    }

    /// Name to show and to look up first: the custom name when present.
    pub fn display_name(&self) -> &str {
        self.custom_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SelectionRepr {
    Full(RosterSelection),
    Units(Vec<RosterUnit>),
}

/// A whole roster selection: army, detachment and units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RosterSelection {
    /// Roster title.
    #[serde(deserialize_with = "crate::document::lenient::optional_text")]
    pub name: Option<String>,

    /// Catalog name of the army, e.g. "Imperium - Space Marines".
    #[serde(deserialize_with = "crate::document::lenient::optional_text")]
    pub army: Option<String>,

    #[serde(deserialize_with = "crate::document::lenient::optional_text")]
    pub detachment: Option<String>,

    pub units: Vec<RosterUnit>,
}

impl RosterSelection {
    pub fn new(units: Vec<RosterUnit>) -> Self {
        Self {
            units,
            ..Default::default()
        }
    }

    pub fn with_detachment(mut self, detachment: impl Into<String>) -> Self {
        self.detachment = Some(detachment.into());
        self
    }

    pub fn with_army(mut self, army: impl Into<String>) -> Self {
        self.army = Some(army.into());
        self
    }

    /// Parse either a selection object or a bare array of units.
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        Ok(match serde_json::from_str(json)? {
            SelectionRepr::Full(selection) => selection,
            SelectionRepr::Units(units) => Self::new(units),
        })
    }

    pub fn load(path: &Path) -> CatalogResult<Self> {
        Self::from_json_str(&read_file(path)?)
    }

    /// Short human-readable overview of the roster.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        if let Some(name) = &self.name {
            lines.push(format!("Roster: {}", name));
        }
        if let Some(army) = &self.army {
            lines.push(format!("Army: {}", army));
        }
        if let Some(detachment) = &self.detachment {
            lines.push(format!("Detachment: {}", detachment));
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }

        lines.push(format!("Units ({}):", self.units.len()));
        for unit in &self.units {
            if unit.number > 1 {
                lines.push(format!("  - {}x {}", unit.number, unit.display_name()));
            } else {
                lines.push(format!("  - {}", unit.display_name()));
            }
            if !unit.composition.is_empty() {
                lines.push(format!("      {}", unit.composition.join(", ")));
            }
        }

        lines.join("\n")
    }
}
