//! Profiles and their characteristic values.

use serde::{Deserialize, Serialize};

use super::lenient;

/// Characteristic name that carries an ability's rules text.
pub const DESCRIPTION_CHARACTERISTIC: &str = "Description";

/// One named value of a profile, e.g. `M = 6"` or `Description = ...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Characteristic {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub value: String,
}

impl Characteristic {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A typed block of characteristics, shared or embedded in an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    /// Profile type, e.g. "Abilities", "Unit", "Ranged Weapons".
    #[serde(deserialize_with = "lenient::text")]
    pub type_name: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub hidden: bool,
    /// Characteristics in document order.
    pub characteristics: Vec<Characteristic>,
}

impl Profile {
    /// Create an empty profile of the given type.
    pub fn new(id: impl Into<String>, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    /// Append a characteristic.
    pub fn with_characteristic(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.characteristics.push(Characteristic::new(name, value));
        self
    }

    /// Shorthand for an ability profile with a description.
    pub fn ability(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(id, name, "Abilities").with_characteristic(DESCRIPTION_CHARACTERISTIC, description)
    }

    pub fn is_type(&self, type_name: &str) -> bool {
        self.type_name == type_name
    }

    /// Value of the first characteristic with this name.
    pub fn characteristic(&self, name: &str) -> Option<&str> {
        self.characteristics
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    /// The ability text, or an empty string if the profile has none.
    pub fn description(&self) -> &str {
        self.characteristic(DESCRIPTION_CHARACTERISTIC).unwrap_or("")
    }
}
