//! Catalog documents as produced by the catalog converter.
//!
//! A [`Document`] is one catalog or base rules file. It is built once from
//! its JSON source and never mutated afterwards. Every field is optional in
//! the source; anything missing takes its default value.

mod entry;
pub(crate) mod lenient;
mod profile;

pub use entry::*;
pub use profile::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{read_file, CatalogResult};

/// Name of the group whose members are detachments.
pub const DETACHMENT_GROUP: &str = "Detachment";

/// Header information for a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogMetadata {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub game_system_id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub revision: String,
    #[serde(deserialize_with = "lenient::text")]
    pub battle_scribe_version: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub library: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub author_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Publication {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CostType {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::number")]
    pub default_cost_limit: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CharacteristicType {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProfileType {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    pub characteristics: Vec<CharacteristicType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Category {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub hidden: bool,
}

/// A shared rule: an id, a name and free rules text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Rule {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub hidden: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
}

impl Rule {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hidden: false,
            description: description.into(),
        }
    }
}

/// A named container of entries. The group named [`DETACHMENT_GROUP`]
/// holds the army's detachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Group {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub hidden: bool,
    pub selection_entries: Vec<Entry>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.selection_entries.push(entry);
        self
    }

    pub fn is_detachment_group(&self) -> bool {
        self.name == DETACHMENT_GROUP
    }
}

/// Reference to another document by display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogueLink {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub target_id: String,
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub kind: String,
}

impl CatalogueLink {
    pub fn new(name: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            target_id: target_id.into(),
            kind: "catalogue".to_string(),
        }
    }
}

/// One parsed catalog or rules document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    pub metadata: CatalogMetadata,
    pub publications: Vec<Publication>,
    pub cost_types: Vec<CostType>,
    pub profile_types: Vec<ProfileType>,
    pub categories: Vec<Category>,
    pub shared_rules: Vec<Rule>,
    pub shared_profiles: Vec<Profile>,
    pub selection_entries: Vec<Entry>,
    pub selection_entry_groups: Vec<Group>,
    pub catalogue_links: Vec<CatalogueLink>,
}

impl Document {
    /// Create an empty document.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metadata: CatalogMetadata {
                id: id.into(),
                name: name.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Parse converter JSON. Fails only if the text is not a document object.
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a converter JSON file.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        Self::from_json_str(&read_file(path)?)
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.selection_entries.push(entry);
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.shared_rules.push(rule);
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.shared_profiles.push(profile);
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.selection_entry_groups.push(group);
        self
    }

    pub fn with_link(mut self, link: CatalogueLink) -> Self {
        self.catalogue_links.push(link);
        self
    }

    /// Entries that take part in unit lookup.
    pub fn units(&self) -> impl Iterator<Item = &Entry> {
        self.selection_entries
            .iter()
            .filter(|e| e.kind.is_unit_like())
    }

    /// Members of every detachment group, in document order.
    pub fn detachments(&self) -> impl Iterator<Item = &Entry> {
        self.selection_entry_groups
            .iter()
            .filter(|g| g.is_detachment_group())
            .flat_map(|g| g.selection_entries.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONVERTED: &str = r#"{
        "metadata": {"name": "Imperium - Space Marines", "id": "sm", "library": "false"},
        "sharedRules": [{"id": "r1", "name": "Oath of Moment", "hidden": "false", "description": null}],
        "selectionEntries": [
            {"id": "u1", "name": "Intercessor Squad", "type": "unit",
             "costs": [{"name": "pts", "typeId": "51b2", "value": 80.0}]},
            {"id": "w1", "name": "Bolt Rifle", "type": "upgrade"}
        ],
        "selectionEntryGroups": [
            {"id": "g1", "name": "Detachment", "selectionEntries": [
                {"id": "d1", "name": "Gladius Task Force", "type": "upgrade"}
            ]},
            {"id": "g2", "name": "Wargear", "selectionEntries": [
                {"id": "x1", "name": "Storm Shield", "type": "upgrade"}
            ]}
        ],
        "catalogueLinks": [{"id": "l1", "name": "Imperium - Agents of the Imperium", "targetId": "aoi", "type": "catalogue"}]
    }"#;

    #[test]
    fn test_parse_converted_document() {
        let doc = Document::from_json_str(CONVERTED).unwrap();
        assert_eq!(doc.name(), "Imperium - Space Marines");
        assert_eq!(doc.shared_rules[0].description, "");
        assert_eq!(doc.catalogue_links[0].target_id, "aoi");
        assert!(doc.publications.is_empty());
    }

    #[test]
    fn test_units_filter_kind() {
        let doc = Document::from_json_str(CONVERTED).unwrap();
        let names: Vec<_> = doc.units().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Intercessor Squad"]);
    }

    #[test]
    fn test_detachments_only_from_detachment_group() {
        let doc = Document::from_json_str(CONVERTED).unwrap();
        let names: Vec<_> = doc.detachments().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Gladius Task Force"]);
    }

    #[test]
    fn test_empty_object_is_valid_document() {
        let doc = Document::from_json_str("{}").unwrap();
        assert_eq!(doc.units().count(), 0);
        assert_eq!(doc.name(), "");
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(Document::from_json_str("[1, 2, 3]").is_err());
        assert!(Document::from_json_str("not json").is_err());
    }
}
