//! Forgiving field decoders for converter output.
//!
//! The catalog converter writes flags as `"true"`/`"false"` strings, costs as
//! numbers or numeric strings, and `null` for empty description text. These
//! helpers accept every such spelling and fall back to the field default.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Text(String),
    Number(i64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Number(f64),
    Text(String),
}

pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FlagRepr>::deserialize(deserializer)? {
        Some(FlagRepr::Bool(value)) => value,
        Some(FlagRepr::Text(text)) => text.trim().eq_ignore_ascii_case("true"),
        Some(FlagRepr::Number(n)) => n != 0,
        None => false,
    })
}

pub(crate) fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberRepr>::deserialize(deserializer)? {
        Some(NumberRepr::Number(value)) => value,
        Some(NumberRepr::Text(text)) => text.trim().parse().unwrap_or(0.0),
        None => 0.0,
    })
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Empty strings count as absent.
pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}
