//! Item identifiers for safety functions and components
//!
//! Identifiers are opaque strings chosen by the user (e.g. "SF1", "R12", "42").
//! They are normalized on construction so that ids surviving a spreadsheet
//! round-trip ("42.0") compare equal to the original ("42").

use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// A normalized, opaque identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an id, trimming whitespace and stripping a trailing ".0"
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(normalize_id(raw.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Normalize a raw identifier string
///
/// Spreadsheet tools turn numeric ids into floats, so `"7.0"` becomes `"7"`.
/// Only a single trailing `.0` is removed; `"7.00"` and `"v1.0a"` are kept.
pub fn normalize_id(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed).to_string()
}

/// Split a comma-joined id list, dropping empty entries
pub fn split_id_list(raw: &str) -> Vec<ItemId> {
    raw.split(',')
        .map(ItemId::new)
        .filter(|id| !id.is_empty())
        .collect()
}

/// Join ids with commas, the inverse of [`split_id_list`]
pub fn join_id_list<'a>(ids: impl IntoIterator<Item = &'a ItemId>) -> String {
    ids.into_iter()
        .map(ItemId::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = ItemId::new(s);
        if id.is_empty() {
            Err(IdParseError::Empty)
        } else {
            Ok(id)
        }
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::new(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::new(s)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(ItemId::new(raw))
    }
}

/// Error parsing an identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("identifier must not be empty")]
    Empty,
}
