//! Sort order for paged queries

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Column reference allowed in an ORDER BY clause: `name` or `schema.name`
static SORT_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*$").unwrap()
});

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortDirection {
    /// Parse a direction, falling back to `default` for missing or blank input
    pub fn parse_or(value: Option<&str>, default: SortDirection) -> Result<SortDirection> {
        match value.map(str::trim) {
            None | Some("") => Ok(default),
            Some(text) => text.parse(),
        }
    }

    /// SQL keyword for this direction
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(Error::invalid_argument(format!("Unknown sort direction: {s}"))),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Sort key and direction
///
/// The key is trimmed on construction; a blank key means "unsorted".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sort {
    /// Column to sort by
    #[serde(default, deserialize_with = "deserialize_key")]
    pub key: Option<String>,
    /// Sort direction, ascending when unset
    #[serde(default)]
    pub direction: Option<SortDirection>,
}

impl Sort {
    /// Create a sort on `key`
    pub fn new(key: impl AsRef<str>, direction: SortDirection) -> Self {
        Self {
            key: trim_to_none(key.as_ref()),
            direction: Some(direction),
        }
    }

    /// Ascending sort on `key`
    pub fn asc(key: impl AsRef<str>) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    /// Descending sort on `key`
    pub fn desc(key: impl AsRef<str>) -> Self {
        Self::new(key, SortDirection::Desc)
    }

    /// Render the ORDER BY clause, or an empty string without a key
    ///
    /// Fails with `InvalidSortKey` if the key is not a plain column reference.
    pub fn order_by_clause(&self) -> Result<String> {
        let Some(key) = &self.key else {
            return Ok(String::new());
        };

        if !SORT_KEY_REGEX.is_match(key) {
            return Err(Error::InvalidSortKey { key: key.clone() });
        }

        let direction = self.direction.unwrap_or_default();
        Ok(format!("ORDER BY {key} {}", direction.as_sql()))
    }
}

/// Parses `key` or `key:asc|desc`
impl FromStr for Sort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (key, direction) = match s.split_once(':') {
            Some((key, direction)) => {
                (key, SortDirection::parse_or(Some(direction), SortDirection::Asc)?)
            }
            None => (s, SortDirection::Asc),
        };

        let sort = Self::new(key, direction);
        if sort.key.is_none() {
            return Err(Error::invalid_argument(format!("Sort key is empty: '{s}'")));
        }
        Ok(sort)
    }
}

fn trim_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn deserialize_key<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let key: Option<String> = Option::deserialize(deserializer)?;
    Ok(key.as_deref().and_then(trim_to_none))
}
