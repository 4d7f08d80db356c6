use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::SortError;
use super::types::{FieldAccess, FieldValue};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(SortError::InvalidDirection(s.to_string()))
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current sort column and direction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortOptions {
    pub key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortOptions {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self { key: key.into(), direction }
    }

    pub fn asc(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Desc)
    }

    /// Parse `"<key> [asc|desc]"`, e.g. `"name desc"`. Direction defaults to asc.
    pub fn parse(s: &str) -> Result<Self, SortError> {
        let mut it = s.split_whitespace();
        let key = it.next().ok_or(SortError::EmptyKey)?;
        let direction = match it.next() {
            Some(dir) => dir.parse()?,
            None => SortDirection::Asc,
        };
        if let Some(extra) = it.next() {
            return Err(SortError::InvalidSpec(format!("unexpected token '{}' in '{}'", extra, s.trim())));
        }
        Ok(Self::new(key, direction))
    }

    /// Accepts either the string form or `{ "key": ..., "direction": ... }`
    pub fn from_value(value: &Value) -> Result<Self, SortError> {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Object(obj) => {
                let key = obj
                    .get("key")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .ok_or(SortError::EmptyKey)?;
                let direction = match obj.get("direction") {
                    None | Some(Value::Null) => SortDirection::Asc,
                    Some(Value::String(d)) => d.parse()?,
                    Some(other) => return Err(SortError::InvalidDirection(other.to_string())),
                };
                Ok(Self::new(key, direction))
            }
            other => Err(SortError::InvalidSpec(format!("expected string or object, got {}", other))),
        }
    }
}

impl fmt::Display for SortOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.direction)
    }
}

/// Compare two field values.
///
/// A missing value sorts after every present value in both directions; the
/// direction only flips the order between two present values.
pub fn compare_fields(a: &FieldValue<'_>, b: &FieldValue<'_>, direction: SortDirection) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = match (a, b) {
                (FieldValue::Number(x), FieldValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
                _ => a.as_text().cmp(&b.as_text()),
            };
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

/// Return a sorted copy of `items`; the input is left untouched.
/// Equal elements keep their relative input order.
pub fn sort_products<T>(items: &[T], options: &SortOptions) -> Vec<T>
where
    T: FieldAccess + Clone,
{
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| compare_fields(&a.field(&options.key), &b.field(&options.key), options.direction));
    sorted
}
