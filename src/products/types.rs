use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a detected product or catalog item.
///
/// Upstream integrations hand out either numeric or string ids, so both are
/// accepted as-is and compared through their string form when used as keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(serde_json::Number),
    Text(String),
}

impl ProductId {
    /// String form used by override and exclusion keys (`1`, `abc`)
    pub fn as_key(&self) -> String {
        match self {
            ProductId::Number(n) => n.to_string(),
            ProductId::Text(s) => s.clone(),
        }
    }

    fn field_value(&self) -> FieldValue<'_> {
        match self {
            ProductId::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Missing),
            ProductId::Text(s) => FieldValue::Text(Cow::Borrowed(s)),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{}", n),
            ProductId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i32> for ProductId {
    fn from(value: i32) -> Self {
        ProductId::Number(value.into())
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        ProductId::Number(value.into())
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        ProductId::Number(value.into())
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        ProductId::Text(value.to_string())
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        ProductId::Text(value)
    }
}

/// A product detected in a third-party tool (PSA, RMM, backup monitor, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Integration-specific attributes, opaque to matching
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn new(id: impl Into<ProductId>, name: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.map(str::to_string),
            vendor: None,
            category: None,
            logo: None,
            extra: Map::new(),
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn key(&self) -> String {
        self.id.as_key()
    }
}

/// Canonical product definition from the internal catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogItem {
    pub fn new(id: impl Into<ProductId>, slug: Option<&str>, name: Option<&str>) -> Self {
        Self {
            id: id.into(),
            slug: slug.map(str::to_string),
            name: name.map(str::to_string),
            vendor: None,
            category: None,
            extra: Map::new(),
        }
    }

    /// True when an override value names this item by slug or by id
    pub fn answers_to(&self, reference: &str) -> bool {
        self.slug.as_deref() == Some(reference) || self.id.as_key() == reference
    }
}

/// A field read off a record for comparison purposes
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Number(f64),
    Text(Cow<'a, str>),
}

impl<'a> FieldValue<'a> {
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// Textual form used for lexicographic comparison and grouping
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Missing => Cow::Borrowed(""),
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
            FieldValue::Text(s) => Cow::Borrowed(s.as_ref()),
        }
    }

    fn from_optional(value: Option<&'a str>) -> Self {
        value.map(|s| FieldValue::Text(Cow::Borrowed(s))).unwrap_or(FieldValue::Missing)
    }

    fn from_json(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldValue::Missing,
            Some(Value::Number(n)) => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Missing),
            Some(Value::String(s)) => FieldValue::Text(Cow::Borrowed(s)),
            Some(Value::Bool(b)) => FieldValue::Text(Cow::Borrowed(if *b { "true" } else { "false" })),
            Some(other) => FieldValue::Text(Cow::Owned(other.to_string())),
        }
    }
}

/// Read access to named fields, unchecked at compile time.
///
/// Unknown keys resolve to [`FieldValue::Missing`] rather than failing.
pub trait FieldAccess {
    fn field(&self, key: &str) -> FieldValue<'_>;
}

impl FieldAccess for Product {
    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => self.id.field_value(),
            "name" => FieldValue::from_optional(self.name.as_deref()),
            "vendor" => FieldValue::from_optional(self.vendor.as_deref()),
            "category" => FieldValue::from_optional(self.category.as_deref()),
            "logo" => FieldValue::from_optional(self.logo.as_deref()),
            other => FieldValue::from_json(self.extra.get(other)),
        }
    }
}

impl FieldAccess for CatalogItem {
    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => self.id.field_value(),
            "slug" => FieldValue::from_optional(self.slug.as_deref()),
            "name" => FieldValue::from_optional(self.name.as_deref()),
            "vendor" => FieldValue::from_optional(self.vendor.as_deref()),
            "category" => FieldValue::from_optional(self.category.as_deref()),
            other => FieldValue::from_json(self.extra.get(other)),
        }
    }
}

impl<T: FieldAccess + ?Sized> FieldAccess for &T {
    fn field(&self, key: &str) -> FieldValue<'_> {
        (**self).field(key)
    }
}
