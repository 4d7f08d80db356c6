use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::products::{CatalogItem, FieldAccess, FieldValue, Product};

/// How a product ended up linked (or not) to a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Override,
    Automatic,
    Unmatched,
}

impl MatchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchSource::Override => "override",
            MatchSource::Automatic => "automatic",
            MatchSource::Unmatched => "unmatched",
        }
    }
}

/// Wire key of [`MatchInfo`]; product attributes with this name are dropped
pub const MATCH_KEY: &str = "match";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "match")]
    pub matched: MatchInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub source: MatchSource,
    pub catalog: Option<CatalogItem>,
}

/// Sorting and grouping a matched row reads the product's own fields, plus
/// `match` (source) and `catalog` (matched item name).
impl FieldAccess for MatchedProduct {
    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            MATCH_KEY => FieldValue::Text(Cow::Borrowed(self.matched.source.as_str())),
            "catalog" => self
                .matched
                .catalog
                .as_ref()
                .map(|c| c.field("name"))
                .unwrap_or(FieldValue::Missing),
            other => self.product.field(other),
        }
    }
}

/// Case-folded, alphanumeric-only form used for automatic name matching
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolve every non-excluded product against the catalog.
///
/// An override keyed by the product id wins when it names a catalog item by
/// slug or id; otherwise the normalized product name is compared with the
/// normalized catalog names. Output keeps input order.
pub fn match_products(
    products: &[Product],
    catalog: &[CatalogItem],
    overrides: &HashMap<String, String>,
    exclusions: &HashSet<String>,
) -> Vec<MatchedProduct> {
    let mut by_name: HashMap<String, &CatalogItem> = HashMap::new();
    for item in catalog {
        if let Some(name) = item.name.as_deref() {
            let normalized = normalize_name(name);
            if !normalized.is_empty() {
                // first catalog entry wins on duplicate names
                by_name.entry(normalized).or_insert(item);
            }
        }
    }

    products
        .iter()
        .filter(|p| !exclusions.contains(&p.key()))
        .map(|product| {
            let key = product.key();
            let matched = match overrides.get(&key) {
                Some(reference) => match catalog.iter().find(|c| c.answers_to(reference)) {
                    Some(item) => MatchInfo { source: MatchSource::Override, catalog: Some(item.clone()) },
                    None => {
                        tracing::debug!(product = %key, reference = %reference, "override names no catalog item");
                        MatchInfo { source: MatchSource::Unmatched, catalog: None }
                    }
                },
                None => automatic_match(product, &by_name),
            };
            let mut product = product.clone();
            if product.extra.remove(MATCH_KEY).is_some() {
                tracing::debug!(product = %key, "dropped attribute shadowed by match info");
            }
            MatchedProduct { product, matched }
        })
        .collect()
}

fn automatic_match(product: &Product, by_name: &HashMap<String, &CatalogItem>) -> MatchInfo {
    product
        .name
        .as_deref()
        .map(normalize_name)
        .filter(|n| !n.is_empty())
        .and_then(|n| by_name.get(&n))
        .map(|item| MatchInfo { source: MatchSource::Automatic, catalog: Some((*item).clone()) })
        .unwrap_or(MatchInfo { source: MatchSource::Unmatched, catalog: None })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new(10, Some("meraki-mx"), Some("Meraki MX")),
            CatalogItem::new(11, Some("datto-siris"), Some("Datto SIRIS")),
        ]
    }

    #[test]
    fn automatic_match_ignores_case_and_punctuation() {
        let products = vec![Product::new(1, Some("meraki-mx")), Product::new(2, Some("Unknown Box"))];
        let out = match_products(&products, &catalog(), &HashMap::new(), &HashSet::new());
        assert_eq!(out[0].matched.source, MatchSource::Automatic);
        assert_eq!(out[0].matched.catalog.as_ref().unwrap().id.as_key(), "10");
        assert_eq!(out[1].matched.source, MatchSource::Unmatched);
    }

    #[test]
    fn override_beats_automatic() {
        let products = vec![Product::new(1, Some("Meraki MX"))];
        let overrides = HashMap::from([("1".to_string(), "datto-siris".to_string())]);
        let out = match_products(&products, &catalog(), &overrides, &HashSet::new());
        assert_eq!(out[0].matched.source, MatchSource::Override);
        assert_eq!(out[0].matched.catalog.as_ref().unwrap().slug.as_deref(), Some("datto-siris"));
    }

    #[test]
    fn override_by_catalog_id() {
        let products = vec![Product::new("abc", None)];
        let overrides = HashMap::from([("abc".to_string(), "10".to_string())]);
        let out = match_products(&products, &catalog(), &overrides, &HashSet::new());
        assert_eq!(out[0].matched.source, MatchSource::Override);
    }

    #[test]
    fn dangling_override_is_unmatched() {
        let products = vec![Product::new(1, Some("Meraki MX"))];
        let overrides = HashMap::from([("1".to_string(), "gone".to_string())]);
        let out = match_products(&products, &catalog(), &overrides, &HashSet::new());
        assert_eq!(out[0].matched.source, MatchSource::Unmatched);
        assert!(out[0].matched.catalog.is_none());
    }

    #[test]
    fn exclusions_are_hidden() {
        let products = vec![Product::new(1, Some("a")), Product::new(2, Some("b"))];
        let exclusions = HashSet::from(["1".to_string()]);
        let out = match_products(&products, &catalog(), &HashMap::new(), &exclusions);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].product.key(), "2");
    }

    #[test]
    fn matched_rows_sort_by_match_source() {
        let row = MatchedProduct {
            product: Product::new(1, Some("a")),
            matched: MatchInfo { source: MatchSource::Automatic, catalog: None },
        };
        assert_eq!(row.field("match").as_text(), "automatic");
        assert!(row.field("catalog").is_missing());
        assert_eq!(row.field("name").as_text(), "a");
    }

    #[test]
    fn match_attribute_does_not_collide_on_the_wire() {
        let products = vec![Product::new(1, Some("Meraki MX")).with_attr("match", serde_json::json!("legacy"))];
        let out = match_products(&products, &catalog(), &HashMap::new(), &HashSet::new());
        assert!(!out[0].product.extra.contains_key("match"));

        let encoded = serde_json::to_string(&out[0]).unwrap();
        assert_eq!(encoded.matches("\"match\"").count(), 1);
        let value = serde_json::to_value(&out[0]).unwrap();
        assert_eq!(value["match"]["source"], "automatic");
    }
}
