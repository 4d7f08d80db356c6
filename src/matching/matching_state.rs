use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use super::matcher::{match_products, MatchedProduct};
use super::memo::Memo;
use crate::products::{CatalogItem, Product};

type ChangeListener = Box<dyn Fn(u64) + Send + Sync>;

/// Snapshot handed to dependents. Every field is shared, so cloning a
/// snapshot never copies product data.
#[derive(Debug, Clone)]
pub struct MatchingValue {
    pub revision: u64,
    pub products: Arc<Vec<Product>>,
    pub catalog: Arc<Vec<CatalogItem>>,
    pub overrides: Arc<HashMap<String, String>>,
    pub exclusions: Arc<HashSet<String>>,
}

impl MatchingValue {
    pub fn is_excluded(&self, key: &str) -> bool {
        self.exclusions.contains(key)
    }

    pub fn override_for(&self, key: &str) -> Option<&str> {
        self.overrides.get(key).map(String::as_str)
    }

    /// Products resolved against the catalog, exclusions removed
    pub fn matched(&self) -> Vec<MatchedProduct> {
        match_products(&self.products, &self.catalog, &self.overrides, &self.exclusions)
    }
}

/// Owner of the matching session: detected products, catalog, the user's
/// overrides (product key -> catalog slug or id) and exclusions.
///
/// All mutation goes through the setters below; each effective change bumps
/// the revision and synchronously notifies listeners.
pub struct MatchingState {
    products: Arc<Vec<Product>>,
    catalog: Arc<Vec<CatalogItem>>,
    overrides: Arc<HashMap<String, String>>,
    exclusions: Arc<HashSet<String>>,
    revision: u64,
    snapshot: Memo<u64, MatchingValue>,
    listeners: Vec<ChangeListener>,
}

impl MatchingState {
    pub fn new(products: Vec<Product>, catalog: Vec<CatalogItem>) -> Self {
        Self {
            products: Arc::new(products),
            catalog: Arc::new(catalog),
            overrides: Arc::default(),
            exclusions: Arc::default(),
            revision: 0,
            snapshot: Memo::new(),
            listeners: Vec::new(),
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn products(&self) -> &Arc<Vec<Product>> {
        &self.products
    }

    pub fn catalog(&self) -> &Arc<Vec<CatalogItem>> {
        &self.catalog
    }

    pub fn overrides(&self) -> &HashMap<String, String> {
        &self.overrides
    }

    pub fn exclusions(&self) -> &HashSet<String> {
        &self.exclusions
    }

    /// Current snapshot; the same `Arc` comes back until something changes.
    pub fn value(&mut self) -> Arc<MatchingValue> {
        let products = &self.products;
        let catalog = &self.catalog;
        let overrides = &self.overrides;
        let exclusions = &self.exclusions;
        let revision = self.revision;
        self.snapshot.get_or_compute(revision, || {
            tracing::trace!(revision, "rebuilding matching snapshot");
            MatchingValue {
                revision,
                products: Arc::clone(products),
                catalog: Arc::clone(catalog),
                overrides: Arc::clone(overrides),
                exclusions: Arc::clone(exclusions),
            }
        })
    }

    pub fn subscribe(&mut self, listener: impl Fn(u64) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = Arc::new(products);
        self.changed("products");
    }

    pub fn set_catalog(&mut self, catalog: Vec<CatalogItem>) {
        self.catalog = Arc::new(catalog);
        self.changed("catalog");
    }

    /// Last write wins for a given key.
    pub fn set_override(&mut self, key: impl Into<String>, reference: impl Into<String>) {
        let key = key.into();
        let reference = reference.into();
        if self.overrides.get(&key) == Some(&reference) {
            return;
        }
        Arc::make_mut(&mut self.overrides).insert(key, reference);
        self.changed("overrides");
    }

    pub fn remove_override(&mut self, key: &str) -> Option<String> {
        if !self.overrides.contains_key(key) {
            return None;
        }
        let removed = Arc::make_mut(&mut self.overrides).remove(key);
        self.changed("overrides");
        removed
    }

    pub fn set_overrides(&mut self, overrides: HashMap<String, String>) {
        self.overrides = Arc::new(overrides);
        self.changed("overrides");
    }

    pub fn clear_overrides(&mut self) {
        if self.overrides.is_empty() {
            return;
        }
        self.overrides = Arc::default();
        self.changed("overrides");
    }

    pub fn exclude(&mut self, key: impl Into<String>) {
        let key = key.into();
        if self.exclusions.contains(&key) {
            return;
        }
        Arc::make_mut(&mut self.exclusions).insert(key);
        self.changed("exclusions");
    }

    pub fn include(&mut self, key: &str) {
        if !self.exclusions.contains(key) {
            return;
        }
        Arc::make_mut(&mut self.exclusions).remove(key);
        self.changed("exclusions");
    }

    pub fn toggle_exclusion(&mut self, key: &str) {
        if self.exclusions.contains(key) {
            self.include(key);
        } else {
            self.exclude(key);
        }
    }

    pub fn set_exclusions(&mut self, exclusions: HashSet<String>) {
        self.exclusions = Arc::new(exclusions);
        self.changed("exclusions");
    }

    fn changed(&mut self, what: &'static str) {
        self.revision += 1;
        tracing::debug!(revision = self.revision, what, "matching state changed");
        for listener in &self.listeners {
            listener(self.revision);
        }
    }
}

impl Default for MatchingState {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl fmt::Debug for MatchingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchingState")
            .field("products", &self.products.len())
            .field("catalog", &self.catalog.len())
            .field("overrides", &self.overrides.len())
            .field("exclusions", &self.exclusions.len())
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
