use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::ProductsConfig;
use crate::matching::{ContextError, MatchedProduct, MatchingState, ProductSortState, ViewContext};
use crate::products::{group_by_field, search_predicate, CatalogItem, Product, SortError, SortOptions};

#[derive(Error, Debug)]
pub enum ProductViewError {
    #[error("Too many products: {count} (limit {max})")]
    TooManyProducts { count: usize, max: usize },

    #[error(transparent)]
    Sort(#[from] SortError),

    #[error(transparent)]
    Context(#[from] ContextError),
}

/// One table render: products plus the user's matching session state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductViewRequest {
    pub products: Vec<Product>,
    #[serde(default)]
    pub catalog: Vec<CatalogItem>,
    /// `"name desc"` or `{ "key": "name", "direction": "desc" }`
    #[serde(default)]
    pub sort: Option<Value>,
    #[serde(default)]
    pub overrides: HashMap<String, String>,
    #[serde(default)]
    pub exclusions: HashSet<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub group_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub sort: SortOptions,
    pub total: usize,
    pub items: Vec<MatchedProduct>,
    /// Group key -> product keys, in first-seen order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<IndexMap<String, Vec<String>>>,
}

pub struct ProductViewService<'a> {
    config: &'a ProductsConfig,
}

impl<'a> ProductViewService<'a> {
    pub fn new(config: &'a ProductsConfig) -> Self {
        Self { config }
    }

    /// Match, filter, sort and optionally group one request.
    pub fn render(&self, request: ProductViewRequest) -> Result<ProductView, ProductViewError> {
        let count = request.products.len();
        if count > self.config.max_items {
            return Err(ProductViewError::TooManyProducts { count, max: self.config.max_items });
        }

        let sort = match &request.sort {
            Some(Value::Null) | None => self.config.default_sort(),
            Some(spec) => SortOptions::from_value(spec)?,
        };

        let mut matching = MatchingState::new(request.products, request.catalog);
        matching.set_overrides(request.overrides);
        matching.set_exclusions(request.exclusions);

        let mut ctx: ViewContext<MatchedProduct> = ViewContext::builder()
            .with_sort(ProductSortState::new(sort.clone()))
            .with_matching(matching)
            .build();

        let matched = Arc::new(ctx.matching_mut()?.value().matched());
        let predicate = request.search.as_deref().and_then(search_predicate::<MatchedProduct>);
        let items = ctx.use_products(&matched, predicate.as_ref())?;

        let groups: Option<IndexMap<String, Vec<String>>> = request.group_by.as_deref().map(|key| {
            group_by_field(&items, key)
                .into_iter()
                .map(|(group, rows)| (group, rows.iter().map(|row| row.product.key()).collect()))
                .collect()
        });

        tracing::debug!(
            products = count,
            shown = items.len(),
            sort = %sort,
            grouped = groups.is_some(),
            "product view rendered"
        );

        Ok(ProductView { sort, total: items.len(), items: items.as_ref().clone(), groups })
    }
}
