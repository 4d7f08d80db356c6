use std::sync::Arc;

use thiserror::Error;

use super::matching_state::MatchingState;
use super::sort_state::ProductSortState;
use super::view::ProductsView;
use crate::products::{FieldAccess, Predicate};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("{consumer} requires {state} to be wired into the view context before use")]
    MissingProvider {
        consumer: &'static str,
        state: &'static str,
    },
}

impl ContextError {
    fn missing(consumer: &'static str, state: &'static str) -> Self {
        ContextError::MissingProvider { consumer, state }
    }
}

/// State wired into a view at construction time.
///
/// Consumers ask for the piece they need; asking for one that was never
/// provided is a programming error reported as [`ContextError`].
pub struct ViewContext<T = crate::products::Product> {
    sort: Option<ProductSortState>,
    matching: Option<MatchingState>,
    view: ProductsView<T>,
}

pub struct ViewContextBuilder<T> {
    sort: Option<ProductSortState>,
    matching: Option<MatchingState>,
    _items: std::marker::PhantomData<T>,
}

impl<T: FieldAccess + Clone> ViewContext<T> {
    pub fn builder() -> ViewContextBuilder<T> {
        ViewContextBuilder { sort: None, matching: None, _items: std::marker::PhantomData }
    }

    pub fn sort(&self) -> Result<&ProductSortState, ContextError> {
        self.sort.as_ref().ok_or_else(|| ContextError::missing("sort", "ProductSortState"))
    }

    pub fn sort_mut(&mut self) -> Result<&mut ProductSortState, ContextError> {
        self.sort.as_mut().ok_or_else(|| ContextError::missing("sort", "ProductSortState"))
    }

    pub fn matching(&self) -> Result<&MatchingState, ContextError> {
        self.matching.as_ref().ok_or_else(|| ContextError::missing("matching", "MatchingState"))
    }

    pub fn matching_mut(&mut self) -> Result<&mut MatchingState, ContextError> {
        self.matching.as_mut().ok_or_else(|| ContextError::missing("matching", "MatchingState"))
    }

    /// Filtered and sorted `products` under the current sort state, memoized
    /// on input identity, predicate identity, key and direction.
    pub fn use_products(
        &mut self,
        products: &Arc<Vec<T>>,
        predicate: Option<&Predicate<T>>,
    ) -> Result<Arc<Vec<T>>, ContextError> {
        let sort = self
            .sort
            .as_ref()
            .ok_or_else(|| ContextError::missing("use_products", "ProductSortState"))?;
        Ok(self.view.derive(products, predicate, sort.options()))
    }
}

impl<T: FieldAccess + Clone> ViewContextBuilder<T> {
    pub fn with_sort(mut self, sort: ProductSortState) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_matching(mut self, matching: MatchingState) -> Self {
        self.matching = Some(matching);
        self
    }

    pub fn build(self) -> ViewContext<T> {
        ViewContext { sort: self.sort, matching: self.matching, view: ProductsView::new() }
    }
}
