use std::sync::Arc;

use super::memo::{ByIdentity, Memo};
use crate::products::{filter_products, sort_products, FieldAccess, Predicate, SortDirection, SortOptions};

struct ViewDeps<T> {
    products: ByIdentity<Vec<T>>,
    predicate: Option<ByIdentity<dyn Fn(&T) -> bool + Send + Sync>>,
    key: String,
    direction: SortDirection,
}

// Manual impl: a derive would demand `T: PartialEq`, but only identities are compared.
impl<T> PartialEq for ViewDeps<T> {
    fn eq(&self, other: &Self) -> bool {
        self.products == other.products
            && self.predicate == other.predicate
            && self.key == other.key
            && self.direction == other.direction
    }
}

/// Derived, render-ready list: filter then sort.
///
/// The result is cached on the identity of the products and predicate `Arc`s
/// and on the sort key/direction; same inputs give back the same `Arc`.
pub struct ProductsView<T> {
    memo: Memo<ViewDeps<T>, Vec<T>>,
}

impl<T> ProductsView<T>
where
    T: FieldAccess + Clone,
{
    pub fn new() -> Self {
        Self { memo: Memo::new() }
    }

    pub fn derive(
        &mut self,
        products: &Arc<Vec<T>>,
        predicate: Option<&Predicate<T>>,
        sort: &SortOptions,
    ) -> Arc<Vec<T>> {
        let deps = ViewDeps {
            products: ByIdentity(Arc::clone(products)),
            predicate: predicate.map(|p| ByIdentity(Arc::clone(p))),
            key: sort.key.clone(),
            direction: sort.direction,
        };
        self.memo.get_or_compute(deps, || {
            tracing::trace!(key = %sort.key, direction = %sort.direction, "deriving product view");
            let filtered = filter_products(products.as_slice(), predicate.map(|p| &**p));
            sort_products(&filtered, sort)
        })
    }
}

impl<T> Default for ProductsView<T>
where
    T: FieldAccess + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::Product;

    fn products() -> Arc<Vec<Product>> {
        Arc::new(vec![
            Product::new(1, Some("B")),
            Product::new(2, None),
            Product::new(3, Some("A")),
        ])
    }

    #[test]
    fn same_inputs_reuse_result() {
        let list = products();
        let mut view = ProductsView::new();
        let a = view.derive(&list, None, &SortOptions::asc("name"));
        let b = view.derive(&list, None, &SortOptions::asc("name"));
        assert!(Arc::ptr_eq(&a, &b));
        let keys: Vec<_> = a.iter().map(Product::key).collect();
        assert_eq!(keys, vec!["3", "1", "2"]);
    }

    #[test]
    fn new_products_arc_recomputes_even_if_equal() {
        let mut view = ProductsView::new();
        let a = view.derive(&products(), None, &SortOptions::asc("name"));
        let b = view.derive(&products(), None, &SortOptions::asc("name"));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(*a, *b);
    }

    #[test]
    fn direction_change_recomputes() {
        let list = products();
        let mut view = ProductsView::new();
        let a = view.derive(&list, None, &SortOptions::asc("name"));
        let b = view.derive(&list, None, &SortOptions::desc("name"));
        assert!(!Arc::ptr_eq(&a, &b));
        let keys: Vec<_> = b.iter().map(Product::key).collect();
        assert_eq!(keys, vec!["1", "3", "2"]);
    }

    #[test]
    fn predicate_identity_drives_cache() {
        let list = products();
        let named: Predicate<Product> = Arc::new(|p: &Product| p.name.is_some());
        let mut view = ProductsView::new();
        let a = view.derive(&list, Some(&named), &SortOptions::asc("name"));
        let b = view.derive(&list, Some(&Arc::clone(&named)), &SortOptions::asc("name"));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 2);

        let other: Predicate<Product> = Arc::new(|p: &Product| p.name.is_some());
        let c = view.derive(&list, Some(&other), &SortOptions::asc("name"));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
