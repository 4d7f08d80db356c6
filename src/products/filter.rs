use std::borrow::Cow;
use std::sync::Arc;

use super::types::FieldAccess;

/// Shared predicate. Identity (not behaviour) is what memoized views compare.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Keep the items for which `predicate` holds.
///
/// Without a predicate the input slice itself is handed back, not a copy.
pub fn filter_products<'a, T, F>(items: &'a [T], predicate: Option<&F>) -> Cow<'a, [T]>
where
    T: Clone,
    F: Fn(&T) -> bool + ?Sized,
{
    match predicate {
        None => Cow::Borrowed(items),
        Some(p) => Cow::Owned(items.iter().filter(|item| p(*item)).cloned().collect()),
    }
}

const SEARCH_FIELDS: [&str; 3] = ["name", "vendor", "category"];

/// Case-insensitive substring search over name, vendor and category.
/// A blank query means "no filter".
pub fn search_predicate<T: FieldAccess + 'static>(query: &str) -> Option<Predicate<T>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    Some(Arc::new(move |item: &T| {
        SEARCH_FIELDS.iter().any(|key| {
            let value = item.field(key);
            !value.is_missing() && value.as_text().to_lowercase().contains(&needle)
        })
    }))
}
