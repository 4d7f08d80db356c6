use std::hash::Hash;

use indexmap::IndexMap;

use super::types::FieldAccess;

/// Partition `items` by the key `group_by` computes.
///
/// Keys appear in first-seen order and each group keeps input order.
pub fn group_products<T, K, F>(items: &[T], group_by: F) -> IndexMap<K, Vec<T>>
where
    T: Clone,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
    for item in items {
        groups.entry(group_by(item)).or_default().push(item.clone());
    }
    groups
}

/// Group by the textual form of a named field; missing fields share the `""` group.
pub fn group_by_field<T>(items: &[T], key: &str) -> IndexMap<String, Vec<T>>
where
    T: FieldAccess + Clone,
{
    group_products(items, |item| item.field(key).as_text().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::types::Product;

    #[test]
    fn keys_in_first_seen_order() {
        let items = vec![
            Product::new(1, Some("MX68")).with_vendor("Cisco"),
            Product::new(2, Some("SIRIS")).with_vendor("Datto"),
            Product::new(3, Some("MR36")).with_vendor("Cisco"),
            Product::new(4, Some("Unknown")),
        ];
        let groups = group_by_field(&items, "vendor");
        let keys: Vec<_> = groups.keys().cloned().collect();
        assert_eq!(keys, vec!["Cisco", "Datto", ""]);

        let cisco: Vec<_> = groups["Cisco"].iter().map(Product::key).collect();
        assert_eq!(cisco, vec!["1", "3"]);
    }

    #[test]
    fn custom_key_function() {
        let items: Vec<Product> = (1..=5i64).map(|i| Product::new(i, Some("x"))).collect();
        let groups = group_products(&items, |p| p.key().parse::<i64>().unwrap() % 2 == 0);
        assert_eq!(groups[&false].len(), 3);
        assert_eq!(groups[&true].len(), 2);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![false, true]);
    }

    #[test]
    fn empty_input_has_no_groups() {
        let items: Vec<Product> = vec![];
        assert!(group_by_field(&items, "vendor").is_empty());
    }
}
