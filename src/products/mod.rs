pub mod error;
pub mod filter;
pub mod group;
pub mod sort;
pub mod types;

pub use error::SortError;
pub use filter::{filter_products, search_predicate, Predicate};
pub use group::{group_by_field, group_products};
pub use sort::{compare_fields, sort_products, SortDirection, SortOptions};
pub use types::{CatalogItem, FieldAccess, FieldValue, Product, ProductId};
