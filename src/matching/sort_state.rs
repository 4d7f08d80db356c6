use crate::products::{SortDirection, SortOptions};

/// Holds the active sort column and direction for a product table.
///
/// Setters that would leave the value unchanged are no-ops, so the revision
/// only moves when dependents actually need to re-derive.
#[derive(Debug, Clone)]
pub struct ProductSortState {
    options: SortOptions,
    revision: u64,
}

impl ProductSortState {
    pub fn new(options: SortOptions) -> Self {
        Self { options, revision: 0 }
    }

    pub fn options(&self) -> &SortOptions {
        &self.options
    }

    pub fn key(&self) -> &str {
        &self.options.key
    }

    pub fn direction(&self) -> SortDirection {
        self.options.direction
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set(&mut self, options: SortOptions) {
        if self.options != options {
            tracing::debug!(from = %self.options, to = %options, "sort changed");
            self.options = options;
            self.revision += 1;
        }
    }

    pub fn set_key(&mut self, key: impl Into<String>) {
        let next = SortOptions::new(key, self.options.direction);
        self.set(next);
    }

    pub fn set_direction(&mut self, direction: SortDirection) {
        let next = SortOptions::new(self.options.key.clone(), direction);
        self.set(next);
    }

    pub fn toggle_direction(&mut self) {
        self.set_direction(self.options.direction.reversed());
    }

    /// Column-header click: the active column flips direction, any other
    /// column becomes active in ascending order.
    pub fn request_sort(&mut self, key: &str) {
        if self.options.key == key {
            self.toggle_direction();
        } else {
            self.set(SortOptions::asc(key));
        }
    }
}

impl Default for ProductSortState {
    fn default() -> Self {
        Self::new(SortOptions::asc("name"))
    }
}
