use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("Sort key cannot be empty")]
    EmptyKey,

    #[error("Invalid sort direction: {0} (expected asc or desc)")]
    InvalidDirection(String),

    #[error("Invalid sort specification: {0}")]
    InvalidSpec(String),
}
