use thiserror::Error;

use crate::ids::Category;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("id must not be empty")]
    EmptyId,

    #[error("{category} id already in use: {id}")]
    DuplicateId { category: Category, id: String },

    #[error("{category} id not found: {id}")]
    NotFound { category: Category, id: String },

    #[error("{0} items are derived and cannot be edited")]
    ReadOnlyItems(Category),

    #[error("invalid weight: {0}")]
    InvalidWeight(String),

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("date range end is before its start")]
    InvalidRange,
}
