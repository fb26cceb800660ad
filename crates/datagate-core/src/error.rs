//! Core error types.

use thiserror::Error;

/// Errors produced by the data-access engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The external type name did not resolve to a registered schema.
    #[error("unknown data type: {0:?}")]
    UnknownType(String),

    /// Entity not found.
    #[error("not found")]
    NotFound,

    /// A named navigation field is absent on the resolved schema.
    #[error("unknown field: {0:?}")]
    InvalidField(String),

    /// The payload could not be coerced to the schema's shape.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The store rejected a read or write.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Invalid registration detected while building the catalog.
    #[error("registration error: {0}")]
    Registration(String),
}
