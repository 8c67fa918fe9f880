//! Error types for the data-access core.
//!
//! Absence is never an error here: point lookups return `Ok(None)` and the
//! layer above decides whether that is a business-level "not found". The
//! variants below are real failures and propagate to the caller unchanged -
//! no retries, no translation.

use thiserror::Error;

/// Failures raised by the relational store and the components on top of it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A repository was requested for an entity type the store has no table
    /// for. This is caller misuse, fatal to the current operation.
    #[error("no table registered for entity type `{0}`")]
    UnregisteredEntity(&'static str),

    /// An insert staged a key that already exists.
    #[error("duplicate key on insert into `{0}`")]
    DuplicateKey(&'static str),

    /// An update or delete targeted a row that is not in the table.
    #[error("{op} targeted a missing row in `{table}`")]
    MissingRow {
        table: &'static str,
        op: &'static str,
    },

    /// A writer panicked while holding the table lock.
    #[error("store lock poisoned by a panicking writer")]
    LockPoisoned,
}

/// Failures raised by the basket key-value store.
///
/// A missing or expired basket is `Ok(None)`, not an error.
#[derive(Debug, Error)]
pub enum BasketError {
    /// The basket could not be serialized or deserialized.
    #[error("basket serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A write was accepted but the immediate read-back found nothing.
    #[error("write for basket `{0}` was not visible on read-back")]
    WriteNotVisible(String),
}
