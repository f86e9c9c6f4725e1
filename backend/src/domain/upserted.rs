//! Outcome of an idempotent write keyed on a natural key.

/// Result of an upsert: the stored value and whether it was inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upserted<T> {
    /// Stored value after the write.
    pub value: T,
    /// `true` when the row did not exist before.
    pub created: bool,
}
