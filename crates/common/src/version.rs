//! Optimistic-concurrency version counter.

use serde::{Deserialize, Serialize};

/// Document version used for compare-and-swap writes.
///
/// A freshly created document starts at [`Version::first`]; every successful
/// write advances it by one. A writer submits the version it read, and the
/// store rejects the write when the stored version has moved on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Creates a version from a raw counter value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// The version of a document that has just been created.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the version after one more successful write.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw counter value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
