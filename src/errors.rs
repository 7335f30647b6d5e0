/*!
 * Error types for the tmclean library.
 *
 * Rejecting a text or unit is not an error: filters signal it by returning
 * `None`. The types here cover the failures that reach the caller of catalog
 * and filter construction, using the thiserror crate for ergonomic error
 * definitions.
 */

use thiserror::Error;

/// Errors that can occur while building, loading or persisting the charset catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A category the filters depend on came out empty
    #[error("Unicode classification data unavailable: category '{0}' is empty")]
    MissingCategory(String),

    /// Reading or writing the snapshot file failed
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be encoded or decoded
    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The snapshot was written by an incompatible format version
    #[error("Snapshot format version {found} does not match expected {expected}")]
    SnapshotVersion {
        /// Version stored in the snapshot
        found: u32,
        /// Version this build reads and writes
        expected: u32,
    },

    /// The snapshot decoded but its content is inconsistent
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// An escape rule pattern failed to compile
    #[error("Invalid escape pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors raised when a filter is constructed with unusable parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FilterError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
