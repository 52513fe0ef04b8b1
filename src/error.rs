//! Error types for Libris
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::storage::Unit;

/// All error types that can occur in Libris
#[derive(Debug, Error)]
pub enum LibrisError {
    /// Member referenced by a loan does not exist
    #[error("Member not found: {0}")]
    MemberNotFound(u64),

    /// Title referenced by a loan does not exist
    #[error("Title not found: {0}")]
    TitleNotFound(u64),

    /// Title exists but already has an outstanding loan
    #[error("Title not available: {0}")]
    TitleUnavailable(u64),

    /// A required field was missing or blank
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A stored unit exists but could not be decoded
    #[error("Failed to read {unit}: {reason}")]
    PersistenceRead { unit: Unit, reason: String },

    /// A stored unit could not be written
    #[error("Failed to write {unit}: {source}")]
    PersistenceWrite {
        unit: Unit,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LibrisError {
    /// Returns true for errors that reject a loan without touching state
    pub fn is_loan_rejection(&self) -> bool {
        matches!(
            self,
            LibrisError::MemberNotFound(_) | LibrisError::TitleNotFound(_) | LibrisError::TitleUnavailable(_)
        )
    }
}

/// Result type alias for Libris operations
pub type Result<T> = std::result::Result<T, LibrisError>;
