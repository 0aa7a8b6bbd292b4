use std::collections::BTreeMap;

use crate::types::DbId;

/// Domain error taxonomy shared by every layer above `pagesmith-core`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Malformed input. `fields` maps a request field to its problems.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    #[error("Brand extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Rewrite failed: {0}")]
    RewriteFailed(String),

    #[error("Invalid field path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `NotFound` for a numeric entity id.
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// `InvalidRequest` without field-level detail.
    pub fn invalid(message: impl Into<String>) -> Self {
        CoreError::InvalidRequest {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// `InvalidPath` for the given path.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
