//! Error taxonomy for the bot core.
//!
//! Only `StoreError::CorruptStore` may stop the process, and only at
//! startup. Everything else is converted into a chat reply at the
//! dispatcher boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the goal store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("objective text is empty")]
    EmptyObjective,

    #[error("progress text is empty")]
    EmptyUpdate,

    #[error("no objective with id {0}")]
    ObjectiveNotFound(u64),

    /// The goals file exists but is not valid JSON. Never auto-recovered:
    /// the bad file stays in place for the operator to inspect.
    #[error("goals file {} is not valid JSON: {source}", path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write goals file: {0}")]
    StorageWrite(#[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Validation failures have no side effects and read fine verbatim in
    /// a chat reply.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StoreError::EmptyObjective
                | StoreError::EmptyUpdate
                | StoreError::ObjectiveNotFound(_)
        )
    }
}

/// Errors from the AI completion collaborator.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("AI endpoint returned no completion text")]
    EmptyCompletion,
}
