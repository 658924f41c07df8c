//! Core error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the quest engine.
#[derive(Debug, Error)]
pub enum QuestError {
    #[error("quest document not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read quest document {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed quest definition: {reason}")]
    MalformedDefinition { reason: String },

    #[error("unknown state: {state}")]
    UnknownState { state: String },

    #[error("chronicler already started")]
    AlreadyStarted,

    #[error("chronicler not started")]
    NotStarted,
}

impl From<serde_json::Error> for QuestError {
    fn from(e: serde_json::Error) -> Self {
        QuestError::MalformedDefinition {
            reason: e.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for QuestError {
    fn from(e: serde_yaml::Error) -> Self {
        QuestError::MalformedDefinition {
            reason: e.to_string(),
        }
    }
}
