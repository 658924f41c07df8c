//! Loading quest definitions from YAML documents.

use crate::definition::QuestDefinition;
use crate::error::QuestError;
use serde_json::Value;
use std::path::Path;

/// Parses a quest definition from a YAML document.
pub fn from_str(document: &str) -> Result<QuestDefinition, QuestError> {
    let tree: Value = serde_yaml::from_str(document)?;
    QuestDefinition::from_value(&tree)
}

/// Reads and parses a quest definition document.
pub fn from_path(path: impl AsRef<Path>) -> Result<QuestDefinition, QuestError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => QuestError::NotFound {
            path: path.to_path_buf(),
        },
        _ => QuestError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    from_str(&content)
}
