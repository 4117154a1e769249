/// Configuration for node trees
use crate::services::error::{Result, TreeError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tree construction and projection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Payload keys stripped before the remainder becomes node fields
    ///
    /// `type` and `index` are always stripped as well.
    pub reserved_keys: Vec<String>,

    /// Inserted between the type tag and the counter in generated ids
    ///
    /// Must be non-alphanumeric; type tags containing it are rejected.
    pub id_separator: char,

    /// Key under which projections list a node's children
    pub children_key: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            reserved_keys: vec!["id".to_string(), "children".to_string(), "parent".to_string()],
            id_separator: ':',
            children_key: "children".to_string(),
        }
    }
}

impl TreeConfig {
    /// Parse a configuration from JSON, filling missing keys with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TreeError::config(format!("failed to parse tree config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            TreeError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Validate configuration
    ///
    /// Projections must never be able to forge structure, so `id`, `parent`
    /// and the children key have to be reserved.
    pub fn validate(&self) -> Result<()> {
        if self.id_separator.is_alphanumeric() {
            return Err(TreeError::config(format!(
                "id_separator '{}' must not be alphanumeric",
                self.id_separator
            )));
        }

        if self.children_key.is_empty() {
            return Err(TreeError::config("children_key cannot be empty"));
        }

        for required in ["id", "parent", self.children_key.as_str()] {
            if !self.reserved_keys.iter().any(|k| k == required) {
                return Err(TreeError::config(format!(
                    "reserved_keys must include '{}'",
                    required
                )));
            }
        }

        Ok(())
    }
}
