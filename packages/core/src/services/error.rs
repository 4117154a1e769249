//! Service Layer Error Types
//!
//! This module defines the error type shared by tree construction, shape
//! derivation and configuration loading. Queries never return errors.

use crate::behaviors::ShapeId;
use crate::models::NodeKey;
use thiserror::Error;

/// Tree operation errors
#[derive(Error, Debug)]
pub enum TreeError {
    /// Value handed to `add` or `create_root` is not a payload object or a node
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Key was not issued by this tree
    #[error("Node not found: {key}")]
    NodeNotFound { key: NodeKey },

    /// Shape id is not registered
    #[error("Shape not found: {shape}")]
    ShapeNotFound { shape: ShapeId },

    /// Configuration is invalid or could not be read
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TreeError {
    /// Create an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a node not found error
    pub fn node_not_found(key: NodeKey) -> Self {
        Self::NodeNotFound { key }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;
