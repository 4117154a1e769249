//! Per-type identifier counters
//!
//! Node ids are `{type}{separator}{n}` where `n` counts up from 1 for each
//! distinct type string. The separator is a single non-alphanumeric
//! character that never occurs in a type tag, so the first separator in an
//! id marks the end of its type and ids of different types cannot collide. The process-wide generator is shared by every tree
//! unless a tree is given its own.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

static GLOBAL: Lazy<Arc<IdGenerator>> = Lazy::new(|| Arc::new(IdGenerator::new()));

/// Monotonic id source scoped by type name
#[derive(Debug, Default)]
pub struct IdGenerator {
    counters: Mutex<HashMap<String, u64>>,
}

impl IdGenerator {
    /// Create a generator with no counters
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide generator
    pub fn global() -> Arc<IdGenerator> {
        GLOBAL.clone()
    }

    /// Produce the next id for `node_type`
    ///
    /// Callers must not pass a type containing `separator`.
    pub fn next_id(&self, node_type: &str, separator: char) -> String {
        let mut counters = self.counters.lock();
        let counter = counters.entry(node_type.to_string()).or_insert(0);
        *counter += 1;
        format!("{}{}{}", node_type, separator, counter)
    }

    /// Number of ids issued so far for `node_type`
    pub fn issued(&self, node_type: &str) -> u64 {
        self.counters.lock().get(node_type).copied().unwrap_or(0)
    }

    /// Forget every counter
    ///
    /// Ids issued after a reset may repeat earlier ones; only reset
    /// generators whose trees have been dropped.
    pub fn reset(&self) {
        self.counters.lock().clear();
    }
}
