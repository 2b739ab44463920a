//! Scope Configuration
//!
//! A [`ScopeConfig`] tunes how a [`Scope`](crate::Scope) mints names and how
//! strictly it checks references before preparing anything. Every field has
//! a default, so a partial JSON document is enough.

use serde::{Deserialize, Serialize};

/// Default number of attempts to mint an unused name.
pub const DEFAULT_MAX_NAME_ATTEMPTS: usize = 1000;

/// Settings for a [`Scope`](crate::Scope).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// How many fresh names to try before giving up.
    ///
    /// Zero is treated as one.
    pub max_name_attempts: usize,

    /// Verify that every name in a load order is declared before running
    /// any producer.
    ///
    /// When disabled, an unknown name is only discovered once the walk
    /// reaches it, after the producers ordered before it have run.
    pub check_references: bool,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            max_name_attempts: DEFAULT_MAX_NAME_ATTEMPTS,
            check_references: true,
        }
    }
}

impl ScopeConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// The number of naming attempts actually made.
    pub fn name_attempts(&self) -> usize {
        self.max_name_attempts.max(1)
    }

    /// Set the number of naming attempts.
    pub fn with_max_name_attempts(mut self, attempts: usize) -> Self {
        self.max_name_attempts = attempts;
        self
    }

    /// Enable or disable the upfront reference check.
    pub fn with_check_references(mut self, check: bool) -> Self {
        self.check_references = check;
        self
    }
}
