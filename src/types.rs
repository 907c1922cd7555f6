//! Common types used throughout blockpipe
//!
//! Shared type aliases and small enums used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// A block height, the record key of a run
pub type BlockHeight = u64;

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for HTTP retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Malformed Record Policy
// ============================================================================

/// What to do when a record cannot be normalized
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Log and count the record, continue the run
    #[default]
    Skip,
    /// Terminate the run on the first malformed record
    Fail,
}

impl std::fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_default() {
        assert_eq!(BackoffType::default(), BackoffType::Exponential);
    }

    #[test]
    fn test_malformed_policy_serde() {
        let policy: MalformedPolicy = serde_json::from_str("\"fail\"").unwrap();
        assert_eq!(policy, MalformedPolicy::Fail);

        let json = serde_json::to_string(&MalformedPolicy::Skip).unwrap();
        assert_eq!(json, "\"skip\"");
    }

    #[test]
    fn test_malformed_policy_default() {
        assert_eq!(MalformedPolicy::default(), MalformedPolicy::Skip);
    }
}
