//! Configuration options for value matching and plan construction.

use serde::{Deserialize, Serialize};

/// Default cardinality above which a source column is not treated as categorical.
pub const DEFAULT_MAX_UNIQUE_VALUES: usize = 50;

/// How the plan builder treats a pair present in both the user overrides
/// and the computed matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The user's entry wins and the computed one is dropped silently.
    #[default]
    PreferUser,
    /// Any pair present in both lists is a `DuplicateMapping` error.
    Reject,
}

/// Options for value matching and plan construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingOptions {
    /// Source columns with more distinct values than this are skipped.
    pub max_unique_values: usize,

    /// Cross-list duplicate handling in the plan builder.
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for MatchingOptions {
    fn default() -> Self {
        Self {
            max_unique_values: DEFAULT_MAX_UNIQUE_VALUES,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

impl MatchingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that reject overrides colliding with computed matches.
    pub fn strict() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_unique_values(mut self, max: usize) -> Self {
        self.max_unique_values = max;
        self
    }

    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}
