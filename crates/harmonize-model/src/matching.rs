//! Column and value match types exchanged between the matching stages.
//!
//! A [`ColumnMapping`] pairs a source column with a target column. For each
//! categorical pair the value matching stage produces a
//! [`ValueMatchingResult`] holding the proposed [`ValueMatch`]es together with
//! coverage accounting over the source column's distinct values.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A proposed correspondence between a source column and a target column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Column name in the source table.
    pub source: String,
    /// Column name in the target schema.
    pub target: String,
}

impl ColumnMapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Plan key for this pair (`source__target`).
    pub fn key(&self) -> String {
        mapping_key(&self.source, &self.target)
    }
}

/// Builds the uniqueness key used by harmonization plans.
pub fn mapping_key(source: &str, target: &str) -> String {
    format!("{source}__{target}")
}

/// A single source value matched to a target value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueMatch {
    /// Source value in its original casing (trimmed).
    pub current_value: String,
    /// Target domain value in its original casing.
    pub target_value: String,
    /// Similarity score reported by the strategy (0.0 to 1.0).
    pub similarity: f64,
}

impl ValueMatch {
    pub fn new(
        current_value: impl Into<String>,
        target_value: impl Into<String>,
        similarity: f64,
    ) -> Self {
        Self {
            current_value: current_value.into(),
            target_value: target_value.into(),
            similarity,
        }
    }
}

/// Value matches for one `(source, target)` column pair.
///
/// `coverage` and `unmatch_values` are derived from `matches` and
/// `unique_values` on construction and cannot drift from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ValueMatchingRecord")]
pub struct ValueMatchingResult {
    source: String,
    target: String,
    matches: Vec<ValueMatch>,
    coverage: f64,
    unique_values: BTreeSet<String>,
    unmatch_values: BTreeSet<String>,
}

#[derive(Deserialize)]
struct ValueMatchingRecord {
    source: String,
    target: String,
    matches: Vec<ValueMatch>,
    unique_values: BTreeSet<String>,
}

impl From<ValueMatchingRecord> for ValueMatchingResult {
    fn from(record: ValueMatchingRecord) -> Self {
        Self::new(
            record.source,
            record.target,
            record.matches,
            record.unique_values,
        )
    }
}

impl ValueMatchingResult {
    /// Creates a result, computing coverage and the unmatched set.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        matches: Vec<ValueMatch>,
        unique_values: BTreeSet<String>,
    ) -> Self {
        let coverage = if unique_values.is_empty() {
            0.0
        } else {
            matches.len() as f64 / unique_values.len() as f64
        };
        let matched: BTreeSet<&str> = matches.iter().map(|m| m.current_value.as_str()).collect();
        let unmatch_values = unique_values
            .iter()
            .filter(|value| !matched.contains(value.as_str()))
            .cloned()
            .collect();
        Self {
            source: source.into(),
            target: target.into(),
            matches,
            coverage,
            unique_values,
            unmatch_values,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn matches(&self) -> &[ValueMatch] {
        &self.matches
    }

    /// Fraction of distinct source values that received a match.
    pub fn coverage(&self) -> f64 {
        self.coverage
    }

    pub fn unique_values(&self) -> &BTreeSet<String> {
        &self.unique_values
    }

    pub fn unmatch_values(&self) -> &BTreeSet<String> {
        &self.unmatch_values
    }

    pub fn column_mapping(&self) -> ColumnMapping {
        ColumnMapping::new(self.source.clone(), self.target.clone())
    }

    /// Consumes the result, returning its matches.
    pub fn into_matches(self) -> Vec<ValueMatch> {
        self.matches
    }

    /// Rows for review: every match, then each unmatched value with no target.
    pub fn preview_rows(&self) -> Vec<PreviewRow> {
        let mut rows: Vec<PreviewRow> = self
            .matches
            .iter()
            .map(|m| PreviewRow {
                source_value: m.current_value.clone(),
                target_value: Some(m.target_value.clone()),
                similarity: Some(m.similarity),
            })
            .collect();
        rows.extend(self.unmatch_values.iter().map(|value| PreviewRow {
            source_value: value.clone(),
            target_value: None,
            similarity: None,
        }));
        rows
    }
}

/// One line of a value mapping preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewRow {
    pub source_value: String,
    pub target_value: Option<String>,
    pub similarity: Option<f64>,
}

/// Value mapping preview for a single column pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueMappingPreview {
    pub source: String,
    pub target: String,
    pub rows: Vec<PreviewRow>,
}

/// Builds review previews for a set of value matching results.
pub fn preview_value_mappings(results: &[ValueMatchingResult]) -> Vec<ValueMappingPreview> {
    results
        .iter()
        .map(|result| ValueMappingPreview {
            source: result.source.clone(),
            target: result.target.clone(),
            rows: result.preview_rows(),
        })
        .collect()
}
