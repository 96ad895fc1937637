//! Built-in column matching strategies.
//!
//! All strategies score every `(source, target)` column pair, then assign
//! greedily from the highest score down so that each source and each target
//! column is used at most once. Results follow source column order.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use polars::prelude::*;
use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;

use harmonize_model::{ColumnMapping, Result};

use super::ColumnMatcher;
use crate::utils::{distinct_values, normalize_text, normalize_value, token_set};

const JARO_WINKLER_MIN_SCORE: f64 = 0.7;
const JACCARD_MIN_SCORE: f64 = 0.1;
const TOKEN_NO_OVERLAP_PENALTY: f64 = 0.6;
const TOKEN_OVERLAP_BOOST: f64 = 1.05;

struct Candidate {
    source_idx: usize,
    target_idx: usize,
    score: f64,
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// One-to-one greedy assignment over scored candidates.
fn assign(
    sources: &[String],
    targets: &[String],
    mut candidates: Vec<Candidate>,
    min_score: f64,
) -> Vec<ColumnMapping> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut assigned_sources = HashSet::new();
    let mut assigned_targets = HashSet::new();
    let mut picked = Vec::new();
    for candidate in candidates {
        if candidate.score < min_score {
            break;
        }
        if assigned_sources.contains(&candidate.source_idx)
            || assigned_targets.contains(&candidate.target_idx)
        {
            continue;
        }
        assigned_sources.insert(candidate.source_idx);
        assigned_targets.insert(candidate.target_idx);
        picked.push((candidate.source_idx, candidate.target_idx));
    }

    picked.sort_unstable();
    picked
        .into_iter()
        .map(|(s, t)| ColumnMapping::new(sources[s].clone(), targets[t].clone()))
        .collect()
}

/// Name similarity: Jaro-Winkler over raw and normalized names, adjusted
/// by token overlap.
#[derive(Debug, Clone, Copy)]
pub struct JaroWinklerColumnMatcher {
    min_score: f64,
}

impl Default for JaroWinklerColumnMatcher {
    fn default() -> Self {
        Self {
            min_score: JARO_WINKLER_MIN_SCORE,
        }
    }
}

impl JaroWinklerColumnMatcher {
    #[must_use]
    pub fn with_min_score(min_score: f64) -> Self {
        Self { min_score }
    }

    fn score(source: &str, target: &str, source_tokens: &BTreeSet<String>, target_tokens: &BTreeSet<String>) -> f64 {
        let raw = jaro_similarity(source.to_lowercase().chars(), target.to_lowercase().chars());
        let normalized = jaro_similarity(normalize_text(source).chars(), normalize_text(target).chars());
        let score = raw.max(normalized);
        if source_tokens.is_disjoint(target_tokens) {
            score * TOKEN_NO_OVERLAP_PENALTY
        } else {
            (score * TOKEN_OVERLAP_BOOST).min(1.0)
        }
    }
}

impl ColumnMatcher for JaroWinklerColumnMatcher {
    fn name(&self) -> &str {
        "jaro_winkler"
    }

    fn map(&self, source: &DataFrame, target: &DataFrame) -> Result<Vec<ColumnMapping>> {
        let sources = column_names(source);
        let targets = column_names(target);
        let target_tokens: Vec<BTreeSet<String>> = targets.iter().map(|t| token_set(t)).collect();

        let mut candidates = Vec::new();
        for (source_idx, source_name) in sources.iter().enumerate() {
            let source_tokens = token_set(source_name);
            for (target_idx, target_name) in targets.iter().enumerate() {
                candidates.push(Candidate {
                    source_idx,
                    target_idx,
                    score: Self::score(
                        source_name,
                        target_name,
                        &source_tokens,
                        &target_tokens[target_idx],
                    ),
                });
            }
        }
        Ok(assign(&sources, &targets, candidates, self.min_score))
    }
}

/// Normalized column name equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactColumnMatcher;

impl ColumnMatcher for ExactColumnMatcher {
    fn name(&self) -> &str {
        "exact"
    }

    fn map(&self, source: &DataFrame, target: &DataFrame) -> Result<Vec<ColumnMapping>> {
        let sources = column_names(source);
        let targets = column_names(target);
        let normalized_targets: Vec<String> = targets.iter().map(|t| normalize_text(t)).collect();

        let mut candidates = Vec::new();
        for (source_idx, source_name) in sources.iter().enumerate() {
            let key = normalize_text(source_name);
            if let Some(target_idx) = normalized_targets.iter().position(|t| *t == key) {
                candidates.push(Candidate {
                    source_idx,
                    target_idx,
                    score: 1.0,
                });
            }
        }
        Ok(assign(&sources, &targets, candidates, 1.0))
    }
}

/// Jaccard overlap of the distinct (normalized) values of each column.
#[derive(Debug, Clone, Copy)]
pub struct JaccardDistanceColumnMatcher {
    min_score: f64,
}

impl Default for JaccardDistanceColumnMatcher {
    fn default() -> Self {
        Self {
            min_score: JACCARD_MIN_SCORE,
        }
    }
}

impl JaccardDistanceColumnMatcher {
    #[must_use]
    pub fn with_min_score(min_score: f64) -> Self {
        Self { min_score }
    }
}

fn value_set(column: &Column) -> BTreeSet<String> {
    distinct_values(column, true)
        .iter()
        .map(|value| normalize_value(value))
        .filter(|value| !value.is_empty())
        .collect()
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

impl ColumnMatcher for JaccardDistanceColumnMatcher {
    fn name(&self) -> &str {
        "jaccard_distance"
    }

    fn map(&self, source: &DataFrame, target: &DataFrame) -> Result<Vec<ColumnMapping>> {
        let sources = column_names(source);
        let targets = column_names(target);
        let source_sets: Vec<BTreeSet<String>> =
            source.get_columns().iter().map(value_set).collect();
        let target_sets: Vec<BTreeSet<String>> =
            target.get_columns().iter().map(value_set).collect();

        let mut candidates = Vec::new();
        for (source_idx, source_values) in source_sets.iter().enumerate() {
            for (target_idx, target_values) in target_sets.iter().enumerate() {
                let score = jaccard(source_values, target_values);
                if score > 0.0 {
                    candidates.push(Candidate {
                        source_idx,
                        target_idx,
                        score,
                    });
                }
            }
        }
        Ok(assign(&sources, &targets, candidates, self.min_score))
    }
}
