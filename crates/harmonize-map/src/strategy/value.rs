//! Built-in value matching strategies.
//!
//! Each source value is paired with its best-scoring target value; pairs
//! scoring below the strategy threshold are dropped. Ties keep the first
//! target in the given order.

use std::cmp::Ordering;

use rapidfuzz::distance::{jaro_winkler, levenshtein};

use harmonize_model::Result;

use super::{ValueMatcher, ValueTriple};

const EDIT_DISTANCE_THRESHOLD: f64 = 0.8;
const JARO_WINKLER_THRESHOLD: f64 = 0.85;

/// Normalized Levenshtein similarity.
#[derive(Debug, Clone, Copy)]
pub struct EditDistanceValueMatcher {
    threshold: f64,
}

impl Default for EditDistanceValueMatcher {
    fn default() -> Self {
        Self {
            threshold: EDIT_DISTANCE_THRESHOLD,
        }
    }
}

impl EditDistanceValueMatcher {
    #[must_use]
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl ValueMatcher for EditDistanceValueMatcher {
    fn name(&self) -> &str {
        "edit_distance"
    }

    fn match_values(&self, source: &[String], target: &[String]) -> Result<Vec<ValueTriple>> {
        Ok(best_matches(source, target, self.threshold, |a, b| {
            levenshtein::normalized_similarity(a.chars(), b.chars())
        }))
    }
}

/// Jaro-Winkler similarity.
#[derive(Debug, Clone, Copy)]
pub struct JaroWinklerValueMatcher {
    threshold: f64,
}

impl Default for JaroWinklerValueMatcher {
    fn default() -> Self {
        Self {
            threshold: JARO_WINKLER_THRESHOLD,
        }
    }
}

impl JaroWinklerValueMatcher {
    #[must_use]
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl ValueMatcher for JaroWinklerValueMatcher {
    fn name(&self) -> &str {
        "jaro_winkler"
    }

    fn match_values(&self, source: &[String], target: &[String]) -> Result<Vec<ValueTriple>> {
        Ok(best_matches(source, target, self.threshold, |a, b| {
            jaro_winkler::similarity(a.chars(), b.chars())
        }))
    }
}

/// Equal strings only, similarity 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactValueMatcher;

impl ValueMatcher for ExactValueMatcher {
    fn name(&self) -> &str {
        "exact"
    }

    fn match_values(&self, source: &[String], target: &[String]) -> Result<Vec<ValueTriple>> {
        Ok(source
            .iter()
            .filter(|value| target.contains(value))
            .map(|value| (value.clone(), value.clone(), 1.0))
            .collect())
    }
}

fn best_matches<F>(source: &[String], target: &[String], threshold: f64, score: F) -> Vec<ValueTriple>
where
    F: Fn(&str, &str) -> f64,
{
    let mut out = Vec::new();
    for value in source {
        let best = target
            .iter()
            .map(|candidate| (candidate, score(value, candidate)))
            .fold(None::<(&String, f64)>, |best, (candidate, similarity)| match best {
                Some((_, top)) if similarity.partial_cmp(&top) != Some(Ordering::Greater) => best,
                _ => Some((candidate, similarity)),
            });
        if let Some((candidate, similarity)) = best
            && similarity >= threshold
        {
            out.push((value.clone(), candidate.clone(), similarity));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn edit_distance_keeps_close_values() {
        let matcher = EditDistanceValueMatcher::default();
        let triples = matcher
            .match_values(
                &strings(&["male", "femal", "m"]),
                &strings(&["female", "male", "unknown"]),
            )
            .unwrap();
        let pairs: Vec<(&str, &str)> = triples
            .iter()
            .map(|(s, t, _)| (s.as_str(), t.as_str()))
            .collect();
        assert_eq!(pairs, vec![("male", "male"), ("femal", "female")]);
        assert_eq!(triples[0].2, 1.0);
    }

    #[test]
    fn ties_keep_first_target() {
        let matcher = EditDistanceValueMatcher::with_threshold(0.0);
        let triples = matcher
            .match_values(&strings(&["ab"]), &strings(&["ax", "ay"]))
            .unwrap();
        assert_eq!(triples[0].1, "ax");
    }

    #[test]
    fn exact_requires_equality() {
        let triples = ExactValueMatcher
            .match_values(&strings(&["male", "m"]), &strings(&["male"]))
            .unwrap();
        assert_eq!(triples, vec![("male".to_string(), "male".to_string(), 1.0)]);
    }

    #[test]
    fn empty_target_yields_nothing() {
        let triples = JaroWinklerValueMatcher::default()
            .match_values(&strings(&["male"]), &[])
            .unwrap();
        assert!(triples.is_empty());
    }
}
