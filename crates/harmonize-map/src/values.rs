//! Value matching orchestration.
//!
//! For each `(source, target)` column pair the orchestrator resolves the
//! target domain, collects the distinct source values, matches both sides
//! in normalized form and maps the proposals back to the original spelling.
//! Pairs without a usable domain, float columns, columns without values and
//! columns above the cardinality limit are skipped.

use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use polars::prelude::*;
use tracing::{debug, info, info_span};

use harmonize_model::{
    ColumnMapping, HarmonizeError, MatchingOptions, Result, ValueMatch, ValueMatchingResult,
};

use crate::domain::{Target, TargetDomains, resolve_domain};
use crate::strategy::{ValueMatcher, ValueMatcherRegistry};
use crate::utils::{distinct_values, normalize_value};

/// Matches values with a built-in method and default options.
pub fn match_values(
    dataset: &DataFrame,
    target: &Target,
    column_mapping: &[ColumnMapping],
    method: &str,
) -> Result<Vec<ValueMatchingResult>> {
    let matcher = ValueMatcherRegistry::builtin().create(method)?;
    match_values_with(
        dataset,
        target,
        column_mapping,
        matcher.as_ref(),
        &MatchingOptions::default(),
    )
}

/// Matches values with an explicit strategy and options.
pub fn match_values_with(
    dataset: &DataFrame,
    target: &Target,
    column_mapping: &[ColumnMapping],
    matcher: &dyn ValueMatcher,
    options: &MatchingOptions,
) -> Result<Vec<ValueMatchingResult>> {
    let target_columns: Vec<&str> = column_mapping.iter().map(|m| m.target.as_str()).collect();
    let domains = resolve_domain(&target_columns, target)?;
    match_values_in_domains(dataset, &domains, column_mapping, matcher, options)
}

/// Matches values against already resolved target domains.
///
/// Results follow the order of `column_mapping`.
pub fn match_values_in_domains(
    dataset: &DataFrame,
    domains: &TargetDomains,
    column_mapping: &[ColumnMapping],
    matcher: &dyn ValueMatcher,
    options: &MatchingOptions,
) -> Result<Vec<ValueMatchingResult>> {
    let span = info_span!("match_values", method = matcher.name(), pairs = column_mapping.len());
    let _guard = span.enter();
    let start = Instant::now();

    let mut results = Vec::new();
    for mapping in column_mapping {
        if let Some(result) = match_pair(dataset, domains, mapping, matcher, options)? {
            results.push(result);
        }
    }

    info!(
        method = matcher.name(),
        pairs = column_mapping.len(),
        matched_pairs = results.len(),
        duration_ms = start.elapsed().as_millis(),
        "value matching complete"
    );
    Ok(results)
}

fn skip(mapping: &ColumnMapping, reason: &str) -> Result<Option<ValueMatchingResult>> {
    debug!(
        source = %mapping.source,
        target = %mapping.target,
        reason,
        "skipping column pair"
    );
    Ok(None)
}

fn match_pair(
    dataset: &DataFrame,
    domains: &TargetDomains,
    mapping: &ColumnMapping,
    matcher: &dyn ValueMatcher,
    options: &MatchingOptions,
) -> Result<Option<ValueMatchingResult>> {
    let Some(domain) = domains
        .get(&mapping.target)
        .and_then(Option::as_ref)
        .filter(|domain| !domain.is_empty())
    else {
        return skip(mapping, "target has no value domain");
    };

    let column = dataset
        .column(&mapping.source)
        .map_err(|_| HarmonizeError::MissingSourceColumn {
            column: mapping.source.clone(),
        })?;

    if column.dtype().is_float() {
        return skip(mapping, "floating-point column");
    }

    let unique = distinct_values(column, true);
    if unique.is_empty() {
        return skip(mapping, "no values");
    }
    if unique.len() > options.max_unique_values {
        return skip(mapping, "too many distinct values");
    }

    let (source_keys, source_lookup) = normalized_lookup(unique.iter());
    let (target_keys, target_lookup) = normalized_lookup(domain.iter());

    let triples = matcher.match_values(&source_keys, &target_keys)?;

    let mut matches = Vec::with_capacity(triples.len());
    for (source_value, target_value, similarity) in triples {
        let (Some(current), Some(target)) = (
            source_lookup.get(&source_value),
            target_lookup.get(&target_value),
        ) else {
            return Err(HarmonizeError::strategy(
                matcher.name(),
                format!("returned a value outside its input: ({source_value}, {target_value})"),
            ));
        };
        matches.push(ValueMatch::new(current.clone(), target.clone(), similarity));
    }

    let unique_values: BTreeSet<String> = source_lookup.into_values().collect();
    let result = ValueMatchingResult::new(
        mapping.source.clone(),
        mapping.target.clone(),
        matches,
        unique_values,
    );
    debug!(
        source = %mapping.source,
        target = %mapping.target,
        matches = result.matches().len(),
        coverage = result.coverage(),
        "matched column values"
    );
    Ok(Some(result))
}

/// Normalized keys in first-appearance order plus a reverse lookup to the
/// original spelling; a later original wins on collision.
fn normalized_lookup<'a, I>(values: I) -> (Vec<String>, HashMap<String, String>)
where
    I: Iterator<Item = &'a String>,
{
    let mut keys = Vec::new();
    let mut lookup = HashMap::new();
    for value in values {
        let key = normalize_value(value);
        if lookup.insert(key.clone(), value.clone()).is_none() {
            keys.push(key);
        }
    }
    (keys, lookup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_lookup_last_writer_wins() {
        let values = vec!["Male".to_string(), "MALE".to_string(), "female".to_string()];
        let (keys, lookup) = normalized_lookup(values.iter());
        assert_eq!(keys, vec!["male", "female"]);
        assert_eq!(lookup["male"], "MALE");
    }
}
