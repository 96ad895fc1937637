use std::collections::BTreeSet;

use polars::prelude::*;

use harmonize_map::strategy::{EditDistanceValueMatcher, ValueTriple};
use harmonize_map::{
    Target, TargetDomains, ValueMatcher, match_columns, match_values, match_values_in_domains,
    match_values_with, preview_domains,
};
use harmonize_model::{ColumnMapping, HarmonizeError, MatchingOptions, Result};

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn sex_dataset() -> DataFrame {
    DataFrame::new(vec![
        Column::new("sex".into(), vec!["Male", "female", "M"]),
        Column::new("weight".into(), vec![70.5f64, 62.0, 80.25]),
    ])
    .unwrap()
}

fn gender_target() -> DataFrame {
    DataFrame::new(vec![Column::new(
        "gender".into(),
        vec!["male", "female", "unknown"],
    )])
    .unwrap()
}

#[test]
fn sex_to_gender_against_table() {
    let results = match_values(
        &sex_dataset(),
        &Target::Table(gender_target()),
        &[ColumnMapping::new("sex", "gender")],
        "edit_distance",
    )
    .unwrap();

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.source(), "sex");
    assert_eq!(result.target(), "gender");
    assert!((result.coverage() - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(result.unique_values(), &set(&["Male", "female", "M"]));
    assert_eq!(result.unmatch_values(), &set(&["M"]));

    let pairs: Vec<(&str, &str)> = result
        .matches()
        .iter()
        .map(|m| (m.current_value.as_str(), m.target_value.as_str()))
        .collect();
    assert_eq!(pairs, vec![("Male", "male"), ("female", "female")]);
}

#[test]
fn sex_to_gender_against_bundled_vocabulary() {
    let results = match_values(
        &sex_dataset(),
        &Target::vocabulary("gdc"),
        &[ColumnMapping::new("sex", "gender")],
        "edit_distance",
    )
    .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].unmatch_values(), &set(&["M"]));
}

#[test]
fn float_columns_are_skipped() {
    let target = DataFrame::new(vec![Column::new("weight".into(), vec!["70.5", "62"])]).unwrap();
    let results = match_values(
        &sex_dataset(),
        &Target::Table(target),
        &[ColumnMapping::new("weight", "weight")],
        "exact",
    )
    .unwrap();
    assert!(results.is_empty());
}

#[test]
fn pairs_without_domain_or_over_threshold_are_skipped() {
    let mut domains = TargetDomains::new();
    domains.insert("gender".to_string(), Some(vec!["male".to_string()]));
    domains.insert("race".to_string(), Some(Vec::new()));

    let results = match_values_in_domains(
        &sex_dataset(),
        &domains,
        &[
            ColumnMapping::new("sex", "race"),
            ColumnMapping::new("sex", "ethnicity"),
            ColumnMapping::new("sex", "gender"),
        ],
        &EditDistanceValueMatcher::default(),
        &MatchingOptions::default().with_max_unique_values(2),
    )
    .unwrap();
    assert!(results.is_empty());
}

#[test]
fn missing_source_column_is_an_error() {
    let err = match_values(
        &sex_dataset(),
        &Target::Table(gender_target()),
        &[ColumnMapping::new("gender_code", "gender")],
        "exact",
    )
    .unwrap_err();
    assert!(matches!(err, HarmonizeError::MissingSourceColumn { column } if column == "gender_code"));
}

#[test]
fn unknown_method_and_vocabulary_are_rejected() {
    let mapping = [ColumnMapping::new("sex", "gender")];
    let err = match_values(&sex_dataset(), &Target::Table(gender_target()), &mapping, "tfidf")
        .unwrap_err();
    assert!(matches!(err, HarmonizeError::UnsupportedMethod { .. }));

    let err = match_values(&sex_dataset(), &Target::vocabulary("cadsr"), &mapping, "exact")
        .unwrap_err();
    assert!(matches!(err, HarmonizeError::UnsupportedVocabulary { .. }));
}

struct FailingMatcher;

impl ValueMatcher for FailingMatcher {
    fn name(&self) -> &str {
        "failing"
    }

    fn match_values(&self, _source: &[String], _target: &[String]) -> Result<Vec<ValueTriple>> {
        Err(HarmonizeError::strategy("failing", "model unavailable"))
    }
}

#[test]
fn strategy_failures_propagate() {
    let err = match_values_with(
        &sex_dataset(),
        &Target::Table(gender_target()),
        &[ColumnMapping::new("sex", "gender")],
        &FailingMatcher,
        &MatchingOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "failing strategy failed: model unavailable");
}

#[test]
fn results_follow_column_mapping_order() {
    let dataset = DataFrame::new(vec![
        Column::new("a".into(), vec!["x", "y"]),
        Column::new("b".into(), vec!["y", "x"]),
    ])
    .unwrap();
    let target = DataFrame::new(vec![Column::new("t".into(), vec!["x", "y"])]).unwrap();
    let results = match_values(
        &dataset,
        &Target::Table(target),
        &[ColumnMapping::new("b", "t"), ColumnMapping::new("a", "t")],
        "exact",
    )
    .unwrap();
    let sources: Vec<&str> = results.iter().map(|r| r.source()).collect();
    assert_eq!(sources, vec!["b", "a"]);
}

#[test]
fn columns_match_against_bundled_vocabulary() {
    let dataset = DataFrame::new(vec![
        Column::new("Gender".into(), vec!["m"]),
        Column::new("vital_status".into(), vec!["alive"]),
    ])
    .unwrap();
    let mappings = match_columns(&dataset, &Target::vocabulary("gdc"), "exact").unwrap();
    assert_eq!(
        mappings,
        vec![
            ColumnMapping::new("Gender", "gender"),
            ColumnMapping::new("vital_status", "vital_status"),
        ]
    );
}

#[test]
fn domain_preview_pads_and_limits() {
    let preview = preview_domains(
        &sex_dataset(),
        ("sex", "gender"),
        &Target::Table(DataFrame::new(vec![Column::new(
            "gender".into(),
            vec!["male", "female", "unknown", "not reported"],
        )])
        .unwrap()),
        None,
    )
    .unwrap();
    assert_eq!(preview.shape(), (4, 2));
    let source: Vec<Option<&str>> = preview
        .column("source_domain")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(source, vec![Some("Male"), Some("female"), Some("M"), Some("")]);

    let limited = preview_domains(&sex_dataset(), ("sex", "gender"), &Target::vocabulary("gdc"), Some(2))
        .unwrap();
    assert_eq!(limited.height(), 2);
}

#[test]
fn exact_results_serialize_for_the_plan_builder() {
    let results = match_values(
        &sex_dataset(),
        &Target::Table(gender_target()),
        &[ColumnMapping::new("sex", "gender")],
        "exact",
    )
    .unwrap();
    insta::assert_json_snapshot!(results, @r#"
    [
      {
        "source": "sex",
        "target": "gender",
        "matches": [
          {
            "current_value": "Male",
            "target_value": "male",
            "similarity": 1.0
          },
          {
            "current_value": "female",
            "target_value": "female",
            "similarity": 1.0
          }
        ],
        "coverage": 0.6666666666666666,
        "unique_values": [
          "M",
          "Male",
          "female"
        ],
        "unmatch_values": [
          "M"
        ]
      }
    ]
    "#);
}
