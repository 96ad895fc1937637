use std::collections::BTreeSet;

use proptest::prelude::*;

use harmonize_model::{ColumnMapping, ValueMatch, ValueMatchingResult, preview_value_mappings};

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn sex_result() -> ValueMatchingResult {
    ValueMatchingResult::new(
        "sex",
        "gender",
        vec![
            ValueMatch::new("Male", "male", 0.95),
            ValueMatch::new("female", "female", 0.9),
        ],
        set(&["Male", "female", "M"]),
    )
}

#[test]
fn coverage_and_unmatched_values() {
    let result = sex_result();
    assert!((result.coverage() - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(result.unmatch_values(), &set(&["M"]));
    assert_eq!(result.column_mapping(), ColumnMapping::new("sex", "gender"));
}

#[test]
fn empty_unique_values_has_zero_coverage() {
    let result = ValueMatchingResult::new("a", "b", Vec::new(), BTreeSet::new());
    assert_eq!(result.coverage(), 0.0);
    assert!(result.unmatch_values().is_empty());
}

#[test]
fn mapping_key_joins_with_double_underscore() {
    assert_eq!(ColumnMapping::new("sex", "gender").key(), "sex__gender");
}

#[test]
fn preview_lists_matches_then_unmatched() {
    let previews = preview_value_mappings(&[sex_result()]);
    insta::assert_json_snapshot!(previews, @r#"
    [
      {
        "source": "sex",
        "target": "gender",
        "rows": [
          {
            "source_value": "Male",
            "target_value": "male",
            "similarity": 0.95
          },
          {
            "source_value": "female",
            "target_value": "female",
            "similarity": 0.9
          },
          {
            "source_value": "M",
            "target_value": null,
            "similarity": null
          }
        ]
      }
    ]
    "#);
}

proptest! {
    #[test]
    fn coverage_matches_definition(
        values in prop::collection::btree_set("[a-z]{1,6}", 1..20),
        picks in prop::collection::vec(any::<bool>(), 20),
    ) {
        let matches: Vec<ValueMatch> = values
            .iter()
            .zip(picks.iter())
            .filter(|(_, pick)| **pick)
            .map(|(value, _)| ValueMatch::new(value.clone(), value.to_uppercase(), 1.0))
            .collect();
        let matched: BTreeSet<String> = matches.iter().map(|m| m.current_value.clone()).collect();
        let result = ValueMatchingResult::new("src", "tgt", matches.clone(), values.clone());

        prop_assert_eq!(result.coverage(), matches.len() as f64 / values.len() as f64);
        let expected: BTreeSet<String> = values.difference(&matched).cloned().collect();
        prop_assert_eq!(result.unmatch_values(), &expected);
    }
}
