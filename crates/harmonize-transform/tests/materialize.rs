use polars::prelude::*;
use serde_json::json;

use harmonize_map::{
    MappingRecord, MatchEntry, Target, ValueMapper, match_values, records_from_json,
    update_mappings,
};
use harmonize_model::{ColumnMapping, HarmonizeError};
use harmonize_transform::{materialize_mapping, materialize_specs};

fn strings(column: &Column) -> Vec<Option<String>> {
    column
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

fn names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|n| n.to_string()).collect()
}

#[test]
fn sex_to_gender_end_to_end() {
    let dataset = DataFrame::new(vec![
        Column::new("sex".into(), vec!["Male", "female", "M"]),
        Column::new("age".into(), vec![Some(34i64), Some(51), None]),
    ])
    .unwrap();

    let computed = match_values(
        &dataset,
        &Target::vocabulary("gdc"),
        &[ColumnMapping::new("sex", "gender")],
        "edit_distance",
    )
    .unwrap();
    assert!((computed[0].coverage() - 2.0 / 3.0).abs() < 1e-12);

    let plan = update_mappings(
        computed,
        vec![MappingRecord::new("age", "age_at_diagnosis")],
    )
    .unwrap();
    let output = materialize_mapping(&dataset, &plan).unwrap();

    assert_eq!(names(&output), vec!["age_at_diagnosis", "gender"]);
    assert_eq!(
        strings(output.column("gender").unwrap()),
        vec![Some("male".to_string()), Some("female".to_string()), None]
    );
    let age = output.column("age_at_diagnosis").unwrap();
    assert_eq!(age.dtype(), &DataType::Int64);
    assert_eq!(age.null_count(), 1);
}

#[test]
fn identity_plan_reproduces_columns() {
    let dataset = DataFrame::new(vec![
        Column::new("a".into(), vec![Some("x"), None, Some("z")]),
        Column::new("b".into(), vec![1.5f64, 2.0, 3.25]),
    ])
    .unwrap();
    let plan = update_mappings(
        Vec::new(),
        vec![MappingRecord::new("b", "b"), MappingRecord::new("a", "a")],
    )
    .unwrap();
    let output = materialize_mapping(&dataset, &plan).unwrap();

    assert_eq!(names(&output), vec!["b", "a"]);
    let expected = dataset.select(["b", "a"]).unwrap();
    assert!(output.equals_missing(&expected));
}

#[test]
fn missing_source_column_fails() {
    let dataset = DataFrame::new(vec![Column::new("a".into(), vec!["x"])]).unwrap();
    let plan = update_mappings(Vec::new(), vec![MappingRecord::new("missing", "out")]).unwrap();
    let err = materialize_mapping(&dataset, &plan).unwrap_err();
    assert_eq!(
        err.to_string(),
        "source column not found in input table: missing"
    );
    assert!(matches!(err, HarmonizeError::MissingSourceColumn { .. }));
}

#[test]
fn empty_plan_gives_empty_table() {
    let dataset = DataFrame::new(vec![Column::new("a".into(), vec!["x"])]).unwrap();
    let plan = update_mappings(Vec::new(), Vec::new()).unwrap();
    let output = materialize_mapping(&dataset, &plan).unwrap();
    assert_eq!(output.width(), 0);
}

#[test]
fn specs_resolve_mappers_from_records() {
    let dataset = DataFrame::new(vec![
        Column::new("sex".into(), vec!["M", "F"]),
        Column::new("grade".into(), vec![1i64, 3]),
    ])
    .unwrap();
    let mut records = records_from_json(&json!([
        {"source": "sex", "target": "gender", "matches": [
            {"current_value": "M", "target_value": "male", "similarity": 0.5},
            {"current_value": "F", "target_value": "female", "similarity": 0.5}
        ]},
        {"source": "grade", "target": "tumor_grade",
         "mapper": {"current_value": ["1", "3"], "target_value": ["G1", "G3"]}}
    ]))
    .unwrap();
    records.push(
        MappingRecord::new("sex", "sex_upper")
            .with_mapper(ValueMapper::function(|v| v.map(str::to_uppercase))),
    );
    records.push(
        MappingRecord::new("sex", "sex_code").with_matches(vec![MatchEntry::pair("M", "1")]),
    );

    let output = materialize_specs(&dataset, records).unwrap();
    assert_eq!(
        names(&output),
        vec!["gender", "tumor_grade", "sex_upper", "sex_code"]
    );
    assert_eq!(
        strings(output.column("tumor_grade").unwrap()),
        vec![Some("G1".to_string()), Some("G3".to_string())]
    );
    assert_eq!(
        strings(output.column("sex_code").unwrap()),
        vec![Some("1".to_string()), None]
    );
}
