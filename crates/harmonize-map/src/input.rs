//! Accepted shapes of value mapper input and mapping records.
//!
//! Mapping records arrive as JSON (list of objects), as a table with
//! `source`/`target` columns, or straight from the output of value and
//! column matching. Every shape is folded into [`MapperInput`], which
//! [`create_mapper`](crate::resolve::create_mapper) resolves in a fixed order.

use std::fmt;

use polars::prelude::*;
use serde_json::{Map, Value};

use harmonize_model::{ColumnMapping, HarmonizeError, Result, ValueMatch, ValueMatchingResult};

use crate::mapper::{ValueFn, ValueMapper};
use crate::utils::any_to_string;

/// One element of a match sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchEntry {
    Match(ValueMatch),
    /// Tuple form `(source_value, target_value)`; both must be strings.
    Pair(Value, Value),
}

impl MatchEntry {
    pub fn pair(current: impl Into<String>, target: impl Into<String>) -> Self {
        MatchEntry::Pair(Value::String(current.into()), Value::String(target.into()))
    }

    /// The `(current, target)` strings, or `InvalidMatchEntry`.
    pub fn as_pair(&self) -> Result<(&str, &str)> {
        match self {
            MatchEntry::Match(m) => Ok((m.current_value.as_str(), m.target_value.as_str())),
            MatchEntry::Pair(Value::String(current), Value::String(target)) => {
                Ok((current.as_str(), target.as_str()))
            }
            MatchEntry::Pair(current, target) => Err(HarmonizeError::InvalidMatchEntry {
                entry: format!("({current}, {target})"),
            }),
        }
    }

    fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) if items.len() == 2 => {
                Ok(MatchEntry::Pair(items[0].clone(), items[1].clone()))
            }
            Value::Object(object) => {
                let current = object.get("current_value").and_then(Value::as_str);
                let target = object.get("target_value").and_then(Value::as_str);
                match (current, target) {
                    (Some(current), Some(target)) => {
                        let similarity = object
                            .get("similarity")
                            .and_then(Value::as_f64)
                            .unwrap_or(1.0);
                        Ok(MatchEntry::Match(ValueMatch::new(current, target, similarity)))
                    }
                    _ => Err(invalid_entry(value)),
                }
            }
            other => Err(invalid_entry(other)),
        }
    }
}

fn invalid_entry(value: &Value) -> HarmonizeError {
    HarmonizeError::InvalidMatchEntry {
        entry: value.to_string(),
    }
}

impl From<ValueMatch> for MatchEntry {
    fn from(value: ValueMatch) -> Self {
        MatchEntry::Match(value)
    }
}

impl From<(&str, &str)> for MatchEntry {
    fn from((current, target): (&str, &str)) -> Self {
        MatchEntry::pair(current, target)
    }
}

/// Anything that can be turned into a [`ValueMapper`].
#[derive(Clone)]
pub enum MapperInput {
    /// Absent mapper.
    Null,
    Mapper(ValueMapper),
    Function(ValueFn),
    Matches(Vec<MatchEntry>),
    /// Table with `current_value` and `target_value` columns.
    Table(DataFrame),
    Record(Box<MappingRecord>),
    /// Input of no accepted shape.
    Other(Value),
}

impl MapperInput {
    /// Interprets a JSON value.
    ///
    /// - `null` is absent
    /// - an array is a match sequence
    /// - an object with `source` and `target` is a nested record
    /// - an object with `current_value` and `target_value` arrays is a table
    /// - anything else is kept as [`MapperInput::Other`]
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(MapperInput::Null),
            Value::Array(items) => Ok(MapperInput::Matches(
                items
                    .iter()
                    .map(MatchEntry::from_json)
                    .collect::<Result<Vec<_>>>()?,
            )),
            Value::Object(object) if object.contains_key("source") && object.contains_key("target") => {
                Ok(MapperInput::Record(Box::new(MappingRecord::from_json_object(object)?)))
            }
            Value::Object(object) => match columnar_table(object)? {
                Some(table) => Ok(MapperInput::Table(table)),
                None => Ok(MapperInput::Other(value.clone())),
            },
            other => Ok(MapperInput::Other(other.clone())),
        }
    }

    /// Short rendering used in error messages.
    pub fn describe(&self) -> String {
        match self {
            MapperInput::Null => "null".to_string(),
            MapperInput::Mapper(mapper) => format!("{} mapper", mapper.kind()),
            MapperInput::Function(_) => "function".to_string(),
            MapperInput::Matches(entries) => format!("{} match entries", entries.len()),
            MapperInput::Table(df) => {
                let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
                format!("table with columns [{}]", names.join(", "))
            }
            MapperInput::Record(record) => {
                format!("record {{source: {}, target: {}}}", record.source, record.target)
            }
            MapperInput::Other(value) => value.to_string(),
        }
    }
}

impl fmt::Debug for MapperInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MapperInput({})", self.describe())
    }
}

impl From<ValueMapper> for MapperInput {
    fn from(mapper: ValueMapper) -> Self {
        MapperInput::Mapper(mapper)
    }
}

impl From<Vec<MatchEntry>> for MapperInput {
    fn from(entries: Vec<MatchEntry>) -> Self {
        MapperInput::Matches(entries)
    }
}

impl From<DataFrame> for MapperInput {
    fn from(table: DataFrame) -> Self {
        MapperInput::Table(table)
    }
}

impl From<MappingRecord> for MapperInput {
    fn from(record: MappingRecord) -> Self {
        MapperInput::Record(Box::new(record))
    }
}

fn columnar_table(object: &Map<String, Value>) -> Result<Option<DataFrame>> {
    let (Some(Value::Array(current)), Some(Value::Array(target))) =
        (object.get("current_value"), object.get("target_value"))
    else {
        return Ok(None);
    };
    let to_cells = |items: &Vec<Value>| -> Vec<Option<String>> {
        items
            .iter()
            .map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect()
    };
    let table = DataFrame::new(vec![
        Column::new("current_value".into(), to_cells(current)),
        Column::new("target_value".into(), to_cells(target)),
    ])
    .map_err(HarmonizeError::frame)?;
    Ok(Some(table))
}

/// One row of a mapping specification.
///
/// `mapper` is `None` when the key is absent; an explicit null is
/// `Some(MapperInput::Null)`.
#[derive(Debug, Clone)]
pub struct MappingRecord {
    pub source: String,
    pub target: String,
    pub mapper: Option<MapperInput>,
    pub matches: Option<Vec<MatchEntry>>,
}

impl MappingRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            mapper: None,
            matches: None,
        }
    }

    #[must_use]
    pub fn with_mapper(mut self, mapper: impl Into<MapperInput>) -> Self {
        self.mapper = Some(mapper.into());
        self
    }

    #[must_use]
    pub fn with_matches(mut self, matches: Vec<MatchEntry>) -> Self {
        self.matches = Some(matches);
        self
    }

    pub fn column_mapping(&self) -> ColumnMapping {
        ColumnMapping::new(self.source.clone(), self.target.clone())
    }

    pub fn key(&self) -> String {
        harmonize_model::mapping_key(&self.source, &self.target)
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Object(object) => Self::from_json_object(object),
            other => Err(HarmonizeError::invalid_spec(format!(
                "each mapping must be an object with 'source', 'target' and optional 'mapper' keys, got: {other}"
            ))),
        }
    }

    fn from_json_object(object: &Map<String, Value>) -> Result<Self> {
        let field = |key: &str| -> Result<String> {
            match object.get(key) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Err(HarmonizeError::invalid_spec(format!(
                    "'{key}' must be a column name, got: {other}"
                ))),
                None => Err(HarmonizeError::invalid_spec(format!(
                    "each mapping must contain 'source' and 'target' keys; missing '{key}'"
                ))),
            }
        };
        let mut record = Self::new(field("source")?, field("target")?);

        if let Some(mapper) = object.get("mapper") {
            record.mapper = Some(MapperInput::from_json(mapper)?);
        }
        if let Some(Value::Array(items)) = object.get("matches") {
            record.matches = Some(
                items
                    .iter()
                    .map(MatchEntry::from_json)
                    .collect::<Result<Vec<_>>>()?,
            );
        }
        Ok(record)
    }
}

impl From<ValueMatchingResult> for MappingRecord {
    fn from(result: ValueMatchingResult) -> Self {
        let mapping = result.column_mapping();
        let matches = result.into_matches().into_iter().map(MatchEntry::Match).collect();
        MappingRecord::new(mapping.source, mapping.target).with_matches(matches)
    }
}

impl From<ColumnMapping> for MappingRecord {
    fn from(mapping: ColumnMapping) -> Self {
        MappingRecord::new(mapping.source, mapping.target)
    }
}

/// Reads mapping records from a JSON array of objects.
pub fn records_from_json(value: &Value) -> Result<Vec<MappingRecord>> {
    match value {
        Value::Array(items) => items.iter().map(MappingRecord::from_json).collect(),
        other => Err(HarmonizeError::invalid_spec(format!(
            "mapping specification must be a list of mappings, got: {other}"
        ))),
    }
}

/// Reads mapping records from a table with `source` and `target` columns.
///
/// Other columns are ignored; records carry no mapper.
pub fn records_from_table(table: &DataFrame) -> Result<Vec<MappingRecord>> {
    let source = required_column(table, "source")?;
    let target = required_column(table, "target")?;

    (0..table.height())
        .map(|idx| {
            let source = cell(source, idx, "source")?;
            let target = cell(target, idx, "target")?;
            Ok(MappingRecord::new(source, target))
        })
        .collect()
}

fn required_column<'a>(table: &'a DataFrame, name: &str) -> Result<&'a Column> {
    table.column(name).map_err(|_| {
        HarmonizeError::invalid_spec(format!(
            "mapping table must contain 'source' and 'target' columns; missing '{name}'"
        ))
    })
}

fn cell(column: &Column, idx: usize, name: &str) -> Result<String> {
    match column.get(idx).map_err(HarmonizeError::frame)? {
        AnyValue::Null => Err(HarmonizeError::invalid_spec(format!(
            "row {idx} has no '{name}' column name"
        ))),
        value => Ok(any_to_string(value)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn record_requires_source_and_target() {
        let err = MappingRecord::from_json(&json!({"source": "sex"})).unwrap_err();
        assert!(matches!(err, HarmonizeError::InvalidMappingSpecification { .. }));
    }

    #[test]
    fn absent_and_null_mapper_differ() {
        let absent = MappingRecord::from_json(&json!({"source": "a", "target": "b"})).unwrap();
        assert!(absent.mapper.is_none());
        let null =
            MappingRecord::from_json(&json!({"source": "a", "target": "b", "mapper": null})).unwrap();
        assert!(matches!(null.mapper, Some(MapperInput::Null)));
    }

    #[test]
    fn object_without_known_keys_is_other() {
        let input = MapperInput::from_json(&json!({"unexpected": 1})).unwrap();
        assert!(matches!(input, MapperInput::Other(_)));
    }

    #[test]
    fn columnar_object_becomes_table() {
        let input = MapperInput::from_json(&json!({
            "current_value": ["M", "F"],
            "target_value": ["male", "female"]
        }))
        .unwrap();
        match input {
            MapperInput::Table(df) => assert_eq!(df.shape(), (2, 2)),
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn tuple_with_number_is_rejected_when_read() {
        let entry = MatchEntry::Pair(json!("a"), json!(1));
        assert!(matches!(
            entry.as_pair(),
            Err(HarmonizeError::InvalidMatchEntry { .. })
        ));
    }

    #[test]
    fn table_records_need_both_columns() {
        let table = DataFrame::new(vec![Column::new("source".into(), vec!["a"])]).unwrap();
        assert!(matches!(
            records_from_table(&table),
            Err(HarmonizeError::InvalidMappingSpecification { .. })
        ));
    }
}
