//! File input and output for datasets, mapping records and results.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;
use serde_json::Value;

use harmonize_map::utils::column_values;
use harmonize_map::{MappingRecord, Target, records_from_json, records_from_table};
use harmonize_model::{ColumnMapping, ValueMatchingResult};

/// Read a CSV file with a header row into a table.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .with_context(|| format!("read csv {}", path.display()))
}

/// Write a table as CSV; missing cells become empty fields.
pub fn write_table(table: &DataFrame, path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    let columns: Vec<Vec<Option<String>>> = table.get_columns().iter().map(column_values).collect();
    writer
        .write_record(table.get_column_names().iter().map(|name| name.as_str()))
        .with_context(|| format!("write header to {}", path.display()))?;
    for row in 0..table.height() {
        let record = columns
            .iter()
            .map(|values| values.get(row).and_then(Option::as_deref).unwrap_or(""));
        writer
            .write_record(record)
            .with_context(|| format!("write row {row} to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

pub fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse json {}", path.display()))
}

pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize json")?;
    fs::write(path, text).with_context(|| format!("write {}", path.display()))
}

/// Mapping records from a JSON array or a CSV table with `source`/`target` columns.
pub fn read_records(path: &Path) -> Result<Vec<MappingRecord>> {
    if is_csv(path) {
        let table = read_table(path)?;
        records_from_table(&table)
            .with_context(|| format!("mapping records in {}", path.display()))
    } else {
        let value = read_json(path)?;
        records_from_json(&value).with_context(|| format!("mapping records in {}", path.display()))
    }
}

pub fn read_column_mappings(path: &Path) -> Result<Vec<ColumnMapping>> {
    Ok(read_records(path)?
        .iter()
        .map(MappingRecord::column_mapping)
        .collect())
}

/// Value matching results as written by `write_json`.
pub fn read_results(path: &Path) -> Result<Vec<ValueMatchingResult>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parse value matching results {}", path.display()))
}

/// An existing file is read as a target table; anything else names a vocabulary.
pub fn parse_target(raw: &str) -> Result<Target> {
    let path = Path::new(raw);
    if path.is_file() {
        Ok(Target::Table(read_table(path)?))
    } else {
        Ok(Target::vocabulary(raw))
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
