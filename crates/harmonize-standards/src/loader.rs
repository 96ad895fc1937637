//! Vocabulary CSV loader.
//!
//! Vocabulary files use a long format with one row per permissible value:
//!
//! ```text
//! Column,Description,Value
//! gender,Text designations that identify gender.,female
//! gender,Text designations that identify gender.,male
//! age_at_diagnosis,Age at the time of diagnosis...,
//! ```
//!
//! A column whose rows all carry an empty `Value` is part of the vocabulary
//! but has no enumerated domain.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;
use harmonize_model::{Vocabulary, VocabularyColumn};

use crate::error::StandardsError;

/// Read a CSV file into a vector of row maps keyed by header.
///
/// Strips a leading BOM from headers and trims every value.
pub fn read_csv_rows(path: &Path) -> Result<Vec<BTreeMap<String, String>>, StandardsError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| StandardsError::csv(path, &e))?;

    let headers = reader
        .headers()
        .map_err(|e| StandardsError::csv(path, &e))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StandardsError::csv(path, &e))?;
        let mut row = BTreeMap::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers
                .get(idx)
                .unwrap_or("")
                .trim_matches('\u{feff}')
                .to_string();
            row.insert(key, value.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

fn get_field(row: &BTreeMap<String, String>, key: &str) -> String {
    row.get(key).cloned().unwrap_or_default()
}

fn get_optional(row: &BTreeMap<String, String>, key: &str) -> Option<String> {
    row.get(key).filter(|v| !v.is_empty()).cloned()
}

/// Load a vocabulary from a long-format CSV file.
pub fn load_vocabulary_csv(
    path: &Path,
    id: &str,
    label: &str,
    version: Option<String>,
) -> Result<Vocabulary, StandardsError> {
    let rows = read_csv_rows(path)?;

    let mut vocabulary = Vocabulary::new(id, label, version);
    vocabulary.source = path.file_name().and_then(|v| v.to_str()).map(String::from);

    for (line, row) in rows.iter().enumerate() {
        let name = get_field(row, "Column");
        if name.is_empty() {
            return Err(StandardsError::Csv {
                path: path.to_path_buf(),
                message: format!("row {} has an empty Column", line + 2),
            });
        }

        if vocabulary.column(&name).is_none() {
            vocabulary.add_column(VocabularyColumn::new(
                name.clone(),
                get_optional(row, "Description"),
            ));
        }

        if let Some(value) = get_optional(row, "Value")
            && let Some(column) = vocabulary.column_mut(&name)
        {
            column.add_value(value);
        }
    }

    tracing::debug!(
        vocabulary = id,
        columns = vocabulary.columns().len(),
        "loaded vocabulary"
    );
    Ok(vocabulary)
}
