//! Reference vocabulary model.
//!
//! A vocabulary (e.g. the GDC data dictionary) defines target columns and,
//! for categorical columns, the permissible values. Columns that are part of
//! the vocabulary but carry no enumerated values (numeric or free-text
//! fields) have no value domain.
//!
//! ## Example: `gdc.gender`
//!
//! ```text
//! Column=gender  Values: female, male, unknown, unspecified, not reported
//! Column=age_at_diagnosis  Values: (none, numeric)
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A column defined by a vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyColumn {
    /// Column name as published (e.g., "gender").
    pub name: String,

    /// Definition text, when provided.
    pub description: Option<String>,

    /// Permissible values in publication order. Empty for non-enumerated columns.
    pub values: Vec<String>,
}

impl VocabularyColumn {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
            values: Vec::new(),
        }
    }

    /// Adds a permissible value, ignoring exact duplicates.
    pub fn add_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !self.values.iter().any(|existing| existing == &value) {
            self.values.push(value);
        }
    }

    /// Returns true if the column has an enumerated value domain.
    pub fn is_enumerated(&self) -> bool {
        !self.values.is_empty()
    }

    /// Case-insensitive membership check.
    pub fn contains(&self, value: &str) -> bool {
        let key = value.trim().to_lowercase();
        self.values.iter().any(|v| v.to_lowercase() == key)
    }
}

/// A loaded reference vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Registry identifier (e.g., "gdc").
    pub id: String,

    /// Display label.
    pub label: String,

    /// Release version, when known.
    pub version: Option<String>,

    /// Source file name.
    pub source: Option<String>,

    columns: Vec<VocabularyColumn>,

    /// Column name -> position in `columns`.
    index: BTreeMap<String, usize>,
}

impl Vocabulary {
    pub fn new(id: impl Into<String>, label: impl Into<String>, version: Option<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            version,
            source: None,
            columns: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Adds a column, replacing any previous definition with the same name.
    pub fn add_column(&mut self, column: VocabularyColumn) {
        match self.index.get(&column.name) {
            Some(&idx) => self.columns[idx] = column,
            None => {
                self.index.insert(column.name.clone(), self.columns.len());
                self.columns.push(column);
            }
        }
    }

    pub fn column(&self, name: &str) -> Option<&VocabularyColumn> {
        self.index.get(name).map(|&idx| &self.columns[idx])
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut VocabularyColumn> {
        match self.index.get(name) {
            Some(&idx) => self.columns.get_mut(idx),
            None => None,
        }
    }

    /// Columns in publication order.
    pub fn columns(&self) -> &[VocabularyColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Valid values for a column; `None` when unknown or not enumerated.
    pub fn domain(&self, name: &str) -> Option<&[String]> {
        self.column(name)
            .filter(|column| column.is_enumerated())
            .map(|column| column.values.as_slice())
    }

    /// Resolves the value domain of each requested column.
    pub fn resolve_domain<S: AsRef<str>>(
        &self,
        columns: &[S],
    ) -> BTreeMap<String, Option<Vec<String>>> {
        columns
            .iter()
            .map(|name| {
                let name = name.as_ref();
                (name.to_string(), self.domain(name).map(<[String]>::to_vec))
            })
            .collect()
    }
}
