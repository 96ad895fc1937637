//! Value domain resolution against a vocabulary or a target table.

use std::collections::BTreeMap;
use std::fmt;

use polars::prelude::*;
use tracing::debug;

use harmonize_model::{HarmonizeError, Result, Vocabulary};
use harmonize_standards::load_vocabulary;

use crate::utils::distinct_values;

/// Valid values per target column; `None` when the column has no domain.
pub type TargetDomains = BTreeMap<String, Option<Vec<String>>>;

/// Where target columns and their valid values come from.
#[derive(Clone)]
pub enum Target {
    /// A built-in vocabulary identifier such as `gdc`.
    Vocabulary(String),
    /// A target table; each column's domain is its distinct non-null values.
    Table(DataFrame),
}

impl Target {
    pub fn vocabulary(id: impl Into<String>) -> Self {
        Target::Vocabulary(id.into())
    }

    /// The target as a table; vocabularies are loaded with [`load_table`].
    pub fn to_table(&self) -> Result<DataFrame> {
        match self {
            Target::Vocabulary(id) => load_table(id),
            Target::Table(table) => Ok(table.clone()),
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Vocabulary(id) => f.debug_tuple("Vocabulary").field(id).finish(),
            Target::Table(table) => f.debug_tuple("Table").field(&table.shape()).finish(),
        }
    }
}

impl From<DataFrame> for Target {
    fn from(table: DataFrame) -> Self {
        Target::Table(table)
    }
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Target::Vocabulary(id.to_string())
    }
}

/// Resolves the valid-value domain of each requested target column.
///
/// Unknown or non-enumerated columns resolve to `None`. Only an unknown
/// vocabulary identifier is an error.
pub fn resolve_domain<S: AsRef<str>>(columns: &[S], target: &Target) -> Result<TargetDomains> {
    let domains = match target {
        Target::Vocabulary(id) => load_vocabulary(id)?.resolve_domain(columns),
        Target::Table(table) => columns
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let domain = table
                    .column(name)
                    .ok()
                    .map(|column| distinct_values(column, false));
                (name.to_string(), domain)
            })
            .collect(),
    };
    debug!(
        requested = columns.len(),
        with_domain = domains.values().filter(|d| d.is_some()).count(),
        "resolved target domains"
    );
    Ok(domains)
}

/// Loads a built-in vocabulary as a table.
///
/// One column per vocabulary column in publication order, holding its
/// permissible values padded with nulls. Non-enumerated columns are all null.
pub fn load_table(vocabulary_id: &str) -> Result<DataFrame> {
    let vocabulary = load_vocabulary(vocabulary_id)?;
    vocabulary_table(&vocabulary)
}

pub fn vocabulary_table(vocabulary: &Vocabulary) -> Result<DataFrame> {
    let height = vocabulary
        .columns()
        .iter()
        .map(|column| column.values.len())
        .max()
        .unwrap_or(0);

    let columns: Vec<Column> = vocabulary
        .columns()
        .iter()
        .map(|column| {
            let mut values: Vec<Option<String>> =
                column.values.iter().cloned().map(Some).collect();
            values.resize(height, None);
            Column::new(column.name.as_str().into(), values)
        })
        .collect();
    DataFrame::new(columns).map_err(HarmonizeError::frame)
}

/// Side-by-side source and target domains for one column pair.
///
/// Both domains are padded with `""` to the larger size, then truncated to
/// `limit` when given.
pub fn preview_domains(
    dataset: &DataFrame,
    column_mapping: (&str, &str),
    target: &Target,
    limit: Option<usize>,
) -> Result<DataFrame> {
    let (source_column, target_column) = column_mapping;

    let source = dataset
        .column(source_column)
        .map_err(|_| HarmonizeError::MissingSourceColumn {
            column: source_column.to_string(),
        })?;
    let mut source_domain = distinct_values(source, false);

    let mut target_domain = resolve_domain(&[target_column], target)?
        .remove(target_column)
        .flatten()
        .unwrap_or_default();

    let largest = source_domain.len().max(target_domain.len());
    let size = limit.map_or(largest, |limit| largest.min(limit));
    source_domain.resize(size, String::new());
    target_domain.resize(size, String::new());

    DataFrame::new(vec![
        Column::new("source_domain".into(), source_domain),
        Column::new("target_domain".into(), target_domain),
    ])
    .map_err(HarmonizeError::frame)
}
