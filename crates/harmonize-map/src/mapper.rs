//! Value mappers: total functions from a column of values to a column of
//! the same length.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use polars::prelude::*;

use harmonize_model::Result;

use crate::utils::column_values;

/// Caller-supplied per-value transformation. `None` is a null cell.
pub type ValueFn = Arc<dyn Fn(Option<&str>) -> Option<String> + Send + Sync>;

/// Wraps a [`ValueFn`].
#[derive(Clone)]
pub struct FunctionMapper {
    func: ValueFn,
}

impl FunctionMapper {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(Option<&str>) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    pub fn from_arc(func: ValueFn) -> Self {
        Self { func }
    }

    pub fn apply(&self, value: Option<&str>) -> Option<String> {
        (self.func)(value)
    }

    /// True if both mappers wrap the same function object.
    pub fn ptr_eq(&self, other: &FunctionMapper) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for FunctionMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FunctionMapper(..)")
    }
}

/// Lookup table from source value to target value.
///
/// Unknown keys map to no value; a lookup never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryMapper {
    entries: BTreeMap<String, String>,
}

impl DictionaryMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds from pairs; a repeated key keeps the last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut mapper = Self::new();
        for (key, value) in pairs {
            mapper.insert(key, value);
        }
        mapper
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

/// A uniform value transformation applied to one column.
#[derive(Debug, Clone, Default)]
pub enum ValueMapper {
    /// Values pass through unchanged.
    #[default]
    Identity,
    Dictionary(DictionaryMapper),
    Function(FunctionMapper),
}

impl ValueMapper {
    pub fn function<F>(func: F) -> Self
    where
        F: Fn(Option<&str>) -> Option<String> + Send + Sync + 'static,
    {
        ValueMapper::Function(FunctionMapper::new(func))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ValueMapper::Identity => "identity",
            ValueMapper::Dictionary(_) => "dictionary",
            ValueMapper::Function(_) => "function",
        }
    }

    pub fn map_value(&self, value: Option<&str>) -> Option<String> {
        match self {
            ValueMapper::Identity => value.map(str::to_string),
            ValueMapper::Dictionary(dictionary) => {
                value.and_then(|v| dictionary.lookup(v)).map(str::to_string)
            }
            ValueMapper::Function(function) => function.apply(value),
        }
    }

    /// Maps a sequence of values; the output has the input's length.
    pub fn map_values(&self, values: &[Option<String>]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|value| self.map_value(value.as_deref()))
            .collect()
    }

    /// Maps a column into a new column named `target`.
    ///
    /// Identity keeps the input dtype. Dictionary and function mappers read
    /// cells as strings and produce a string column.
    pub fn map_column(&self, column: &Column, target: &str) -> Result<Column> {
        match self {
            ValueMapper::Identity => Ok(column.clone().with_name(target.into())),
            _ => {
                let mapped = self.map_values(&column_values(column));
                Ok(Column::new(target.into(), mapped))
            }
        }
    }
}

impl From<DictionaryMapper> for ValueMapper {
    fn from(dictionary: DictionaryMapper) -> Self {
        ValueMapper::Dictionary(dictionary)
    }
}

impl From<FunctionMapper> for ValueMapper {
    fn from(function: FunctionMapper) -> Self {
        ValueMapper::Function(function)
    }
}
