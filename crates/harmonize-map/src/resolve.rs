//! Resolution of mapper input into a [`ValueMapper`].

use polars::prelude::*;

use harmonize_model::{HarmonizeError, Result};

use crate::input::{MapperInput, MappingRecord, MatchEntry};
use crate::mapper::{DictionaryMapper, FunctionMapper, ValueMapper};
use crate::utils::column_values;

/// Resolves any accepted mapper input into a [`ValueMapper`].
///
/// Shapes are tried in order and the first that applies wins:
///
/// 1. absent or null: identity
/// 2. a `ValueMapper`: returned unchanged
/// 3. a function: function mapper
/// 4. a match sequence: dictionary of `current_value -> target_value`
/// 5. a table with `current_value` and `target_value` columns: dictionary,
///    later rows overriding earlier ones
/// 6. a record with `source` and `target`: its `mapper` if set (resolved
///    recursively), else its `matches`, else identity
/// 7. anything else: `UnresolvableMapper`
pub fn create_mapper(input: MapperInput) -> Result<ValueMapper> {
    match input {
        MapperInput::Null => Ok(ValueMapper::Identity),
        MapperInput::Mapper(mapper) => Ok(mapper),
        MapperInput::Function(func) => Ok(ValueMapper::Function(FunctionMapper::from_arc(func))),
        MapperInput::Matches(entries) => dictionary_from_matches(&entries),
        MapperInput::Table(table) => dictionary_from_table(&table),
        MapperInput::Record(record) => mapper_from_record(*record),
        MapperInput::Other(value) => Err(HarmonizeError::UnresolvableMapper {
            input: value.to_string(),
        }),
    }
}

fn mapper_from_record(record: MappingRecord) -> Result<ValueMapper> {
    match (record.mapper, record.matches) {
        (Some(MapperInput::Mapper(mapper)), _) => Ok(mapper),
        (Some(other), _) => create_mapper(other),
        (None, Some(entries)) => dictionary_from_matches(&entries),
        (None, None) => Ok(ValueMapper::Identity),
    }
}

/// Folds match entries into a dictionary; a repeated source value keeps
/// its last target.
pub fn dictionary_from_matches(entries: &[MatchEntry]) -> Result<ValueMapper> {
    let mut dictionary = DictionaryMapper::new();
    for entry in entries {
        let (current, target) = entry.as_pair()?;
        dictionary.insert(current, target);
    }
    Ok(ValueMapper::Dictionary(dictionary))
}

fn dictionary_from_table(table: &DataFrame) -> Result<ValueMapper> {
    let (Ok(current), Ok(target)) = (table.column("current_value"), table.column("target_value"))
    else {
        return Err(HarmonizeError::UnresolvableMapper {
            input: MapperInput::Table(table.clone()).describe(),
        });
    };

    let mut dictionary = DictionaryMapper::new();
    for (current, target) in column_values(current)
        .into_iter()
        .zip(column_values(target))
    {
        if let (Some(current), Some(target)) = (current, target) {
            dictionary.insert(current, target);
        }
    }
    Ok(ValueMapper::Dictionary(dictionary))
}
