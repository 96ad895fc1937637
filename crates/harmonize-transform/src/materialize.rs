//! Plan materialization.
//!
//! Each plan entry reads its source column from the input table, applies
//! its mapper and writes the result under the target name. Output columns
//! follow plan order; when two entries share a target, the later one
//! replaces the earlier column in place.

use std::time::Instant;

use polars::prelude::*;
use tracing::{debug, info, info_span};

use harmonize_map::{HarmonizationPlan, HarmonizationPlanEntry, MappingRecord, create_mapper};
use harmonize_model::{HarmonizeError, Result};

/// Applies `plan` to `input` and returns the harmonized table.
pub fn materialize_mapping(input: &DataFrame, plan: &HarmonizationPlan) -> Result<DataFrame> {
    materialize_entries(input, plan.entries())
}

/// Materializes straight from mapping records.
///
/// Records without a mapper are resolved from their matches (or to
/// identity). Unlike a plan, records are not deduplicated.
pub fn materialize_specs(input: &DataFrame, records: Vec<MappingRecord>) -> Result<DataFrame> {
    let entries = records
        .into_iter()
        .map(|record| {
            let source = record.source.clone();
            let target = record.target.clone();
            let mapper = create_mapper(record.into())?;
            Ok(HarmonizationPlanEntry::new(source, target, mapper))
        })
        .collect::<Result<Vec<_>>>()?;
    materialize_entries(input, &entries)
}

fn materialize_entries(input: &DataFrame, entries: &[HarmonizationPlanEntry]) -> Result<DataFrame> {
    let span = info_span!("materialize", entries = entries.len(), input_rows = input.height());
    let _guard = span.enter();
    let start = Instant::now();

    let mut columns: Vec<Column> = Vec::with_capacity(entries.len());
    for entry in entries {
        let source = input
            .column(&entry.source)
            .map_err(|_| HarmonizeError::MissingSourceColumn {
                column: entry.source.clone(),
            })?;
        let mapped = entry.mapper.map_column(source, &entry.target)?;

        match columns
            .iter()
            .position(|column| column.name().as_str() == entry.target)
        {
            Some(idx) => columns[idx] = mapped,
            None => columns.push(mapped),
        }
        debug!(
            source = %entry.source,
            target = %entry.target,
            mapper = entry.mapper.kind(),
            "materialized column"
        );
    }

    let output = DataFrame::new(columns).map_err(HarmonizeError::frame)?;
    info!(
        output_columns = output.width(),
        output_rows = output.height(),
        duration_ms = start.elapsed().as_millis(),
        "materialization complete"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use harmonize_map::ValueMapper;

    use super::*;

    #[test]
    fn later_entry_with_same_target_overwrites() {
        let input = DataFrame::new(vec![
            Column::new("a".into(), vec!["1", "2"]),
            Column::new("b".into(), vec!["3", "4"]),
        ])
        .unwrap();
        let entries = vec![
            HarmonizationPlanEntry::new("a", "out", ValueMapper::Identity),
            HarmonizationPlanEntry::new("a", "other", ValueMapper::Identity),
            HarmonizationPlanEntry::new("b", "out", ValueMapper::Identity),
        ];
        let output = materialize_entries(&input, &entries).unwrap();
        let names: Vec<&str> = output.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["out", "other"]);
        let out: Vec<Option<&str>> = output.column("out").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(out, vec![Some("3"), Some("4")]);
    }
}
