//! Column matching entry point.

use std::time::Instant;

use polars::prelude::*;
use tracing::info;

use harmonize_model::{ColumnMapping, Result};

use crate::domain::Target;
use crate::strategy::{ColumnMatcher, ColumnMatcherRegistry};

/// Proposes source to target column correspondences with a built-in method.
///
/// A vocabulary target is loaded as a table first.
pub fn match_columns(source: &DataFrame, target: &Target, method: &str) -> Result<Vec<ColumnMapping>> {
    let matcher = ColumnMatcherRegistry::builtin().create(method)?;
    match_columns_with(source, target, matcher.as_ref())
}

pub fn match_columns_with(
    source: &DataFrame,
    target: &Target,
    matcher: &dyn ColumnMatcher,
) -> Result<Vec<ColumnMapping>> {
    let start = Instant::now();
    let target_table = target.to_table()?;
    let mappings = matcher.map(source, &target_table)?;
    info!(
        method = matcher.name(),
        source_columns = source.width(),
        target_columns = target_table.width(),
        mappings = mappings.len(),
        duration_ms = start.elapsed().as_millis(),
        "column matching complete"
    );
    Ok(mappings)
}
