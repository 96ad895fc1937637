use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, trace};

use harmonize_cli::io::{
    parse_target, read_column_mappings, read_records, read_results, read_table, write_json,
    write_table,
};
use harmonize_cli::logging::redact_value;
use harmonize_map::{
    ColumnMatcherRegistry, PlanBuilder, ValueMatcherRegistry, match_columns, match_values_with,
    preview_domains,
};
use harmonize_model::{ColumnMapping, MatchingOptions, preview_value_mappings};
use harmonize_standards::{VocabularyRegistry, default_standards_root};
use harmonize_transform::materialize_mapping;

use crate::cli::{ApplyArgs, ColumnsArgs, PreviewArgs, ValuesArgs};
use crate::summary::{
    print_apply_summary, print_column_mappings, print_frame, print_methods, print_value_previews,
    print_value_results, print_vocabularies,
};

pub fn run_columns(args: &ColumnsArgs) -> Result<()> {
    let source = read_table(&args.source)?;
    let target = parse_target(&args.target)?;
    let mappings = match_columns(&source, &target, &args.method).context("match columns")?;
    print_column_mappings(&mappings);
    if let Some(path) = &args.output {
        write_json(&mappings, path)?;
        info!(path = %path.display(), count = mappings.len(), "column mappings written");
    }
    Ok(())
}

pub fn run_values(args: &ValuesArgs) -> Result<()> {
    let span = info_span!("values", source = %args.source.display(), method = %args.method);
    let _guard = span.enter();

    let source = read_table(&args.source)?;
    let target = parse_target(&args.target)?;
    let mappings: Vec<ColumnMapping> = if let Some(path) = &args.mappings {
        read_column_mappings(path)?
    } else if !args.pairs.is_empty() {
        args.pairs
            .iter()
            .map(|(source, target)| ColumnMapping::new(source, target))
            .collect()
    } else {
        match_columns(&source, &target, &args.column_method).context("match columns")?
    };

    let matcher = ValueMatcherRegistry::builtin()
        .create(&args.method)
        .context("select value matching method")?;
    let options = MatchingOptions::default().with_max_unique_values(args.max_unique_values);
    let results = match_values_with(&source, &target, &mappings, matcher.as_ref(), &options)
        .context("match values")?;

    for result in &results {
        for value in result.unmatch_values() {
            trace!(
                source = result.source(),
                target = result.target(),
                value = redact_value(value),
                "unmatched value"
            );
        }
    }

    print_value_results(&results);
    print_value_previews(&preview_value_mappings(&results));
    if let Some(path) = &args.output {
        write_json(&results, path)?;
        info!(path = %path.display(), count = results.len(), "value matching results written");
    }
    Ok(())
}

pub fn run_apply(args: &ApplyArgs) -> Result<()> {
    let span = info_span!("apply", source = %args.source.display());
    let _guard = span.enter();
    let start = Instant::now();

    if args.mappings.is_none() && args.computed.is_none() {
        bail!("nothing to apply: pass --mappings, --computed or both");
    }
    let input = read_table(&args.source)?;
    let user = match &args.mappings {
        Some(path) => read_records(path)?,
        None => Vec::new(),
    };
    let computed = match &args.computed {
        Some(path) => read_results(path)?,
        None => Vec::new(),
    };
    let options = if args.strict {
        MatchingOptions::strict()
    } else {
        MatchingOptions::default()
    };

    let plan = PlanBuilder::new(options)
        .with_computed(computed)
        .with_user(user)
        .build()
        .context("build harmonization plan")?;
    let output = materialize_mapping(&input, &plan).context("materialize mapping")?;
    write_table(&output, &args.output)?;

    info!(
        entries = plan.len(),
        rows = output.height(),
        output = %args.output.display(),
        duration_ms = start.elapsed().as_millis(),
        "apply complete"
    );
    print_apply_summary(&plan, &output, &args.output);
    Ok(())
}

pub fn run_preview(args: &PreviewArgs) -> Result<()> {
    let source = read_table(&args.source)?;
    let target = parse_target(&args.target)?;
    let (source_column, target_column) = &args.pair;
    let preview = preview_domains(
        &source,
        (source_column.as_str(), target_column.as_str()),
        &target,
        args.limit,
    )
    .context("preview domains")?;
    print_frame(&preview);
    Ok(())
}

pub fn run_vocabularies() -> Result<()> {
    let root = default_standards_root();
    let (registry, summary) = VocabularyRegistry::verify_and_load(&root)
        .with_context(|| format!("load standards from {}", root.display()))?;
    let vocabularies: Vec<_> = registry.vocabularies.values().collect();
    print_vocabularies(&vocabularies);
    println!(
        "{} vocabularies, {} columns, {} values verified in {}",
        summary.vocabulary_count,
        summary.column_count,
        summary.value_count,
        summary.standards_dir.display()
    );
    Ok(())
}

pub fn run_methods() -> Result<()> {
    print_methods(
        &ColumnMatcherRegistry::builtin().names(),
        &ValueMatcherRegistry::builtin().names(),
    );
    Ok(())
}
