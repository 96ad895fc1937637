use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::DataFrame;

use harmonize_map::HarmonizationPlan;
use harmonize_map::utils::column_values;
use harmonize_model::{ColumnMapping, ValueMappingPreview, ValueMatchingResult, Vocabulary};

pub fn print_column_mappings(mappings: &[ColumnMapping]) {
    if mappings.is_empty() {
        println!("No column matches found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Source"), header_cell("Target")]);
    apply_table_style(&mut table);
    for mapping in mappings {
        table.add_row(vec![Cell::new(&mapping.source), Cell::new(&mapping.target)]);
    }
    println!("{table}");
}

pub fn print_value_results(results: &[ValueMatchingResult]) {
    if results.is_empty() {
        println!("No column pairs were eligible for value matching.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Target"),
        header_cell("Matches"),
        header_cell("Unique"),
        header_cell("Coverage"),
        header_cell("Unmatched"),
    ]);
    apply_table_style(&mut table);
    for result in results {
        let unmatched: Vec<&str> = result.unmatch_values().iter().map(String::as_str).collect();
        table.add_row(vec![
            Cell::new(result.source()),
            Cell::new(result.target()),
            Cell::new(result.matches().len()),
            Cell::new(result.unique_values().len()),
            coverage_cell(result.coverage()),
            dim_cell(unmatched.join(", ")),
        ]);
    }
    for index in 2..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    println!("{table}");
}

pub fn print_value_previews(previews: &[ValueMappingPreview]) {
    for preview in previews {
        println!("{} -> {}", preview.source, preview.target);
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Source value"),
            header_cell("Target value"),
            header_cell("Similarity"),
        ]);
        apply_table_style(&mut table);
        for row in &preview.rows {
            let target = match &row.target_value {
                Some(value) => Cell::new(value),
                None => dim_cell("-"),
            };
            let similarity = match row.similarity {
                Some(value) => Cell::new(format!("{value:.3}")),
                None => dim_cell("-"),
            };
            table.add_row(vec![Cell::new(&row.source_value), target, similarity]);
        }
        align_column(&mut table, 2, CellAlignment::Right);
        println!("{table}");
    }
}

/// Render every column of a small table.
pub fn print_frame(frame: &DataFrame) {
    let mut table = Table::new();
    table.set_header(
        frame
            .get_column_names()
            .iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    let columns: Vec<Vec<Option<String>>> = frame.get_columns().iter().map(column_values).collect();
    for row in 0..frame.height() {
        table.add_row(
            columns
                .iter()
                .map(|values| match values.get(row).cloned().flatten() {
                    Some(value) => Cell::new(value),
                    None => dim_cell(""),
                })
                .collect::<Vec<_>>(),
        );
    }
    println!("{table}");
}

pub fn print_apply_summary(plan: &HarmonizationPlan, output: &DataFrame, path: &Path) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Target"),
        header_cell("Mapper"),
    ]);
    apply_table_style(&mut table);
    for entry in plan {
        table.add_row(vec![
            Cell::new(&entry.source),
            Cell::new(&entry.target),
            dim_cell(entry.mapper.kind()),
        ]);
    }
    println!("{table}");
    println!(
        "Wrote {} rows x {} columns to {}",
        output.height(),
        output.width(),
        path.display()
    );
}

pub fn print_vocabularies(vocabularies: &[&Vocabulary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Vocabulary"),
        header_cell("Label"),
        header_cell("Version"),
        header_cell("Columns"),
        header_cell("Enumerated"),
    ]);
    apply_table_style(&mut table);
    for vocabulary in vocabularies {
        let enumerated = vocabulary
            .columns()
            .iter()
            .filter(|column| column.is_enumerated())
            .count();
        table.add_row(vec![
            Cell::new(&vocabulary.id).add_attribute(Attribute::Bold),
            Cell::new(&vocabulary.label),
            Cell::new(vocabulary.version.as_deref().unwrap_or("-")),
            Cell::new(vocabulary.columns().len()),
            Cell::new(enumerated),
        ]);
    }
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    println!("{table}");
}

pub fn print_methods(column_methods: &[String], value_methods: &[String]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Kind"), header_cell("Method")]);
    apply_table_style(&mut table);
    for (kind, names) in [("column", column_methods), ("value", value_methods)] {
        for name in names {
            table.add_row(vec![dim_cell(kind), Cell::new(name)]);
        }
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn coverage_cell(coverage: f64) -> Cell {
    let color = if coverage >= 1.0 {
        Color::Green
    } else if coverage > 0.0 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(format!("{:.1}%", coverage * 100.0)).fg(color)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
