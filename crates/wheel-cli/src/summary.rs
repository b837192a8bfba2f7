use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use wheel_api::JobView;
use wheel_model::{ImportJob, MappingSuggestion, SuitabilityWarning, WarningSeverity};
use wheel_transform::BuildReport;

/// Print counts and the column mapping from an analysis suggestion.
pub fn print_suggestion_summary(suggestion: &MappingSuggestion) {
    if let Some(title) = &suggestion.suggested_wheel_title {
        println!("Suggested wheel title: {title}");
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Source column")]);
    apply_table_style(&mut table);
    let mapping = &suggestion.column_mapping;
    for (field, column) in [
        ("Activity name", &mapping.activity_name),
        ("Start date", &mapping.start_date),
        ("End date", &mapping.end_date),
        ("Ring", &mapping.ring),
        ("Group", &mapping.group),
        ("Labels", &mapping.labels),
        ("Description", &mapping.description),
    ] {
        table.add_row(vec![
            Cell::new(field),
            match column {
                Some(name) => Cell::new(name),
                None => dim_cell("-"),
            },
        ]);
    }
    println!("{table}");

    let mut counts = Table::new();
    counts.set_header(vec![header_cell("Entity"), header_cell("Count")]);
    apply_table_style(&mut counts);
    align_column(&mut counts, 1, CellAlignment::Right);
    counts.add_row(vec![Cell::new("Rings"), Cell::new(suggestion.rings.len())]);
    counts.add_row(vec![
        Cell::new("Activity groups"),
        Cell::new(suggestion.activity_groups.len()),
    ]);
    counts.add_row(vec![Cell::new("Labels"), Cell::new(suggestion.labels.len())]);
    counts.add_row(vec![
        Cell::new("Activities"),
        Cell::new(suggestion.activities.len()),
    ]);
    println!("{counts}");

    if let Some(warning) = &suggestion.suitability_warning {
        print_suitability_warning(warning);
    }
}

/// Print a suitability warning with its remediation steps.
pub fn print_suitability_warning(warning: &SuitabilityWarning) {
    let label = match warning.severity {
        WarningSeverity::Info => "note",
        WarningSeverity::Warning => "warning",
        WarningSeverity::Error => "error",
    };
    eprintln!("{label}: {}", warning.message);
    if warning.block_import {
        eprintln!("This data cannot be imported as-is.");
    }
    for step in &warning.remediation {
        eprintln!("  - {step}");
    }
}

/// Print what the build rerouted, excluded or could not resolve.
pub fn print_build_report(report: &BuildReport) {
    if report.remapped_ring_refs > 0 || report.remapped_group_refs > 0 {
        println!(
            "Rerouted references: {} ring, {} group",
            report.remapped_ring_refs, report.remapped_group_refs
        );
    }
    for unresolved in &report.unresolved {
        eprintln!(
            "warning: \"{}\" references unknown {} \"{}\"",
            unresolved.item_name, unresolved.kind, unresolved.referenced_name
        );
    }
    for name in &report.excluded_items {
        eprintln!("warning: \"{name}\" has no parseable start date and was excluded");
    }
}

/// Print a terminal job snapshot as a summary table.
pub fn print_job_summary(job: &ImportJob) {
    let view = JobView::from(job);
    println!("Job: {}", job.id);
    if view.is_complete {
        println!("Status: completed");
    } else if view.is_failed {
        match &view.error_message {
            Some(message) => println!("Status: failed ({message})"),
            None => println!("Status: failed"),
        }
    } else {
        println!("Status: {:?} ({}%)", view.status, view.percent);
        if let Some(step) = &view.current_step {
            println!("Step: {step}");
        }
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Created"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Rings"), Cell::new(view.created_rings)]);
    table.add_row(vec![
        Cell::new("Activity groups"),
        Cell::new(view.created_groups),
    ]);
    table.add_row(vec![Cell::new("Labels"), Cell::new(view.created_labels)]);
    table.add_row(vec![Cell::new("Pages"), Cell::new(view.created_pages)]);
    table.add_row(vec![Cell::new("Activities"), Cell::new(view.created_items)]);
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(comfy_table::Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(comfy_table::Color::DarkGrey)
}
