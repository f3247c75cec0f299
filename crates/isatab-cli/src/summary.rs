use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use isatab_model::{Message, ValidationReport};
use isatab_validate::Rule;

pub fn print_report(report: &ValidationReport) {
    let mut counts = Table::new();
    counts.set_header(vec![header_cell("Severity"), header_cell("Count")]);
    apply_table_style(&mut counts);
    align_column(&mut counts, 1, CellAlignment::Right);
    counts.add_row(vec![
        severity_cell("ERROR", Color::Red),
        count_cell(report.errors.len(), Color::Red),
    ]);
    counts.add_row(vec![
        severity_cell("WARN", Color::Yellow),
        count_cell(report.warnings.len(), Color::Yellow),
    ]);
    counts.add_row(vec![
        severity_cell("INFO", Color::Blue),
        count_cell(report.info.len(), Color::Blue),
    ]);
    println!("{counts}");

    let rows: Vec<(&str, Color, &Message)> = report
        .errors
        .iter()
        .map(|m| ("ERROR", Color::Red, m))
        .chain(report.warnings.iter().map(|m| ("WARN", Color::Yellow, m)))
        .chain(report.info.iter().map(|m| ("INFO", Color::Blue, m)))
        .collect();
    if !rows.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Severity"),
            header_cell("Code"),
            header_cell("Message"),
            header_cell("Detail"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        for (label, color, message) in rows {
            table.add_row(vec![
                severity_cell(label, color),
                Cell::new(message.code),
                Cell::new(&message.message),
                detail_cell(&message.supplemental),
            ]);
        }
        println!();
        println!("Findings:");
        println!("{table}");
    }

    if !report.validation_finished {
        eprintln!("warning: validation did not run to completion");
    }
}

pub fn print_rules(
    available: &[Rule],
    investigation: &[&str],
    study: &[&str],
    assay: &[&str],
) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Investigation"),
        header_cell("Study"),
        header_cell("Assay"),
    ]);
    apply_table_style(&mut table);
    for column in 1..4 {
        align_column(&mut table, column, CellAlignment::Center);
    }
    for rule in available {
        table.add_row(vec![
            Cell::new(rule.id).add_attribute(Attribute::Bold),
            selected_cell(investigation, rule.id),
            selected_cell(study, rule.id),
            selected_cell(assay, rule.id),
        ]);
    }
    println!("{table}");
}

fn selected_cell(selection: &[&str], id: &str) -> Cell {
    if selection.contains(&id) {
        Cell::new("✓").fg(Color::Green)
    } else {
        dim_cell("-")
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn severity_cell(label: &str, color: Color) -> Cell {
    Cell::new(label).fg(color).add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn detail_cell(detail: &str) -> Cell {
    if detail.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(detail)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
