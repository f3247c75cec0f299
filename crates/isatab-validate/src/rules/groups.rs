//! Study-group inference: the distinct combinations of factor values
//! (with their units and term annotations) observed in a table.

use anyhow::Result;

use isatab_model::Table;
use isatab_model::headers::{HeaderKind, classify_header, is_term_qualifier};

use crate::codes;
use crate::context::RuleContext;
use crate::store::MessageStore;

/// The factor-level columns of a table: each `Factor Value[...]` column
/// together with the `Unit` / `Term Source REF` / `Term Accession
/// Number` qualifiers that directly follow it.
fn factor_columns(table: &Table) -> Vec<usize> {
    let mut columns = Vec::new();
    let mut in_factor = false;
    for col in 0..table.headers.len() {
        let header = table.base_header(col);
        if matches!(classify_header(header), HeaderKind::FactorValue(_)) {
            columns.push(col);
            in_factor = true;
        } else if in_factor && is_term_qualifier(header) {
            columns.push(col);
        } else {
            in_factor = false;
        }
    }
    columns
}

/// Distinct trimmed factor-value tuples in the table. A table without
/// factor columns has zero groups.
pub fn count_study_groups(table: &Table) -> usize {
    let columns = factor_columns(table);
    if columns.is_empty() {
        return 0;
    }
    let mut groups = std::collections::BTreeSet::new();
    for row in 0..table.rows.len() {
        let tuple: Vec<String> = columns
            .iter()
            .map(|&col| table.value(row, col).trim().to_string())
            .collect();
        groups.insert(tuple);
    }
    groups.len()
}

/// Rule 5001 (table scope): report the number of study groups found in
/// the current table, and at study scope compare it against the count
/// declared in `Comment[Number of Study Groups]` (5002 on mismatch).
pub fn check_study_groups(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    let at_study_scope = ctx.assay.is_none();
    let declared = ctx.study()?.group_size_in_comment;
    let table = ctx.current_table()?;
    let found = count_study_groups(table);
    store.add_info(
        codes::STUDY_GROUPS_FOUND,
        format!("Found {} study groups in {}", found, table.file_name),
        String::new(),
    );
    if let (true, Some(declared)) = (at_study_scope, declared)
        && declared != found
    {
        store.add_warning(
            codes::STUDY_GROUPS_MISMATCH,
            "The declared study-group count does not match the table",
            format!(
                "{} declared in the investigation, {} found in {}",
                declared, found, table.file_name
            ),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            file_name: "s_test.txt".to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|v| v.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn counts_distinct_factor_tuples() {
        let t = table(
            &["Sample Name", "Factor Value[Dose]", "Unit"],
            &[
                &["s1", "1", "mg"],
                &["s2", "1", "mg"],
                &["s3", "2", "mg"],
                &["s4", "1 ", "mg "],
            ],
        );
        assert_eq!(count_study_groups(&t), 2);
    }

    #[test]
    fn no_factor_columns_means_zero_groups() {
        let t = table(&["Sample Name", "Characteristics[Organism]"], &[&["s1", "mouse"]]);
        assert_eq!(count_study_groups(&t), 0);
    }

    #[test]
    fn qualifiers_outside_factors_are_ignored() {
        let t = table(
            &[
                "Characteristics[Age]",
                "Unit",
                "Factor Value[Dose]",
                "Factor Value[Time]",
            ],
            &[&["6", "week", "1", "2"], &["8", "week", "1", "2"]],
        );
        assert_eq!(count_study_groups(&t), 1);
    }
}
