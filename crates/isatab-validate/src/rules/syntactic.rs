//! Syntactic rules: lexical checks on dates, identifiers and ontology
//! term annotations.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use anyhow::Result;
use chrono::NaiveDate;
use regex::Regex;

use isatab_model::Table;

use crate::codes;
use crate::context::RuleContext;
use crate::rules::util;
use crate::store::MessageStore;

static DOI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^10\.\d{4,9}(?:\.\d+)*/[^\s"&'<>]+$"#).expect("DOI regex")
});

fn is_iso_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

fn check_date_columns(table: &Table, headers: &[&str], store: &mut MessageStore) {
    for header in headers {
        let Some(col) = table.column_index(header) else {
            continue;
        };
        for value in table.column_values(col) {
            let trimmed = value.trim();
            if !trimmed.is_empty() && !is_iso_date(trimmed) {
                store.add_warning(
                    codes::DATE_FORMAT,
                    "A date does not conform to the ISO-8601 format",
                    format!("{header}: '{trimmed}'"),
                );
            }
        }
    }
}

/// Rule 3001: submission and release dates in the investigation and
/// study sections must be ISO-8601 dates.
pub fn check_date_formats(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    check_date_columns(
        &ctx.investigation.investigation,
        &[
            "Investigation Submission Date",
            "Investigation Public Release Date",
        ],
        store,
    );
    for study in &ctx.investigation.studies {
        check_date_columns(
            study,
            &["Study Submission Date", "Study Public Release Date"],
            store,
        );
    }
    Ok(())
}

fn check_doi_column(table: &Table, header: &str, store: &mut MessageStore) {
    let Some(col) = table.column_index(header) else {
        return;
    };
    for value in table.column_values(col) {
        let trimmed = value.trim();
        if !trimmed.is_empty() && !DOI_REGEX.is_match(trimmed) {
            store.add_warning(
                codes::DOI_FORMAT,
                "A publication DOI does not conform to the DOI format",
                format!("{header}: '{trimmed}'"),
            );
        }
    }
}

/// Rule 3002: publication DOIs must match the DOI lexical form.
pub fn check_dois(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    check_doi_column(
        &ctx.investigation.i_publications,
        "Investigation Publication DOI",
        store,
    );
    for publications in &ctx.investigation.s_publications {
        check_doi_column(publications, "Study Publication DOI", store);
    }
    Ok(())
}

fn check_pubmed_column(table: &Table, header: &str, store: &mut MessageStore) {
    let Some(col) = table.column_index(header) else {
        return;
    };
    for value in table.column_values(col) {
        let trimmed = value.trim();
        let valid = !trimmed.is_empty()
            && trimmed.bytes().all(|b| b.is_ascii_digit())
            && trimmed.bytes().any(|b| b != b'0');
        if !trimmed.is_empty() && !valid {
            store.add_warning(
                codes::PUBMED_FORMAT,
                "A PubMed ID is not a positive integer",
                format!("{header}: '{trimmed}'"),
            );
        }
    }
}

/// Rule 3003: PubMed identifiers must be positive integers.
pub fn check_pubmed_ids(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    check_pubmed_column(&ctx.investigation.i_publications, "Investigation PubMed ID", store);
    for publications in &ctx.investigation.s_publications {
        check_pubmed_column(publications, "Study PubMed ID", store);
    }
    Ok(())
}

/// Rule 3008: collect the declared `Term Source Name` values into the
/// shared context; duplicate names warn.
pub fn collect_term_sources(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    let mut sources = BTreeSet::new();
    for name in util::column(&ctx.investigation.ontology_sources, util::TERM_SOURCE_NAME) {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !sources.insert(trimmed.to_string()) {
            store.add_warning(
                codes::TERM_SOURCE_DUPLICATE,
                "An ontology source is declared more than once",
                format!("term source '{trimmed}'"),
            );
        }
    }
    ctx.term_source_refs = Some(sources);
    Ok(())
}

/// Rule 3010 (table scope): `Term Source REF` cells must name a declared
/// ontology source, and a non-empty `Term Accession Number` requires a
/// non-empty `Term Source REF` in the same row.
pub fn check_ontology_fields(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    let declared = ctx.term_source_refs()?.clone();
    let table = ctx.current_table()?;
    for col in 0..table.headers.len() {
        match table.base_header(col) {
            "Term Source REF" => {
                for value in table.column_values(col) {
                    let trimmed = value.trim();
                    if !trimmed.is_empty() && !declared.contains(trimmed) {
                        store.add_warning(
                            codes::ONTOLOGY_FIELDS,
                            "A Term Source REF does not name a declared ontology source",
                            format!(
                                "term source '{}' in {} is not declared",
                                trimmed, table.file_name
                            ),
                        );
                    }
                }
            }
            "Term Accession Number" => {
                // In an ontology-term triple the accession directly
                // follows the Term Source REF column.
                if col == 0 || table.base_header(col - 1) != "Term Source REF" {
                    continue;
                }
                for (row, value) in table.column_values(col).enumerate() {
                    if value.trim().is_empty() {
                        continue;
                    }
                    if table.value(row, col - 1).trim().is_empty() {
                        store.add_warning(
                            codes::ONTOLOGY_FIELDS,
                            "A Term Accession Number has no Term Source REF",
                            format!("row {} of {}", row + 1, table.file_name),
                        );
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}
