//! Shared helpers for the rule library: investigation-section column
//! names and table-loading utilities used by the cross-file rules.

use std::collections::{BTreeMap, BTreeSet};

use isatab_ingest::InvestigationBundle;
use isatab_model::Table;

use crate::context::RuleContext;

pub(crate) const STUDY_FILE_NAME: &str = "Study File Name";
pub(crate) const ASSAY_FILE_NAME: &str = "Study Assay File Name";
pub(crate) const ASSAY_MEASUREMENT_TYPE: &str = "Study Assay Measurement Type";
pub(crate) const ASSAY_TECHNOLOGY_TYPE: &str = "Study Assay Technology Type";
pub(crate) const PROTOCOL_NAME: &str = "Study Protocol Name";
pub(crate) const PROTOCOL_TYPE: &str = "Study Protocol Type";
pub(crate) const PROTOCOL_PARAMETERS: &str = "Study Protocol Parameters Name";
pub(crate) const FACTOR_NAME: &str = "Study Factor Name";
pub(crate) const TERM_SOURCE_NAME: &str = "Term Source Name";
pub(crate) const SAMPLE_NAME: &str = "Sample Name";
pub(crate) const PROTOCOL_REF: &str = "Protocol REF";

/// Values of the first column matching `header`, trimmed, empties kept.
pub(crate) fn column(table: &Table, header: &str) -> Vec<String> {
    match table.column_index(header) {
        Some(col) => table.column_values(col).map(str::to_string).collect(),
        None => Vec::new(),
    }
}

pub(crate) fn study_file_name(bundle: &InvestigationBundle, index: usize) -> Option<String> {
    bundle
        .studies
        .get(index)?
        .first_value(STUDY_FILE_NAME)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Non-empty assay file names declared for a study, in row order.
pub(crate) fn assay_file_names(bundle: &InvestigationBundle, index: usize) -> Vec<String> {
    bundle
        .s_assays
        .get(index)
        .map(|assays| {
            column(assays, ASSAY_FILE_NAME)
                .into_iter()
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn protocol_names(bundle: &InvestigationBundle, index: usize) -> Vec<String> {
    bundle
        .s_protocols
        .get(index)
        .map(|protocols| column(protocols, PROTOCOL_NAME))
        .unwrap_or_default()
}

/// Lower-cased protocol name to declared protocol type.
pub(crate) fn protocol_types(bundle: &InvestigationBundle, index: usize) -> BTreeMap<String, String> {
    let Some(protocols) = bundle.s_protocols.get(index) else {
        return BTreeMap::new();
    };
    let names = column(protocols, PROTOCOL_NAME);
    let types = column(protocols, PROTOCOL_TYPE);
    names
        .into_iter()
        .zip(types)
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, ptype)| (name.to_lowercase(), ptype))
        .collect()
}

pub(crate) fn factor_names(bundle: &InvestigationBundle, index: usize) -> Vec<String> {
    bundle
        .s_factors
        .get(index)
        .map(|factors| column(factors, FACTOR_NAME))
        .unwrap_or_default()
}

/// Declared protocol-parameter names across all of a study's protocols.
/// Parameter cells are semicolon-separated lists.
pub(crate) fn parameter_names(bundle: &InvestigationBundle, index: usize) -> BTreeSet<String> {
    let Some(protocols) = bundle.s_protocols.get(index) else {
        return BTreeSet::new();
    };
    column(protocols, PROTOCOL_PARAMETERS)
        .iter()
        .flat_map(|cell| cell.split(';'))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Every `Sample Name` value in a table, trimmed, empties dropped.
pub(crate) fn sample_names(table: &Table) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for col in table.column_indices(SAMPLE_NAME) {
        for value in table.column_values(col) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                names.insert(trimmed.to_string());
            }
        }
    }
    names
}

/// Study-sample and assay tables of one study, loaded from disk for the
/// investigation-scope cross-file rules. Unreadable files are skipped
/// here; rule 0006 reports them.
pub(crate) struct StudyTables {
    pub sample: Option<Table>,
    pub assays: Vec<Table>,
}

pub(crate) fn load_study_tables(ctx: &RuleContext<'_>, index: usize) -> StudyTables {
    let sample = study_file_name(ctx.investigation, index).and_then(|name| {
        match isatab_ingest::read_table(&ctx.dir_context.join(&name)) {
            Ok(table) => Some(table),
            Err(error) => {
                tracing::debug!(file = %name, %error, "study file not readable");
                None
            }
        }
    });
    let mut assays = Vec::new();
    for name in assay_file_names(ctx.investigation, index) {
        match isatab_ingest::read_table(&ctx.dir_context.join(&name)) {
            Ok(table) => assays.push(table),
            Err(error) => {
                tracing::debug!(file = %name, %error, "assay file not readable");
            }
        }
    }
    StudyTables { sample, assays }
}

/// Duplicated entries (first occurrence order) and the count of empty
/// entries in a name list.
pub(crate) fn name_list_problems(names: &[String]) -> (Vec<String>, usize) {
    let mut seen = BTreeSet::new();
    let mut duplicates = Vec::new();
    let mut empty = 0usize;
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            empty += 1;
            continue;
        }
        if !seen.insert(trimmed.to_string()) && !duplicates.iter().any(|d| d == trimmed) {
            duplicates.push(trimmed.to_string());
        }
    }
    (duplicates, empty)
}
