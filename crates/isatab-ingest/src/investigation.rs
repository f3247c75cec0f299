//! Investigation-file parsing.
//!
//! The investigation file is label-oriented: rows carry a label in the
//! first cell and values in the remaining cells, grouped under section
//! header rows (`ONTOLOGY SOURCE REFERENCE`, `INVESTIGATION`, `STUDY`,
//! ...). Each section is transposed into a [`Table`] whose headers are
//! the section's labels, one data row per value column. Study-scoped
//! sections are collected per study, in declaration order.
//!
//! Label checking happens here because only the parser sees the raw
//! section layout; findings are returned as [`LabelIssue`]s for the
//! validator to report (code 5), never as hard failures.

use std::path::Path;

use isatab_model::Table;
use isatab_model::headers::is_comment;

use crate::error::{IngestError, Result};
use crate::tsv::read_rows;

pub const ONTOLOGY_SOURCE_REFERENCE: &str = "ONTOLOGY SOURCE REFERENCE";
pub const INVESTIGATION: &str = "INVESTIGATION";
pub const INVESTIGATION_PUBLICATIONS: &str = "INVESTIGATION PUBLICATIONS";
pub const INVESTIGATION_CONTACTS: &str = "INVESTIGATION CONTACTS";
pub const STUDY: &str = "STUDY";
pub const STUDY_DESIGN_DESCRIPTORS: &str = "STUDY DESIGN DESCRIPTORS";
pub const STUDY_PUBLICATIONS: &str = "STUDY PUBLICATIONS";
pub const STUDY_FACTORS: &str = "STUDY FACTORS";
pub const STUDY_ASSAYS: &str = "STUDY ASSAYS";
pub const STUDY_PROTOCOLS: &str = "STUDY PROTOCOLS";
pub const STUDY_CONTACTS: &str = "STUDY CONTACTS";

const PUBLICATION_LABELS: [&str; 7] = [
    "PubMed ID",
    "Publication DOI",
    "Publication Author List",
    "Publication Title",
    "Publication Status",
    "Publication Status Term Accession Number",
    "Publication Status Term Source REF",
];

const CONTACT_LABELS: [&str; 11] = [
    "Person Last Name",
    "Person First Name",
    "Person Mid Initials",
    "Person Email",
    "Person Phone",
    "Person Fax",
    "Person Address",
    "Person Affiliation",
    "Person Roles",
    "Person Roles Term Accession Number",
    "Person Roles Term Source REF",
];

fn prefixed(prefix: &str, labels: &[&str]) -> Vec<String> {
    labels
        .iter()
        .map(|label| format!("{prefix} {label}"))
        .collect()
}

/// Expected labels for a section; the actual label set must be a superset
/// of these, and any extra must be a `Comment[<name>]` label.
fn expected_labels(section: &str) -> Vec<String> {
    match section {
        ONTOLOGY_SOURCE_REFERENCE => vec![
            "Term Source Name".to_string(),
            "Term Source File".to_string(),
            "Term Source Version".to_string(),
            "Term Source Description".to_string(),
        ],
        INVESTIGATION => prefixed(
            "Investigation",
            &[
                "Identifier",
                "Title",
                "Description",
                "Submission Date",
                "Public Release Date",
            ],
        ),
        INVESTIGATION_PUBLICATIONS => prefixed("Investigation", &PUBLICATION_LABELS),
        INVESTIGATION_CONTACTS => prefixed("Investigation", &CONTACT_LABELS),
        STUDY => prefixed(
            "Study",
            &[
                "Identifier",
                "Title",
                "Description",
                "Submission Date",
                "Public Release Date",
                "File Name",
            ],
        ),
        STUDY_DESIGN_DESCRIPTORS => prefixed(
            "Study",
            &[
                "Design Type",
                "Design Type Term Accession Number",
                "Design Type Term Source REF",
            ],
        ),
        STUDY_PUBLICATIONS => prefixed("Study", &PUBLICATION_LABELS),
        STUDY_FACTORS => prefixed(
            "Study",
            &[
                "Factor Name",
                "Factor Type",
                "Factor Type Term Accession Number",
                "Factor Type Term Source REF",
            ],
        ),
        STUDY_ASSAYS => prefixed(
            "Study",
            &[
                "Assay Measurement Type",
                "Assay Measurement Type Term Accession Number",
                "Assay Measurement Type Term Source REF",
                "Assay Technology Type",
                "Assay Technology Type Term Accession Number",
                "Assay Technology Type Term Source REF",
                "Assay Technology Platform",
                "Assay File Name",
            ],
        ),
        STUDY_PROTOCOLS => prefixed(
            "Study",
            &[
                "Protocol Name",
                "Protocol Type",
                "Protocol Type Term Accession Number",
                "Protocol Type Term Source REF",
                "Protocol Description",
                "Protocol URI",
                "Protocol Version",
                "Protocol Parameters Name",
                "Protocol Parameters Name Term Accession Number",
                "Protocol Parameters Name Term Source REF",
                "Protocol Components Name",
                "Protocol Components Type",
                "Protocol Components Type Term Accession Number",
                "Protocol Components Type Term Source REF",
            ],
        ),
        STUDY_CONTACTS => prefixed("Study", &CONTACT_LABELS),
        _ => Vec::new(),
    }
}

const ALL_SECTIONS: [&str; 11] = [
    ONTOLOGY_SOURCE_REFERENCE,
    INVESTIGATION,
    INVESTIGATION_PUBLICATIONS,
    INVESTIGATION_CONTACTS,
    STUDY,
    STUDY_DESIGN_DESCRIPTORS,
    STUDY_PUBLICATIONS,
    STUDY_FACTORS,
    STUDY_ASSAYS,
    STUDY_PROTOCOLS,
    STUDY_CONTACTS,
];

fn is_section_header(label: &str) -> bool {
    ALL_SECTIONS.contains(&label)
}

fn is_study_scoped(section: &str) -> bool {
    matches!(
        section,
        STUDY_DESIGN_DESCRIPTORS
            | STUDY_PUBLICATIONS
            | STUDY_FACTORS
            | STUDY_ASSAYS
            | STUDY_PROTOCOLS
            | STUDY_CONTACTS
    )
}

/// The fully parsed investigation file by section: fixed
/// investigation-level tables plus parallel per-study table sequences.
#[derive(Debug, Clone, Default)]
pub struct InvestigationBundle {
    pub ontology_sources: Table,
    pub investigation: Table,
    pub i_publications: Table,
    pub i_contacts: Table,
    pub studies: Vec<Table>,
    pub s_design_descriptors: Vec<Table>,
    pub s_publications: Vec<Table>,
    pub s_factors: Vec<Table>,
    pub s_assays: Vec<Table>,
    pub s_protocols: Vec<Table>,
    pub s_contacts: Vec<Table>,
}

/// A section-label finding: either an expected label is missing, or an
/// extra label does not match the comment pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelIssue {
    pub section: String,
    pub detail: String,
}

#[derive(Debug, Clone)]
pub struct LoadedInvestigation {
    pub bundle: InvestigationBundle,
    pub label_issues: Vec<LabelIssue>,
}

#[derive(Debug)]
struct RawSection {
    name: String,
    /// (label, values) in file order.
    rows: Vec<(String, Vec<String>)>,
}

impl RawSection {
    fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|(label, _)| label.as_str()).collect()
    }

    /// Transpose label rows into a table: headers are the labels, one
    /// data row per value column.
    fn into_table(self, file_name: &str) -> Table {
        let width = self.rows.iter().map(|(_, values)| values.len()).max().unwrap_or(0);
        let headers: Vec<String> = self.rows.iter().map(|(label, _)| label.clone()).collect();
        let mut table = Table::new(file_name, headers);
        for col in 0..width {
            let row: Vec<String> = self
                .rows
                .iter()
                .map(|(_, values)| values.get(col).cloned().unwrap_or_default())
                .collect();
            if row.iter().all(|value| value.is_empty()) {
                continue;
            }
            table.rows.push(row);
        }
        table
    }
}

fn check_labels(section: &RawSection, issues: &mut Vec<LabelIssue>) {
    let actual = section.labels();
    for expected in expected_labels(&section.name) {
        if !actual.contains(&expected.as_str()) {
            issues.push(LabelIssue {
                section: section.name.clone(),
                detail: format!("expected label '{expected}' not found"),
            });
        }
    }
    let expected = expected_labels(&section.name);
    for label in actual {
        if !expected.iter().any(|e| e == label) && !is_comment(label) {
            issues.push(LabelIssue {
                section: section.name.clone(),
                detail: format!("label '{label}' is not an expected or comment label"),
            });
        }
    }
}

/// Parse an investigation file into the bundle of per-section tables.
///
/// Unparseable files are hard errors; unexpected labels are soft
/// [`LabelIssue`]s left to the caller.
pub fn load_investigation(path: &Path) -> Result<LoadedInvestigation> {
    let rows = read_rows(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut sections: Vec<RawSection> = Vec::new();
    for row in rows {
        let Some((label, values)) = row.split_first() else {
            continue;
        };
        if is_section_header(label) {
            sections.push(RawSection {
                name: label.clone(),
                rows: Vec::new(),
            });
            continue;
        }
        let Some(current) = sections.last_mut() else {
            return Err(IngestError::OrphanRow {
                path: path.to_path_buf(),
                label: label.clone(),
            });
        };
        current.rows.push((label.clone(), values.to_vec()));
    }
    if sections.is_empty() {
        return Err(IngestError::NoSections {
            path: path.to_path_buf(),
        });
    }

    let mut bundle = InvestigationBundle::default();
    let mut label_issues = Vec::new();
    let mut study_count = 0usize;
    for section in sections {
        check_labels(&section, &mut label_issues);
        let name = section.name.clone();
        if name == STUDY {
            study_count += 1;
            // Keep the parallel sequences aligned even for sparse files.
            bundle.s_design_descriptors.push(Table::new(&file_name, Vec::new()));
            bundle.s_publications.push(Table::new(&file_name, Vec::new()));
            bundle.s_factors.push(Table::new(&file_name, Vec::new()));
            bundle.s_assays.push(Table::new(&file_name, Vec::new()));
            bundle.s_protocols.push(Table::new(&file_name, Vec::new()));
            bundle.s_contacts.push(Table::new(&file_name, Vec::new()));
            bundle.studies.push(section.into_table(&file_name));
            continue;
        }
        if is_study_scoped(&name) {
            if study_count == 0 {
                return Err(IngestError::StudySectionWithoutStudy {
                    section: name,
                    path: path.to_path_buf(),
                });
            }
            let table = section.into_table(&file_name);
            let slot = study_count - 1;
            match name.as_str() {
                STUDY_DESIGN_DESCRIPTORS => bundle.s_design_descriptors[slot] = table,
                STUDY_PUBLICATIONS => bundle.s_publications[slot] = table,
                STUDY_FACTORS => bundle.s_factors[slot] = table,
                STUDY_ASSAYS => bundle.s_assays[slot] = table,
                STUDY_PROTOCOLS => bundle.s_protocols[slot] = table,
                _ => bundle.s_contacts[slot] = table,
            }
            continue;
        }
        let table = section.into_table(&file_name);
        match name.as_str() {
            ONTOLOGY_SOURCE_REFERENCE => bundle.ontology_sources = table,
            INVESTIGATION => bundle.investigation = table,
            INVESTIGATION_PUBLICATIONS => bundle.i_publications = table,
            _ => bundle.i_contacts = table,
        }
    }

    tracing::debug!(
        file = %file_name,
        studies = bundle.studies.len(),
        label_issues = label_issues.len(),
        "loaded investigation"
    );
    Ok(LoadedInvestigation {
        bundle,
        label_issues,
    })
}
