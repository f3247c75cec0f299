//! The shared rule state.
//!
//! Rules declare what they need through the accessor methods; a missing
//! scope, or a stage that has not run yet, surfaces as an `Err`, which
//! the engine reports as a code-0 error before moving on to the next
//! rule.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use isatab_ingest::InvestigationBundle;
use isatab_model::{ConfigMap, Table, TableConfig};

/// Per-study state, populated by the pipeline before study-scope rules
/// run and kept alive through the study's assays.
#[derive(Debug)]
pub struct StudyScope {
    pub index: usize,
    pub file_name: String,
    pub sample_table: Table,
    /// The `("[sample]", "")` configuration; absent when the loaded
    /// configuration directory does not carry one.
    pub config: Option<TableConfig>,
    /// Lower-cased protocol name to declared protocol type.
    pub protocol_types: BTreeMap<String, String>,
    /// Expected study-group count from `Comment[Number of Study Groups]`.
    pub group_size_in_comment: Option<usize>,
    /// Every assay table loaded so far for this study, so that
    /// assay-vs-study sample checks see all of them.
    pub assay_tables: Vec<Table>,
}

/// Per-assay state; `table_index` points into the study's `assay_tables`.
#[derive(Debug)]
pub struct AssayScope {
    pub table_index: usize,
    pub config: TableConfig,
}

#[derive(Debug)]
pub struct RuleContext<'a> {
    pub investigation: &'a InvestigationBundle,
    /// Directory holding the study and assay files.
    pub dir_context: PathBuf,
    pub config_dir: PathBuf,
    /// Written by rule 4001.
    pub configs: Option<ConfigMap>,
    /// Written by rule 3008.
    pub term_source_refs: Option<BTreeSet<String>>,
    pub study: Option<StudyScope>,
    pub assay: Option<AssayScope>,
}

impl<'a> RuleContext<'a> {
    pub fn new(investigation: &'a InvestigationBundle, dir_context: &Path, config_dir: &Path) -> Self {
        Self {
            investigation,
            dir_context: dir_context.to_path_buf(),
            config_dir: config_dir.to_path_buf(),
            configs: None,
            term_source_refs: None,
            study: None,
            assay: None,
        }
    }

    pub fn configs(&self) -> Result<&ConfigMap> {
        self.configs
            .as_ref()
            .context("configurations not loaded; rule 4001 must run first")
    }

    pub fn term_source_refs(&self) -> Result<&BTreeSet<String>> {
        self.term_source_refs
            .as_ref()
            .context("term source references not collected; rule 3008 must run first")
    }

    pub fn study(&self) -> Result<&StudyScope> {
        self.study.as_ref().context("rule requires study scope")
    }

    pub fn study_mut(&mut self) -> Result<&mut StudyScope> {
        self.study.as_mut().context("rule requires study scope")
    }

    /// The table under validation at the current scope: the assay table
    /// in assay scope, otherwise the study-sample table.
    pub fn current_table(&self) -> Result<&Table> {
        let study = self.study()?;
        match &self.assay {
            Some(assay) => study
                .assay_tables
                .get(assay.table_index)
                .ok_or_else(|| anyhow!("assay table index out of range")),
            None => Ok(&study.sample_table),
        }
    }

    /// The configuration governing the current table, when one is loaded.
    pub fn current_config(&self) -> Result<Option<&TableConfig>> {
        match &self.assay {
            Some(assay) => Ok(Some(&assay.config)),
            None => Ok(self.study()?.config.as_ref()),
        }
    }
}
