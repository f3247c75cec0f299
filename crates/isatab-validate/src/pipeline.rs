//! The validation pipeline: investigation first, then each study-sample
//! table, then each of the study's assay tables.

use std::path::{Path, PathBuf};

use isatab_model::{STUDY_GROUP_COMMENT, Table, ValidationReport, config_key, sample_key};

use crate::codes;
use crate::context::{AssayScope, RuleContext, StudyScope};
use crate::rules::{self, RuleSet, util};
use crate::store::MessageStore;

/// Per-scope replacements for the default rule machinery. `None` halves
/// keep the defaults.
#[derive(Debug, Clone, Default)]
pub struct ScopeRules {
    pub available_rules: Option<Vec<rules::Rule>>,
    pub rules_to_run: Option<Vec<rules::RuleSelector>>,
}

impl ScopeRules {
    fn apply(&self, mut defaults: RuleSet) -> RuleSet {
        if let Some(available) = &self.available_rules {
            defaults.available_rules = available.clone();
        }
        if let Some(selection) = &self.rules_to_run {
            defaults.rules_to_run = selection.clone();
        }
        defaults
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleOverrides {
    pub investigation: ScopeRules,
    pub studies: ScopeRules,
    pub assays: ScopeRules,
}

#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Directory holding the study and assay files; defaults to the
    /// investigation file's directory.
    pub data_dir: Option<PathBuf>,
    pub rules: RuleOverrides,
}

/// Run one rule set's selection in order. A selector that resolves to
/// no rule, or a rule that returns an error, reports under code 0; an
/// unresolvable selector additionally marks the run unfinished.
fn run_rule_set(
    set: &RuleSet,
    ctx: &mut RuleContext<'_>,
    store: &mut MessageStore,
    finished: &mut bool,
) {
    for selector in &set.rules_to_run {
        let rule = match set.get_rule(selector) {
            Ok(rule) => rule,
            Err(error) => {
                store.add_error(codes::UNKNOWN, "A rule could not be resolved", error.to_string());
                *finished = false;
                continue;
            }
        };
        tracing::debug!(rule = rule.id, "running rule");
        if let Err(error) = (rule.run)(ctx, store) {
            store.add_error(
                codes::UNKNOWN,
                "A rule failed to run",
                format!("rule {}: {error:#}", rule.id),
            );
        }
    }
}

/// Validate with the default rule sets and the investigation's own
/// directory as the data directory.
pub fn validate(investigation_path: &Path, config_dir: &Path) -> ValidationReport {
    validate_with_options(investigation_path, config_dir, &ValidateOptions::default())
}

pub fn validate_with_options(
    investigation_path: &Path,
    config_dir: &Path,
    options: &ValidateOptions,
) -> ValidationReport {
    let mut store = MessageStore::new();
    let mut finished = true;

    let loaded = match isatab_ingest::load_investigation(investigation_path) {
        Ok(loaded) => loaded,
        Err(error) => {
            tracing::warn!(%error, path = %investigation_path.display(), "investigation not parseable");
            store.add_error(
                codes::UNKNOWN,
                "The investigation file could not be parsed",
                format!("{}: {error}", investigation_path.display()),
            );
            return store.into_report(false);
        }
    };
    for issue in &loaded.label_issues {
        store.add_error(
            codes::SECTION_LABELS,
            "The investigation file has unexpected section labels",
            format!("{}: {}", issue.section, issue.detail),
        );
    }

    let dir_context = options.data_dir_for(investigation_path);
    let mut ctx = RuleContext::new(&loaded.bundle, &dir_context, config_dir);

    let investigation_set = options
        .rules
        .investigation
        .apply(rules::default_investigation_rule_set());
    let study_set = options.rules.studies.apply(rules::default_study_rule_set());
    let assay_set = options.rules.assays.apply(rules::default_assay_rule_set());

    run_rule_set(&investigation_set, &mut ctx, &mut store, &mut finished);

    for index in 0..loaded.bundle.studies.len() {
        let Some(file_name) = util::study_file_name(&loaded.bundle, index) else {
            continue;
        };
        // Rule 0006 has already reported an unreadable sample file. The
        // study-table rules are skipped then, but the study's assays are
        // still validated against an empty sample table.
        let (sample_table, sample_readable) =
            match isatab_ingest::read_table(&dir_context.join(&file_name)) {
                Ok(table) => (table, true),
                Err(error) => {
                    tracing::warn!(file = %file_name, %error, "study sample file not readable");
                    (Table::new(&file_name, Vec::new()), false)
                }
            };
        let group_size_in_comment = loaded.bundle.studies[index]
            .first_value(STUDY_GROUP_COMMENT)
            .and_then(|value| value.trim().parse::<usize>().ok());
        let config = ctx
            .configs
            .as_ref()
            .and_then(|configs| configs.get(&sample_key()).cloned());
        ctx.study = Some(StudyScope {
            index,
            file_name,
            sample_table,
            config,
            protocol_types: util::protocol_types(&loaded.bundle, index),
            group_size_in_comment,
            assay_tables: Vec::new(),
        });
        if sample_readable {
            run_rule_set(&study_set, &mut ctx, &mut store, &mut finished);
        }

        let assays = &loaded.bundle.s_assays[index];
        for row in 0..assays.rows.len() {
            let file = assays
                .column_index(util::ASSAY_FILE_NAME)
                .map(|col| assays.value(row, col).trim().to_string())
                .unwrap_or_default();
            if file.is_empty() {
                continue;
            }
            let measurement = assays
                .column_index(util::ASSAY_MEASUREMENT_TYPE)
                .map(|col| assays.value(row, col))
                .unwrap_or("");
            let technology = assays
                .column_index(util::ASSAY_TECHNOLOGY_TYPE)
                .map(|col| assays.value(row, col))
                .unwrap_or("");
            // Rule 4002 has already reported missing configurations.
            let Some(config) = ctx
                .configs
                .as_ref()
                .and_then(|configs| configs.get(&config_key(measurement, technology)).cloned())
            else {
                tracing::debug!(file = %file, "skipping assay; no configuration for its types");
                continue;
            };
            let table = match isatab_ingest::read_table(&dir_context.join(&file)) {
                Ok(table) => table,
                Err(error) => {
                    tracing::warn!(file = %file, %error, "skipping assay; file not readable");
                    continue;
                }
            };
            let table_index = match ctx.study_mut() {
                Ok(study) => {
                    study.assay_tables.push(table);
                    study.assay_tables.len() - 1
                }
                Err(_) => continue,
            };
            ctx.assay = Some(AssayScope { table_index, config });
            run_rule_set(&assay_set, &mut ctx, &mut store, &mut finished);
            ctx.assay = None;
        }
        ctx.study = None;
    }

    store.into_report(finished)
}

impl ValidateOptions {
    fn data_dir_for(&self, investigation_path: &Path) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            investigation_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}
