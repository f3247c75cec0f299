//! Structural rules: declared files must exist, and assay samples must
//! propagate from the study-sample table.

use anyhow::Result;

use crate::codes;
use crate::context::RuleContext;
use crate::rules::util;
use crate::store::MessageStore;

/// Rule 0006: every declared study and assay file must be readable.
/// Study files report under code 6, assay files under code 8.
pub fn check_table_files_read(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    for index in 0..ctx.investigation.studies.len() {
        match util::study_file_name(ctx.investigation, index) {
            Some(name) => {
                if !ctx.dir_context.join(&name).is_file() {
                    store.add_error(
                        codes::STUDY_FILE_NOT_READ,
                        "A study file could not be read",
                        format!("{name} does not appear to exist"),
                    );
                }
            }
            None => store.add_error(
                codes::STUDY_FILE_NOT_READ,
                "A study file could not be read",
                format!("no file name declared for study {}", index + 1),
            ),
        }
        for name in util::assay_file_names(ctx.investigation, index) {
            if !ctx.dir_context.join(&name).is_file() {
                store.add_error(
                    codes::ASSAY_FILE_NOT_READ,
                    "An assay file could not be read",
                    format!("{name} does not appear to exist"),
                );
            }
        }
    }
    Ok(())
}

/// Rule 0000 (assay scope): every `Sample Name` in the current assay
/// table must be declared in the study-sample table. Emits 1003.
pub fn check_assay_samples_declared(
    ctx: &mut RuleContext<'_>,
    store: &mut MessageStore,
) -> Result<()> {
    let study = ctx.study()?;
    // Nothing to compare against without a Sample Name column; the
    // missing column is reported by rules 0006 and 4003.
    if study.sample_table.column_index(util::SAMPLE_NAME).is_none() {
        return Ok(());
    }
    let assay_table = ctx.current_table()?;
    let declared = util::sample_names(&study.sample_table);
    let used = util::sample_names(assay_table);
    let undeclared: Vec<&String> = used.iter().filter(|name| !declared.contains(*name)).collect();
    if !undeclared.is_empty() {
        let names: Vec<&str> = undeclared.iter().map(|s| s.as_str()).collect();
        store.add_warning(
            codes::SAMPLE_NOT_DECLARED,
            "Samples not declared in the study file are used in an assay file",
            format!(
                "samples {:?} in {} are not declared in {}",
                names, assay_table.file_name, study.file_name
            ),
        );
    }
    Ok(())
}
