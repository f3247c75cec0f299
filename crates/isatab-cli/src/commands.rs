use anyhow::Context;
use isatab_model::ValidationReport;
use isatab_validate::{ValidateOptions, rules, validate_with_options};

use crate::cli::ValidateArgs;
use crate::summary::{print_report, print_rules};

/// Run a validation and print the report. Returns the report so the
/// caller can pick the exit code.
pub fn run_validate(args: &ValidateArgs) -> anyhow::Result<ValidationReport> {
    let options = ValidateOptions {
        data_dir: args.data_dir.clone(),
        ..Default::default()
    };
    tracing::debug!(
        investigation = %args.investigation.display(),
        config_dir = %args.config_dir.display(),
        "starting validation"
    );
    let report = validate_with_options(&args.investigation, &args.config_dir, &options);
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{json}");
    } else {
        print_report(&report);
    }
    Ok(report)
}

pub fn run_rules() {
    print_rules(
        &rules::default_available_rules(),
        rules::INVESTIGATION_RULES,
        rules::STUDY_RULES,
        rules::ASSAY_RULES,
    );
}
