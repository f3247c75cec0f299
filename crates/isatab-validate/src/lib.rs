//! Rule-driven validation of investigation/study/assay table bundles
//! against per-measurement table configurations.
//!
//! [`validate`] is the whole pipeline: parse the investigation file,
//! run the investigation-scope rules, then the study- and assay-scope
//! rules over each table the investigation declares. Findings accumulate
//! in a per-run [`MessageStore`] and come back as a
//! [`ValidationReport`]; rule failures never abort the run.

pub mod codes;
pub mod context;
pub mod pipeline;
pub mod rules;
pub mod store;

pub use context::{AssayScope, RuleContext, StudyScope};
pub use isatab_model::{Message, Severity, ValidationReport};
pub use pipeline::{
    RuleOverrides, ScopeRules, ValidateOptions, validate, validate_with_options,
};
pub use rules::{Rule, RuleFn, RuleSelector, RuleSet, RuleSetError};
pub use store::MessageStore;
