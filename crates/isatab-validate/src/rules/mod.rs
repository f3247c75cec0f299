//! The rule library and its selection model.
//!
//! Every rule is a plain function over the shared [`RuleContext`] and a
//! [`MessageStore`]. A rule set pairs the available rules with an
//! ordered selection of what to run at a given scope; callers can
//! replace either half to extend or reorder validation.

pub mod configuration;
pub mod groups;
pub mod referential;
pub mod structural;
pub mod syntactic;
pub(crate) mod util;

use thiserror::Error;

use crate::context::RuleContext;
use crate::store::MessageStore;

pub type RuleFn = fn(&mut RuleContext<'_>, &mut MessageStore) -> anyhow::Result<()>;

/// A named validation rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub run: RuleFn,
}

/// How a rule set names the rules it wants to run, in order.
#[derive(Debug, Clone)]
pub enum RuleSelector {
    /// Match a rule by its registered id.
    Id(String),
    /// Match a rule by function identity.
    Callable(RuleFn),
}

impl From<&str> for RuleSelector {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<RuleFn> for RuleSelector {
    fn from(run: RuleFn) -> Self {
        Self::Callable(run)
    }
}

#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("no rule matches selector {0:?}")]
    NotFound(String),
    #[error("selector {0:?} matches more than one rule")]
    Ambiguous(String),
}

/// The rules available at one scope plus the ordered selection to run.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub available_rules: Vec<Rule>,
    pub rules_to_run: Vec<RuleSelector>,
}

impl RuleSet {
    pub fn new(available_rules: Vec<Rule>, rules_to_run: Vec<RuleSelector>) -> Self {
        Self {
            available_rules,
            rules_to_run,
        }
    }

    /// Resolve a selector to the single rule it names.
    pub fn get_rule(&self, selector: &RuleSelector) -> Result<&Rule, RuleSetError> {
        let mut matches = self.available_rules.iter().filter(|rule| match selector {
            RuleSelector::Id(id) => rule.id == id,
            RuleSelector::Callable(run) => std::ptr::fn_addr_eq(rule.run, *run),
        });
        let first = matches
            .next()
            .ok_or_else(|| RuleSetError::NotFound(describe(selector)))?;
        if matches.next().is_some() {
            return Err(RuleSetError::Ambiguous(describe(selector)));
        }
        Ok(first)
    }
}

fn describe(selector: &RuleSelector) -> String {
    match selector {
        RuleSelector::Id(id) => id.clone(),
        RuleSelector::Callable(run) => format!("callable at {:p}", *run as *const ()),
    }
}

/// Every built-in rule, keyed by its stable id.
pub fn default_available_rules() -> Vec<Rule> {
    vec![
        Rule { id: "0000", run: structural::check_assay_samples_declared },
        Rule { id: "0006", run: structural::check_table_files_read },
        Rule { id: "1003", run: referential::check_samples_declared },
        Rule { id: "1007", run: referential::check_protocol_usage },
        Rule { id: "1008", run: referential::check_factor_usage },
        Rule { id: "1009", run: referential::check_parameter_usage },
        Rule { id: "1010", run: referential::check_protocol_names },
        Rule { id: "1011", run: referential::check_parameter_names },
        Rule { id: "1012", run: referential::check_factor_names },
        Rule { id: "1019", run: referential::check_table_protocols },
        Rule { id: "1020", run: referential::check_table_parameters },
        Rule { id: "1021", run: referential::check_table_factors },
        Rule { id: "1099", run: referential::check_unit_placement },
        Rule { id: "3001", run: syntactic::check_date_formats },
        Rule { id: "3002", run: syntactic::check_dois },
        Rule { id: "3003", run: syntactic::check_pubmed_ids },
        Rule { id: "3008", run: syntactic::collect_term_sources },
        Rule { id: "3010", run: syntactic::check_ontology_fields },
        Rule { id: "4001", run: configuration::load_configurations },
        Rule { id: "4002", run: configuration::check_measurement_technology_types },
        Rule { id: "4003", run: configuration::check_required_fields },
        Rule { id: "4007", run: configuration::check_factor_value_presence },
        Rule { id: "4009", run: configuration::check_protocol_fields },
        Rule { id: "4011", run: configuration::check_data_types },
        Rule { id: "4014", run: configuration::check_table_headers },
        Rule { id: "5001", run: groups::check_study_groups },
    ]
}

/// Ordered default selection at investigation scope. 4001 and 3008 run
/// first so later rules find the configurations and declared term
/// sources in the context.
pub const INVESTIGATION_RULES: &[&str] = &[
    "4001", "0006", "1003", "1007", "1008", "1009", "1010", "1011", "1012", "3001", "3002",
    "3003", "3008", "4002", "4003",
];

/// Ordered default selection for each study-sample table.
pub const STUDY_RULES: &[&str] = &[
    "4014", "4007", "4003", "4011", "1099", "4009", "3010", "5001",
];

/// Ordered default selection for each assay table.
pub const ASSAY_RULES: &[&str] = &[
    "4014", "4007", "4003", "4011", "1099", "4009", "3010", "0000", "5001",
];

fn selection(ids: &[&str]) -> Vec<RuleSelector> {
    ids.iter().map(|id| RuleSelector::from(*id)).collect()
}

pub fn default_investigation_rule_set() -> RuleSet {
    RuleSet::new(default_available_rules(), selection(INVESTIGATION_RULES))
}

pub fn default_study_rule_set() -> RuleSet {
    RuleSet::new(default_available_rules(), selection(STUDY_RULES))
}

pub fn default_assay_rule_set() -> RuleSet {
    RuleSet::new(default_available_rules(), selection(ASSAY_RULES))
}
