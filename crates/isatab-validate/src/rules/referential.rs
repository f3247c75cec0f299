//! Referential rules: cross-references between the investigation's
//! declaration sections and the study/assay tables that use them.

use std::collections::BTreeSet;

use anyhow::Result;

use isatab_model::Table;
use isatab_model::headers::{HeaderKind, classify_header, is_value_bearing};

use crate::codes;
use crate::context::RuleContext;
use crate::rules::util;
use crate::store::MessageStore;

fn bracketed_names(table: &Table, want: fn(&HeaderKind<'_>) -> Option<String>) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for col in 0..table.headers.len() {
        if let Some(name) = want(&classify_header(table.base_header(col))) {
            names.insert(name);
        }
    }
    names
}

fn factor_value_names(table: &Table) -> BTreeSet<String> {
    bracketed_names(table, |kind| match kind {
        HeaderKind::FactorValue(name) => Some((*name).to_string()),
        _ => None,
    })
}

fn parameter_value_names(table: &Table) -> BTreeSet<String> {
    bracketed_names(table, |kind| match kind {
        HeaderKind::ParameterValue(name) => Some((*name).to_string()),
        _ => None,
    })
}

fn protocol_refs(table: &Table) -> BTreeSet<String> {
    let mut refs = BTreeSet::new();
    for col in table.column_indices(util::PROTOCOL_REF) {
        for value in table.column_values(col) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                refs.insert(trimmed.to_string());
            }
        }
    }
    refs
}

/// Rule 1003 (investigation scope): samples used in assay tables must be
/// declared in the study-sample table of the same study.
pub fn check_samples_declared(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    for index in 0..ctx.investigation.studies.len() {
        let tables = util::load_study_tables(ctx, index);
        let Some(sample_table) = tables.sample else {
            continue;
        };
        let declared = util::sample_names(&sample_table);
        for assay in &tables.assays {
            let used = util::sample_names(assay);
            let undeclared: Vec<&str> = used
                .iter()
                .filter(|name| !declared.contains(*name))
                .map(|s| s.as_str())
                .collect();
            if !undeclared.is_empty() {
                store.add_warning(
                    codes::SAMPLE_NOT_DECLARED,
                    "Samples not declared in the study file are used in an assay file",
                    format!(
                        "samples {:?} in {} are not declared in {}",
                        undeclared, assay.file_name, sample_table.file_name
                    ),
                );
            }
        }
    }
    Ok(())
}

fn report_undeclared_protocols(
    table: &Table,
    declared: &BTreeSet<String>,
    store: &mut MessageStore,
) {
    for protocol in protocol_refs(table) {
        if !declared.contains(&protocol) {
            store.add_warning(
                codes::PROTOCOL_NOT_DECLARED,
                "A protocol that was not declared in the study is referenced",
                format!(
                    "protocol '{}' in {} is not declared in the study protocols",
                    protocol, table.file_name
                ),
            );
        }
    }
}

/// Rule 1007 (investigation scope): every non-empty `Protocol REF` cell
/// in a study or assay table must name a declared protocol.
pub fn check_protocol_usage(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    for index in 0..ctx.investigation.studies.len() {
        let declared: BTreeSet<String> = util::protocol_names(ctx.investigation, index)
            .into_iter()
            .filter(|name| !name.is_empty())
            .collect();
        let tables = util::load_study_tables(ctx, index);
        if let Some(sample_table) = &tables.sample {
            report_undeclared_protocols(sample_table, &declared, store);
        }
        for assay in &tables.assays {
            report_undeclared_protocols(assay, &declared, store);
        }
    }
    Ok(())
}

/// Rule 1019 (table scope): `Protocol REF` cells of the current table
/// against the current study's declared protocols. Emits 1007.
pub fn check_table_protocols(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    let study = ctx.study()?;
    let declared: BTreeSet<String> = util::protocol_names(ctx.investigation, study.index)
        .into_iter()
        .filter(|name| !name.is_empty())
        .collect();
    let table = ctx.current_table()?;
    report_undeclared_protocols(table, &declared, store);
    Ok(())
}

/// Rule 1008 (investigation scope): factor names used in `Factor
/// Value[...]` columns must be declared, and declared factors must be
/// used somewhere.
pub fn check_factor_usage(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    for index in 0..ctx.investigation.studies.len() {
        let declared: BTreeSet<String> = util::factor_names(ctx.investigation, index)
            .into_iter()
            .filter(|name| !name.is_empty())
            .collect();
        let tables = util::load_study_tables(ctx, index);
        let mut used: BTreeSet<String> = BTreeSet::new();
        if let Some(sample_table) = &tables.sample {
            used.extend(factor_value_names(sample_table));
        }
        for assay in &tables.assays {
            used.extend(factor_value_names(assay));
        }
        for name in used.difference(&declared) {
            store.add_warning(
                codes::FACTOR_USAGE,
                "A factor that was not declared in the study is used",
                format!("factor '{name}' is used in a table but not declared in the study factors"),
            );
        }
        for name in declared.difference(&used) {
            store.add_warning(
                codes::FACTOR_USAGE,
                "A factor declared in the study is never used",
                format!("factor '{name}' is declared but not used in any table"),
            );
        }
    }
    Ok(())
}

/// Rule 1021 (table scope): factor usage for the current table only.
/// Emits 1008.
pub fn check_table_factors(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    let study = ctx.study()?;
    let declared: BTreeSet<String> = util::factor_names(ctx.investigation, study.index)
        .into_iter()
        .filter(|name| !name.is_empty())
        .collect();
    let table = ctx.current_table()?;
    for name in factor_value_names(table) {
        if !declared.contains(&name) {
            store.add_warning(
                codes::FACTOR_USAGE,
                "A factor that was not declared in the study is used",
                format!("factor '{}' in {} is not declared in the study factors", name, table.file_name),
            );
        }
    }
    Ok(())
}

/// Rule 1009 (investigation scope): parameter names used in `Parameter
/// Value[...]` columns must be declared under some study protocol.
pub fn check_parameter_usage(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    for index in 0..ctx.investigation.studies.len() {
        let declared = util::parameter_names(ctx.investigation, index);
        let tables = util::load_study_tables(ctx, index);
        let mut used: BTreeSet<String> = BTreeSet::new();
        if let Some(sample_table) = &tables.sample {
            used.extend(parameter_value_names(sample_table));
        }
        for assay in &tables.assays {
            used.extend(parameter_value_names(assay));
        }
        for name in used.difference(&declared) {
            store.add_warning(
                codes::PARAMETER_NOT_DECLARED,
                "A protocol parameter that was not declared in the study is used",
                format!(
                    "parameter '{name}' is used in a table but not declared under any study protocol"
                ),
            );
        }
    }
    Ok(())
}

/// Rule 1020 (table scope): parameter usage for the current table only.
/// Emits 1009.
pub fn check_table_parameters(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    let study = ctx.study()?;
    let declared = util::parameter_names(ctx.investigation, study.index);
    let table = ctx.current_table()?;
    for name in parameter_value_names(table) {
        if !declared.contains(&name) {
            store.add_warning(
                codes::PARAMETER_NOT_DECLARED,
                "A protocol parameter that was not declared in the study is used",
                format!(
                    "parameter '{}' in {} is not declared under any study protocol",
                    name, table.file_name
                ),
            );
        }
    }
    Ok(())
}

/// Rule 1010: protocol names must be unique and non-empty per study.
pub fn check_protocol_names(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    for index in 0..ctx.investigation.studies.len() {
        let names = util::protocol_names(ctx.investigation, index);
        let (duplicates, empty) = util::name_list_problems(&names);
        for name in duplicates {
            store.add_warning(
                codes::PROTOCOL_NAMES,
                "A protocol name is declared more than once",
                format!("protocol '{}' in study {}", name, index + 1),
            );
        }
        if empty > 0 {
            store.add_warning(
                codes::PROTOCOL_NAMES,
                "A protocol is declared without a name",
                format!("{} unnamed protocol(s) in study {}", empty, index + 1),
            );
        }
    }
    Ok(())
}

/// Rule 1011: parameter names must be unique and non-empty per protocol.
pub fn check_parameter_names(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    for index in 0..ctx.investigation.studies.len() {
        let Some(protocols) = ctx.investigation.s_protocols.get(index) else {
            continue;
        };
        let names = util::column(protocols, util::PROTOCOL_NAME);
        let parameters = util::column(protocols, util::PROTOCOL_PARAMETERS);
        for (row, cell) in parameters.iter().enumerate() {
            if cell.trim().is_empty() {
                continue;
            }
            let entries: Vec<String> = cell.split(';').map(str::to_string).collect();
            let (duplicates, empty) = util::name_list_problems(&entries);
            let protocol = names.get(row).map(String::as_str).unwrap_or("");
            for name in duplicates {
                store.add_warning(
                    codes::PARAMETER_NAMES,
                    "A protocol parameter is declared more than once",
                    format!("parameter '{name}' of protocol '{protocol}'"),
                );
            }
            if empty > 0 {
                store.add_warning(
                    codes::PARAMETER_NAMES,
                    "A protocol parameter is declared without a name",
                    format!("{empty} unnamed parameter(s) of protocol '{protocol}'"),
                );
            }
        }
    }
    Ok(())
}

/// Rule 1012: factor names must be unique and non-empty per study.
pub fn check_factor_names(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    for index in 0..ctx.investigation.studies.len() {
        let names = util::factor_names(ctx.investigation, index);
        let (duplicates, empty) = util::name_list_problems(&names);
        for name in duplicates {
            store.add_warning(
                codes::FACTOR_NAMES,
                "A factor name is declared more than once",
                format!("factor '{}' in study {}", name, index + 1),
            );
        }
        if empty > 0 {
            store.add_warning(
                codes::FACTOR_NAMES,
                "A factor is declared without a name",
                format!("{} unnamed factor(s) in study {}", empty, index + 1),
            );
        }
    }
    Ok(())
}

/// Rule 1099 (table scope): every `Unit` column must directly follow a
/// value-bearing column (characteristic, parameter value, factor value).
pub fn check_unit_placement(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    let table = ctx.current_table()?;
    for col in 0..table.headers.len() {
        if table.base_header(col) != "Unit" {
            continue;
        }
        let preceded_by_value = col > 0 && is_value_bearing(table.base_header(col - 1));
        if !preceded_by_value {
            store.add_warning(
                codes::UNIT_PLACEMENT,
                "A Unit column does not follow a value column",
                format!("column {} of {}", col + 1, table.file_name),
            );
        }
    }
    Ok(())
}
