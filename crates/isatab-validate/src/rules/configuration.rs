//! Configuration-driven rules: required fields, datatypes, protocol
//! placement and the header grammar, all judged against the loaded
//! table configurations.

use anyhow::Result;

use isatab_model::headers::{
    HeaderKind, classify_header, is_material_or_data,
};
use isatab_model::{DataType, Table, TableConfig, config_key, investigation_key};

use crate::codes;
use crate::context::RuleContext;
use crate::rules::util;
use crate::store::MessageStore;

/// Rule 4001: load the configuration directory into the shared context.
pub fn load_configurations(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    match isatab_config::load_config_dir(&ctx.config_dir) {
        Ok(configs) => {
            tracing::debug!(count = configs.len(), "configurations loaded");
            ctx.configs = Some(configs);
        }
        Err(error) => {
            store.add_error(
                codes::CONFIG_LOAD,
                "Configurations could not be loaded",
                format!("{}: {error}", ctx.config_dir.display()),
            );
        }
    }
    Ok(())
}

/// Rule 4002: every declared (measurement-type, technology-type) pair
/// must key a loaded configuration.
pub fn check_measurement_technology_types(
    ctx: &mut RuleContext<'_>,
    store: &mut MessageStore,
) -> Result<()> {
    let configs = ctx.configs()?;
    for assays in &ctx.investigation.s_assays {
        let measurements = util::column(assays, util::ASSAY_MEASUREMENT_TYPE);
        let technologies = util::column(assays, util::ASSAY_TECHNOLOGY_TYPE);
        for (row, measurement) in measurements.iter().enumerate() {
            let technology = technologies.get(row).map(String::as_str).unwrap_or("");
            if measurement.is_empty() && technology.is_empty() {
                continue;
            }
            if !configs.contains_key(&config_key(measurement, technology)) {
                store.add_error(
                    codes::CONFIG_NOT_FOUND,
                    "A measurement/technology type pair has no configuration",
                    format!(
                        "measurement type '{measurement}' with technology type '{technology}' \
                         does not key any loaded configuration"
                    ),
                );
            }
        }
    }
    Ok(())
}

fn check_table_required_fields(table: &Table, config: &TableConfig, store: &mut MessageStore) {
    for field in config.required_fields() {
        let columns = table.column_indices(&field.header);
        if columns.is_empty() {
            store.add_warning(
                codes::REQUIRED_COLUMN_MISSING,
                "A required column is missing",
                format!("required column '{}' not found in {}", field.header, table.file_name),
            );
            continue;
        }
        if columns.len() > 1 {
            store.add_warning(
                codes::REQUIRED_COLUMN_MISSING,
                "A required column appears more than once",
                format!(
                    "column '{}' appears {} times in {}",
                    field.header,
                    columns.len(),
                    table.file_name
                ),
            );
        }
        for col in columns {
            for (row, value) in table.column_values(col).enumerate() {
                if value.trim().is_empty() {
                    store.add_warning(
                        codes::REQUIRED_VALUE_MISSING,
                        "A required field has no value",
                        format!(
                            "'{}' is empty in row {} of {}",
                            field.header,
                            row + 1,
                            table.file_name
                        ),
                    );
                }
            }
        }
    }
}

fn investigation_sections<'a>(
    ctx: &'a RuleContext<'_>,
) -> Vec<&'a Table> {
    let bundle = ctx.investigation;
    let mut sections = vec![
        &bundle.ontology_sources,
        &bundle.investigation,
        &bundle.i_publications,
        &bundle.i_contacts,
    ];
    sections.extend(bundle.studies.iter());
    sections.extend(bundle.s_design_descriptors.iter());
    sections.extend(bundle.s_publications.iter());
    sections.extend(bundle.s_factors.iter());
    sections.extend(bundle.s_assays.iter());
    sections.extend(bundle.s_protocols.iter());
    sections.extend(bundle.s_contacts.iter());
    sections
}

/// Rule 4003: required fields must carry values. At investigation scope
/// the `("[investigation]", "")` configuration drives checks across the
/// sections (a field found nowhere is 4013); at study/assay scope the
/// current table's configuration applies (a missing column is 4010).
pub fn check_required_fields(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    if ctx.study.is_some() {
        let Some(config) = ctx.current_config()?.cloned() else {
            return Ok(());
        };
        let table = ctx.current_table()?;
        check_table_required_fields(table, &config, store);
        return Ok(());
    }
    let configs = ctx.configs()?;
    let Some(config) = configs.get(&investigation_key()) else {
        tracing::debug!("no [investigation] configuration; skipping section field checks");
        return Ok(());
    };
    for field in config.required_fields() {
        let mut found = false;
        for section in investigation_sections(ctx) {
            let Some(col) = section.column_index(&field.header) else {
                continue;
            };
            found = true;
            for (row, value) in section.column_values(col).enumerate() {
                if value.trim().is_empty() {
                    store.add_warning(
                        codes::REQUIRED_VALUE_MISSING,
                        "A required field has no value",
                        format!("'{}' is empty in row {}", field.header, row + 1),
                    );
                }
            }
        }
        if !found {
            store.add_warning(
                codes::REQUIRED_SECTION_FIELD_MISSING,
                "A required investigation field is missing",
                format!("field '{}' not found in any section", field.header),
            );
        }
    }
    Ok(())
}

/// Rule 4007 (table scope): `Factor Value[...]` columns must carry a
/// value in every row.
pub fn check_factor_value_presence(
    ctx: &mut RuleContext<'_>,
    store: &mut MessageStore,
) -> Result<()> {
    let table = ctx.current_table()?;
    for col in 0..table.headers.len() {
        let header = table.base_header(col);
        if !matches!(classify_header(header), HeaderKind::FactorValue(_)) {
            continue;
        }
        for (row, value) in table.column_values(col).enumerate() {
            if value.trim().is_empty() {
                store.add_warning(
                    codes::FACTOR_VALUE_MISSING,
                    "A factor value is missing",
                    format!("'{}' is empty in row {} of {}", header, row + 1, table.file_name),
                );
            }
        }
    }
    Ok(())
}

/// Distinct protocol types (lower-cased) used by `Protocol REF` columns
/// in the half-open column range, resolved through the study's protocol
/// name→type map with a fallback to the raw protocol name.
fn protocol_types_between(
    table: &Table,
    range: std::ops::Range<usize>,
    names_to_types: &std::collections::BTreeMap<String, String>,
) -> Vec<String> {
    let mut types = Vec::new();
    for col in range {
        if table.base_header(col) != util::PROTOCOL_REF {
            continue;
        }
        for value in table.column_values(col) {
            let name = value.trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            let ptype = names_to_types
                .get(&name)
                .map(|t| t.trim().to_lowercase())
                .unwrap_or_else(|| name.clone());
            if !types.contains(&ptype) {
                types.push(ptype);
            }
        }
    }
    types
}

/// Rule 4009 (table scope): between two consecutive configured columns
/// present in the table, the `Protocol REF` values found must cover
/// every protocol type the configuration expects between those
/// positions (missing types warn under 1007). A `Protocol REF` column
/// after the last material/data column warns under 4009.
pub fn check_protocol_fields(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    let study = ctx.study()?;
    let names_to_types = study.protocol_types.clone();
    let Some(config) = ctx.current_config()?.cloned() else {
        return Ok(());
    };
    let table = ctx.current_table()?;

    // Configured fields that actually appear in the table, in config order.
    let present: Vec<(usize, usize)> = config
        .fields
        .iter()
        .filter_map(|field| {
            table
                .column_index(&field.header)
                .map(|col| (field.pos, col))
        })
        .collect();
    for pair in present.windows(2) {
        let (start_pos, start_col) = pair[0];
        let (end_pos, end_col) = pair[1];
        if end_col <= start_col {
            continue;
        }
        let found = protocol_types_between(table, start_col + 1..end_col, &names_to_types);
        for expected in config.protocols_between(start_pos, end_pos) {
            let wanted = expected.protocol_type.trim().to_lowercase();
            if !found.contains(&wanted) {
                store.add_warning(
                    codes::PROTOCOL_NOT_DECLARED,
                    "An expected protocol reference is missing",
                    format!(
                        "a protocol of type '{}' is expected between '{}' and '{}' in {}",
                        expected.protocol_type,
                        table.headers[start_col],
                        table.headers[end_col],
                        table.file_name
                    ),
                );
            }
        }
    }

    let last_object = (0..table.headers.len())
        .rev()
        .find(|&col| is_material_or_data(table.base_header(col)));
    if let Some(last) = last_object {
        for col in last + 1..table.headers.len() {
            if table.base_header(col) == util::PROTOCOL_REF {
                store.add_warning(
                    codes::PROTOCOL_REF_PLACEMENT,
                    "A Protocol REF column appears after the last material or data column",
                    format!("column {} of {}", col + 1, table.file_name),
                );
            }
        }
    }
    Ok(())
}

fn value_conforms(value: &str, field: &isatab_model::FieldDescriptor) -> bool {
    match field.data_type {
        DataType::String | DataType::OntologyTerm => true,
        DataType::Boolean => {
            value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
        }
        DataType::Integer => value.parse::<i64>().is_ok(),
        DataType::Double => value.parse::<f64>().is_ok(),
        DataType::Date => chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
        DataType::List => field
            .list_values
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(value)),
    }
}

/// Rule 4011 (table scope): each cell must parse according to its
/// field's declared datatype. Values outside a `List` field's allowed
/// set (compared case-insensitively) warn under 4012.
pub fn check_data_types(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    let Some(config) = ctx.current_config()?.cloned() else {
        return Ok(());
    };
    let table = ctx.current_table()?;
    for col in 0..table.headers.len() {
        let Some(field) = config.field(table.base_header(col)) else {
            continue;
        };
        for (row, value) in table.column_values(col).enumerate() {
            let trimmed = value.trim();
            if trimmed.is_empty() || value_conforms(trimmed, field) {
                continue;
            }
            if field.data_type == DataType::List {
                store.add_warning(
                    codes::LIST_MEMBERSHIP,
                    "A value is outside the allowed value set",
                    format!(
                        "'{}' in row {} of {} is not one of {:?} for '{}'",
                        trimmed,
                        row + 1,
                        table.file_name,
                        field.list_values,
                        field.header
                    ),
                );
            } else {
                store.add_warning(
                    codes::DATATYPE_MISMATCH,
                    "A value does not conform to its declared datatype",
                    format!(
                        "'{}' in row {} of {} does not parse as {:?} for '{}'",
                        trimmed,
                        row + 1,
                        table.file_name,
                        field.data_type,
                        field.header
                    ),
                );
            }
        }
    }
    Ok(())
}

/// What may follow the most recent object-bearing column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderStateMachine {
    Start,
    /// After `Source Name` / `Sample Name` (and after a `Label` resolved
    /// a labeled extract).
    Material,
    /// After `Protocol REF`.
    Protocol,
    /// After `Labeled Extract Name`, before its `Label`.
    LabeledExtract,
    /// Any other fixed header; no qualifier constraint.
    Other,
}

/// Rule 4014 (table scope): headers must belong to the fixed vocabulary
/// or match a bracketed pattern, and qualifier columns must follow the
/// table-shape grammar.
pub fn check_table_headers(ctx: &mut RuleContext<'_>, store: &mut MessageStore) -> Result<()> {
    let table = ctx.current_table()?;
    let mut state = HeaderStateMachine::Start;
    for col in 0..table.headers.len() {
        let header = table.base_header(col);
        let kind = classify_header(header);
        let grammar_error = |store: &mut MessageStore, detail: &str| {
            store.add_error(
                codes::HEADER_GRAMMAR,
                "A column header violates the table grammar",
                format!("column '{}' of {}: {}", table.headers[col], table.file_name, detail),
            );
        };
        match kind {
            HeaderKind::Unknown(_) => {
                store.add_error(
                    codes::HEADER_GRAMMAR,
                    "A column header is not an allowed header",
                    format!("column '{}' of {}", table.headers[col], table.file_name),
                );
                state = HeaderStateMachine::Other;
            }
            HeaderKind::Comment(_) => {
                // Comments are allowed everywhere except directly after a
                // labeled extract still waiting for its Label.
                if state == HeaderStateMachine::LabeledExtract {
                    grammar_error(store, "a Label column must follow Labeled Extract Name");
                    state = HeaderStateMachine::Other;
                }
            }
            HeaderKind::Characteristics(_) | HeaderKind::FactorValue(_) => match state {
                HeaderStateMachine::Protocol => {
                    grammar_error(store, "only parameter values and assay qualifiers may follow Protocol REF");
                }
                HeaderStateMachine::LabeledExtract => {
                    grammar_error(store, "a Label column must follow Labeled Extract Name");
                    state = HeaderStateMachine::Other;
                }
                _ => {}
            },
            HeaderKind::ParameterValue(_) => match state {
                HeaderStateMachine::Material => {
                    grammar_error(store, "parameter values may not qualify a material column");
                }
                HeaderStateMachine::LabeledExtract => {
                    grammar_error(store, "a Label column must follow Labeled Extract Name");
                    state = HeaderStateMachine::Other;
                }
                _ => {}
            },
            HeaderKind::Fixed(name) => match name {
                "Source Name" | "Sample Name" => state = HeaderStateMachine::Material,
                "Protocol REF" => state = HeaderStateMachine::Protocol,
                "Labeled Extract Name" => state = HeaderStateMachine::LabeledExtract,
                "Label" => {
                    if state != HeaderStateMachine::LabeledExtract {
                        grammar_error(store, "Label may only qualify a Labeled Extract Name");
                    }
                    state = HeaderStateMachine::Material;
                }
                "Unit" | "Term Source REF" | "Term Accession Number" => {
                    if state == HeaderStateMachine::LabeledExtract {
                        grammar_error(store, "a Label column must follow Labeled Extract Name");
                        state = HeaderStateMachine::Other;
                    }
                }
                _ => state = HeaderStateMachine::Other,
            },
        }
    }
    Ok(())
}
