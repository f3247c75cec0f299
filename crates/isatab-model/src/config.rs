//! Configuration value objects describing one table schema per
//! (measurement-type, technology-type) pair.
//!
//! Configurations originate from XML but are consumed here as pre-parsed
//! values; the validator never sees raw XML.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::headers::strip_duplicate_suffix;

/// Measurement type of the distinguished investigation configuration.
pub const INVESTIGATION_MEASUREMENT: &str = "[investigation]";
/// Measurement type of the study-sample table configuration.
pub const SAMPLE_MEASUREMENT: &str = "[sample]";

/// Configurations are keyed by the lower-cased measurement and technology
/// types.
pub type ConfigKey = (String, String);

pub type ConfigMap = BTreeMap<ConfigKey, TableConfig>;

pub fn config_key(measurement_type: &str, technology_type: &str) -> ConfigKey {
    (
        measurement_type.trim().to_lowercase(),
        technology_type.trim().to_lowercase(),
    )
}

pub fn investigation_key() -> ConfigKey {
    config_key(INVESTIGATION_MEASUREMENT, "")
}

pub fn sample_key() -> ConfigKey {
    config_key(SAMPLE_MEASUREMENT, "")
}

/// Declared datatype of a configured field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataType {
    #[default]
    String,
    Boolean,
    Integer,
    Double,
    Date,
    List,
    OntologyTerm,
}

impl DataType {
    /// Parse the `data-type` attribute of an isaconfig field element.
    /// Unrecognized labels fall back to `String` (no lexical constraint).
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "boolean" => Self::Boolean,
            "integer" => Self::Integer,
            "double" => Self::Double,
            "date" => Self::Date,
            "list" => Self::List,
            "ontology term" | "ontology-term" => Self::OntologyTerm,
            _ => Self::String,
        }
    }
}

/// One configured column: header, datatype, required flag, allowed values
/// for `List` fields, and the lexical position among all schema entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub header: String,
    pub data_type: DataType,
    pub is_required: bool,
    pub list_values: Vec<String>,
    pub pos: usize,
}

/// An expected `Protocol REF` column of a given protocol type, positioned
/// among the field descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolFieldDescriptor {
    pub protocol_type: String,
    pub pos: usize,
}

/// Schema for one (measurement-type, technology-type) table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub measurement_type: String,
    pub technology_type: String,
    pub fields: Vec<FieldDescriptor>,
    pub protocols: Vec<ProtocolFieldDescriptor>,
}

impl TableConfig {
    pub fn key(&self) -> ConfigKey {
        config_key(&self.measurement_type, &self.technology_type)
    }

    /// Look up the field for a column header, ignoring duplicate suffixes.
    pub fn field(&self, header: &str) -> Option<&FieldDescriptor> {
        let base = strip_duplicate_suffix(header);
        self.fields.iter().find(|field| field.header == base)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.is_required)
    }

    /// Protocol fields expected strictly between two schema positions.
    pub fn protocols_between(
        &self,
        start: usize,
        end: usize,
    ) -> impl Iterator<Item = &ProtocolFieldDescriptor> {
        self.protocols
            .iter()
            .filter(move |protocol| protocol.pos > start && protocol.pos < end)
    }
}
