pub mod config;
pub mod headers;
pub mod report;
pub mod table;

pub use config::{
    ConfigKey, ConfigMap, DataType, FieldDescriptor, INVESTIGATION_MEASUREMENT,
    ProtocolFieldDescriptor, SAMPLE_MEASUREMENT, TableConfig, config_key, investigation_key,
    sample_key,
};
pub use headers::{HeaderKind, STUDY_GROUP_COMMENT, classify_header, strip_duplicate_suffix};
pub use report::{Message, Severity, ValidationReport};
pub use table::Table;
