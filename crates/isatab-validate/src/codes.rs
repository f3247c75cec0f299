//! The stable message-code catalogue. Codes are API: callers may filter
//! on them, and no built-in rule emits a code outside this set.

/// Unknown or system error (rule failure, unresolvable selector, parse
/// failure of the investigation file).
pub const UNKNOWN: i32 = 0;
/// Section-label mismatch in the investigation file.
pub const SECTION_LABELS: i32 = 5;
/// A declared study file could not be read.
pub const STUDY_FILE_NOT_READ: i32 = 6;
/// A declared assay file could not be read.
pub const ASSAY_FILE_NOT_READ: i32 = 8;

/// Sample used in an assay table but not declared in the study-sample table.
pub const SAMPLE_NOT_DECLARED: i32 = 1003;
/// Protocol referenced but not declared (or expected and not found).
pub const PROTOCOL_NOT_DECLARED: i32 = 1007;
/// Factor used but not declared, or declared but never used.
pub const FACTOR_USAGE: i32 = 1008;
/// Protocol parameter used but not declared.
pub const PARAMETER_NOT_DECLARED: i32 = 1009;
/// Protocol names not unique or empty within a study.
pub const PROTOCOL_NAMES: i32 = 1010;
/// Protocol-parameter names not unique or empty within a protocol.
pub const PARAMETER_NAMES: i32 = 1011;
/// Factor names not unique or empty within a study.
pub const FACTOR_NAMES: i32 = 1012;
/// A `Unit` column does not follow a value-bearing column.
pub const UNIT_PLACEMENT: i32 = 1099;

/// Date value is not an ISO-8601 date.
pub const DATE_FORMAT: i32 = 3001;
/// Publication DOI does not match the DOI lexical form.
pub const DOI_FORMAT: i32 = 3002;
/// PubMed ID is not a positive integer.
pub const PUBMED_FORMAT: i32 = 3003;
/// Duplicate declared ontology-source names.
pub const TERM_SOURCE_DUPLICATE: i32 = 3008;
/// Term Source REF / Term Accession Number inconsistency.
pub const ONTOLOGY_FIELDS: i32 = 3010;

/// The configuration directory could not be loaded.
pub const CONFIG_LOAD: i32 = 4001;
/// No configuration for a declared (measurement, technology) pair.
pub const CONFIG_NOT_FOUND: i32 = 4002;
/// A required field has an empty value.
pub const REQUIRED_VALUE_MISSING: i32 = 4003;
/// A `Factor Value[...]` column has an empty value.
pub const FACTOR_VALUE_MISSING: i32 = 4007;
/// A `Protocol REF` column appears after the last material/data column.
pub const PROTOCOL_REF_PLACEMENT: i32 = 4009;
/// A required column is missing from a study or assay table.
pub const REQUIRED_COLUMN_MISSING: i32 = 4010;
/// A cell does not parse according to the field's declared datatype.
pub const DATATYPE_MISMATCH: i32 = 4011;
/// A cell under a list-typed field is outside the allowed value set.
pub const LIST_MEMBERSHIP: i32 = 4012;
/// A required investigation field is absent from every section.
pub const REQUIRED_SECTION_FIELD_MISSING: i32 = 4013;
/// Column header outside the allowed vocabulary, or table-shape grammar
/// violation.
pub const HEADER_GRAMMAR: i32 = 4014;

/// Informational study-group count.
pub const STUDY_GROUPS_FOUND: i32 = 5001;
/// Declared study-group count does not match the computed count.
pub const STUDY_GROUPS_MISMATCH: i32 = 5002;
