//! Column-header vocabulary and bracketed-pattern parsing for ISA-Tab tables.
//!
//! Study and assay tables are header-driven: a column is either one of a
//! fixed, case-sensitive vocabulary or a bracketed pattern such as
//! `Characteristics[<name>]`. Repeated headers are disambiguated by the
//! reader with a trailing `.<n>` index, which all matching here ignores.

/// The fixed allowed material, data, and qualifier headers.
pub const FIXED_HEADERS: &[&str] = &[
    "Source Name",
    "Sample Name",
    "Term Source REF",
    "Protocol REF",
    "Term Accession Number",
    "Unit",
    "Assay Name",
    "Extract Name",
    "Raw Data File",
    "Material Type",
    "MS Assay Name",
    "NMR Assay Name",
    "Raw Spectral Data File",
    "Labeled Extract Name",
    "Label",
    "Hybridization Assay Name",
    "Array Design REF",
    "Scan Name",
    "Array Data File",
    "Protein Assignment File",
    "Peptide Assignment File",
    "Post Translational Modification Assignment File",
    "Data Transformation Name",
    "Derived Data File",
    "Derived Spectral Data File",
    "Normalization Name",
    "Derived Array Data File",
    "Image File",
    "Free Induction Decay Data File",
    "Metabolite Assignment File",
    "Performer",
    "Date",
    "Array Data Matrix File",
    "Free Induction Decay File",
    "Derived Array Data Matrix File",
    "Acquisition Parameter Data File",
];

/// Comment column on a STUDY row declaring the expected study-group count.
pub const STUDY_GROUP_COMMENT: &str = "Comment[Number of Study Groups]";

/// Classification of a single (base) column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind<'a> {
    /// One of [`FIXED_HEADERS`].
    Fixed(&'a str),
    Characteristics(&'a str),
    ParameterValue(&'a str),
    FactorValue(&'a str),
    Comment(&'a str),
    /// Anything else; rejected by the header-grammar rule.
    Unknown(&'a str),
}

/// Strip the `.<n>` index appended to repeated headers, if present.
pub fn strip_duplicate_suffix(header: &str) -> &str {
    if let Some((base, suffix)) = header.rsplit_once('.')
        && !suffix.is_empty()
        && suffix.bytes().all(|b| b.is_ascii_digit())
    {
        return base;
    }
    header
}

/// Extract `<name>` from `<prefix>[<name>]`, requiring a non-empty name.
pub fn bracketed_name<'a>(header: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = header.strip_prefix(prefix)?;
    let name = rest.strip_prefix('[')?.strip_suffix(']')?;
    if name.trim().is_empty() { None } else { Some(name) }
}

/// Classify a base header (duplicate suffix already stripped).
pub fn classify_header(header: &str) -> HeaderKind<'_> {
    if FIXED_HEADERS.contains(&header) {
        return HeaderKind::Fixed(header);
    }
    if let Some(name) = bracketed_name(header, "Characteristics") {
        return HeaderKind::Characteristics(name);
    }
    if let Some(name) = bracketed_name(header, "Parameter Value") {
        return HeaderKind::ParameterValue(name);
    }
    if let Some(name) = bracketed_name(header, "Factor Value") {
        return HeaderKind::FactorValue(name);
    }
    if let Some(name) = bracketed_name(header, "Comment") {
        return HeaderKind::Comment(name);
    }
    HeaderKind::Unknown(header)
}

/// True for `Comment[<name>]` with a non-empty name.
pub fn is_comment(header: &str) -> bool {
    matches!(classify_header(header), HeaderKind::Comment(_))
}

/// True for columns that carry a value a `Unit` column may qualify.
pub fn is_value_bearing(header: &str) -> bool {
    matches!(
        classify_header(header),
        HeaderKind::Characteristics(_) | HeaderKind::ParameterValue(_) | HeaderKind::FactorValue(_)
    )
}

/// Ontology-term and unit qualifier columns attached to a preceding value.
pub fn is_term_qualifier(header: &str) -> bool {
    matches!(header, "Unit" | "Term Source REF" | "Term Accession Number")
}

/// Material and data-file columns; the object-bearing backbone of a table.
pub fn is_material_or_data(header: &str) -> bool {
    match classify_header(header) {
        HeaderKind::Fixed(name) => {
            name.ends_with(" Name") || name.ends_with(" File") || name == "Array Design REF"
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{HeaderKind, classify_header, is_material_or_data, strip_duplicate_suffix};

    #[test]
    fn strips_only_numeric_suffixes() {
        assert_eq!(strip_duplicate_suffix("Protocol REF.1"), "Protocol REF");
        assert_eq!(strip_duplicate_suffix("Protocol REF.12"), "Protocol REF");
        assert_eq!(strip_duplicate_suffix("Protocol REF"), "Protocol REF");
        assert_eq!(strip_duplicate_suffix("file.txt"), "file.txt");
    }

    #[test]
    fn classifies_bracketed_headers() {
        assert_eq!(
            classify_header("Factor Value[Dose]"),
            HeaderKind::FactorValue("Dose")
        );
        assert_eq!(
            classify_header("Characteristics[Organism]"),
            HeaderKind::Characteristics("Organism")
        );
        assert_eq!(
            classify_header("Comment[note]"),
            HeaderKind::Comment("note")
        );
        // Empty names are not valid bracketed headers.
        assert_eq!(
            classify_header("Factor Value[]"),
            HeaderKind::Unknown("Factor Value[]")
        );
    }

    #[test]
    fn fixed_vocabulary_is_case_sensitive() {
        assert_eq!(classify_header("Sample Name"), HeaderKind::Fixed("Sample Name"));
        assert_eq!(classify_header("sample name"), HeaderKind::Unknown("sample name"));
    }

    #[test]
    fn material_and_data_columns() {
        assert!(is_material_or_data("Source Name"));
        assert!(is_material_or_data("Raw Spectral Data File"));
        assert!(!is_material_or_data("Unit"));
        assert!(!is_material_or_data("Protocol REF"));
    }
}
