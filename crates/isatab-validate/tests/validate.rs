use std::fs;
use std::path::{Path, PathBuf};

use isatab_validate::{RuleSelector, ScopeRules, ValidateOptions, codes, validate, validate_with_options};

const INVESTIGATION: &str = "\
ONTOLOGY SOURCE REFERENCE
Term Source Name\tOBI\tUO
Term Source File\t\t
Term Source Version\t\t
Term Source Description\tBiomedical investigations\tUnits
INVESTIGATION
Investigation Identifier\tI1
Investigation Title\tMinimal investigation
Investigation Description\t
Investigation Submission Date\t2024-01-10
Investigation Public Release Date\t2024-02-01
INVESTIGATION PUBLICATIONS
Investigation PubMed ID\t
Investigation Publication DOI\t
Investigation Publication Author List\t
Investigation Publication Title\t
Investigation Publication Status\t
Investigation Publication Status Term Accession Number\t
Investigation Publication Status Term Source REF\t
INVESTIGATION CONTACTS
Investigation Person Last Name\tDoe
Investigation Person First Name\tJane
Investigation Person Mid Initials\t
Investigation Person Email\t
Investigation Person Phone\t
Investigation Person Fax\t
Investigation Person Address\t
Investigation Person Affiliation\t
Investigation Person Roles\t
Investigation Person Roles Term Accession Number\t
Investigation Person Roles Term Source REF\t
STUDY
Study Identifier\tS1
Study Title\tStudy one
Study Description\t
Study Submission Date\t2024-01-10
Study Public Release Date\t2024-02-01
Study File Name\ts_study1.txt
Comment[Number of Study Groups]\t2
STUDY DESIGN DESCRIPTORS
Study Design Type\tintervention design
Study Design Type Term Accession Number\t
Study Design Type Term Source REF\t
STUDY PUBLICATIONS
Study PubMed ID\t
Study Publication DOI\t
Study Publication Author List\t
Study Publication Title\t
Study Publication Status\t
Study Publication Status Term Accession Number\t
Study Publication Status Term Source REF\t
STUDY FACTORS
Study Factor Name\tGrowth Temperature
Study Factor Type\ttemperature
Study Factor Type Term Accession Number\t
Study Factor Type Term Source REF\t
STUDY ASSAYS
Study Assay Measurement Type\tmetabolite profiling
Study Assay Measurement Type Term Accession Number\t
Study Assay Measurement Type Term Source REF\t
Study Assay Technology Type\tmass spectrometry
Study Assay Technology Type Term Accession Number\t
Study Assay Technology Type Term Source REF\t
Study Assay Technology Platform\t
Study Assay File Name\ta_assay1.txt
STUDY PROTOCOLS
Study Protocol Name\tsample collection\textraction
Study Protocol Type\tsample collection\textraction
Study Protocol Type Term Accession Number\t\t
Study Protocol Type Term Source REF\t\t
Study Protocol Description\t\t
Study Protocol URI\t\t
Study Protocol Version\t\t
Study Protocol Parameters Name\t\t
Study Protocol Parameters Name Term Accession Number\t\t
Study Protocol Parameters Name Term Source REF\t\t
Study Protocol Components Name\t\t
Study Protocol Components Type\t\t
Study Protocol Components Type Term Accession Number\t\t
Study Protocol Components Type Term Source REF\t\t
STUDY CONTACTS
Study Person Last Name\tDoe
Study Person First Name\tJane
Study Person Mid Initials\t
Study Person Email\t
Study Person Phone\t
Study Person Fax\t
Study Person Address\t
Study Person Affiliation\t
Study Person Roles\t
Study Person Roles Term Accession Number\t
Study Person Roles Term Source REF\t
";

const STUDY_TABLE: &str = "\
Source Name\tCharacteristics[Organism]\tTerm Source REF\tTerm Accession Number\tProtocol REF\tSample Name\tFactor Value[Growth Temperature]\tUnit
src1\tMus musculus\tOBI\tOBI:0100026\tsample collection\ts1\t30\tdegree Celsius
src2\tMus musculus\tOBI\tOBI:0100026\tsample collection\ts2\t42\tdegree Celsius
";

const ASSAY_TABLE: &str = "\
Sample Name\tProtocol REF\tMS Assay Name\tRaw Spectral Data File
s1\textraction\tassay1\tf1.mzML
s2\textraction\tassay2\tf2.mzML
";

const INVESTIGATION_XML: &str = r#"<isatab-configuration table-name="investigation">
  <measurement term-label="[investigation]"/>
  <technology term-label=""/>
  <field header="Investigation Identifier" data-type="String" is-required="true"/>
  <field header="Study Identifier" data-type="String" is-required="true"/>
</isatab-configuration>
"#;

const STUDY_SAMPLE_XML: &str = r#"<isatab-configuration table-name="studySample">
  <measurement term-label="[sample]"/>
  <technology term-label=""/>
  <field header="Source Name" data-type="String" is-required="true"/>
  <field header="Characteristics[Organism]" data-type="Ontology term"/>
  <protocol-field protocol-type="sample collection"/>
  <field header="Sample Name" data-type="String" is-required="true"/>
</isatab-configuration>
"#;

const MS_XML: &str = r#"<isatab-configuration table-name="ms">
  <measurement term-label="metabolite profiling"/>
  <technology term-label="mass spectrometry"/>
  <field header="Sample Name" data-type="String" is-required="true"/>
  <protocol-field protocol-type="extraction"/>
  <field header="MS Assay Name" data-type="String"/>
  <field header="Raw Spectral Data File" data-type="String"/>
</isatab-configuration>
"#;

struct Fixture {
    _dir: tempfile::TempDir,
    investigation: PathBuf,
    configs: PathBuf,
    data_dir: PathBuf,
}

fn fixture() -> Fixture {
    fixture_with(INVESTIGATION, STUDY_TABLE, ASSAY_TABLE)
}

fn fixture_with(investigation: &str, study: &str, assay: &str) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().to_path_buf();
    let investigation_path = data_dir.join("i_investigation.txt");
    fs::write(&investigation_path, investigation).expect("write investigation");
    fs::write(data_dir.join("s_study1.txt"), study).expect("write study table");
    fs::write(data_dir.join("a_assay1.txt"), assay).expect("write assay table");

    let configs = data_dir.join("configs");
    fs::create_dir(&configs).expect("create config dir");
    fs::write(configs.join("investigation.xml"), INVESTIGATION_XML).expect("write config");
    fs::write(configs.join("studySample.xml"), STUDY_SAMPLE_XML).expect("write config");
    fs::write(configs.join("ms.xml"), MS_XML).expect("write config");

    Fixture {
        _dir: dir,
        investigation: investigation_path,
        configs,
        data_dir,
    }
}

fn codes_of(messages: &[isatab_validate::Message]) -> Vec<i32> {
    messages.iter().map(|m| m.code).collect()
}

#[test]
fn clean_bundle_has_no_errors() {
    let fx = fixture();
    let report = validate(&fx.investigation, &fx.configs);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert!(report.validation_finished);
    // One group count per validated table: the study table and the assay.
    let counts: Vec<&str> = report
        .with_code(codes::STUDY_GROUPS_FOUND)
        .map(|m| m.message.as_str())
        .collect();
    assert_eq!(counts.len(), 2, "{counts:?}");
    assert!(counts[0].contains("Found 2 study groups in s_study1.txt"), "{counts:?}");
}

#[test]
fn missing_study_file_is_an_error() {
    let fx = fixture();
    fs::remove_file(fx.data_dir.join("s_study1.txt")).expect("remove study table");
    let report = validate(&fx.investigation, &fx.configs);
    assert!(
        codes_of(&report.errors).contains(&codes::STUDY_FILE_NOT_READ),
        "{:?}",
        report.errors
    );
    // The run still finishes; the study-table rules are skipped but the
    // study's assays are still validated.
    assert!(report.validation_finished);
}

#[test]
fn assay_rules_run_when_study_file_is_missing() {
    let assay = ASSAY_TABLE.replace("MS Assay Name", "Bogus Header");
    let fx = fixture_with(INVESTIGATION, STUDY_TABLE, &assay);
    fs::remove_file(fx.data_dir.join("s_study1.txt")).expect("remove study table");
    let report = validate(&fx.investigation, &fx.configs);
    let errors = codes_of(&report.errors);
    assert!(errors.contains(&codes::STUDY_FILE_NOT_READ), "{:?}", report.errors);
    assert!(errors.contains(&codes::HEADER_GRAMMAR), "{:?}", report.errors);
    assert!(report.validation_finished);
}

#[test]
fn missing_assay_file_is_an_error() {
    let fx = fixture();
    fs::remove_file(fx.data_dir.join("a_assay1.txt")).expect("remove assay table");
    let report = validate(&fx.investigation, &fx.configs);
    assert!(
        codes_of(&report.errors).contains(&codes::ASSAY_FILE_NOT_READ),
        "{:?}",
        report.errors
    );
}

#[test]
fn undeclared_protocol_warns() {
    let assay = ASSAY_TABLE.replace("extraction", "fractionation");
    let fx = fixture_with(INVESTIGATION, STUDY_TABLE, &assay);
    let report = validate(&fx.investigation, &fx.configs);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert!(
        codes_of(&report.warnings).contains(&codes::PROTOCOL_NOT_DECLARED),
        "{:?}",
        report.warnings
    );
}

#[test]
fn study_group_mismatch_warns_once() {
    let investigation =
        INVESTIGATION.replace("Comment[Number of Study Groups]\t2", "Comment[Number of Study Groups]\t3");
    let fx = fixture_with(&investigation, STUDY_TABLE, ASSAY_TABLE);
    let report = validate(&fx.investigation, &fx.configs);
    let mismatches: Vec<_> = report.with_code(codes::STUDY_GROUPS_MISMATCH).collect();
    assert_eq!(mismatches.len(), 1, "{mismatches:?}");
    assert!(mismatches[0].supplemental.contains("3 declared"), "{mismatches:?}");
}

#[test]
fn malformed_date_warns() {
    let investigation =
        INVESTIGATION.replace("Study Submission Date\t2024-01-10", "Study Submission Date\t10/01/2024");
    let fx = fixture_with(&investigation, STUDY_TABLE, ASSAY_TABLE);
    let report = validate(&fx.investigation, &fx.configs);
    assert!(
        codes_of(&report.warnings).contains(&codes::DATE_FORMAT),
        "{:?}",
        report.warnings
    );
}

#[test]
fn unknown_header_is_a_grammar_error() {
    let study = STUDY_TABLE.replace("Factor Value[Growth Temperature]", "Growth Temp");
    let fx = fixture_with(INVESTIGATION, &study, ASSAY_TABLE);
    let report = validate(&fx.investigation, &fx.configs);
    assert!(
        codes_of(&report.errors).contains(&codes::HEADER_GRAMMAR),
        "{:?}",
        report.errors
    );
    // The factor is now declared but never used.
    assert!(
        codes_of(&report.warnings).contains(&codes::FACTOR_USAGE),
        "{:?}",
        report.warnings
    );
}

#[test]
fn undeclared_term_source_warns() {
    let study = STUDY_TABLE.replace("\tOBI\t", "\tNCBITaxon\t");
    let fx = fixture_with(INVESTIGATION, &study, ASSAY_TABLE);
    let report = validate(&fx.investigation, &fx.configs);
    assert!(
        codes_of(&report.warnings).contains(&codes::ONTOLOGY_FIELDS),
        "{:?}",
        report.warnings
    );
}

#[test]
fn missing_configuration_pair_is_an_error() {
    let fx = fixture();
    fs::remove_file(fx.configs.join("ms.xml")).expect("remove ms config");
    let report = validate(&fx.investigation, &fx.configs);
    assert!(
        codes_of(&report.errors).contains(&codes::CONFIG_NOT_FOUND),
        "{:?}",
        report.errors
    );
}

#[test]
fn unreadable_config_dir_is_an_error() {
    let fx = fixture();
    let report = validate(&fx.investigation, &fx.configs.join("missing"));
    assert!(
        codes_of(&report.errors).contains(&codes::CONFIG_LOAD),
        "{:?}",
        report.errors
    );
}

#[test]
fn unparseable_investigation_aborts_the_run() {
    let fx = fixture();
    let report = validate(&fx.investigation.with_file_name("absent.txt"), &fx.configs);
    assert!(!report.validation_finished);
    assert!(codes_of(&report.errors).contains(&codes::UNKNOWN), "{:?}", report.errors);
}

#[test]
fn unknown_selector_reports_and_marks_unfinished() {
    let fx = fixture();
    let options = ValidateOptions {
        rules: isatab_validate::RuleOverrides {
            investigation: ScopeRules {
                available_rules: None,
                rules_to_run: Some(vec![RuleSelector::from("9999")]),
            },
            ..Default::default()
        },
        ..Default::default()
    };
    let report = validate_with_options(&fx.investigation, &fx.configs, &options);
    assert!(!report.validation_finished);
    assert!(codes_of(&report.errors).contains(&codes::UNKNOWN), "{:?}", report.errors);
}

#[test]
fn explicit_data_dir_is_used() {
    let fx = fixture();
    let elsewhere = tempfile::tempdir().expect("tempdir");
    for file in ["s_study1.txt", "a_assay1.txt"] {
        fs::rename(fx.data_dir.join(file), elsewhere.path().join(file)).expect("move table");
    }
    let options = ValidateOptions {
        data_dir: Some(elsewhere.path().to_path_buf()),
        ..Default::default()
    };
    let report = validate_with_options(&fx.investigation, &fx.configs, &options);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
}

#[test]
fn repeated_runs_are_deterministic() {
    let fx = fixture();
    let assay = ASSAY_TABLE.replace("s2", "s9");
    fs::write(fx.data_dir.join("a_assay1.txt"), assay).expect("rewrite assay table");
    let first = validate(&fx.investigation, &fx.configs);
    let second = validate(&fx.investigation, &fx.configs);
    assert_eq!(first, second);
    assert!(
        codes_of(&first.warnings).contains(&codes::SAMPLE_NOT_DECLARED),
        "{:?}",
        first.warnings
    );
}

#[test]
fn report_serializes_to_json() {
    let fx = fixture();
    let report = validate(&fx.investigation, &fx.configs);
    let json = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(json["validation_finished"], serde_json::Value::Bool(true));
    assert!(json["info"].as_array().is_some_and(|info| !info.is_empty()));
}

#[test]
fn duplicate_factor_declaration_warns() {
    let investigation = INVESTIGATION.replace(
        "Study Factor Name\tGrowth Temperature",
        "Study Factor Name\tGrowth Temperature\tGrowth Temperature",
    );
    // Keep the factor rows rectangular.
    let investigation = investigation
        .replace("Study Factor Type\ttemperature", "Study Factor Type\ttemperature\ttemperature")
        .replace(
            "Study Factor Type Term Accession Number\t\nStudy Factor Type Term Source REF\t\n",
            "Study Factor Type Term Accession Number\t\t\nStudy Factor Type Term Source REF\t\t\n",
        );
    let fx = fixture_with(&investigation, STUDY_TABLE, ASSAY_TABLE);
    let report = validate(&fx.investigation, &fx.configs);
    assert!(
        codes_of(&report.warnings).contains(&codes::FACTOR_NAMES),
        "{:?}",
        report.warnings
    );
}

#[test]
fn unknown_measurement_pair_names_both_types() {
    let investigation = INVESTIGATION
        .replace(
            "Study Assay Measurement Type\tmetabolite profiling",
            "Study Assay Measurement Type\tproteomics",
        )
        .replace(
            "Study Assay Technology Type\tmass spectrometry",
            "Study Assay Technology Type\tflux-capacitor",
        );
    let fx = fixture_with(&investigation, STUDY_TABLE, ASSAY_TABLE);
    let report = validate(&fx.investigation, &fx.configs);
    let errors: Vec<_> = report
        .errors
        .iter()
        .filter(|m| m.code == codes::CONFIG_NOT_FOUND)
        .collect();
    assert_eq!(errors.len(), 1, "{:?}", report.errors);
    assert!(errors[0].supplemental.contains("proteomics"), "{:?}", errors[0]);
    assert!(errors[0].supplemental.contains("flux-capacitor"), "{:?}", errors[0]);
}

#[test]
fn list_value_outside_allowed_set_warns() {
    let ms_with_list = r#"<isatab-configuration table-name="ms">
  <measurement term-label="metabolite profiling"/>
  <technology term-label="mass spectrometry"/>
  <field header="Sample Name" data-type="String" is-required="true"/>
  <protocol-field protocol-type="extraction"/>
  <field header="Parameter Value[Scan polarity]" data-type="List">
    <list-values>positive,negative</list-values>
  </field>
  <field header="MS Assay Name" data-type="String"/>
  <field header="Raw Spectral Data File" data-type="String"/>
</isatab-configuration>
"#;
    let investigation = INVESTIGATION.replace(
        "Study Protocol Parameters Name\t\t",
        "Study Protocol Parameters Name\t\tScan polarity",
    );
    let assay = "Sample Name\tProtocol REF\tParameter Value[Scan polarity]\tMS Assay Name\tRaw Spectral Data File\n\
                 s1\textraction\tpositive\tassay1\tf1.mzML\n\
                 s2\textraction\tsideways\tassay2\tf2.mzML\n";
    let fx = fixture_with(&investigation, STUDY_TABLE, assay);
    fs::write(fx.configs.join("ms.xml"), ms_with_list).expect("rewrite ms config");
    let report = validate(&fx.investigation, &fx.configs);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    let violations: Vec<_> = report.with_code(codes::LIST_MEMBERSHIP).collect();
    assert_eq!(violations.len(), 1, "{:?}", report.warnings);
    assert!(violations[0].supplemental.contains("sideways"), "{:?}", violations[0]);
}

#[test]
fn missing_required_column_warns() {
    let assay = "Protocol REF\tMS Assay Name\tRaw Spectral Data File\n\
                 extraction\tassay1\tf1.mzML\n\
                 extraction\tassay2\tf2.mzML\n";
    let fx = fixture_with(INVESTIGATION, STUDY_TABLE, assay);
    let report = validate(&fx.investigation, &fx.configs);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    let missing: Vec<_> = report.with_code(codes::REQUIRED_COLUMN_MISSING).collect();
    assert_eq!(missing.len(), 1, "{:?}", report.warnings);
    assert!(missing[0].supplemental.contains("Sample Name"), "{:?}", missing[0]);
    assert!(missing[0].supplemental.contains("a_assay1.txt"), "{:?}", missing[0]);
}

#[test]
fn non_integer_value_warns() {
    let ms_with_integer = r#"<isatab-configuration table-name="ms">
  <measurement term-label="metabolite profiling"/>
  <technology term-label="mass spectrometry"/>
  <field header="Sample Name" data-type="String" is-required="true"/>
  <protocol-field protocol-type="extraction"/>
  <field header="Parameter Value[Number of scans]" data-type="Integer"/>
  <field header="MS Assay Name" data-type="String"/>
  <field header="Raw Spectral Data File" data-type="String"/>
</isatab-configuration>
"#;
    let investigation = INVESTIGATION.replace(
        "Study Protocol Parameters Name\t\t",
        "Study Protocol Parameters Name\t\tNumber of scans",
    );
    let assay = "Sample Name\tProtocol REF\tParameter Value[Number of scans]\tMS Assay Name\tRaw Spectral Data File\n\
                 s1\textraction\t128\tassay1\tf1.mzML\n\
                 s2\textraction\tabc\tassay2\tf2.mzML\n";
    let fx = fixture_with(&investigation, STUDY_TABLE, assay);
    fs::write(fx.configs.join("ms.xml"), ms_with_integer).expect("rewrite ms config");
    let report = validate(&fx.investigation, &fx.configs);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    let mismatches: Vec<_> = report.with_code(codes::DATATYPE_MISMATCH).collect();
    assert_eq!(mismatches.len(), 1, "{:?}", report.warnings);
    assert!(mismatches[0].supplemental.contains("'abc'"), "{:?}", mismatches[0]);
}

#[test]
fn data_dir_defaults_to_investigation_directory() {
    let fx = fixture();
    let report = validate(&fx.investigation, &fx.configs);
    let from_parent = validate_with_options(
        &fx.investigation,
        &fx.configs,
        &ValidateOptions {
            data_dir: Some(Path::new(&fx.data_dir).to_path_buf()),
            ..Default::default()
        },
    );
    assert_eq!(report, from_parent);
}
