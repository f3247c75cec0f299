use std::fs;

use isatab_config::{ConfigError, load_config_dir};
use isatab_model::{DataType, config_key, sample_key};

const STUDY_SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<isatab-config-file xmlns="http://www.ebi.ac.uk/bii/isatab_configuration#">
  <isatab-configuration table-name="studySample">
    <measurement term-label="[sample]"/>
    <technology term-label=""/>
    <field header="Source Name" data-type="String" is-required="true"/>
    <field header="Characteristics[Organism]" data-type="Ontology term" is-required="false"/>
    <protocol-field protocol-type="sample collection"/>
    <field header="Sample Name" data-type="String" is-required="true"/>
    <structured-field name="factors"/>
  </isatab-configuration>
</isatab-config-file>
"#;

const ASSAY_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<isatab-config-file xmlns="http://www.ebi.ac.uk/bii/isatab_configuration#">
  <isatab-configuration table-name="ms">
    <measurement term-label="Metabolite Profiling"/>
    <technology term-label="Mass Spectrometry"/>
    <field header="Sample Name" data-type="String" is-required="true"/>
    <protocol-field protocol-type="extraction"/>
    <field header="MS Assay Name" data-type="String" is-required="true"/>
    <field header="Parameter Value[Scan polarity]" data-type="List" is-required="false">
      <list-values>positive,negative</list-values>
    </field>
    <field header="Raw Spectral Data File" data-type="String" is-required="false"/>
  </isatab-configuration>
</isatab-config-file>
"#;

#[test]
fn loads_directory_keyed_by_lowered_types() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("studySample.xml"), STUDY_SAMPLE_XML).expect("write");
    fs::write(dir.path().join("ms.xml"), ASSAY_XML).expect("write");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

    let configs = load_config_dir(dir.path()).expect("load configs");
    assert_eq!(configs.len(), 2);

    let sample = configs.get(&sample_key()).expect("sample config");
    assert_eq!(sample.fields.len(), 3);
    assert_eq!(sample.protocols.len(), 1);
    // Lexical positions interleave fields, protocol fields and structured fields.
    assert_eq!(sample.fields[0].pos, 0);
    assert_eq!(sample.protocols[0].pos, 2);
    assert_eq!(sample.fields[2].pos, 3);
    assert!(sample.field("Sample Name").expect("field").is_required);
    assert_eq!(
        sample.field("Characteristics[Organism]").expect("field").data_type,
        DataType::OntologyTerm
    );

    let assay = configs
        .get(&config_key("metabolite profiling", "mass spectrometry"))
        .expect("assay config");
    let polarity = assay.field("Parameter Value[Scan polarity]").expect("field");
    assert_eq!(polarity.data_type, DataType::List);
    assert_eq!(polarity.list_values, vec!["positive", "negative"]);
}

#[test]
fn file_without_configuration_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("bad.xml"), "<isatab-config-file/>").expect("write");
    match load_config_dir(dir.path()) {
        Err(ConfigError::NoConfiguration { .. }) => {}
        other => panic!("expected NoConfiguration, got {other:?}"),
    }
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = load_config_dir(&dir.path().join("absent"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}
