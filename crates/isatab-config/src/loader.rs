//! isaconfig XML parsing.
//!
//! Each configuration file carries one `<isatab-configuration>` element
//! whose `<measurement>`/`<technology>` children key the configuration
//! and whose `<field>`, `<protocol-field>`, `<unit-field>` and
//! `<structured-field>` children describe the table schema in lexical
//! order. Only fields and protocol fields are materialized; the other
//! entries still occupy a schema position.

use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use isatab_model::{ConfigMap, DataType, FieldDescriptor, ProtocolFieldDescriptor, TableConfig};

use crate::error::{ConfigError, Result};

fn attribute(start: &BytesStart<'_>, name: &[u8], path: &Path) -> Result<Option<String>> {
    for attr in start.attributes() {
        let attr = attr.map_err(|error| ConfigError::xml(path, error))?;
        if attr.key.local_name().as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|error| ConfigError::xml(path, error))?;
            return Ok(Some(value.trim().to_string()));
        }
    }
    Ok(None)
}

fn required_attribute(start: &BytesStart<'_>, name: &str, path: &Path) -> Result<String> {
    attribute(start, name.as_bytes(), path)?.ok_or_else(|| ConfigError::MissingAttribute {
        path: path.to_path_buf(),
        element: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        attribute: name.to_string(),
    })
}

#[derive(Default)]
struct ConfigBuilder {
    measurement_type: String,
    technology_type: String,
    fields: Vec<FieldDescriptor>,
    protocols: Vec<ProtocolFieldDescriptor>,
    pos: usize,
}

impl ConfigBuilder {
    fn next_pos(&mut self) -> usize {
        let pos = self.pos;
        self.pos += 1;
        pos
    }

    fn finish(self) -> TableConfig {
        TableConfig {
            measurement_type: self.measurement_type,
            technology_type: self.technology_type,
            fields: self.fields,
            protocols: self.protocols,
        }
    }
}

/// Parse one isaconfig XML file into its table configurations.
pub fn parse_config_file(path: &Path) -> Result<Vec<TableConfig>> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::io(path, source))?;
    let mut reader = Reader::from_str(&content);
    reader.config_mut().trim_text(true);

    let mut configs = Vec::new();
    let mut builder: Option<ConfigBuilder> = None;
    loop {
        let event = reader
            .read_event()
            .map_err(|error| ConfigError::xml(path, error))?;
        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                let empty = matches!(event, Event::Empty(_));
                match start.local_name().as_ref() {
                    b"isatab-configuration" => {
                        builder = Some(ConfigBuilder::default());
                    }
                    b"measurement" => {
                        if let Some(builder) = builder.as_mut() {
                            builder.measurement_type =
                                required_attribute(start, "term-label", path)?;
                        }
                    }
                    b"technology" => {
                        if let Some(builder) = builder.as_mut() {
                            builder.technology_type =
                                attribute(start, b"term-label", path)?.unwrap_or_default();
                        }
                    }
                    b"field" => {
                        if let Some(builder) = builder.as_mut() {
                            let header = required_attribute(start, "header", path)?;
                            let data_type = attribute(start, b"data-type", path)?
                                .map(|label| DataType::from_label(&label))
                                .unwrap_or_default();
                            let is_required = attribute(start, b"is-required", path)?
                                .is_some_and(|value| value.eq_ignore_ascii_case("true"));
                            let pos = builder.next_pos();
                            builder.fields.push(FieldDescriptor {
                                header,
                                data_type,
                                is_required,
                                list_values: Vec::new(),
                                pos,
                            });
                        }
                    }
                    b"list-values" => {
                        if !empty {
                            let text = reader
                                .read_text(start.name())
                                .map_err(|error| ConfigError::xml(path, error))?;
                            if let Some(field) =
                                builder.as_mut().and_then(|b| b.fields.last_mut())
                            {
                                field.list_values = text
                                    .split(',')
                                    .map(|value| value.trim().to_string())
                                    .filter(|value| !value.is_empty())
                                    .collect();
                            }
                        }
                    }
                    b"protocol-field" => {
                        if let Some(builder) = builder.as_mut() {
                            let protocol_type =
                                required_attribute(start, "protocol-type", path)?;
                            let pos = builder.next_pos();
                            builder
                                .protocols
                                .push(ProtocolFieldDescriptor { protocol_type, pos });
                        }
                    }
                    // Position-occupying entries without field semantics.
                    b"structured-field" | b"unit-field" => {
                        if let Some(builder) = builder.as_mut() {
                            builder.next_pos();
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref end) => {
                if end.local_name().as_ref() == b"isatab-configuration"
                    && let Some(builder) = builder.take()
                {
                    configs.push(builder.finish());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    // Self-closing configuration elements never hit the End arm.
    if let Some(builder) = builder.take() {
        configs.push(builder.finish());
    }
    if configs.is_empty() {
        return Err(ConfigError::NoConfiguration {
            path: path.to_path_buf(),
        });
    }
    Ok(configs)
}

/// Load every `*.xml` configuration in a directory, keyed by the
/// lower-cased (measurement-type, technology-type) pair.
pub fn load_config_dir(dir: &Path) -> Result<ConfigMap> {
    let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::io(dir, source))?;
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ConfigError::io(dir, source))?;
        let path = entry.path();
        let is_xml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if is_xml {
            paths.push(path);
        }
    }
    paths.sort();

    let mut map = ConfigMap::new();
    for path in paths {
        for config in parse_config_file(&path)? {
            let key = config.key();
            tracing::debug!(
                file = %path.display(),
                measurement = %key.0,
                technology = %key.1,
                fields = config.fields.len(),
                "loaded configuration"
            );
            map.insert(key, config);
        }
    }
    Ok(map)
}
