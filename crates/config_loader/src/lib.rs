//! # Config Loader
//!
//! Reads a `DeliveryBlueprint` from TOML or JSON.
//!
//! Decoding is done entry by entry, so a bad `[[appenders]]` or `[[gates]]`
//! table is reported by position and name instead of by byte offset:
//!
//! ```text
//! config parse error: [[appenders]] #1 (name = "audit"): unknown variant `syslog`, ...
//! ```
//!
//! After decoding, the blueprint goes through [`validator`] before it is
//! handed out.
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("delivery.toml")).unwrap();
//! println!("{} gates", blueprint.gates.len());
//! ```

mod validator;

pub use contracts::DeliveryBlueprint;

use std::path::Path;

use contracts::{AppenderConfig, ConfigVersion, ContractError, GateConfig};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Format from a file name's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, ContractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            Some(other) => Err(ContractError::config_parse(format!(
                "unsupported config format: .{other}"
            ))),
            None => Err(ContractError::config_parse(format!(
                "cannot determine config format of '{}'",
                path.display()
            ))),
        }
    }
}

/// Entry point for reading and writing delivery configuration
pub struct ConfigLoader;

impl ConfigLoader {
    /// Read, decode and validate a configuration file
    pub fn load_from_path(path: &Path) -> Result<DeliveryBlueprint, ContractError> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Decode and validate configuration text
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<DeliveryBlueprint, ContractError> {
        let blueprint = decode(document(content, format)?)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// Render a blueprint back into configuration text
    pub fn render(
        blueprint: &DeliveryBlueprint,
        format: ConfigFormat,
    ) -> Result<String, ContractError> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(blueprint)
                .map_err(|e| ContractError::config_parse(format!("cannot render TOML: {e}"))),
            ConfigFormat::Json => serde_json::to_string_pretty(blueprint)
                .map_err(|e| ContractError::config_parse(format!("cannot render JSON: {e}"))),
        }
    }
}

/// Syntax-level parse into a format-neutral tree
fn document(content: &str, format: ConfigFormat) -> Result<Value, ContractError> {
    match format {
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| ContractError::ConfigParse {
            message: format!("TOML syntax: {}", e.message()),
            source: Some(Box::new(e)),
        }),
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
                message: format!("JSON syntax at line {}: {e}", e.line()),
                source: Some(Box::new(e)),
            })
        }
    }
}

fn decode(root: Value) -> Result<DeliveryBlueprint, ContractError> {
    let Value::Object(mut root) = root else {
        return Err(ContractError::config_parse(
            "configuration root must be a table",
        ));
    };

    let version = match root.remove("version") {
        Some(value) => serde_json::from_value::<ConfigVersion>(value).map_err(|e| {
            ContractError::ConfigParse {
                message: format!("version: {e}"),
                source: Some(Box::new(e)),
            }
        })?,
        None => ConfigVersion::default(),
    };
    let appenders: Vec<AppenderConfig> = decode_entries(&mut root, Section::Appenders)?;
    let gates: Vec<GateConfig> = decode_entries(&mut root, Section::Gates)?;

    if let Some(key) = root.keys().next() {
        return Err(ContractError::config_parse(format!(
            "unknown top-level key `{key}`"
        )));
    }

    Ok(DeliveryBlueprint {
        version,
        appenders,
        gates,
    })
}

/// Top-level arrays of tables
#[derive(Debug, Clone, Copy)]
pub(crate) enum Section {
    Appenders,
    Gates,
}

impl Section {
    fn key(self) -> &'static str {
        match self {
            Section::Appenders => "appenders",
            Section::Gates => "gates",
        }
    }

    /// Field naming the entry, used in messages
    fn naming_field(self) -> &'static str {
        match self {
            Section::Appenders => "name",
            Section::Gates => "appender",
        }
    }

    /// Human label such as `[[gates]] #2 (appender = "file")`
    pub(crate) fn label(self, index: usize, name: Option<&str>) -> String {
        match name {
            Some(name) => format!(
                "[[{}]] #{index} ({} = \"{name}\")",
                self.key(),
                self.naming_field()
            ),
            None => format!("[[{}]] #{index}", self.key()),
        }
    }
}

fn decode_entries<T: DeserializeOwned>(
    root: &mut Map<String, Value>,
    section: Section,
) -> Result<Vec<T>, ContractError> {
    let items = match root.remove(section.key()) {
        None => match section {
            Section::Appenders => {
                return Err(ContractError::config_parse(
                    "missing [[appenders]] section",
                ))
            }
            Section::Gates => return Ok(Vec::new()),
        },
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ContractError::config_parse(format!(
                "`{}` must be an array of tables",
                section.key()
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let name = item
                .get(section.naming_field())
                .and_then(Value::as_str)
                .map(str::to_string);
            serde_json::from_value(item).map_err(|e| ContractError::ConfigParse {
                message: format!("{}: {e}", section.label(index, name.as_deref())),
                source: Some(Box::new(e)),
            })
        })
        .collect()
}
