use crate::cli::OutputFormat;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartialParseConfig {
    #[serde(rename = "max-input-bytes")]
    pub max_input_bytes: Option<usize>,
    pub strict: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartialOutputConfig {
    pub format: Option<OutputFormat>,
}

/// The TOML config file. Every key is optional.
///
/// ```toml
/// [parse]
/// max-input-bytes = 1048576
/// strict = true
///
/// [output]
/// format = "json"
/// ```
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    pub parse: Option<PartialParseConfig>,
    pub output: Option<PartialOutputConfig>,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
