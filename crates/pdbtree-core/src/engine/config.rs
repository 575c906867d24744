use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Options applied at the boundary of a parse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseConfig {
    /// Inputs larger than this many bytes are rejected before parsing starts.
    pub max_input_bytes: Option<usize>,
    /// Turn any recorded anomaly into a [`super::error::PdbError::Strict`] failure.
    pub strict: bool,
}

impl ParseConfig {
    pub fn builder() -> ParseConfigBuilder {
        ParseConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct ParseConfigBuilder {
    max_input_bytes: Option<usize>,
    strict: Option<bool>,
}

impl ParseConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = Some(limit);
        self
    }
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    pub fn build(self) -> Result<ParseConfig, ConfigError> {
        if self.max_input_bytes == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "max_input_bytes",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(ParseConfig {
            max_input_bytes: self.max_input_bytes,
            strict: self.strict.unwrap_or(false),
        })
    }
}
