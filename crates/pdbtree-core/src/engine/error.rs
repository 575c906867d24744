use thiserror::Error;

use super::config::ConfigError;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Input is {size} bytes, which exceeds the limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error("Strict mode: parse produced {count} anomalies")]
    Strict { count: usize },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
