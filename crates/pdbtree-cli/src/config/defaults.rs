use crate::cli::OutputFormat;

/// 256 MiB; large enough for any single deposited entry.
const DEFAULT_MAX_INPUT_BYTES: usize = 256 * 1024 * 1024;

/// Values used when neither the command line nor the config file sets an option.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultsConfig {
    pub strict: bool,
    pub max_input_bytes: Option<usize>,
    pub output_format: OutputFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            strict: false,
            max_input_bytes: Some(DEFAULT_MAX_INPUT_BYTES),
            output_format: OutputFormat::Pdb,
        }
    }
}
