mod defaults;
mod file;

use crate::cli::{OutputFormat, ParseOptions};
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
pub use file::PartialConfig;
use pdbtree::engine::config::ParseConfig;
use pdbtree::engine::error::PdbError;
use std::path::Path;
use tracing::debug;

/// Settings after merging command-line flags, the config file and defaults,
/// in that order of precedence.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub parse: ParseConfig,
    pub output_format: OutputFormat,
}

impl PartialConfig {
    pub fn merge_with_cli(
        self,
        options: &ParseOptions,
        format: Option<OutputFormat>,
    ) -> Result<ResolvedConfig> {
        let defaults = DefaultsConfig::default();
        let parse_file = self.parse.unwrap_or_default();
        let output_file = self.output.unwrap_or_default();

        let strict = options.strict || parse_file.strict.unwrap_or(defaults.strict);
        let max_input_bytes = options
            .max_input_bytes
            .or(parse_file.max_input_bytes)
            .or(defaults.max_input_bytes);

        let mut builder = ParseConfig::builder().strict(strict);
        if let Some(limit) = max_input_bytes {
            builder = builder.max_input_bytes(limit);
        }
        let parse = builder.build().map_err(PdbError::from)?;

        let output_format = format
            .or(output_file.format)
            .unwrap_or(defaults.output_format);

        Ok(ResolvedConfig {
            parse,
            output_format,
        })
    }
}

/// Loads the optional config file and merges it with the command line.
pub fn resolve(
    config_path: Option<&Path>,
    options: &ParseOptions,
    format: Option<OutputFormat>,
) -> Result<ResolvedConfig> {
    let partial = match config_path {
        Some(path) => PartialConfig::from_file(path)?,
        None => PartialConfig::default(),
    };
    let resolved = partial.merge_with_cli(options, format)?;
    debug!("Resolved configuration: {:?}", resolved);
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdbtree::engine::config::ConfigError;
    use std::io::Write;

    fn options(strict: bool, max_input_bytes: Option<usize>) -> ParseOptions {
        ParseOptions {
            strict,
            max_input_bytes,
        }
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let resolved = resolve(None, &ParseOptions::default(), None).unwrap();
        let defaults = DefaultsConfig::default();
        assert!(!resolved.parse.strict);
        assert_eq!(resolved.parse.max_input_bytes, defaults.max_input_bytes);
        assert_eq!(resolved.output_format, OutputFormat::Pdb);
    }

    #[test]
    fn file_values_override_defaults() {
        let partial = PartialConfig::from_toml(
            "[parse]\nmax-input-bytes = 4096\nstrict = true\n\n[output]\nformat = \"json\"\n",
        )
        .unwrap();
        let resolved = partial
            .merge_with_cli(&ParseOptions::default(), None)
            .unwrap();
        assert!(resolved.parse.strict);
        assert_eq!(resolved.parse.max_input_bytes, Some(4096));
        assert_eq!(resolved.output_format, OutputFormat::Json);
    }

    #[test]
    fn cli_flags_override_file_values() {
        let partial =
            PartialConfig::from_toml("[parse]\nmax-input-bytes = 4096\n[output]\nformat = \"json\"\n")
                .unwrap();
        let resolved = partial
            .merge_with_cli(&options(true, Some(10)), Some(OutputFormat::Pdb))
            .unwrap();
        assert!(resolved.parse.strict);
        assert_eq!(resolved.parse.max_input_bytes, Some(10));
        assert_eq!(resolved.output_format, OutputFormat::Pdb);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(PartialConfig::from_toml("[parse]\nstrictness = true\n").is_err());
        assert!(PartialConfig::from_toml("[render]\n").is_err());
    }

    #[test]
    fn zero_limit_is_a_config_error() {
        let result = PartialConfig::default().merge_with_cli(&options(false, Some(0)), None);
        assert!(matches!(
            result,
            Err(CliError::Pdb(PdbError::Config(ConfigError::InvalidParameter { .. })))
        ));
    }

    #[test]
    fn from_file_reports_the_offending_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[parse]\nstrict = \"yes\"\n").unwrap();
        match resolve(Some(file.path()), &ParseOptions::default(), None) {
            Err(CliError::FileParsing { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected FileParsing, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve(
            Some(&dir.path().join("absent.toml")),
            &ParseOptions::default(),
            None,
        );
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
