use crate::core::io::dict::PdbDict;
use crate::core::io::lines::split_lines;
use crate::core::io::pdb::{extract_header, extract_structure};
use crate::core::models::document::PdbDocument;
use crate::engine::assembler::assemble;
use crate::engine::config::ParseConfig;
use crate::engine::error::PdbError;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, instrument};

/// Where a parse currently stands. Every transition is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    Unparsed,
    HeaderExtracted,
    StructureExtracted,
    Assembled,
}

impl fmt::Display for ParseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseStage::Unparsed => "unparsed",
            ParseStage::HeaderExtracted => "header-extracted",
            ParseStage::StructureExtracted => "structure-extracted",
            ParseStage::Assembled => "assembled",
        };
        f.write_str(name)
    }
}

fn check_size(size: usize, config: &ParseConfig) -> Result<(), PdbError> {
    match config.max_input_bytes {
        Some(limit) if size > limit => Err(PdbError::InputTooLarge { size, limit }),
        _ => Ok(()),
    }
}

fn check_strict(anomaly_count: usize, config: &ParseConfig) -> Result<(), PdbError> {
    if config.strict && anomaly_count > 0 {
        return Err(PdbError::Strict {
            count: anomaly_count,
        });
    }
    Ok(())
}

fn extract(text: &str, config: &ParseConfig) -> Result<PdbDict, PdbError> {
    check_size(text.len(), config)?;
    let lines = split_lines(text);
    let mut dict = PdbDict::default();
    debug!(stage = %ParseStage::Unparsed, lines = lines.len(), "Split input into records");

    extract_header(&mut dict, &lines);
    debug!(stage = %ParseStage::HeaderExtracted, code = ?dict.code, "Header extracted");

    extract_structure(&mut dict, &lines);
    debug!(
        stage = %ParseStage::StructureExtracted,
        models = dict.models.len(),
        connections = dict.connections.len(),
        "Structure extracted"
    );
    Ok(dict)
}

/// Parses PDB text into the intermediate dict without building domain objects.
///
/// # Errors
///
/// Returns [`PdbError::InputTooLarge`] if the text exceeds the configured limit,
/// or [`PdbError::Strict`] if strict mode is on and anomalies were recorded.
#[instrument(skip_all, fields(bytes = text.len()))]
pub fn parse_to_dict(text: &str, config: &ParseConfig) -> Result<PdbDict, PdbError> {
    let dict = extract(text, config)?;
    check_strict(dict.anomalies.len(), config)?;
    Ok(dict)
}

/// Parses PDB text into a [`PdbDocument`].
///
/// # Errors
///
/// Returns [`PdbError::InputTooLarge`] if the text exceeds the configured limit,
/// or [`PdbError::Strict`] if strict mode is on and anomalies were recorded.
#[instrument(skip_all, fields(bytes = text.len()))]
pub fn parse_str(text: &str, config: &ParseConfig) -> Result<PdbDocument, PdbError> {
    let document = assemble(extract(text, config)?);
    debug!(stage = %ParseStage::Assembled, anomalies = document.anomalies().len(), "Document assembled");
    check_strict(document.anomalies().len(), config)?;
    Ok(document)
}

/// Reads a whole stream as UTF-8, stopping one byte past the configured limit.
fn read_text(reader: &mut impl Read, config: &ParseConfig) -> Result<String, PdbError> {
    let mut bytes = Vec::new();
    match config.max_input_bytes {
        Some(limit) => {
            reader.by_ref().take((limit as u64).saturating_add(1)).read_to_end(&mut bytes)?;
            check_size(bytes.len(), config)?;
        }
        None => {
            reader.read_to_end(&mut bytes)?;
        }
    }
    Ok(String::from_utf8(bytes)?)
}

/// Opens a file after checking its size against the configured limit.
fn open_checked(path: &Path, config: &ParseConfig) -> Result<BufReader<File>, PdbError> {
    let size = fs::metadata(path)?.len();
    check_size(usize::try_from(size).unwrap_or(usize::MAX), config)?;
    Ok(BufReader::new(File::open(path)?))
}

/// Reads and parses a whole stream.
///
/// With a size limit configured, at most one byte past the limit is read before
/// the input is rejected; the reported size is the number of bytes read.
///
/// # Errors
///
/// Returns [`PdbError::Io`] or [`PdbError::Encoding`] if the stream cannot be
/// read as UTF-8, plus everything [`parse_str`] returns.
pub fn parse_reader(reader: &mut impl Read, config: &ParseConfig) -> Result<PdbDocument, PdbError> {
    let text = read_text(reader, config)?;
    parse_str(&text, config)
}

/// Reads and parses a file, checking its size before reading it.
///
/// # Errors
///
/// See [`parse_reader`].
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn parse_path<P: AsRef<Path>>(path: P, config: &ParseConfig) -> Result<PdbDocument, PdbError> {
    let mut reader = open_checked(path.as_ref(), config)?;
    parse_reader(&mut reader, config)
}

/// Reads a file into the intermediate dict, with the same size checks as
/// [`parse_path`].
///
/// # Errors
///
/// See [`parse_reader`] and [`parse_to_dict`].
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn parse_path_to_dict<P: AsRef<Path>>(
    path: P,
    config: &ParseConfig,
) -> Result<PdbDict, PdbError> {
    let mut reader = open_checked(path.as_ref(), config)?;
    let text = read_text(&mut reader, config)?;
    parse_to_dict(&text, config)
}
