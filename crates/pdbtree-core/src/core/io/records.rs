//! Fixed-column decoders (and the matching encoders) for individual PDB records.
//!
//! Every function in this module works on a single normalized line (see
//! [`super::lines::normalize_line`]). Absent columns decode to documented defaults;
//! a column that is present but unparseable is reported as a [`FieldError`] and
//! defaulted, so one bad field never invalidates the rest of the record.

use super::lines::{columns, merge_records, Record};
use crate::core::models::topology::Connection;
use chrono::{Datelike, NaiveDate};
use phf::{phf_map, Map};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::warn;

static MONTHS: Map<&'static str, u32> = phf_map! {
    "JAN" => 1, "FEB" => 2, "MAR" => 3, "APR" => 4, "MAY" => 5, "JUN" => 6,
    "JUL" => 7, "AUG" => 8, "SEP" => 9, "OCT" => 10, "NOV" => 11, "DEC" => 12,
};

const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Two-digit years below this value are placed in the 2000s, the rest in the 1900s.
const CENTURY_PIVOT: i32 = 69;

/// Maximum number of bonded serials carried by one CONECT line.
pub const CONECT_FIELDS_PER_LINE: usize = 4;

/// A single field that was present but could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FieldError {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Invalid date in columns {columns} (value: '{value}')")]
    InvalidDate { columns: String, value: String },
    #[error("Invalid charge in columns {columns} (value: '{value}')")]
    InvalidCharge { columns: String, value: String },
}

/// Reads typed values out of one line, collecting decode failures as it goes.
pub(crate) struct FieldReader<'a> {
    line: &'a str,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(line: &'a str) -> Self {
        Self {
            line,
            errors: Vec::new(),
        }
    }

    pub(crate) fn raw(&self, start: usize, end: usize) -> &'a str {
        columns(self.line, start, end)
    }

    pub(crate) fn text(&self, start: usize, end: usize) -> Option<String> {
        let value = self.raw(start, end);
        (!value.is_empty()).then(|| value.to_string())
    }

    pub(crate) fn char(&self, column: usize) -> Option<char> {
        self.raw(column, column).chars().next()
    }

    pub(crate) fn int(&mut self, start: usize, end: usize) -> Option<i32> {
        let value = self.raw(start, end);
        if value.is_empty() {
            return None;
        }
        match value.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                self.errors.push(FieldError::InvalidInt {
                    columns: format!("{}-{}", start, end),
                    value: value.to_string(),
                });
                None
            }
        }
    }

    pub(crate) fn float(&mut self, start: usize, end: usize) -> Option<f64> {
        let value = self.raw(start, end);
        if value.is_empty() {
            return None;
        }
        match value.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                self.errors.push(FieldError::InvalidFloat {
                    columns: format!("{}-{}", start, end),
                    value: value.to_string(),
                });
                None
            }
        }
    }

    pub(crate) fn date(&mut self, start: usize, end: usize) -> Option<NaiveDate> {
        let value = self.raw(start, end);
        if value.is_empty() {
            return None;
        }
        parse_pdb_date(value, &format!("{}-{}", start, end))
            .map_err(|e| self.errors.push(e))
            .ok()
    }

    pub(crate) fn finish(self) -> Vec<FieldError> {
        self.errors
    }
}

/// One decoded ATOM or HETATM line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomRecord {
    pub atom_id: Option<i32>,
    pub atom_name: Option<String>,
    pub alt_loc: Option<char>,
    pub residue_name: Option<String>,
    pub chain_id: String,
    pub residue_id: Option<i32>,
    pub insert_code: String,
    /// Grouping key: chain id, residue number and insertion code concatenated as text.
    pub full_id: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub occupancy: f64,
    pub temperature_factor: Option<f64>,
    pub element: Option<String>,
    pub charge: i32,
}

impl Default for AtomRecord {
    /// The record produced by a line with every optional column blank.
    fn default() -> Self {
        Self {
            atom_id: None,
            atom_name: None,
            alt_loc: None,
            residue_name: None,
            chain_id: String::new(),
            residue_id: None,
            insert_code: String::new(),
            full_id: String::new(),
            x: None,
            y: None,
            z: None,
            occupancy: 1.0,
            temperature_factor: None,
            element: None,
            charge: 0,
        }
    }
}

/// Builds the residue grouping key. Missing parts render as empty text.
pub fn make_full_id(chain_id: &str, residue_id: Option<i32>, insert_code: &str) -> String {
    match residue_id {
        Some(number) => format!("{}{}{}", chain_id, number, insert_code),
        None => format!("{}{}", chain_id, insert_code),
    }
}

/// Decodes the two-column charge field (`"2-"`, `"1+"`, `"2"`, blank).
pub fn decode_charge(value: &str) -> Result<i32, FieldError> {
    let value = value.trim();
    let invalid = || FieldError::InvalidCharge {
        columns: "79-80".into(),
        value: value.to_string(),
    };
    if value.is_empty() {
        return Ok(0);
    }
    let (digits, sign) = match value.chars().last() {
        Some('-') => (&value[..value.len() - 1], -1),
        Some('+') => (&value[..value.len() - 1], 1),
        _ => (value, 1),
    };
    if digits.is_empty() {
        return Err(invalid());
    }
    digits
        .parse::<i32>()
        .map(|magnitude| sign * magnitude)
        .map_err(|_| invalid())
}

/// Largest charge magnitude that fits the two charge columns.
pub const MAX_CHARGE_MAGNITUDE: i32 = 9;

/// Encodes a formal charge in digit-then-sign form; zero becomes blank.
///
/// Charges beyond [`MAX_CHARGE_MAGNITUDE`] are clamped so the record stays
/// 80 columns wide and keeps its sign.
pub fn encode_charge(charge: i32) -> String {
    let clamped = charge.clamp(-MAX_CHARGE_MAGNITUDE, MAX_CHARGE_MAGNITUDE);
    if clamped != charge {
        warn!(charge, clamped, "Charge does not fit in columns 79-80, clamping");
    }
    match clamped {
        0 => "  ".to_string(),
        c if c < 0 => format!("{}-", -c),
        c => format!("{}+", c),
    }
}

/// Decodes an ATOM/HETATM line into an [`AtomRecord`].
///
/// Never fails: unparseable numeric columns are defaulted and returned alongside
/// the record so callers can report them.
pub fn atom_line_to_record(line: &str) -> (AtomRecord, Vec<FieldError>) {
    let mut reader = FieldReader::new(line);

    let atom_id = reader.int(7, 11);
    let atom_name = reader.text(13, 16);
    let alt_loc = reader.char(17);
    let residue_name = reader.text(18, 20);
    let chain_id = reader.raw(22, 22).to_string();
    let residue_id = reader.int(23, 26);
    let insert_code = reader.raw(27, 27).to_string();
    let x = reader.float(31, 38);
    let y = reader.float(39, 46);
    let z = reader.float(47, 54);
    let occupancy = reader.float(55, 60).unwrap_or(1.0);
    let temperature_factor = reader.float(61, 66);
    let element = reader.text(77, 78);
    let charge_text = reader.raw(79, 80);

    let mut errors = reader.finish();
    let charge = decode_charge(charge_text).unwrap_or_else(|e| {
        errors.push(e);
        0
    });

    let full_id = make_full_id(&chain_id, residue_id, &insert_code);
    let record = AtomRecord {
        atom_id,
        atom_name,
        alt_loc,
        residue_name,
        chain_id,
        residue_id,
        insert_code,
        full_id,
        x,
        y,
        z,
        occupancy,
        temperature_factor,
        element,
        charge,
    };
    (record, errors)
}

pub(crate) fn optional<T>(value: Option<T>, width: usize, render: impl Fn(T) -> String) -> String {
    value.map_or_else(|| " ".repeat(width), render)
}

/// Encodes an [`AtomRecord`] as an 80-column ATOM/HETATM line.
///
/// Atom names shorter than four characters start in column 14.
pub fn record_to_atom_line(keyword: &str, record: &AtomRecord) -> String {
    let name = match record.atom_name.as_deref() {
        Some(n) if n.chars().count() >= 4 => n.to_string(),
        Some(n) => format!(" {:<3}", n),
        None => String::new(),
    };
    format!(
        "{:<6}{:>5} {:<4}{}{:>3} {:1}{:>4}{:1}   {}{}{}{:>6.2}{}          {:>2}{:<2}",
        keyword,
        optional(record.atom_id, 5, |v| v.to_string()),
        name,
        record.alt_loc.unwrap_or(' '),
        record.residue_name.as_deref().unwrap_or(""),
        record.chain_id,
        optional(record.residue_id, 4, |v| v.to_string()),
        record.insert_code,
        optional(record.x, 8, |v| format!("{:>8.3}", v)),
        optional(record.y, 8, |v| format!("{:>8.3}", v)),
        optional(record.z, 8, |v| format!("{:>8.3}", v)),
        record.occupancy,
        optional(record.temperature_factor, 6, |v| format!("{:>6.2}", v)),
        record.element.as_deref().unwrap_or(""),
        encode_charge(record.charge),
    )
}

/// Parses a `DD-MON-YY` (or `DD-MON-YYYY`) date.
pub fn parse_pdb_date(value: &str, cols: &str) -> Result<NaiveDate, FieldError> {
    let invalid = || FieldError::InvalidDate {
        columns: cols.to_string(),
        value: value.to_string(),
    };
    let mut parts = value.trim().split('-');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let day: u32 = day.parse().map_err(|_| invalid())?;
    let month = *MONTHS
        .get(month.to_ascii_uppercase().as_str())
        .ok_or_else(invalid)?;
    let mut year: i32 = year.parse().map_err(|_| invalid())?;
    if year < 100 {
        year += if year < CENTURY_PIVOT { 2000 } else { 1900 };
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Formats a date back into `DD-MON-YY`.
pub fn format_pdb_date(date: NaiveDate) -> String {
    format!(
        "{:02}-{}-{:02}",
        date.day(),
        MONTH_NAMES[date.month0() as usize],
        date.year().rem_euclid(100)
    )
}

/// Scalars carried by the HEADER record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderLine {
    pub classification: Option<String>,
    pub deposition_date: Option<NaiveDate>,
    pub code: Option<String>,
}

/// Decodes a HEADER line: classification 11-50, date 51-59, code 63-66.
pub fn decode_header_line(line: &str) -> (HeaderLine, Vec<FieldError>) {
    let mut reader = FieldReader::new(line);
    let header = HeaderLine {
        classification: reader.text(11, 50),
        deposition_date: reader.date(51, 59),
        code: reader.text(63, 66),
    };
    (header, reader.finish())
}

/// Splits merged list text (KEYWDS, AUTHOR, EXPDTA) into trimmed, non-empty items.
pub fn split_list(text: &str, separator: char) -> Vec<String> {
    text.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// A molecule declared in the COMPND records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Compound {
    pub mol_id: Option<u32>,
    pub molecule: Option<String>,
    pub chains: Vec<String>,
    /// Every other `KEY: VALUE` token, keyed by its tag.
    pub properties: BTreeMap<String, String>,
}

/// Decodes the COMPND specification list into compounds.
///
/// Each `MOL_ID` token opens a new compound. Tokens seen before any `MOL_ID` are
/// attached to an implicit compound without an id.
pub fn decode_compounds(records: &[Record<'_>]) -> (Vec<Compound>, Vec<FieldError>) {
    let text = merge_records(records, 10, " ");
    let mut compounds: Vec<Compound> = Vec::new();
    let mut errors = Vec::new();
    let mut last_key: Option<String> = None;

    for token in text.split(';').map(str::trim).filter(|t| !t.is_empty()) {
        let Some((key, value)) = token.split_once(':') else {
            // Value text that itself contains a ';' continues the previous token.
            if let (Some(key), Some(compound)) = (&last_key, compounds.last_mut()) {
                append_to_property(compound, key, token);
            }
            continue;
        };
        let key = key.trim().to_ascii_uppercase();
        let value = value.trim();

        if key == "MOL_ID" {
            let mol_id = value
                .parse()
                .map_err(|_| {
                    errors.push(FieldError::InvalidInt {
                        columns: "11-80".into(),
                        value: value.to_string(),
                    })
                })
                .ok();
            compounds.push(Compound {
                mol_id,
                ..Compound::default()
            });
        } else {
            if compounds.is_empty() {
                compounds.push(Compound::default());
            }
            if let Some(compound) = compounds.last_mut() {
                match key.as_str() {
                    "MOLECULE" => compound.molecule = Some(value.to_string()),
                    "CHAIN" => compound.chains = split_list(value, ','),
                    _ => {
                        compound.properties.insert(key.clone(), value.to_string());
                    }
                }
            }
        }
        last_key = Some(key);
    }
    (compounds, errors)
}

fn append_to_property(compound: &mut Compound, key: &str, extra: &str) {
    match key {
        "MOLECULE" => {
            if let Some(name) = compound.molecule.as_mut() {
                name.push_str("; ");
                name.push_str(extra);
            }
        }
        "CHAIN" => compound.chains.extend(split_list(extra, ',')),
        _ => {
            if let Some(value) = compound.properties.get_mut(key) {
                value.push_str("; ");
                value.push_str(extra);
            }
        }
    }
}

/// Unit cell parameters from CRYST1.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Crystal {
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub c: Option<f64>,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    pub space_group: Option<String>,
    pub z: Option<i32>,
}

pub fn decode_cryst1(line: &str) -> (Crystal, Vec<FieldError>) {
    let mut reader = FieldReader::new(line);
    let crystal = Crystal {
        a: reader.float(7, 15),
        b: reader.float(16, 24),
        c: reader.float(25, 33),
        alpha: reader.float(34, 40),
        beta: reader.float(41, 47),
        gamma: reader.float(48, 54),
        space_group: reader.text(56, 66),
        z: reader.int(67, 70),
    };
    (crystal, reader.finish())
}

pub fn encode_cryst1(crystal: &Crystal) -> String {
    format!(
        "CRYST1{}{}{}{}{}{} {:<11}{}",
        optional(crystal.a, 9, |v| format!("{:>9.3}", v)),
        optional(crystal.b, 9, |v| format!("{:>9.3}", v)),
        optional(crystal.c, 9, |v| format!("{:>9.3}", v)),
        optional(crystal.alpha, 7, |v| format!("{:>7.2}", v)),
        optional(crystal.beta, 7, |v| format!("{:>7.2}", v)),
        optional(crystal.gamma, 7, |v| format!("{:>7.2}", v)),
        crystal.space_group.as_deref().unwrap_or(""),
        optional(crystal.z, 4, |v| format!("{:>4}", v)),
    )
}

/// Reads the model serial from columns 11-14 of a MODEL record.
pub fn decode_model_serial(line: &str) -> (Option<i32>, Vec<FieldError>) {
    let mut reader = FieldReader::new(line);
    let serial = reader.int(11, 14);
    (serial, reader.finish())
}

/// Decodes one CONECT line into its source serial and bonded serials.
///
/// Bonded serials occupy 5-column fields starting at column 12; blank fields are
/// skipped. Returns `None` for the source when columns 7-11 are blank or malformed.
pub fn decode_conect_line(line: &str) -> (Option<i32>, Vec<i32>, Vec<FieldError>) {
    let mut reader = FieldReader::new(line);
    let source = reader.int(7, 11);
    let bonded = (0..CONECT_FIELDS_PER_LINE)
        .filter_map(|i| {
            let start = 12 + i * 5;
            reader.int(start, start + 4)
        })
        .collect();
    (source, bonded, reader.finish())
}

/// Folds CONECT lines into one [`Connection`] per source atom.
///
/// Lines repeating a source serial extend that atom's bond list in file order; the
/// output is ordered by first appearance of each source serial.
pub fn merge_connections<S: AsRef<str>>(lines: &[S]) -> (Vec<Connection>, Vec<FieldError>) {
    let mut connections: Vec<Connection> = Vec::new();
    let mut open: HashMap<i32, usize> = HashMap::new();
    let mut errors = Vec::new();

    for line in lines {
        let (source, bonded, mut line_errors) = decode_conect_line(line.as_ref());
        errors.append(&mut line_errors);
        let Some(source) = source else {
            continue;
        };
        match open.get(&source) {
            Some(&idx) => connections[idx].bond_to.extend(bonded),
            None => {
                open.insert(source, connections.len());
                connections.push(Connection::new(source, bonded));
            }
        }
    }
    (connections, errors)
}

/// Encodes a connection as one or more CONECT lines of at most four bonds each.
pub fn encode_connection(connection: &Connection) -> Vec<String> {
    if connection.bond_to.is_empty() {
        return vec![format!("CONECT{:>5}", connection.atom)];
    }
    connection
        .bond_to
        .chunks(CONECT_FIELDS_PER_LINE)
        .map(|chunk| {
            let bonded: String = chunk.iter().map(|b| format!("{:>5}", b)).collect();
            format!("CONECT{:>5}{}", connection.atom, bonded)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::lines::{get_lines, normalize_line};

    const FULL_ATOM_LINE: &str =
        "ATOM    107  N1 AGLY B  13C     12.681  37.302 -25.211 0.70  15.56           N2-";

    #[test]
    fn empty_line_decodes_to_empty_atom() {
        let (record, errors) = atom_line_to_record(&normalize_line("ATOM"));
        assert!(errors.is_empty());
        assert_eq!(record, AtomRecord::default());
        assert_eq!(record.full_id, "");
        assert_eq!(record.occupancy, 1.0);
        assert_eq!(record.charge, 0);
    }

    #[test]
    fn full_line_decodes_every_field() {
        let (record, errors) = atom_line_to_record(FULL_ATOM_LINE);
        assert!(errors.is_empty());
        assert_eq!(record.atom_id, Some(107));
        assert_eq!(record.atom_name.as_deref(), Some("N1"));
        assert_eq!(record.alt_loc, Some('A'));
        assert_eq!(record.residue_name.as_deref(), Some("GLY"));
        assert_eq!(record.chain_id, "B");
        assert_eq!(record.residue_id, Some(13));
        assert_eq!(record.insert_code, "C");
        assert_eq!(record.full_id, "B13C");
        assert_eq!(record.x, Some(12.681));
        assert_eq!(record.y, Some(37.302));
        assert_eq!(record.z, Some(-25.211));
        assert_eq!(record.occupancy, 0.7);
        assert_eq!(record.temperature_factor, Some(15.56));
        assert_eq!(record.element.as_deref(), Some("N"));
        assert_eq!(record.charge, -2);
    }

    #[test]
    fn full_id_omits_missing_parts_without_placeholders() {
        assert_eq!(make_full_id("", Some(10), ""), "10");
        assert_eq!(make_full_id("A", None, "B"), "AB");
        assert_eq!(make_full_id("A", Some(-3), ""), "A-3");
    }

    #[test]
    fn malformed_field_is_defaulted_and_reported() {
        let line = normalize_line(
            "ATOM    107  N1  GLY B  13      12.681  XX.302 -25.211  1.00 15.56           N",
        );
        let (record, errors) = atom_line_to_record(&line);
        assert_eq!(record.y, None);
        assert_eq!(record.x, Some(12.681));
        assert_eq!(record.atom_id, Some(107));
        assert_eq!(
            errors,
            vec![FieldError::InvalidFloat {
                columns: "39-46".into(),
                value: "XX.302".into()
            }]
        );
    }

    #[test]
    fn charge_decoding_follows_digit_then_sign() {
        assert_eq!(decode_charge("2-"), Ok(-2));
        assert_eq!(decode_charge("2+"), Ok(2));
        assert_eq!(decode_charge("2"), Ok(2));
        assert_eq!(decode_charge(" 1"), Ok(1));
        assert_eq!(decode_charge("  "), Ok(0));
        assert!(decode_charge("x-").is_err());
        assert!(decode_charge("-").is_err());
    }

    #[test]
    fn charge_encoding_inverts_decoding() {
        for charge in [-3, -1, 0, 1, 2] {
            assert_eq!(decode_charge(&encode_charge(charge)), Ok(charge));
        }
    }

    #[test]
    fn oversized_charge_is_clamped_to_one_digit() {
        assert_eq!(encode_charge(-10), "9-");
        assert_eq!(encode_charge(12), "9+");
        let record = AtomRecord {
            atom_id: Some(1),
            atom_name: Some("FE".into()),
            residue_name: Some("HEM".into()),
            charge: -10,
            ..AtomRecord::default()
        };
        let line = record_to_atom_line("HETATM", &record);
        assert_eq!(line.chars().count(), 80);
        let (decoded, errors) = atom_line_to_record(&line);
        assert!(errors.is_empty());
        assert_eq!(decoded.charge, -9);
    }

    #[test]
    fn non_ascii_atom_name_does_not_shift_later_fields() {
        let line = normalize_line(
            "HETATM    1 É    UNK A   1       1.000   2.000   3.000  1.00  0.00           X",
        );
        let (record, errors) = atom_line_to_record(&line);
        assert!(errors.is_empty());
        assert_eq!(record.atom_name.as_deref(), Some("É"));
        assert_eq!(record.residue_name.as_deref(), Some("UNK"));
        assert_eq!(record.chain_id, "A");
        assert_eq!(record.residue_id, Some(1));
        assert_eq!(record.insert_code, "");
        assert_eq!(record.x, Some(1.0));
        assert_eq!(record.z, Some(3.0));
        assert_eq!(record.element.as_deref(), Some("X"));
    }

    #[test]
    fn canonical_atom_line_reencodes_column_for_column() {
        let line =
            "HETATM 1234  CA AGLY B  13C     12.681  37.302 -25.211  0.70 15.56           C2-";
        assert_eq!(line.len(), 80);
        let (record, errors) = atom_line_to_record(line);
        assert!(errors.is_empty());
        assert_eq!(record_to_atom_line("HETATM", &record), line);
    }

    #[test]
    fn four_character_names_start_at_column_thirteen() {
        let record = AtomRecord {
            atom_id: Some(1),
            atom_name: Some("HD21".into()),
            residue_name: Some("ASN".into()),
            chain_id: "A".into(),
            residue_id: Some(5),
            x: Some(0.0),
            y: Some(0.0),
            z: Some(0.0),
            element: Some("H".into()),
            ..AtomRecord::default()
        };
        let line = record_to_atom_line("ATOM", &record);
        assert_eq!(&line[12..16], "HD21");
        let (decoded, _) = atom_line_to_record(&line);
        assert_eq!(decoded.atom_name.as_deref(), Some("HD21"));
        assert_eq!(decoded.full_id, "A5");
    }

    #[test]
    fn header_line_decodes_date_and_code() {
        let line =
            format!("HEADER    UNKNOWN FUNCTION{}21-AUG-17   6AR7{}", " ".repeat(24), " ".repeat(14));
        let (header, errors) = decode_header_line(&line);
        assert!(errors.is_empty());
        assert_eq!(header.classification.as_deref(), Some("UNKNOWN FUNCTION"));
        assert_eq!(header.deposition_date, NaiveDate::from_ymd_opt(2017, 8, 21));
        assert_eq!(header.code.as_deref(), Some("6AR7"));
    }

    #[test]
    fn blank_header_line_yields_no_values() {
        let (header, errors) = decode_header_line(&normalize_line("HEADER"));
        assert!(errors.is_empty());
        assert_eq!(header, HeaderLine::default());
    }

    #[test]
    fn pdb_dates_use_two_digit_year_pivot() {
        assert_eq!(
            parse_pdb_date("01-JAN-99", "51-59"),
            Ok(NaiveDate::from_ymd_opt(1999, 1, 1).unwrap())
        );
        assert_eq!(
            parse_pdb_date("15-jun-05", "51-59"),
            Ok(NaiveDate::from_ymd_opt(2005, 6, 15).unwrap())
        );
        assert!(parse_pdb_date("32-JAN-99", "51-59").is_err());
        assert!(parse_pdb_date("01-XXX-99", "51-59").is_err());
        assert!(parse_pdb_date("garbage", "51-59").is_err());
    }

    #[test]
    fn format_pdb_date_roundtrips() {
        let date = NaiveDate::from_ymd_opt(2017, 8, 21).unwrap();
        assert_eq!(format_pdb_date(date), "21-AUG-17");
        assert_eq!(parse_pdb_date(&format_pdb_date(date), "51-59"), Ok(date));
    }

    #[test]
    fn conect_scenario_merges_repeated_sources() {
        let lines: Vec<String> = [
            "CONECT 1179  746 1184 1195 1203",
            "CONECT 1179 1211 1222",
            "CONECT 1221  544 1017 1020 1022",
        ]
        .iter()
        .map(|l| normalize_line(l))
        .collect();
        let (connections, errors) = merge_connections(&lines);
        assert!(errors.is_empty());
        assert_eq!(
            connections,
            vec![
                Connection::new(1179, vec![746, 1184, 1195, 1203, 1211, 1222]),
                Connection::new(1221, vec![544, 1017, 1020, 1022]),
            ]
        );
    }

    #[test]
    fn merged_bond_list_is_concatenation_in_line_order() {
        let lines: Vec<String> = ["CONECT    1    2", "CONECT    5    6", "CONECT    1    3    4"]
            .iter()
            .map(|l| normalize_line(l))
            .collect();
        let (connections, _) = merge_connections(&lines);
        assert_eq!(connections[0], Connection::new(1, vec![2, 3, 4]));
        assert_eq!(connections[1], Connection::new(5, vec![6]));
    }

    #[test]
    fn encode_connection_splits_into_chunks_of_four() {
        let connection = Connection::new(1179, vec![746, 1184, 1195, 1203, 1211, 1222]);
        let lines = encode_connection(&connection);
        assert_eq!(
            lines,
            vec!["CONECT 1179  746 1184 1195 1203", "CONECT 1179 1211 1222"]
        );
        let (merged, _) = merge_connections(&lines);
        assert_eq!(merged, vec![connection]);
    }

    #[test]
    fn compounds_are_split_on_mol_id() {
        let lines: Vec<String> = [
            "COMPND    MOL_ID: 1;",
            "COMPND   2 MOLECULE: HEMOGLOBIN ALPHA;",
            "COMPND   3 CHAIN: A, C;",
            "COMPND   4 ENGINEERED: YES;",
            "COMPND   5 MOL_ID: 2;",
            "COMPND   6 MOLECULE: HEMOGLOBIN BETA;",
            "COMPND   7 CHAIN: B, D",
        ]
        .iter()
        .map(|l| normalize_line(l))
        .collect();
        let records = get_lines("COMPND", &lines);
        let (compounds, errors) = decode_compounds(&records);
        assert!(errors.is_empty());
        assert_eq!(compounds.len(), 2);
        assert_eq!(compounds[0].mol_id, Some(1));
        assert_eq!(compounds[0].molecule.as_deref(), Some("HEMOGLOBIN ALPHA"));
        assert_eq!(compounds[0].chains, vec!["A", "C"]);
        assert_eq!(
            compounds[0].properties.get("ENGINEERED").map(String::as_str),
            Some("YES")
        );
        assert_eq!(compounds[1].mol_id, Some(2));
        assert_eq!(compounds[1].chains, vec!["B", "D"]);
    }

    #[test]
    fn cryst1_decodes_unit_cell() {
        let line = normalize_line(
            "CRYST1   52.000   58.600   61.900  90.00  90.00  90.00 P 21 21 21    8",
        );
        let (crystal, errors) = decode_cryst1(&line);
        assert!(errors.is_empty());
        assert_eq!(crystal.a, Some(52.0));
        assert_eq!(crystal.c, Some(61.9));
        assert_eq!(crystal.gamma, Some(90.0));
        assert_eq!(crystal.space_group.as_deref(), Some("P 21 21 21"));
        assert_eq!(crystal.z, Some(8));
        assert_eq!(normalize_line(&encode_cryst1(&crystal)), line);
    }

    #[test]
    fn model_serial_is_read_from_columns_eleven_to_fourteen() {
        assert_eq!(decode_model_serial(&normalize_line("MODEL        2")).0, Some(2));
        assert_eq!(decode_model_serial(&normalize_line("MODEL")).0, None);
        let (serial, errors) = decode_model_serial(&normalize_line("MODEL     ab"));
        assert_eq!(serial, None);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn split_list_drops_empty_items() {
        assert_eq!(
            split_list("ELECTRON TRANSPORT, ,HEME PROTEIN", ','),
            vec!["ELECTRON TRANSPORT", "HEME PROTEIN"]
        );
    }
}
