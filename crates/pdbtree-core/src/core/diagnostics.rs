//! Data-quality findings collected while parsing.
//!
//! Nothing here aborts a parse. Decoders and the grouper record what they saw,
//! the document keeps the list, and callers decide whether to surface it (the
//! strict parse mode in [`crate::engine::config`] turns any finding into an error).

use super::io::records::FieldError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Hierarchy level at which a grouping anomaly was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupLevel {
    Chain,
    Residue,
    Molecule,
}

impl fmt::Display for GroupLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                GroupLevel::Chain => "chain",
                GroupLevel::Residue => "residue",
                GroupLevel::Molecule => "molecule",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Anomaly {
    /// A column was present but could not be decoded; the field was defaulted.
    #[error("{record} record: {error}")]
    MalformedField { record: String, error: FieldError },

    /// A grouping key reappeared after a different key; sibling groups were produced.
    #[error("model {model_id}: {level} '{key}' is split into non-contiguous runs")]
    NonContiguousGroup {
        model_id: i32,
        level: GroupLevel,
        key: String,
    },

    /// Coordinate records found before the first MODEL record.
    #[error("{count} coordinate record(s) before the first MODEL record were ignored")]
    OrphanRecords { count: usize },

    /// A header value failed validation and was dropped.
    #[error("header value rejected: {reason}")]
    InvalidHeader { reason: String },

    /// A three-row matrix record is missing rows; the matrix was dropped.
    #[error("{record} matrix has {rows} of 3 rows and was ignored")]
    IncompleteTransform { record: String, rows: usize },

    /// NUMMDL declares a different number of models than the file holds.
    #[error("NUMMDL declares {declared} models but {found} were found")]
    ModelCountMismatch { declared: i32, found: usize },
}

impl Anomaly {
    pub fn malformed(record: &str, error: FieldError) -> Self {
        Anomaly::MalformedField {
            record: record.trim().to_string(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anomaly_messages_are_readable() {
        let anomaly = Anomaly::malformed(
            "ATOM  ",
            FieldError::InvalidFloat {
                columns: "31-38".into(),
                value: "abc".into(),
            },
        );
        assert_eq!(
            anomaly.to_string(),
            "ATOM record: Invalid float format in columns 31-38 (value: 'abc')"
        );

        let anomaly = Anomaly::NonContiguousGroup {
            model_id: 1,
            level: GroupLevel::Chain,
            key: "A".into(),
        };
        assert_eq!(
            anomaly.to_string(),
            "model 1: chain 'A' is split into non-contiguous runs"
        );

        let anomaly = Anomaly::IncompleteTransform {
            record: "MTRIX 2".into(),
            rows: 1,
        };
        assert_eq!(anomaly.to_string(), "MTRIX 2 matrix has 1 of 3 rows and was ignored");
    }

    #[test]
    fn anomalies_serialize_with_type_tags() {
        let anomaly = Anomaly::NonContiguousGroup {
            model_id: 2,
            level: GroupLevel::Residue,
            key: "A10".into(),
        };
        let value = serde_json::to_value(&anomaly).unwrap();
        assert_eq!(value["type"], "non-contiguous-group");
        assert_eq!(value["model_id"], 2);
        assert_eq!(value["level"], "residue");
        assert_eq!(value["key"], "A10");

        let anomaly = Anomaly::malformed(
            "HETATM",
            FieldError::InvalidCharge {
                columns: "79-80".into(),
                value: "x+".into(),
            },
        );
        let value = serde_json::to_value(&anomaly).unwrap();
        assert_eq!(value["type"], "malformed-field");
        assert_eq!(value["record"], "HETATM");
        assert_eq!(value["error"]["kind"], "invalid-charge");
    }
}
