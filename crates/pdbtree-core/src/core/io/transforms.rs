//! ORIGXn, SCALEn and MTRIXn: the coordinate transformations of the entry.
//!
//! Each matrix is spread over three lines, one row per line. A row carries three
//! matrix elements in columns 11-40 and a translation in columns 46-55.

use super::records::{FieldError, FieldReader};
use nalgebra::{Matrix3, Point3, Vector3};
use serde::Serialize;

pub const ORIGX_RECORDS: [&str; 3] = ["ORIGX1", "ORIGX2", "ORIGX3"];
pub const SCALE_RECORDS: [&str; 3] = ["SCALE1", "SCALE2", "SCALE3"];

/// A 3x3 matrix and translation vector, stored row-major.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Transform {
    pub rotation: [[f64; 3]; 3],
    pub translation: [f64; 3],
}

impl Transform {
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::from_fn(|row, col| self.rotation[row][col])
    }

    pub fn vector(&self) -> Vector3<f64> {
        Vector3::from(self.translation)
    }

    /// Maps `point` through the matrix, then adds the translation.
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.matrix() * point.coords + self.vector())
    }
}

/// One non-crystallographic symmetry operator from MTRIXn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NcsOperator {
    pub serial: i32,
    pub transform: Transform,
    /// Column 60 is `1`: the copy's coordinates are already in the file.
    pub given: bool,
}

/// Every transformation declared by the entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transforms {
    pub origx: Option<Transform>,
    pub scale: Option<Transform>,
    pub ncs: Vec<NcsOperator>,
}

impl Transforms {
    pub fn is_empty(&self) -> bool {
        self.origx.is_none() && self.scale.is_none() && self.ncs.is_empty()
    }
}

fn decode_row(reader: &mut FieldReader<'_>) -> ([f64; 3], f64) {
    let row = [
        reader.float(11, 20).unwrap_or_default(),
        reader.float(21, 30).unwrap_or_default(),
        reader.float(31, 40).unwrap_or_default(),
    ];
    (row, reader.float(46, 55).unwrap_or_default())
}

/// Decodes the three ORIGXn or SCALEn lines, in row order.
///
/// Blank elements are zero.
pub fn decode_transform(rows: [&str; 3]) -> (Transform, Vec<FieldError>) {
    let mut transform = Transform::default();
    let mut errors = Vec::new();
    for (idx, line) in rows.into_iter().enumerate() {
        let mut reader = FieldReader::new(line);
        let (row, shift) = decode_row(&mut reader);
        transform.rotation[idx] = row;
        transform.translation[idx] = shift;
        errors.extend(reader.finish());
    }
    (transform, errors)
}

pub fn encode_transform(keywords: [&str; 3], transform: &Transform) -> Vec<String> {
    keywords
        .iter()
        .enumerate()
        .map(|(idx, keyword)| {
            let [a, b, c] = transform.rotation[idx];
            format!(
                "{:<6}    {:>10.6}{:>10.6}{:>10.6}     {:>10.5}",
                keyword, a, b, c, transform.translation[idx]
            )
        })
        .collect()
}

/// One decoded MTRIXn line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixRow {
    /// Zero-based row taken from the record name.
    pub row: usize,
    pub serial: Option<i32>,
    pub values: [f64; 3],
    pub shift: f64,
    pub given: bool,
}

/// Decodes a MTRIXn line. Returns `None` for a record name other than MTRIX1-3.
pub fn decode_matrix_row(line: &str) -> Option<(MatrixRow, Vec<FieldError>)> {
    let row = match line.get(..6)? {
        "MTRIX1" => 0,
        "MTRIX2" => 1,
        "MTRIX3" => 2,
        _ => return None,
    };
    let mut reader = FieldReader::new(line);
    let serial = reader.int(8, 10);
    let (values, shift) = decode_row(&mut reader);
    let given = reader.char(60) == Some('1');
    let matrix_row = MatrixRow {
        row,
        serial,
        values,
        shift,
        given,
    };
    Some((matrix_row, reader.finish()))
}

/// Groups MTRIX rows by serial, in order of first appearance.
///
/// Returns the complete operators and, for every serial that lacks one of its
/// three rows, the serial and the number of rows found. Rows without a serial
/// are ignored.
pub fn group_ncs_operators(rows: &[MatrixRow]) -> (Vec<NcsOperator>, Vec<(i32, usize)>) {
    let mut groups: Vec<(i32, [Option<&MatrixRow>; 3])> = Vec::new();
    for row in rows {
        let Some(serial) = row.serial else { continue };
        match groups.iter_mut().find(|(s, _)| *s == serial) {
            Some((_, slots)) => slots[row.row] = Some(row),
            None => {
                let mut slots = [None; 3];
                slots[row.row] = Some(row);
                groups.push((serial, slots));
            }
        }
    }

    let mut operators = Vec::new();
    let mut incomplete = Vec::new();
    for (serial, slots) in groups {
        let [Some(r1), Some(r2), Some(r3)] = slots else {
            incomplete.push((serial, slots.iter().flatten().count()));
            continue;
        };
        operators.push(NcsOperator {
            serial,
            transform: Transform {
                rotation: [r1.values, r2.values, r3.values],
                translation: [r1.shift, r2.shift, r3.shift],
            },
            given: r1.given || r2.given || r3.given,
        });
    }
    (operators, incomplete)
}

pub fn encode_ncs_operator(operator: &NcsOperator) -> Vec<String> {
    (0..3)
        .map(|idx| {
            let [a, b, c] = operator.transform.rotation[idx];
            let line = format!(
                "MTRIX{}{:>4}{:>10.6}{:>10.6}{:>10.6}     {:>10.5}    {}",
                idx + 1,
                operator.serial,
                a,
                b,
                c,
                operator.transform.translation[idx],
                if operator.given { "1" } else { "" }
            );
            line.trim_end().to_string()
        })
        .collect()
}
