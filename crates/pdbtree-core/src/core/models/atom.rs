use crate::core::io::records::AtomRecord;
use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;

/// Which coordinate record an atom was read from.
///
/// Standard polymer atoms come from `ATOM`; ligands, ions and waters from `HETATM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AtomKind {
    /// Polymer atom, written as an `ATOM` record.
    #[default]
    Standard,
    /// Heteroatom, written as a `HETATM` record.
    Hetero,
}

impl AtomKind {
    /// The record keyword used for this kind of atom.
    pub fn keyword(&self) -> &'static str {
        match self {
            AtomKind::Standard => "ATOM",
            AtomKind::Hetero => "HETATM",
        }
    }
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for AtomKind {
    type Err = ();

    /// Parses a record keyword into an `AtomKind`.
    ///
    /// Surrounding whitespace is ignored, so padded six-column tags such as
    /// `"ATOM  "` are accepted.
    ///
    /// # Errors
    ///
    /// Returns `()` if the keyword is neither `ATOM` nor `HETATM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ATOM" => Ok(AtomKind::Standard),
            "HETATM" => Ok(AtomKind::Hetero),
            _ => Err(()),
        }
    }
}

/// An atom of an assembled model.
///
/// Identity within its parent (chain id, residue number) is held by the enclosing
/// residue or molecule; the atom itself only carries per-atom columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The serial number (`atom_id`), unique within a model. Blank serials become 0.
    pub id: i32,
    /// The atom name (e.g., "CA", "N", "O").
    pub name: String,
    /// Alternate location indicator, if any.
    pub alt_loc: Option<char>,
    /// Element symbol, empty if the column was blank.
    pub element: String,
    /// Orthogonal coordinates in Angstroms. Blank coordinates become 0.0.
    pub position: Point3<f64>,
    /// Occupancy, 1.0 when the column was blank.
    pub occupancy: f64,
    /// Isotropic temperature factor, if present.
    pub temperature_factor: Option<f64>,
    /// Formal charge.
    pub charge: i32,
    /// Record the atom came from.
    pub kind: AtomKind,
}

impl Atom {
    /// Creates a new `Atom` with default values for the optional columns.
    ///
    /// # Arguments
    ///
    /// * `id` - The atom serial.
    /// * `name` - The name of the atom.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(id: i32, name: &str, position: Point3<f64>) -> Self {
        Self {
            id,
            name: name.to_string(),
            alt_loc: None,
            element: String::new(),
            position,
            occupancy: 1.0,
            temperature_factor: None,
            charge: 0,
            kind: AtomKind::default(),
        }
    }

    /// Builds an atom from a decoded coordinate record.
    pub fn from_record(record: &AtomRecord, kind: AtomKind) -> Self {
        Self {
            id: record.atom_id.unwrap_or_default(),
            name: record.atom_name.clone().unwrap_or_default(),
            alt_loc: record.alt_loc,
            element: record.element.clone().unwrap_or_default(),
            position: Point3::new(
                record.x.unwrap_or_default(),
                record.y.unwrap_or_default(),
                record.z.unwrap_or_default(),
            ),
            occupancy: record.occupancy,
            temperature_factor: record.temperature_factor,
            charge: record.charge,
            kind,
        }
    }

    /// Converts the atom back into a record, given the identity of its parent.
    pub fn to_record(
        &self,
        residue_name: &str,
        chain_id: &str,
        residue_id: Option<i32>,
        insert_code: &str,
    ) -> AtomRecord {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        AtomRecord {
            atom_id: Some(self.id),
            atom_name: non_empty(&self.name),
            alt_loc: self.alt_loc,
            residue_name: non_empty(residue_name),
            chain_id: chain_id.to_string(),
            residue_id,
            insert_code: insert_code.to_string(),
            full_id: crate::core::io::records::make_full_id(chain_id, residue_id, insert_code),
            x: Some(self.position.x),
            y: Some(self.position.y),
            z: Some(self.position.z),
            occupancy: self.occupancy,
            temperature_factor: self.temperature_factor,
            element: non_empty(&self.element),
            charge: self.charge,
        }
    }

    pub fn is_hetero(&self) -> bool {
        self.kind == AtomKind::Hetero
    }

    /// Euclidean distance to another atom in Angstroms.
    pub fn distance_to(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }
}
