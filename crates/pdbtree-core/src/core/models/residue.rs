use super::atom::{Atom, AtomKind};
use crate::core::io::dict::ResidueDict;
use std::collections::HashMap;

/// A residue of a polymer chain, or a small molecule built from heteroatoms.
///
/// Both are the same shape: one contiguous run of atoms sharing a full id, named
/// after the run's first atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub id: String,                       // Full id: chain + number + insertion code
    pub name: String,                     // Name of the residue (e.g., "ALA", "HEM")
    pub residue_number: Option<i32>,      // Sequence number from the source file
    pub insert_code: String,              // Insertion code, empty if none
    pub chain_id: String,                 // Chain identifier, empty if none
    pub(crate) atoms: Vec<Atom>,          // Atoms in file order
    atom_name_map: HashMap<String, usize>, // First index of each atom name
}

/// Heteroatom groups share the residue representation.
pub type SmallMolecule = Residue;

impl Residue {
    pub(crate) fn new(
        id: &str,
        name: &str,
        residue_number: Option<i32>,
        insert_code: &str,
        chain_id: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            residue_number,
            insert_code: insert_code.to_string(),
            chain_id: chain_id.to_string(),
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    /// Builds a residue from one grouped run of atom records.
    pub(crate) fn from_group(group: &ResidueDict, kind: AtomKind) -> Self {
        let first = group.atoms.first();
        let mut residue = Self::new(
            &group.id,
            &group.name,
            first.and_then(|a| a.residue_id),
            first.map_or("", |a| a.insert_code.as_str()),
            first.map_or("", |a| a.chain_id.as_str()),
        );
        for record in &group.atoms {
            residue.add_atom(Atom::from_record(record, kind));
        }
        residue
    }

    pub(crate) fn add_atom(&mut self, atom: Atom) {
        self.atom_name_map
            .entry(atom.name.clone())
            .or_insert(self.atoms.len());
        self.atoms.push(atom);
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Returns the first atom carrying `name`, if any.
    pub fn atom_by_name(&self, name: &str) -> Option<&Atom> {
        self.atom_name_map.get(name).map(|&idx| &self.atoms[idx])
    }

    pub fn atom_by_id(&self, id: i32) -> Option<&Atom> {
        self.atoms.iter().find(|atom| atom.id == id)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}
