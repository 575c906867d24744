use super::atom::{Atom, AtomKind};
use super::residue::Residue;
use crate::core::io::dict::ChainDict;

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub chain_id: String,            // Chain identifier (e.g., "A"), possibly empty
    pub(crate) residues: Vec<Residue>, // Residues in file order
}

impl Chain {
    pub(crate) fn new(chain_id: &str) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            residues: Vec::new(),
        }
    }

    pub(crate) fn from_group(group: &ChainDict) -> Self {
        let mut chain = Self::new(&group.chain_id);
        chain.residues = group
            .residues
            .iter()
            .map(|r| Residue::from_group(r, AtomKind::Standard))
            .collect();
        chain
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    /// Returns the first residue with the given full id.
    pub fn residue(&self, id: &str) -> Option<&Residue> {
        self.residues.iter().find(|r| r.id == id)
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.residues.iter().flat_map(|r| r.atoms())
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}
