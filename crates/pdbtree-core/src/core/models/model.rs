use super::atom::Atom;
use super::chain::Chain;
use super::complex::Complex;
use super::residue::SmallMolecule;

/// One structural frame: the chains and small molecules of a MODEL block.
///
/// Files without MODEL records produce a single model with id 1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub model_id: i32,
    pub(crate) chains: Vec<Chain>,
    pub(crate) molecules: Vec<SmallMolecule>,
    pub(crate) complexes: Vec<Complex>,
}

impl Model {
    pub(crate) fn new(model_id: i32) -> Self {
        Self {
            model_id,
            ..Self::default()
        }
    }

    /// Chains in file order.
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// Small molecules (heteroatom groups) in file order.
    pub fn molecules(&self) -> &[SmallMolecule] {
        &self.molecules
    }

    pub fn complexes(&self) -> &[Complex] {
        &self.complexes
    }

    /// Returns the first chain with the given identifier.
    ///
    /// Malformed input may produce several sibling chains sharing an identifier;
    /// use [`Model::chains`] to see all of them.
    pub fn chain(&self, chain_id: &str) -> Option<&Chain> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    pub fn molecule(&self, id: &str) -> Option<&SmallMolecule> {
        self.molecules.iter().find(|m| m.id == id)
    }

    pub fn complex(&self, complex_id: &str) -> Option<&Complex> {
        self.complexes.iter().find(|c| c.complex_id == complex_id)
    }

    /// Distinct chain identifiers in order of first appearance.
    pub fn chain_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for chain in &self.chains {
            if !ids.contains(&chain.chain_id.as_str()) {
                ids.push(&chain.chain_id);
            }
        }
        ids
    }

    /// Every atom of the model: chain atoms first, then small-molecule atoms.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.chains
            .iter()
            .flat_map(|c| c.atoms())
            .chain(self.molecules.iter().flat_map(|m| m.atoms()))
    }

    pub fn atom(&self, atom_id: i32) -> Option<&Atom> {
        self.atoms().find(|a| a.id == atom_id)
    }

    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(Chain::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::Residue;
    use nalgebra::Point3;

    fn chain_with_atoms(chain_id: &str, serials: &[i32]) -> Chain {
        let mut residue = Residue::new(&format!("{}1", chain_id), "GLY", Some(1), "", chain_id);
        for &serial in serials {
            residue.add_atom(Atom::new(serial, "CA", Point3::origin()));
        }
        let mut chain = Chain::new(chain_id);
        chain.residues.push(residue);
        chain
    }

    #[test]
    fn model_lookup_by_chain_and_atom() {
        let mut model = Model::new(1);
        model.chains.push(chain_with_atoms("A", &[1, 2]));
        model.chains.push(chain_with_atoms("B", &[3]));
        let mut ligand = Residue::new("A100", "HEM", Some(100), "", "A");
        ligand.add_atom(Atom::new(50, "FE", Point3::origin()));
        model.molecules.push(ligand);

        assert_eq!(model.model_id, 1);
        assert_eq!(model.chain_ids(), vec!["A", "B"]);
        assert_eq!(model.chain("B").map(|c| c.len()), Some(1));
        assert!(model.chain("C").is_none());
        assert_eq!(model.molecule("A100").map(|m| m.name.as_str()), Some("HEM"));
        assert_eq!(model.atoms().map(|a| a.id).collect::<Vec<_>>(), vec![1, 2, 3, 50]);
        assert_eq!(model.atom(50).map(|a| a.name.as_str()), Some("FE"));
        assert_eq!(model.residue_count(), 2);
    }

    #[test]
    fn chain_ids_are_deduplicated_for_sibling_chains() {
        let mut model = Model::new(1);
        model.chains.push(chain_with_atoms("A", &[1]));
        model.chains.push(chain_with_atoms("B", &[2]));
        model.chains.push(chain_with_atoms("A", &[3]));
        assert_eq!(model.chains().len(), 3);
        assert_eq!(model.chain_ids(), vec!["A", "B"]);
    }
}
