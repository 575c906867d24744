//! Intermediate, serializable representation of a parsed file.
//!
//! The record decoders fill a [`PdbDict`]; the assembler turns it into domain
//! objects. Keeping the two apart lets the dict be dumped as-is (e.g. to JSON)
//! without committing to the domain model.

use super::annotations::{EntryLink, Journal, Revision};
use super::records::{AtomRecord, Compound, Crystal};
use super::transforms::Transforms;
use crate::core::diagnostics::Anomaly;
use crate::core::models::topology::Connection;
use chrono::NaiveDate;
use serde::Serialize;

/// One contiguous run of atom records sharing a full id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidueDict {
    pub id: String,
    pub name: String,
    pub atoms: Vec<AtomRecord>,
}

/// One contiguous run of atom records sharing a chain id, grouped into residues.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainDict {
    pub chain_id: String,
    pub residues: Vec<ResidueDict>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ModelDict {
    pub model_id: i32,
    pub molecules: Vec<ResidueDict>,
    pub chains: Vec<ChainDict>,
}

impl ModelDict {
    pub fn atom_count(&self) -> usize {
        let chain_atoms: usize = self
            .chains
            .iter()
            .flat_map(|c| &c.residues)
            .map(|r| r.atoms.len())
            .sum();
        let molecule_atoms: usize = self.molecules.iter().map(|m| m.atoms.len()).sum();
        chain_atoms + molecule_atoms
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PdbDict {
    pub classification: Option<String>,
    pub deposition_date: Option<NaiveDate>,
    pub code: Option<String>,
    pub obsolete: Option<EntryLink>,
    pub title: Option<String>,
    pub split_codes: Vec<String>,
    pub caveat: Option<String>,
    pub compounds: Vec<Compound>,
    pub keywords: Vec<String>,
    pub experimental_techniques: Vec<String>,
    pub model_count: Option<i32>,
    pub model_annotations: Vec<String>,
    pub authors: Vec<String>,
    pub revisions: Vec<Revision>,
    pub supersedes: Option<EntryLink>,
    pub journal: Option<Journal>,
    pub crystal: Option<Crystal>,
    pub transforms: Transforms,
    pub models: Vec<ModelDict>,
    pub connections: Vec<Connection>,
    pub anomalies: Vec<Anomaly>,
}
