//! # Core Models Module
//!
//! The read-only hierarchy produced by a parse. A [`document::PdbDocument`] owns
//! its header, its models and the bond table; each [`model::Model`] owns its
//! chains and small molecules, and each chain owns its residues. Nothing holds a
//! back reference: chain and residue identifiers on atoms are plain attributes.
//!
//! - [`atom`] - Per-atom columns and coordinates
//! - [`residue`] - Residues and small molecules (same shape)
//! - [`chain`] - Ordered residues sharing a chain identifier
//! - [`complex`] - Named multi-chain assemblies declared in COMPND
//! - [`model`] - One structural frame
//! - [`topology`] - CONECT bond-table entries
//! - [`document`] - The header and the whole parsed file

pub mod atom;
pub mod chain;
pub mod complex;
pub mod document;
pub mod model;
pub mod residue;
pub mod topology;
