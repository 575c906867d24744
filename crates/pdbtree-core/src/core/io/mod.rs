//! Reading and writing the PDB text format.
//!
//! [`lines`] normalizes raw text into 80-column records, [`records`] decodes and
//! encodes individual record types, [`dict`] holds the serializable intermediate
//! form, and [`pdb`] ties them together behind the [`traits::MolecularFile`]
//! interface. [`annotations`] and [`transforms`] cover the less common title
//! and crystallographic records.

pub mod annotations;
pub mod dict;
pub mod lines;
pub mod pdb;
pub mod records;
pub mod traits;
pub mod transforms;
