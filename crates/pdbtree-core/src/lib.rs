//! # pdbtree
//!
//! Parses Protein Data Bank (PDB) fixed-column text into a typed, read-only
//! hierarchy (models, chains, residues, small molecules, complexes) and writes
//! that hierarchy back out as PDB records.
//!
//! ## Layers
//!
//! - **[`core`]**: stateless data. Line handling and record codecs in
//!   [`core::io`], the serializable intermediate dict, and the domain model in
//!   [`core::models`].
//! - **[`engine`]**: the algorithms that turn flat records into structure
//!   (adjacent-run grouping and assembly), plus configuration, errors and
//!   progress reporting.
//! - **[`workflows`]**: the entry points. Parse a string, a reader, a file, or a
//!   batch of files in parallel.
//!
//! ```ignore
//! use pdbtree::engine::config::ParseConfig;
//! use pdbtree::workflows::parse::parse_path;
//!
//! let document = parse_path("1lol.pdb", &ParseConfig::default())?;
//! for chain in document.model().into_iter().flat_map(|m| m.chains()) {
//!     println!("{} has {} residues", chain.chain_id, chain.len());
//! }
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
