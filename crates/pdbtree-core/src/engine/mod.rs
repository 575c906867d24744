//! # Engine Module
//!
//! Turns flat decoded records into structure.
//!
//! - **Grouping** ([`grouping`]) - Single-pass adjacent-run grouping of atom
//!   records into residues, molecules and chains
//! - **Assembly** ([`assembler`]) - Builds the domain document, including
//!   per-model complexes
//! - **Configuration** ([`config`]) - Parse options and their builder
//! - **Error Handling** ([`error`]) - The error type returned by every fallible
//!   entry point
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events

pub mod assembler;
pub mod config;
pub mod error;
pub mod grouping;
pub mod progress;
