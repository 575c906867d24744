//! # Workflows Module
//!
//! Top-level entry points.
//!
//! - **Single input** ([`parse`]) - Parse a string, reader or file, with size
//!   limits and optional strict mode applied at the boundary
//! - **Batch** ([`batch`]) - Parse many files in parallel with progress reporting

pub mod batch;
pub mod parse;
