//! # Core Module
//!
//! Stateless building blocks: reading and writing PDB records ([`io`]), the
//! domain hierarchy those records assemble into ([`models`]), and the
//! data-quality findings a parse can record ([`diagnostics`]).

pub mod diagnostics;
pub mod io;
pub mod models;
