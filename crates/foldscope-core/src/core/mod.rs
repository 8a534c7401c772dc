//! # Core Module
//!
//! Stateless building blocks of foldscope: the molecule data model, structure
//! file I/O, residue identifier tables and pure analytics.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms and molecules as parsed from a file
//! - **File I/O** ([`io`]) - Fixed-column PDB reading and structure format detection
//! - **Analytics** ([`analytics`]) - Statistics, distograms and chain sequences
//! - **Utilities** ([`utils`]) - Residue classification and one-letter code tables
//!
//! Nothing in this module holds state between calls; analytics are recomputed on
//! demand and never cached on a [`models::molecule::Molecule`].

pub mod analytics;
pub mod io;
pub mod models;
pub mod utils;
