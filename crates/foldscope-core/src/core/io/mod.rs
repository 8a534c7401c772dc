//! Provides input functionality for structure files.
//!
//! The fixed-column PDB format is parsed locally into a
//! [`Molecule`](crate::core::models::molecule::Molecule); other structural formats
//! are recognized by extension and passed through as opaque text for an external
//! renderer. Reading only fails on I/O or text decoding, never on content.

pub mod error;
pub mod format;
pub mod pdb;
pub mod traits;
