//! # Core Models Module
//!
//! Data structures describing a parsed structure file.
//!
//! ## Key Components
//!
//! - [`atom`] - A single ATOM/HETATM record with its coordinates and labels
//! - [`molecule`] - An ordered, immutable list of atoms read from one source
//! - [`ids`] - Stable identifiers for loaded structures
//!
//! ## Usage
//!
//! ```ignore
//! use foldscope::core::io::{pdb::PdbFile, traits::StructureFile};
//!
//! let molecule = PdbFile::read_str("1abc.pdb", &text);
//! for atom in molecule.atoms() {
//!     println!("{} {} {}", atom.chain, atom.residue, atom.residue_id);
//! }
//! ```

pub mod atom;
pub mod ids;
pub mod molecule;
