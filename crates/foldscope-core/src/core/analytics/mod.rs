//! Pure analytics over a [`Molecule`](crate::core::models::molecule::Molecule).
//!
//! Every function here is side-effect free and recomputes its result from the
//! atom list; callers decide when (and on which thread) to run them and where to
//! keep the results.
//!
//! - [`statistics`] - Atom, element, residue and chain counts in one linear pass
//! - [`distogram`] - Pairwise inter-residue distance matrix
//! - [`sequence`] - One-letter chain sequences for a sequence viewer

pub mod distogram;
pub mod sequence;
pub mod statistics;
