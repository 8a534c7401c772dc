//! # Workflows Module
//!
//! The public API of foldscope. Workflows tie the pure [`crate::core`] layer to
//! the stateful [`crate::engine`] layer and define how asynchronous work is
//! bound back into the registry.
//!
//! ## Overview
//!
//! Every workflow that involves slow work is split into a pure step, which may
//! run on any thread, and a completion step that mutates the registry. The pure
//! step never sees the registry; the completion step is keyed by the
//! [`StructureId`](crate::core::models::ids::StructureId) issued when the work
//! was requested, so completions may arrive in any order and completions for
//! entries that were removed in the meantime are discarded.
//!
//! ## Architecture
//!
//! - **File Loading** ([`load`]) - Submit an upload, parse it off-thread, bind the result
//! - **Job Structures** ([`jobs`]) - Register remotely predicted structures and merge job status
//! - **Analysis** ([`analyze`]) - Snapshot a molecule, compute its distogram, attach it

pub mod analyze;
pub mod jobs;
pub mod load;
