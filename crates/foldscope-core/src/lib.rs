//! # foldscope Core Library
//!
//! The structural-data subsystem behind a protein structure viewer: it turns
//! uploaded coordinate files into typed molecules, derives analytical summaries
//! from them, and keeps a consistent registry of loaded structures that several
//! independent views read while loads complete asynchronously and out of order.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `Atom`), the
//!   fixed-column PDB reader and format detection, and pure analytics
//!   (statistics, distograms, chain sequences).
//!
//! - **[`engine`]: The State Layer.** The `StructureRegistry` that owns loaded
//!   structures, their file bindings and the active selection, together with the
//!   shared `ViewerController` and progress reporting. Every registry mutation is
//!   atomic and total.
//!
//! - **[`workflows`]: The Public API.** The submit/complete protocol for file
//!   loads, job registration and result merging, and the request/attach protocol
//!   for analytics. These bind asynchronous completions to the identity they were
//!   issued for, so late results never resurrect deleted entries.

pub mod core;
pub mod engine;
pub mod workflows;
