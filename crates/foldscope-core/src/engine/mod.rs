//! # Engine Module
//!
//! The stateful layer of foldscope. It owns everything that changes while a
//! viewer session runs: the set of loaded structures, the bindings between
//! uploaded files and those structures, the active selection and the shared
//! rendering configuration.
//!
//! ## Architecture
//!
//! - **Registry** ([`registry`]) - Sole owner of structures, file bindings and the selection
//! - **Structures** ([`structure`]) - Registry entries and uploaded-file bindings
//! - **Metadata** ([`metadata`]) - Optional analysis/job fields and their merge rule
//! - **Viewer** ([`viewer`]) - Shared view mode, coloring, visibility and highlight state
//! - **Progress Monitoring** ([`progress`]) - Load and analysis events for front ends
//! - **Error Handling** ([`error`]) - Errors surfaced to callers of the workflows
//!
//! ## Consistency Model
//!
//! All mutation happens through `&mut` on a single logical thread, so the
//! registry needs no locking. Each operation completes its whole change before
//! returning, and none of them fail: references to entries that no longer exist
//! are ignored, because asynchronous completions routinely arrive after the
//! entry they target was removed.

pub mod error;
pub mod metadata;
pub mod progress;
pub mod registry;
pub mod structure;
pub mod viewer;
