//! # Scene Linker (The Loom)
//!
//! The expansion engine of Skein. This crate turns authored scenes whose
//! text carries inline conditional anchors into the full set of concrete,
//! condition-tagged scene variants that rendering consumes.
//!
//! ## Core Components
//!
//! - **anchor**: scanner for the `[passed|failed](?condition)` micro-grammar
//! - **expander**: combinatorial expansion of scene buckets into 2^k variants
//! - **error**: fatal error taxonomy for the compilation pass
//!
//! ## Design Philosophy
//!
//! - **Static**: conditions are never evaluated here; every assignment of
//!   condition truth-values is enumerated up front and tagged on its variant
//! - **Deterministic**: a single synchronous pass with an observable variant
//!   ordering that downstream rendering depends on
//! - **Total**: the pass either resolves every anchor in every bucket or
//!   aborts with a fatal error; no partially expanded story is handed on

pub mod anchor;
pub mod error;
pub mod expander;

pub use anchor::*;
pub use error::*;
pub use expander::*;
