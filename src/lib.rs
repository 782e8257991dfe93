#![forbid(unsafe_code)]
//! zfs-resource: query and destroy ZFS-style resources (datasets, volumes,
//! snapshots) through an injected storage engine.
//!
//! Model highlights:
//! - Every destroy request is classified, validated and planned before the
//!   engine sees a single call; invalid input never mutates anything.
//! - Plans run deepest-first and never stop early: each input path maps to
//!   `None` on success or its failure message.
//! - Whole-subtree work goes through the engine's atomic bulk program facility.
//! - Query results are flat records or a parent/child tree built in one pass.

pub mod adapters;
pub mod api;
pub mod constants;
pub mod logging;
pub mod namespace;
pub mod policy;
pub mod types;

pub use api::*;
