//! Policy configuration for destroy protection and query defaults.
//!
//! Consumers typically construct a [`Policy`](crate::policy::Policy) via
//! `Policy::default()` or `Policy::permissive()` and then customize fields
//! before creating a [`ZfsResource`](crate::ZfsResource) instance.
//!
//! Submodules:
//! - `config`: policy struct and presets
//! - `types`: grouped policy sections

pub mod config;
pub mod types;

pub use config::Policy;
