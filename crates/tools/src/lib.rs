//! Developer tooling: read-only inspection of a running town session.
//!
//! # Invariants
//! - The inspector never mutates what it inspects.

pub mod inspector;

pub use inspector::{EntityInfo, TownInspector, WorldSummary};
