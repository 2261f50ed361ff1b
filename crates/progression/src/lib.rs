//! Building progression: per-building levels and XP, upgrade tables, and the
//! decoration catalog with purchase and placement rules.
//!
//! Currency lives outside the engine behind the [`Ledger`] trait; every call
//! that spends borrows a ledger for that call only.
//!
//! # Invariants
//!
//! - A building's level only changes through a successful upgrade, and then
//!   by exactly one, up to [`MAX_BUILDING_LEVEL`](focustown_common::MAX_BUILDING_LEVEL).
//! - XP never decreases.
//! - A failed mutating call leaves levels, XP, purchases, placements and the
//!   ledger balance exactly as they were.
//! - Authored upgrade tables take precedence; the scaling formula only covers
//!   levels the tables omit.

pub mod catalog;
pub mod engine;
pub mod ledger;
pub mod snapshot;
pub mod upgrades;
pub mod visuals;

pub use catalog::{Decoration, DecorationCategory, PlacedDecoration, default_catalog};
pub use engine::{PLACEMENT_TOLERANCE, ProgressionEngine, ProgressionError, ProgressionEvent};
pub use ledger::{Ledger, Wallet};
pub use snapshot::ProgressionSnapshot;
pub use upgrades::{BuildingUpgrade, upgrade_table};
