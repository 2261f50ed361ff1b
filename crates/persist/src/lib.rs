//! Save files for a town session: a checksummed JSON envelope, a single
//! slot with one backup, and a frame-driven auto-save timer.
//!
//! # Invariants
//!
//! - A save is only written after the previous one has been copied to the
//!   backup slot.
//! - A loaded save always passes its schema and checksum checks; a save that
//!   fails either is never returned.
//! - The auto-save interval is never below [`MIN_AUTOSAVE_INTERVAL`].

pub mod autosave;
pub mod save;
pub mod store;

pub use autosave::{AutoSave, AutoSaveConfig, MIN_AUTOSAVE_INTERVAL};
pub use save::{SAVE_SCHEMA_VERSION, SaveGame};
pub use store::{BACKUP_FILE, Loaded, SAVE_FILE, SaveSource, SaveStore, StoreError};
