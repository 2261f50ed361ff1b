//! Town kernel: the authoritative map, its buildings and the player character.
//!
//! # Invariants
//! - Building footprints are both render rectangles and collision geometry.
//! - A character box is valid iff it lies inside the map and overlaps no
//!   building footprint, locked or not.
//! - Buildings are created with the town and never destroyed during a session.

pub mod building;
pub mod character;
pub mod town;

pub use building::{Building, TownMap};
pub use character::Character;
pub use town::{TimeOfDay, TownError, TownState, Weather};
