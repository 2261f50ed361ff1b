//! Player locomotion for the town map.
//!
//! [`MovementSystem`] turns a raw per-frame input direction into a new
//! character position, velocity, facing and locomotion state, resolving
//! collisions against building footprints and the map edge.
//!
//! # Invariants
//!
//! - A resolved position is always a valid position: the character box lies
//!   inside the map and overlaps no building, locked or not.
//! - Buildings are checked before map edges; the first building in map order
//!   that overlaps is the one reported.
//! - Acceleration and deceleration never overshoot their target and snap to
//!   it exactly once the remainder fits in one frame's budget.
//! - Notifications are edge-triggered and queued; nothing is delivered until
//!   the caller drains [`MovementSystem::drain_events`].

pub mod animation;
pub mod collision;
pub mod config;
pub mod system;

pub use animation::{AnimationPlayer, IDLE_CLIP, clip_for};
pub use collision::{Collision, CollisionKind};
pub use config::MovementConfig;
pub use system::{
    CHARACTER_SIZE, MIN_MOVEMENT_THRESHOLD, MovementEvent, MovementState, MovementSystem,
    POSITION_EPSILON,
};
