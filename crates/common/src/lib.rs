//! Shared types for the focus town workspace: entity ids, scene ids,
//! rectangle geometry, colours, building kinds and facing directions.
//!
//! # Invariants
//! - Building kinds serialise as their integer discriminant.
//! - Rectangle overlap is strict: rectangles that only touch do not collide.
//! - Vectors cross the JSON boundary as `{x, y}` objects.

pub mod types;
pub mod wire;

pub use glam::Vec2;
pub use types::{
    BuildingType, CharacterState, Direction, Entity, MAX_BUILDING_LEVEL, Rect, Rgba, SceneId,
    UnknownBuildingType,
};
