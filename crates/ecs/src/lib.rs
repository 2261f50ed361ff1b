//! Entity store for the town: one typed sparse map per component kind,
//! eager multi-component views, and the frame systems that work purely on
//! world data (bounds sync, proximity prompts, animation timers, NPC wandering,
//! scene transitions).
//!
//! # Invariants
//! - Entity ids start at 1, increase monotonically and are never reused.
//! - A component exists for an entity iff it was inserted and not removed.
//! - Adding one component kind never creates another.
//! - Views are snapshots; they do not see later structural changes.

pub mod components;
pub mod rng;
pub mod scene;
pub mod systems;
pub mod view;
pub mod world;

pub use components::*;
pub use rng::SplitMix64;
pub use scene::SceneTracker;
pub use systems::InteractionTarget;
pub use view::{ComponentSet, EntityView};
pub use world::{Component, World};
