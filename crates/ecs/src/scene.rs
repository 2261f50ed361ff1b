use crate::World;
use crate::components::{Hitbox, Position};
use focustown_common::{Entity, SceneId};
use glam::Vec2;

const NUDGE_STEP: f32 = 8.0;
const MAX_NUDGES: u32 = 50;

/// Tracks which scene is active and where the player stood before entering a building.
#[derive(Debug, Clone, Default)]
pub struct SceneTracker {
    current: SceneId,
    previous: SceneId,
    return_position: Option<Vec2>,
}

impl SceneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> SceneId {
        self.current
    }

    pub fn previous(&self) -> SceneId {
        self.previous
    }

    pub fn in_main(&self) -> bool {
        self.current.is_main()
    }

    /// Switch to `interior` and drop the player at `spawn`.
    ///
    /// If the spawn point overlaps a hitbox in the interior, the player is
    /// pushed right in 8-unit steps, at most 50 times. Returns false (and
    /// changes nothing) when the player has no position.
    pub fn enter_building(
        &mut self,
        world: &mut World,
        player: Entity,
        interior: SceneId,
        spawn: Vec2,
    ) -> bool {
        let Some(pos) = world.get::<Position>(player).copied() else {
            return false;
        };
        self.return_position = Some(pos.to_vec2());
        self.previous = self.current;
        self.current = interior;

        let mut at = spawn;
        if let Some(hb) = world.get::<Hitbox>(player).copied() {
            for _ in 0..MAX_NUDGES {
                let bounds = hb.bounds.at(at);
                let overlapping = world.entities().iter().any(|&other| {
                    other != player
                        && world.scene_of(other) == Some(interior)
                        && world
                            .get::<Hitbox>(other)
                            .is_some_and(|o| o.bounds.overlaps(&bounds))
                });
                if !overlapping {
                    break;
                }
                at.x += NUDGE_STEP;
            }
        }
        place(world, player, at);
        tracing::debug!(from = self.previous.0, to = interior.0, "entered building");
        true
    }

    /// Return to the town and restore the position saved on entry.
    /// Returns false when already in the town or the player has no position.
    pub fn exit_to_main(&mut self, world: &mut World, player: Entity) -> bool {
        if self.in_main() || !world.has::<Position>(player) {
            return false;
        }
        if let Some(back) = self.return_position.take() {
            place(world, player, back);
        }
        self.previous = self.current;
        self.current = SceneId::MAIN;
        tracing::debug!(from = self.previous.0, "returned to town");
        true
    }
}

fn place(world: &mut World, entity: Entity, at: Vec2) {
    world.insert(entity, Position::from(at));
    if let Some(hb) = world.get_mut::<Hitbox>(entity) {
        hb.bounds = hb.bounds.at(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAFE: SceneId = SceneId(1);

    #[test]
    fn enter_and_exit_restore_position() {
        let mut w = World::new();
        let player = w.create_entity();
        w.add_position(player, 300.0, 220.0);
        w.add_hitbox(player, 32.0, 32.0);

        let mut scenes = SceneTracker::new();
        assert!(scenes.enter_building(&mut w, player, CAFE, Vec2::new(40.0, 40.0)));
        assert_eq!(scenes.current(), CAFE);
        assert_eq!(w.get::<Position>(player), Some(&Position::new(40.0, 40.0)));

        assert!(scenes.exit_to_main(&mut w, player));
        assert!(scenes.in_main());
        assert_eq!(scenes.previous(), CAFE);
        assert_eq!(
            w.get::<Position>(player),
            Some(&Position::new(300.0, 220.0))
        );
        assert!(!scenes.exit_to_main(&mut w, player));
    }

    #[test]
    fn spawn_is_nudged_off_furniture() {
        let mut w = World::new();
        let player = w.create_entity();
        w.add_position(player, 0.0, 0.0);
        w.add_hitbox(player, 32.0, 32.0);
        let desk = w.create_entity();
        w.add_position(desk, 100.0, 100.0);
        w.add_hitbox(desk, 20.0, 20.0);
        w.add_scene(desk, CAFE);

        let mut scenes = SceneTracker::new();
        scenes.enter_building(&mut w, player, CAFE, Vec2::new(90.0, 100.0));
        let pos = w.get::<Position>(player).unwrap();
        // 90 -> 98 -> ... -> 122 is the first x clear of the desk's right edge at 120.
        assert_eq!(pos.x, 122.0);
        assert_eq!(w.get::<Hitbox>(player).unwrap().bounds.x, 122.0);
    }

    #[test]
    fn enter_without_position_is_refused() {
        let mut w = World::new();
        let ghost = w.create_entity();
        let mut scenes = SceneTracker::new();
        assert!(!scenes.enter_building(&mut w, ghost, CAFE, Vec2::ZERO));
        assert!(scenes.in_main());
    }
}
