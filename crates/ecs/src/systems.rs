//! Frame systems that only touch [`World`] data.
//!
//! Call order within a frame: position writers first, then [`sync_bounds`],
//! then [`update_interactions`], so proximity reads this frame's positions.

use crate::World;
use crate::components::*;
use crate::rng::SplitMix64;
use focustown_common::{Entity, Rect, SceneId};
use glam::Vec2;

/// What the player is standing next to after [`update_interactions`].
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionTarget {
    Building {
        entity: Entity,
        name: String,
        interior: SceneId,
    },
    ExitDoor {
        entity: Entity,
    },
    Interactable {
        entity: Entity,
        kind: String,
    },
}

/// Re-derive hitbox bounds from position and zone bounds from position + offset.
pub fn sync_bounds(world: &mut World) {
    for e in world.view::<(Position, Hitbox)>() {
        let Some(pos) = world.get::<Position>(e).copied() else {
            continue;
        };
        if let Some(hb) = world.get_mut::<Hitbox>(e) {
            hb.bounds = Rect::new(pos.x, pos.y, hb.width, hb.height);
        }
    }
    for e in world.view::<(Position, InteractionZone)>() {
        let Some(pos) = world.get::<Position>(e).copied() else {
            continue;
        };
        if let Some(zone) = world.get_mut::<InteractionZone>(e) {
            zone.bounds = Rect::new(
                pos.x + zone.offset.x,
                pos.y + zone.offset.y,
                zone.width,
                zone.height,
            );
        }
    }
}

fn reset_interaction_flags(world: &mut World) {
    for e in world.entities().to_vec() {
        if let Some(hb) = world.get_mut::<Hitbox>(e) {
            hb.colliding = false;
        }
        if let Some(bubble) = world.get_mut::<SpeechBubble>(e) {
            bubble.active = false;
            bubble.text.clear();
        }
        if let Some(door) = world.get_mut::<ExitDoor>(e) {
            door.player_near = false;
        }
        if let Some(item) = world.get_mut::<Interactable>(e) {
            item.player_near = false;
        }
    }
}

fn show_bubble(world: &mut World, entity: Entity, text: &str) {
    if let Some(bubble) = world.get_mut::<SpeechBubble>(entity) {
        bubble.active = true;
        bubble.text = text.to_owned();
    }
}

/// Refresh proximity flags and prompts for the current scene.
///
/// In the town, the first building whose zone overlaps the player wins and
/// the player's bubble reads `Enter\n<name>? (X)`. In interiors every exit
/// door and interactable gets its `player_near` flag, and those in range show
/// their own bubble. Returns the first thing the player is near, in entity order.
pub fn update_interactions(world: &mut World, scene: SceneId) -> Option<InteractionTarget> {
    reset_interaction_flags(world);
    sync_bounds(world);

    let player = world.player()?;
    let player_box = world.get::<Hitbox>(player)?.bounds;
    let zones = world.view::<InteractionZone>();
    let in_range = |world: &World, e: Entity| {
        e != player
            && world.scene_of(e) == Some(scene)
            && world
                .get::<InteractionZone>(e)
                .is_some_and(|z| z.bounds.overlaps(&player_box))
    };

    let mut target = None;
    if scene.is_main() {
        for e in zones.iter() {
            if !in_range(&*world, e) {
                continue;
            }
            let Some(link) = world.get::<BuildingLink>(e).cloned() else {
                continue;
            };
            show_bubble(world, player, &format!("Enter\n{}? (X)", link.display_name));
            tracing::trace!(entity = %e, building = %link.display_name, "player at building");
            target = Some(InteractionTarget::Building {
                entity: e,
                name: link.display_name,
                interior: link.interior_scene,
            });
            break;
        }
    } else {
        for e in zones.iter() {
            if world.scene_of(e) != Some(scene) {
                continue;
            }
            let near = in_range(&*world, e);
            if let Some(door) = world.get_mut::<ExitDoor>(e) {
                door.player_near = near;
                if near {
                    let text = door.display_text.clone();
                    show_bubble(world, e, &text);
                    if target.is_none() {
                        target = Some(InteractionTarget::ExitDoor { entity: e });
                    }
                }
            }
            if let Some(item) = world.get_mut::<Interactable>(e) {
                item.player_near = near;
                if near {
                    let (prompt, kind) = (item.prompt.clone(), item.kind.clone());
                    show_bubble(world, e, &prompt);
                    if target.is_none() {
                        target = Some(InteractionTarget::Interactable { entity: e, kind });
                    }
                }
            }
        }
    }

    if target.is_some() {
        if let Some(hb) = world.get_mut::<Hitbox>(player) {
            hb.colliding = true;
        }
    }
    target
}

/// Step every frame timer; wrap the frame index at `frame_count`.
pub fn advance_animations(world: &mut World, dt: f32) {
    for e in world.view::<Animation>() {
        if let Some(anim) = world.get_mut::<Animation>(e) {
            anim.timer -= dt;
            if anim.timer <= 0.0 {
                anim.timer = anim.frame_time;
                anim.current_frame = match anim.frame_count {
                    0 => 0,
                    n => (anim.current_frame + 1) % n,
                };
            }
        }
    }
}

fn random_direction(rng: &mut SplitMix64) -> Vec2 {
    let mut rx = rng.next_f32() * 2.0 - 1.0;
    let mut ry = rng.next_f32() * 2.0 - 1.0;
    if rx.abs() < 0.2 && ry.abs() < 0.2 {
        rx = if rx < 0.0 { -0.5 } else { 0.5 };
        ry = if ry < 0.0 { -0.5 } else { 0.5 };
    }
    Vec2::new(rx, ry).normalize()
}

fn blocked(world: &World, entity: Entity, bounds: Rect, scene: SceneId) -> bool {
    world.entities().iter().any(|&other| {
        other != entity
            && world.scene_of(other) == Some(scene)
            && world
                .get::<Hitbox>(other)
                .is_some_and(|hb| hb.bounds.overlaps(&bounds))
    })
}

/// Walk the controlled player inside an interior.
///
/// `direction` is raw input, each axis in `{-1, 0, 1}`, scaled by
/// `PlayerInput::speed`. A step that would overlap another hitbox in `scene`
/// is dropped. A frozen player stays put. Returns true when the player moved.
pub fn move_player(
    world: &mut World,
    dt: f32,
    scene: SceneId,
    arena: Rect,
    direction: Vec2,
) -> bool {
    let Some(player) = world.player() else {
        return false;
    };
    let (Some(input), Some(pos), Some(hb)) = (
        world.get::<PlayerInput>(player).copied(),
        world.get::<Position>(player).copied(),
        world.get::<Hitbox>(player).copied(),
    ) else {
        return false;
    };
    if !input.controlled || input.frozen || direction == Vec2::ZERO {
        return false;
    }
    let origin = pos.to_vec2();
    let min = Vec2::new(arena.x, arena.y);
    let max = Vec2::new(arena.right() - hb.width, arena.bottom() - hb.height);
    let step = origin + direction * input.speed * dt;
    let next = step.min(max).max(min);
    if next == origin || blocked(world, player, hb.bounds.at(next), scene) {
        return false;
    }
    world.insert(player, Position::from(next));
    if let Some(hb) = world.get_mut::<Hitbox>(player) {
        hb.bounds = hb.bounds.at(next);
    }
    true
}

/// Move wandering NPCs that belong to `scene`.
///
/// Each wanderer alternates between walking and pausing for a random
/// duration in `[min_move_time, max_move_time]`. A blocked step is retried on
/// the x axis alone, then on the y axis alone; if all three collide the
/// wanderer stops until its next timer flip. Positions stay inside `arena`.
/// Entities under player control are skipped.
pub fn update_wanderers(
    world: &mut World,
    dt: f32,
    scene: SceneId,
    arena: Rect,
    rng: &mut SplitMix64,
) {
    for e in world.view::<(AiWander, Position, Sprite, Hitbox)>() {
        if world.get::<PlayerInput>(e).is_some_and(|pi| pi.controlled) {
            continue;
        }
        if world.scene_of(e).is_some_and(|s| s != scene) {
            continue;
        }
        let (Some(mut wander), Some(pos), Some(hb), Some(sprite)) = (
            world.get::<AiWander>(e).copied(),
            world.get::<Position>(e).copied(),
            world.get::<Hitbox>(e).copied(),
            world.get::<Sprite>(e),
        ) else {
            continue;
        };
        let sprite_size = Vec2::new(sprite.width as f32, sprite.height as f32);

        wander.move_timer += dt;
        if wander.move_timer >= wander.current_move_time {
            wander.move_timer = 0.0;
            wander.moving = !wander.moving;
            wander.current_move_time = rng.range(wander.min_move_time, wander.max_move_time);
            wander.direction = if wander.moving {
                random_direction(rng)
            } else {
                Vec2::ZERO
            };
        }

        if wander.moving {
            let origin = pos.to_vec2();
            let step = wander.direction * wander.speed * dt;
            let attempts = [
                origin + step,
                origin + Vec2::new(step.x, 0.0),
                origin + Vec2::new(0.0, step.y),
            ];
            let next = attempts
                .into_iter()
                .find(|p| !blocked(world, e, hb.bounds.at(*p), scene))
                .unwrap_or_else(|| {
                    wander.moving = false;
                    origin
                });
            let max = Vec2::new(arena.right(), arena.bottom()) - sprite_size;
            let clamped = Vec2::new(
                next.x.min(max.x).max(arena.x),
                next.y.min(max.y).max(arena.y),
            );
            world.insert(e, Position::from(clamped));
            if let Some(hb) = world.get_mut::<Hitbox>(e) {
                hb.bounds = hb.bounds.at(clamped);
            }
        }
        world.insert(e, wander);
    }
}
