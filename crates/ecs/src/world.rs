use crate::components::*;
use crate::view::{ComponentSet, EntityView};
use focustown_common::{Entity, Rect, Rgba, SceneId};
use glam::Vec2;
use std::collections::HashMap;

/// A component kind with its own typed store inside [`World`].
pub trait Component: Sized + 'static {
    fn store(world: &World) -> &HashMap<Entity, Self>;
    fn store_mut(world: &mut World) -> &mut HashMap<Entity, Self>;
}

macro_rules! component_stores {
    ($($ty:ty => $field:ident),* $(,)?) => {
        /// Entity registry plus one sparse map per component kind.
        ///
        /// Every store is keyed by [`Entity`]; iteration order comes from
        /// [`World::entities`], never from the maps themselves.
        #[derive(Debug, Default)]
        pub struct World {
            last_id: u32,
            entities: Vec<Entity>,
            $($field: HashMap<Entity, $ty>,)*
        }

        $(
            impl ComponentSet for $ty {
                fn matches(world: &World, entity: Entity) -> bool {
                    world.has::<$ty>(entity)
                }
            }

            impl Component for $ty {
                fn store(world: &World) -> &HashMap<Entity, Self> {
                    &world.$field
                }
                fn store_mut(world: &mut World) -> &mut HashMap<Entity, Self> {
                    &mut world.$field
                }
            }
        )*
    };
}

component_stores! {
    Position => positions,
    Sprite => sprites,
    Hitbox => hitboxes,
    Animation => animations,
    PlayerInput => player_inputs,
    BuildingLink => buildings,
    SpeechBubble => speech_bubbles,
    Scene => scenes,
    Player => players,
    InteractionZone => interaction_zones,
    BuildingInterior => building_interiors,
    AiWander => ai_wanders,
    ExitDoor => exit_doors,
    Interactable => interactables,
    LibraryData => library_data,
    TodoListData => todo_lists,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id. Ids start at 1 and are never reused.
    pub fn create_entity(&mut self) -> Entity {
        self.last_id += 1;
        let entity = Entity(self.last_id);
        self.entities.push(entity);
        tracing::trace!(%entity, "entity created");
        entity
    }

    /// Every entity ever created, in creation order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Insert or overwrite. Returns the value that was replaced.
    pub fn insert<C: Component>(&mut self, entity: Entity, component: C) -> Option<C> {
        C::store_mut(self).insert(entity, component)
    }

    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        C::store(self).get(&entity)
    }

    /// Borrow mutably. The borrow ends before the next structural change.
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        C::store_mut(self).get_mut(&entity)
    }

    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        C::store(self).contains_key(&entity)
    }

    /// Remove one component kind. The entity id itself stays registered.
    pub fn remove<C: Component>(&mut self, entity: Entity) -> Option<C> {
        C::store_mut(self).remove(&entity)
    }

    /// Number of entities carrying `C`.
    pub fn count<C: Component>(&self) -> usize {
        C::store(self).len()
    }

    /// Eager filter of [`entities`](Self::entities) down to those carrying all of `Q`.
    pub fn view<Q: ComponentSet>(&self) -> EntityView {
        EntityView::new::<Q>(self)
    }

    /// First entity marked as [`Player`].
    pub fn player(&self) -> Option<Entity> {
        self.entities
            .iter()
            .copied()
            .find(|e| self.has::<Player>(*e))
    }

    /// Scene the entity belongs to, if tagged.
    pub fn scene_of(&self, entity: Entity) -> Option<SceneId> {
        self.get::<Scene>(entity).map(|s| s.scene)
    }

    // --- Convenience constructors mirroring the component fields ---

    pub fn add_position(&mut self, entity: Entity, x: f32, y: f32) {
        self.insert(entity, Position::new(x, y));
    }

    pub fn add_sprite(
        &mut self,
        entity: Entity,
        texture_path: impl Into<String>,
        width: u32,
        height: u32,
        tint: Rgba,
    ) {
        self.insert(
            entity,
            Sprite {
                texture_path: texture_path.into(),
                texture: None,
                width,
                height,
                tint,
                loaded: false,
            },
        );
    }

    /// Bounds start at the entity's current position, or the origin when it has none.
    pub fn add_hitbox(&mut self, entity: Entity, width: f32, height: f32) {
        let origin = self.origin_of(entity);
        self.insert(
            entity,
            Hitbox {
                width,
                height,
                bounds: Rect::new(origin.x, origin.y, width, height),
                colliding: false,
            },
        );
    }

    pub fn add_animation(
        &mut self,
        entity: Entity,
        frame_count: u32,
        frame_time: f32,
        frame_width: u32,
        frame_height: u32,
    ) {
        self.insert(
            entity,
            Animation {
                frame_count,
                current_frame: 0,
                frame_time,
                timer: frame_time,
                frame_width,
                frame_height,
            },
        );
    }

    pub fn add_player_input(&mut self, entity: Entity, speed: f32) {
        self.insert(
            entity,
            PlayerInput {
                speed,
                controlled: true,
                frozen: false,
            },
        );
    }

    pub fn add_building(
        &mut self,
        entity: Entity,
        display_name: impl Into<String>,
        interior_scene: SceneId,
    ) {
        self.insert(
            entity,
            BuildingLink {
                display_name: display_name.into(),
                interior_scene,
            },
        );
    }

    pub fn add_speech_bubble(&mut self, entity: Entity, text: impl Into<String>, offset: Vec2) {
        self.insert(entity, SpeechBubble::new(text, offset));
    }

    pub fn add_scene(&mut self, entity: Entity, scene: SceneId) {
        self.insert(entity, Scene { scene });
    }

    pub fn add_player(&mut self, entity: Entity) {
        self.insert(entity, Player);
    }

    /// Bounds start at position + offset; an unpositioned entity gets origin bounds.
    pub fn add_interaction_zone(&mut self, entity: Entity, width: f32, height: f32, offset: Vec2) {
        let bounds = match self.get::<Position>(entity) {
            Some(p) => Rect::new(p.x + offset.x, p.y + offset.y, width, height),
            None => Rect::new(0.0, 0.0, width, height),
        };
        self.insert(
            entity,
            InteractionZone {
                width,
                height,
                offset,
                bounds,
            },
        );
    }

    pub fn add_building_interior(&mut self, entity: Entity, interior: BuildingInterior) {
        self.insert(entity, interior);
    }

    /// Starts paused with zeroed timers; the first wander tick picks a duration.
    pub fn add_ai_wander(&mut self, entity: Entity, speed: f32, min_time: f32, max_time: f32) {
        self.insert(
            entity,
            AiWander {
                speed,
                min_move_time: min_time,
                max_move_time: max_time,
                ..AiWander::default()
            },
        );
    }

    pub fn add_exit_door(&mut self, entity: Entity, display_text: impl Into<String>) {
        self.insert(
            entity,
            ExitDoor {
                display_text: display_text.into(),
                player_near: false,
            },
        );
    }

    pub fn add_interactable(
        &mut self,
        entity: Entity,
        name: impl Into<String>,
        prompt: impl Into<String>,
        kind: impl Into<String>,
    ) {
        self.insert(
            entity,
            Interactable {
                name: name.into(),
                prompt: prompt.into(),
                kind: kind.into(),
                player_near: false,
            },
        );
    }

    pub fn add_library_data(&mut self, entity: Entity, data: LibraryData) {
        self.insert(entity, data);
    }

    pub fn add_todo_list_data(&mut self, entity: Entity, data: TodoListData) {
        self.insert(entity, data);
    }

    fn origin_of(&self, entity: Entity) -> Vec2 {
        self.get::<Position>(entity)
            .map(|p| p.to_vec2())
            .unwrap_or(Vec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut w = World::new();
        let a = w.create_entity();
        let b = w.create_entity();
        assert_eq!(a, Entity(1));
        assert_eq!(b, Entity(2));
        assert_eq!(w.entities(), &[a, b]);
    }

    #[test]
    fn adding_one_kind_leaves_others_absent() {
        let mut w = World::new();
        let e = w.create_entity();
        w.add_position(e, 1.0, 2.0);
        assert!(w.has::<Position>(e));
        assert!(!w.has::<Hitbox>(e));
        assert!(!w.has::<Sprite>(e));
        assert!(!w.has::<Player>(e));
        assert!(w.get::<InteractionZone>(e).is_none());
    }

    #[test]
    fn re_adding_replaces_without_merge() {
        let mut w = World::new();
        let e = w.create_entity();
        w.add_position(e, 3.0, 4.0);
        w.add_position(e, 3.0, 4.0);
        assert_eq!(w.get::<Position>(e), Some(&Position::new(3.0, 4.0)));

        w.add_position(e, -1.0, 9.0);
        assert_eq!(w.get::<Position>(e), Some(&Position::new(-1.0, 9.0)));
        assert_eq!(w.count::<Position>(), 1);
    }

    #[test]
    fn hitbox_before_position_stays_at_origin() {
        let mut w = World::new();
        let e = w.create_entity();
        w.add_hitbox(e, 32.0, 32.0);
        let origin = Rect::new(0.0, 0.0, 32.0, 32.0);
        assert_eq!(w.get::<Hitbox>(e).unwrap().bounds, origin);

        w.add_position(e, 50.0, 60.0);
        assert_eq!(w.get::<Hitbox>(e).unwrap().bounds, origin);
    }

    #[test]
    fn hitbox_after_position_uses_it() {
        let mut w = World::new();
        let e = w.create_entity();
        w.add_position(e, 50.0, 60.0);
        w.add_hitbox(e, 16.0, 8.0);
        let bounds = w.get::<Hitbox>(e).unwrap().bounds;
        assert_eq!(bounds, Rect::new(50.0, 60.0, 16.0, 8.0));
    }

    #[test]
    fn zone_bounds_include_offset() {
        let mut w = World::new();
        let e = w.create_entity();
        w.add_position(e, 100.0, 100.0);
        w.add_interaction_zone(e, 40.0, 20.0, Vec2::new(-5.0, 30.0));
        let zone = w.get::<InteractionZone>(e).unwrap();
        assert_eq!(zone.bounds, Rect::new(95.0, 130.0, 40.0, 20.0));

        let lone = w.create_entity();
        w.add_interaction_zone(lone, 10.0, 10.0, Vec2::new(4.0, 4.0));
        assert_eq!(
            w.get::<InteractionZone>(lone).unwrap().bounds,
            Rect::new(0.0, 0.0, 10.0, 10.0)
        );
    }

    #[test]
    fn constructor_defaults() {
        let mut w = World::new();
        let e = w.create_entity();
        w.add_animation(e, 4, 0.2, 32, 32);
        w.add_player_input(e, 120.0);
        w.add_speech_bubble(e, "hi", SpeechBubble::DEFAULT_OFFSET);
        w.add_ai_wander(e, 60.0, 0.5, 2.0);

        let anim = w.get::<Animation>(e).unwrap();
        assert_eq!(anim.current_frame, 0);
        assert_eq!(anim.timer, 0.2);
        let input = w.get::<PlayerInput>(e).unwrap();
        assert!(input.controlled && !input.frozen);
        let bubble = w.get::<SpeechBubble>(e).unwrap();
        assert!(!bubble.active);
        assert_eq!(bubble.alpha, 1.0);
        let wander = w.get::<AiWander>(e).unwrap();
        assert!(!wander.moving);
        assert_eq!(wander.current_move_time, 0.0);
    }

    #[test]
    fn remove_keeps_entity_registered() {
        let mut w = World::new();
        let e = w.create_entity();
        w.add_exit_door(e, "Exit (E)");
        let door = w.remove::<ExitDoor>(e).unwrap();
        assert_eq!(door.display_text, "Exit (E)");
        assert!(!w.has::<ExitDoor>(e));
        assert_eq!(w.entities(), &[e]);
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut w = World::new();
        let e = w.create_entity();
        w.add_todo_list_data(e, TodoListData::default());
        {
            let todo = w.get_mut::<TodoListData>(e).unwrap();
            todo.push_task("write report");
            assert_eq!(todo.toggle(0), Some(true));
            assert_eq!(todo.toggle(5), None);
        }
        assert_eq!(w.get::<TodoListData>(e).unwrap().completed, vec![true]);
    }

    #[test]
    fn any_integer_id_can_key_components() {
        let mut w = World::new();
        let stray = Entity(999);
        w.add_position(stray, 1.0, 1.0);
        assert!(w.has::<Position>(stray));
        assert!(w.entities().is_empty());
    }
}
