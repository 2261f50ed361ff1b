use crate::world::{Component, World};
use focustown_common::Entity;

/// A set of component kinds an entity must carry to appear in a view.
///
/// Implemented for every component kind and for tuples of up to four kinds.
pub trait ComponentSet {
    fn matches(world: &World, entity: Entity) -> bool;
}

impl<A: Component, B: Component> ComponentSet for (A, B) {
    fn matches(world: &World, entity: Entity) -> bool {
        world.has::<A>(entity) && world.has::<B>(entity)
    }
}

impl<A: Component, B: Component, C: Component> ComponentSet for (A, B, C) {
    fn matches(world: &World, entity: Entity) -> bool {
        world.has::<A>(entity) && world.has::<B>(entity) && world.has::<C>(entity)
    }
}

impl<A: Component, B: Component, C: Component, D: Component> ComponentSet for (A, B, C, D) {
    fn matches(world: &World, entity: Entity) -> bool {
        world.has::<A>(entity)
            && world.has::<B>(entity)
            && world.has::<C>(entity)
            && world.has::<D>(entity)
    }
}

/// Entities matching a [`ComponentSet`] at construction time, in creation order.
///
/// The list is not kept live: rebuild the view after adding or removing components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityView {
    entities: Vec<Entity>,
}

impl EntityView {
    pub fn new<Q: ComponentSet>(world: &World) -> Self {
        let entities = world
            .entities()
            .iter()
            .copied()
            .filter(|e| Q::matches(world, *e))
            .collect();
        Self { entities }
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn first(&self) -> Option<Entity> {
        self.entities.first().copied()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }
}

impl IntoIterator for EntityView {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.into_iter()
    }
}
