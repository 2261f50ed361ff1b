use focustown_common::{BuildingType, Entity, SceneId};
use focustown_ecs::*;
use focustown_kernel::TownState;
use focustown_movement::MovementSystem;
use focustown_progression::{Ledger, ProgressionEngine};
use glam::Vec2;
use std::fmt;

/// Read-only queries for debug overlays and the CLI `info` command.
pub struct TownInspector;

macro_rules! component_names {
    ($world:expr, $entity:expr; $($ty:ty => $name:literal),* $(,)?) => {{
        let mut names = Vec::new();
        $(
            if $world.has::<$ty>($entity) {
                names.push($name);
            }
        )*
        names
    }};
}

impl TownInspector {
    pub fn summary(world: &World, scene: SceneId) -> WorldSummary {
        WorldSummary {
            scene,
            entity_count: world.entity_count(),
            positioned: world.count::<Position>(),
            buildings: world.count::<BuildingLink>(),
            wanderers: world.count::<AiWander>(),
            in_scene: world
                .entities()
                .iter()
                .filter(|&&e| world.scene_of(e) == Some(scene))
                .count(),
            player: world.player(),
        }
    }

    pub fn inspect_entity(world: &World, entity: Entity) -> Option<EntityInfo> {
        if !world.entities().contains(&entity) {
            return None;
        }
        let components = component_names!(world, entity;
            Position => "position",
            Sprite => "sprite",
            Hitbox => "hitbox",
            Animation => "animation",
            PlayerInput => "player_input",
            BuildingLink => "building",
            SpeechBubble => "speech_bubble",
            Scene => "scene",
            Player => "player",
            InteractionZone => "interaction_zone",
            BuildingInterior => "building_interior",
            AiWander => "ai_wander",
            ExitDoor => "exit_door",
            Interactable => "interactable",
            LibraryData => "library_data",
            TodoListData => "todo_list_data",
        );
        Some(EntityInfo {
            entity,
            position: world.get::<Position>(entity).map(|p| p.to_vec2()),
            scene: world.scene_of(entity),
            components,
        })
    }

    /// Entities in creation order.
    pub fn list_entities(world: &World) -> Vec<Entity> {
        world.entities().to_vec()
    }

    /// One line per upgradable building: level, XP, next step.
    pub fn progression_lines<L: Ledger + ?Sized>(
        engine: &ProgressionEngine,
        ledger: &L,
    ) -> Vec<String> {
        let mut lines = vec![
            "=== Progression ===".to_string(),
            format!("Balance: {}", ledger.balance()),
            format!("Decorations owned: {}", engine.purchased_ids().len()),
        ];
        for kind in BuildingType::UPGRADABLE {
            let level = engine.building_level(kind);
            let xp = engine.building_xp(kind);
            let next = match (
                engine.required_xp_for_next_level(kind),
                engine.upgrade_cost(kind),
            ) {
                (Some(required), Some(cost)) => {
                    let ready = if engine.can_upgrade_building(kind, ledger) {
                        " ready"
                    } else {
                        ""
                    };
                    format!("next: {required} xp, {cost} coins{ready}")
                }
                _ => "max level".to_string(),
            };
            let placed = engine.placed_decorations(kind).len();
            lines.push(format!(
                "  {kind}: level {level}, {xp} xp, {placed} placed, {next}"
            ));
        }
        lines
    }

    /// Every section a debug overlay shows, in display order.
    pub fn report<L: Ledger + ?Sized>(
        world: &World,
        scene: SceneId,
        town: &TownState,
        movement: &MovementSystem,
        engine: &ProgressionEngine,
        ledger: &L,
    ) -> Vec<String> {
        let mut lines = vec!["=== World ===".to_string()];
        lines.push(Self::summary(world, scene).to_string());
        lines.push("=== Town ===".to_string());
        lines.extend(town.debug_info());
        lines.extend(movement.debug_info());
        lines.extend(Self::progression_lines(engine, ledger));
        lines
    }
}

#[derive(Debug, Clone)]
pub struct WorldSummary {
    pub scene: SceneId,
    pub entity_count: usize,
    pub positioned: usize,
    pub buildings: usize,
    pub wanderers: usize,
    /// Entities tagged with `scene`.
    pub in_scene: usize,
    pub player: Option<Entity>,
}

impl fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "World: scene={} entities={} positioned={} buildings={} wanderers={} in_scene={}",
            self.scene.0,
            self.entity_count,
            self.positioned,
            self.buildings,
            self.wanderers,
            self.in_scene
        )?;
        match self.player {
            Some(p) => write!(f, " player={p}"),
            None => write!(f, " player=none"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub entity: Entity,
    pub position: Option<Vec2>,
    pub scene: Option<SceneId>,
    pub components: Vec<&'static str>,
}

impl fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity {}", self.entity)?;
        if let Some(p) = self.position {
            write!(f, " pos=({:.1}, {:.1})", p.x, p.y)?;
        }
        if let Some(s) = self.scene {
            write!(f, " scene={}", s.0)?;
        }
        write!(f, " [{}]", self.components.join(", "))
    }
}
