//! The single owner of a running town.
//!
//! Per frame: movement, player entity sync, bounds, interactions, wanderers,
//! animations, focus timer, progression events, town clock, auto-save. Every
//! subsystem is borrowed for one call at a time.

use crate::config::AppConfig;
use crate::script::Step;
use focustown_common::{BuildingType, Entity, Rect, Rgba, SceneId};
use focustown_ecs::systems::{
    advance_animations, move_player, sync_bounds, update_interactions, update_wanderers,
};
use focustown_ecs::{
    BuildingInterior, GuiKind, InteractionTarget, LibraryData, PlayerInput, Position, SceneTracker,
    SplitMix64, Sprite, TodoListData, World,
};
use focustown_input::{Action, InputState};
use focustown_kernel::TownState;
use focustown_movement::{AnimationPlayer, CHARACTER_SIZE, MovementSystem};
use focustown_persist::{AutoSave, Loaded, SaveGame, SaveSource, SaveStore, StoreError};
use focustown_pomodoro::{FocusStats, Phase, PomodoroEvent, PomodoroTimer};
use focustown_progression::{Ledger, ProgressionEngine, ProgressionError, ProgressionEvent, Wallet};
use focustown_tools::TownInspector;
use glam::Vec2;

const INTERIOR_SIZE: Vec2 = Vec2::new(1024.0, 768.0);
const INTERIOR_SPAWN: Vec2 = Vec2::new(496.0, 560.0);
const DOOR_SIZE: Vec2 = Vec2::new(64.0, 96.0);
const DOOR_MARGIN: f32 = 10.0;
const NPC_SIZE: f32 = 32.0;
/// Entrance zones start this far inside the footprint and reach below it.
const ENTRANCE_OVERLAP: f32 = 8.0;
const ENTRANCE_DEPTH: f32 = 24.0;
const BUBBLE_OFFSET: Vec2 = Vec2::new(0.0, -40.0);
const WANDER_SPEED: f32 = 40.0;
const WANDER_MIN_TIME: f32 = 1.0;
const WANDER_MAX_TIME: f32 = 3.0;
const TOWNSFOLK: [(f32, f32); 2] = [(300.0, 650.0), (820.0, 620.0)];
const CHARACTER_CLIPS: [&str; 5] = ["idle", "walk_up", "walk_down", "walk_left", "walk_right"];

/// Interior scene for a building kind. The town is scene 0.
pub fn interior_scene(kind: BuildingType) -> SceneId {
    SceneId(u32::from(kind.index()) + 1)
}

fn kind_of_scene(scene: SceneId) -> Option<BuildingType> {
    let index = scene.0.checked_sub(1)?;
    BuildingType::try_from(u8::try_from(index).ok()?).ok()
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    EnteredBuilding { kind: BuildingType },
    BuildingLocked { name: String },
    ExitedBuilding { kind: BuildingType },
    Interacted { kind: String },
    Progression(ProgressionEvent),
    Focus(PomodoroEvent),
    /// XP for `kind` and the same amount of currency.
    FocusRewarded { kind: BuildingType, reward: u32 },
    AutoSaved,
}

#[derive(Debug, Clone)]
struct BuildingEntity {
    entity: Entity,
    id: String,
    kind: BuildingType,
}

/// Character clip playback as far as a headless run can tell.
#[derive(Debug, Default)]
struct ClipPlayer {
    playing: String,
    elapsed: f32,
}

impl AnimationPlayer for ClipPlayer {
    fn play_animation(&mut self, name: &str) {
        self.playing = name.to_owned();
        self.elapsed = 0.0;
    }

    fn update(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    fn has_animation(&self, name: &str) -> bool {
        CHARACTER_CLIPS.iter().any(|clip| *clip == name)
    }
}

pub struct Session {
    config: AppConfig,
    store: SaveStore,
    world: World,
    town: TownState,
    movement: MovementSystem,
    progression: ProgressionEngine,
    wallet: Wallet,
    pomodoro: PomodoroTimer,
    /// Building credited for the running work phase.
    focus_kind: Option<BuildingType>,
    scenes: SceneTracker,
    input: InputState,
    rng: SplitMix64,
    autosave: AutoSave,
    clips: ClipPlayer,
    player: Entity,
    buildings: Vec<BuildingEntity>,
    interiors: Vec<(BuildingType, Entity)>,
    events: Vec<SessionEvent>,
}

impl Session {
    /// A fresh town. The save directory is created but not read.
    pub fn new(config: AppConfig) -> Result<Self, StoreError> {
        let store = open_store(&config)?;
        Ok(Self::assemble(
            config,
            store,
            TownState::new(),
            ProgressionEngine::new(),
            Wallet::default(),
            FocusStats::default(),
        ))
    }

    /// Continue from the save in `config.save_dir`, or start fresh when
    /// there is none. Also reports which file the save came from.
    ///
    /// A saved character position that overlaps a building or leaves the
    /// map is replaced by a spawn point.
    pub fn resume(config: AppConfig) -> Result<(Self, Option<SaveSource>), StoreError> {
        let store = open_store(&config)?;
        match store.load() {
            Ok(Loaded { save, source }) => {
                let mut progression = ProgressionEngine::new();
                progression.restore(&save.progression);
                let mut town = save.town;
                town.respawn_if_blocked();
                let focus = save.focus;
                let session = Self::assemble(config, store, town, progression, save.wallet, focus);
                Ok((session, Some(source)))
            }
            Err(StoreError::NoSave) => {
                let session = Self::assemble(
                    config,
                    store,
                    TownState::new(),
                    ProgressionEngine::new(),
                    Wallet::default(),
                    FocusStats::default(),
                );
                Ok((session, None))
            }
            Err(e) => Err(e),
        }
    }

    fn assemble(
        config: AppConfig,
        store: SaveStore,
        mut town: TownState,
        progression: ProgressionEngine,
        wallet: Wallet,
        focus: FocusStats,
    ) -> Self {
        for kind in BuildingType::UPGRADABLE {
            town.set_building_level(kind, progression.building_level(kind));
        }
        let mut world = World::new();
        let buildings = spawn_buildings(&mut world, &town, &progression);
        let interiors = spawn_interiors(&mut world, &progression);
        let player = spawn_player(&mut world, &town, config.movement.base_speed);
        spawn_townsfolk(&mut world);
        sync_bounds(&mut world);
        tracing::debug!(entities = world.entity_count(), "session assembled");

        Self {
            movement: MovementSystem::new(config.movement, &town),
            rng: SplitMix64::new(config.seed),
            autosave: AutoSave::new(&config.autosave),
            pomodoro: PomodoroTimer::new(config.pomodoro).with_stats(focus),
            config,
            store,
            world,
            town,
            progression,
            wallet,
            focus_kind: None,
            scenes: SceneTracker::new(),
            input: InputState::new(),
            clips: ClipPlayer::default(),
            player,
            buildings,
            interiors,
            events: Vec::new(),
        }
    }

    pub fn press(&mut self, action: Action) {
        self.input.press(action);
    }

    pub fn release(&mut self, action: Action) {
        self.input.release(action);
    }

    /// Hold the step's actions for its frame count, then let go.
    pub fn run_step(&mut self, step: &Step) {
        for &action in &step.actions {
            self.input.press(action);
        }
        for _ in 0..step.frames {
            self.step(self.config.frame_dt);
        }
        self.input.release_all();
    }

    /// Advance one frame.
    pub fn step(&mut self, dt: f32) {
        let mut intent = self.input.move_input();
        if self.is_frozen() {
            intent.direction = Vec2::ZERO;
        }
        let scene = self.scenes.current();
        if scene.is_main() {
            self.movement
                .update(dt, intent.direction, intent.run, &mut self.town);
            for event in self.movement.drain_events() {
                tracing::trace!(?event, "movement");
            }
            let at = self.town.character().position;
            self.world.add_position(self.player, at.x, at.y);
            self.movement.drive_animation(&mut self.clips, dt);
        } else {
            let arena = self.arena(scene);
            move_player(&mut self.world, dt, scene, arena, intent.direction);
        }

        sync_bounds(&mut self.world);
        let target = update_interactions(&mut self.world, scene);
        self.handle_presses(target);

        let scene = self.scenes.current();
        let arena = self.arena(scene);
        update_wanderers(&mut self.world, dt, scene, arena, &mut self.rng);
        advance_animations(&mut self.world, dt);
        self.pomodoro.update(dt);
        self.apply_pomodoro_events();
        self.apply_progression_events();
        self.town.update(dt);

        if self.autosave.tick(dt) {
            match self.save() {
                Ok(()) => self.events.push(SessionEvent::AutoSaved),
                Err(e) => tracing::warn!(error = %e, "auto-save failed"),
            }
        }
        self.input.end_frame();
    }

    fn handle_presses(&mut self, target: Option<InteractionTarget>) {
        if self.input.was_pressed(Action::Interact) {
            match target {
                Some(InteractionTarget::Building {
                    entity,
                    name,
                    interior,
                }) => self.enter(entity, name, interior),
                Some(InteractionTarget::ExitDoor { .. }) => self.leave(),
                Some(InteractionTarget::Interactable { kind, .. }) => {
                    tracing::debug!(kind = kind.as_str(), "interacted");
                    let barista = kind == "barista";
                    self.events.push(SessionEvent::Interacted { kind });
                    if barista && !self.pomodoro.is_active() {
                        self.start_focus(BuildingType::CoffeeShop, None);
                    }
                }
                None => {}
            }
        }
        if self.input.was_pressed(Action::Exit) {
            self.leave();
        }
    }

    fn enter(&mut self, entity: Entity, name: String, interior: SceneId) {
        let Some(building) = self.buildings.iter().find(|b| b.entity == entity) else {
            return;
        };
        if !self.town.can_interact_with_building(&building.id) {
            self.events.push(SessionEvent::BuildingLocked { name });
            return;
        }
        let kind = building.kind;
        self.movement.stop();
        if self
            .scenes
            .enter_building(&mut self.world, self.player, interior, INTERIOR_SPAWN)
        {
            self.world.add_scene(self.player, interior);
            self.events.push(SessionEvent::EnteredBuilding { kind });
        }
    }

    fn leave(&mut self) {
        let from = self.scenes.current();
        if self.scenes.exit_to_main(&mut self.world, self.player) {
            if self.pomodoro.is_active() {
                self.stop_focus();
            }
            self.world.add_scene(self.player, SceneId::MAIN);
            if let Some(kind) = kind_of_scene(from) {
                self.events.push(SessionEvent::ExitedBuilding { kind });
            }
        }
    }

    fn arena(&self, scene: SceneId) -> Rect {
        let size = if scene.is_main() {
            self.town.town_map().size
        } else {
            INTERIOR_SIZE
        };
        Rect::new(0.0, 0.0, size.x, size.y)
    }

    /// Mirror queued progression events onto the town and the world.
    fn apply_progression_events(&mut self) {
        for event in self.progression.drain_events() {
            match &event {
                ProgressionEvent::BuildingUpgraded { kind, level } => {
                    self.town.set_building_level(*kind, *level);
                    self.refresh_visuals(*kind);
                }
                ProgressionEvent::DecorationPlaced { kind, id } => {
                    for b in self.buildings.iter().filter(|b| b.kind == *kind) {
                        self.town.add_decoration_to_building(&b.id, id);
                    }
                }
                ProgressionEvent::DecorationPurchased { .. }
                | ProgressionEvent::UpgradeReady { .. } => {}
            }
            self.events.push(SessionEvent::Progression(event));
        }
    }

    fn refresh_visuals(&mut self, kind: BuildingType) {
        let exterior = self.progression.building_exterior_sprite(kind);
        for b in self.buildings.iter().filter(|b| b.kind == kind) {
            if let Some(sprite) = self.world.get_mut::<Sprite>(b.entity) {
                sprite.texture_path = exterior.clone();
                sprite.texture = None;
                sprite.loaded = false;
            }
        }
        if let Some((_, room)) = self.interiors.iter().find(|(k, _)| *k == kind) {
            if let Some(interior) = self.world.get_mut::<BuildingInterior>(*room) {
                interior.game_background = self.progression.building_interior_background(kind);
                interior.game_color = self.progression.building_ambient_color(kind);
                interior.background = None;
                interior.textures_loaded = false;
            }
        }
    }

    /// Pay out and mirror queued timer events. The player is frozen from
    /// the start of a work phase until it completes or is interrupted.
    fn apply_pomodoro_events(&mut self) {
        for event in self.pomodoro.drain_events() {
            let work = event.phase().is_work();
            if work && event.ends_phase() {
                self.set_frozen(false);
            } else if work && matches!(event, PomodoroEvent::Started { .. }) {
                self.set_frozen(true);
            }
            let reward = event.reward();
            if reward > 0 {
                let kind = self.focus_kind.unwrap_or(BuildingType::CoffeeShop);
                self.progression.add_building_xp(kind, reward);
                self.wallet.award(reward, "focus session");
                tracing::debug!(%kind, reward, "focus rewarded");
                let rewarded = SessionEvent::FocusRewarded { kind, reward };
                self.events.push(rewarded);
            }
            self.events.push(SessionEvent::Focus(event));
        }
    }

    fn set_frozen(&mut self, frozen: bool) {
        if let Some(input) = self.world.get_mut::<PlayerInput>(self.player) {
            input.frozen = frozen;
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.world
            .get::<PlayerInput>(self.player)
            .is_some_and(|input| input.frozen)
    }

    /// Start a work phase credited to `kind`, for `minutes` or the configured
    /// length. A phase already running is interrupted and paid out first.
    pub fn start_focus(&mut self, kind: BuildingType, minutes: Option<u32>) {
        self.pomodoro.stop();
        self.apply_pomodoro_events();
        self.focus_kind = Some(kind);
        self.pomodoro.start(Phase::Work, minutes);
        self.apply_pomodoro_events();
        self.apply_progression_events();
    }

    /// Start a break, long when one is due. Returns the phase started.
    pub fn start_break(&mut self) -> Phase {
        let phase = if self.pomodoro.should_suggest_long_break() {
            Phase::LongBreak
        } else {
            Phase::ShortBreak
        };
        self.pomodoro.start(phase, None);
        self.apply_pomodoro_events();
        self.apply_progression_events();
        phase
    }

    pub fn pause_focus(&mut self) -> bool {
        let paused = self.pomodoro.pause();
        self.apply_pomodoro_events();
        paused
    }

    pub fn resume_focus(&mut self) -> bool {
        let resumed = self.pomodoro.resume();
        self.apply_pomodoro_events();
        resumed
    }

    /// End the current phase early. Work is paid for the whole minutes it ran.
    pub fn stop_focus(&mut self) -> bool {
        let stopped = self.pomodoro.stop();
        self.apply_pomodoro_events();
        self.apply_progression_events();
        stopped
    }

    /// Let `seconds` pass with no input held, one second per frame.
    pub fn wait(&mut self, seconds: u32) {
        for _ in 0..seconds {
            self.step(1.0);
        }
    }

    pub fn upgrade(&mut self, kind: BuildingType) -> Result<u32, ProgressionError> {
        let level = self
            .progression
            .try_upgrade_building(kind, &mut self.wallet)?;
        self.apply_progression_events();
        Ok(level)
    }

    pub fn purchase(&mut self, id: &str) -> Result<(), ProgressionError> {
        self.progression
            .try_purchase_decoration(id, &mut self.wallet)?;
        self.apply_progression_events();
        Ok(())
    }

    pub fn place(
        &mut self,
        kind: BuildingType,
        id: &str,
        x: f32,
        y: f32,
    ) -> Result<(), ProgressionError> {
        self.progression.try_place_decoration(kind, id, x, y)?;
        self.apply_progression_events();
        Ok(())
    }

    /// Move the character in town. False when the spot is blocked.
    pub fn teleport(&mut self, position: Vec2) -> bool {
        if !self.movement.teleport(position, &mut self.town) {
            return false;
        }
        let at = self.town.character().position;
        self.world.add_position(self.player, at.x, at.y);
        sync_bounds(&mut self.world);
        true
    }

    /// Write the current state, keeping the previous save as the backup.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let save = SaveGame::new(
            self.town.clone(),
            self.progression.snapshot(),
            self.wallet.clone(),
            self.pomodoro.stats(),
        )?;
        self.store.save(&save)?;
        self.autosave.reset();
        Ok(())
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn town(&self) -> &TownState {
        &self.town
    }

    pub fn movement(&self) -> &MovementSystem {
        &self.movement
    }

    pub fn progression(&self) -> &ProgressionEngine {
        &self.progression
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn pomodoro(&self) -> &PomodoroTimer {
        &self.pomodoro
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    pub fn scene(&self) -> SceneId {
        self.scenes.current()
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn player_position(&self) -> Option<Vec2> {
        let pos = self.world.get::<Position>(self.player)?;
        Some(pos.to_vec2())
    }

    pub fn status_line(&self) -> String {
        let pos = self.player_position().unwrap_or_default();
        let place = match kind_of_scene(self.scene()) {
            Some(kind) => kind.display_name(),
            None => "Town",
        };
        format!(
            "{place} at ({:.1}, {:.1}), facing {}, balance {}",
            pos.x,
            pos.y,
            self.movement.facing().as_str(),
            self.wallet.balance()
        )
    }

    pub fn report(&self) -> Vec<String> {
        let mut lines = TownInspector::report(
            &self.world,
            self.scenes.current(),
            &self.town,
            &self.movement,
            &self.progression,
            &self.wallet,
        );
        lines.extend(self.pomodoro.debug_info());
        lines
    }
}

fn open_store(config: &AppConfig) -> Result<SaveStore, StoreError> {
    let store = SaveStore::open(&config.save_dir)?;
    Ok(store.with_compression(config.autosave.compress))
}

fn spawn_buildings(
    world: &mut World,
    town: &TownState,
    progression: &ProgressionEngine,
) -> Vec<BuildingEntity> {
    let mut spawned = Vec::new();
    for b in &town.town_map().buildings {
        let e = world.create_entity();
        world.add_position(e, b.position.x, b.position.y);
        world.add_sprite(
            e,
            progression.building_exterior_sprite(b.kind),
            b.size.x as u32,
            b.size.y as u32,
            Rgba::WHITE,
        );
        world.add_hitbox(e, b.size.x, b.size.y);
        world.add_building(e, b.name.clone(), interior_scene(b.kind));
        world.add_scene(e, SceneId::MAIN);
        world.add_interaction_zone(
            e,
            b.size.x,
            ENTRANCE_DEPTH,
            Vec2::new(0.0, b.size.y - ENTRANCE_OVERLAP),
        );
        world.add_speech_bubble(e, "", BUBBLE_OFFSET);
        spawned.push(BuildingEntity {
            entity: e,
            id: b.id.clone(),
            kind: b.kind,
        });
    }
    spawned
}

/// Who stands inside each building: display name, prompt, interaction tag.
fn host(kind: BuildingType) -> (&'static str, &'static str, &'static str) {
    match kind {
        BuildingType::CoffeeShop => ("Barista", "Start Pomodoro (X)", "barista"),
        BuildingType::Library => ("Librarian", "Talk to Librarian (X)", "librarian"),
        BuildingType::BulletinBoard => ("Task Board", "Review Tasks (X)", "task_board"),
        BuildingType::Gym => ("Trainer", "Start Workout (X)", "trainer"),
        BuildingType::Home | BuildingType::Decoration => ("Desk", "Use Desk (X)", "desk"),
    }
}

fn spawn_interiors(
    world: &mut World,
    progression: &ProgressionEngine,
) -> Vec<(BuildingType, Entity)> {
    let mut rooms = Vec::new();
    for kind in BuildingType::UPGRADABLE {
        let scene = interior_scene(kind);

        let room = world.create_entity();
        world.add_building_interior(
            room,
            BuildingInterior {
                gui: if kind == BuildingType::CoffeeShop {
                    GuiKind::Pomodoro
                } else {
                    GuiKind::None
                },
                gui_background: String::new(),
                gui_color: Rgba::WHITE,
                game_background: progression.building_interior_background(kind),
                game_color: progression.building_ambient_color(kind),
                background: None,
                textures_loaded: false,
            },
        );
        world.add_scene(room, scene);
        match kind {
            BuildingType::Library => world.add_library_data(room, LibraryData::default()),
            BuildingType::BulletinBoard => world.add_todo_list_data(room, TodoListData::default()),
            _ => {}
        }

        let door = world.create_entity();
        world.add_position(
            door,
            (INTERIOR_SIZE.x - DOOR_SIZE.x) / 2.0,
            INTERIOR_SIZE.y - DOOR_SIZE.y - DOOR_MARGIN,
        );
        world.add_sprite(
            door,
            "door.png",
            DOOR_SIZE.x as u32,
            DOOR_SIZE.y as u32,
            Rgba::BROWN,
        );
        world.add_hitbox(door, DOOR_SIZE.x, DOOR_SIZE.y);
        world.add_interaction_zone(
            door,
            DOOR_SIZE.x + 20.0,
            DOOR_SIZE.y + 20.0,
            Vec2::splat(-10.0),
        );
        world.add_exit_door(door, "Exit (E)");
        world.add_speech_bubble(door, "", BUBBLE_OFFSET);
        world.add_scene(door, scene);

        let (name, prompt, tag) = host(kind);
        let npc = world.create_entity();
        world.add_position(npc, (INTERIOR_SIZE.x - NPC_SIZE) / 2.0, 200.0);
        world.add_sprite(
            npc,
            format!("{tag}.png"),
            NPC_SIZE as u32,
            NPC_SIZE as u32,
            Rgba::WHITE,
        );
        world.add_hitbox(npc, NPC_SIZE, NPC_SIZE);
        world.add_interaction_zone(npc, NPC_SIZE + 40.0, NPC_SIZE + 40.0, Vec2::splat(-20.0));
        world.add_interactable(npc, name, prompt, tag);
        world.add_speech_bubble(npc, "", BUBBLE_OFFSET);
        world.add_scene(npc, scene);

        rooms.push((kind, room));
    }
    rooms
}

fn spawn_player(world: &mut World, town: &TownState, speed: f32) -> Entity {
    let at = town.character().position;
    let player = world.create_entity();
    world.add_position(player, at.x, at.y);
    world.add_sprite(
        player,
        "character.png",
        CHARACTER_SIZE.x as u32,
        CHARACTER_SIZE.y as u32,
        Rgba::WHITE,
    );
    world.add_hitbox(player, CHARACTER_SIZE.x, CHARACTER_SIZE.y);
    world.add_animation(
        player,
        4,
        0.15,
        CHARACTER_SIZE.x as u32,
        CHARACTER_SIZE.y as u32,
    );
    world.add_player_input(player, speed);
    world.add_player(player);
    world.add_scene(player, SceneId::MAIN);
    world.add_speech_bubble(player, "", BUBBLE_OFFSET);
    player
}

fn spawn_townsfolk(world: &mut World) {
    for (x, y) in TOWNSFOLK {
        let npc = world.create_entity();
        world.add_position(npc, x, y);
        world.add_sprite(npc, "townsfolk.png", 32, 32, Rgba::WHITE);
        world.add_hitbox(npc, NPC_SIZE, NPC_SIZE);
        world.add_animation(npc, 4, 0.2, 32, 32);
        world.add_ai_wander(npc, WANDER_SPEED, WANDER_MIN_TIME, WANDER_MAX_TIME);
        world.add_scene(npc, SceneId::MAIN);
    }
}
