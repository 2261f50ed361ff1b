use crate::building::{Building, TownMap};
use crate::character::Character;
use focustown_common::{BuildingType, CharacterState, MAX_BUILDING_LEVEL};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Seconds of play between time-of-day changes.
const TIME_OF_DAY_PERIOD: f32 = 300.0;

/// Errors from loading a saved town.
#[derive(Debug, thiserror::Error)]
pub enum TownError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid town map: {0}")]
    InvalidMap(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    #[default]
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn next(self) -> Self {
        match self {
            TimeOfDay::Morning => TimeOfDay::Afternoon,
            TimeOfDay::Afternoon => TimeOfDay::Evening,
            TimeOfDay::Evening => TimeOfDay::Night,
            TimeOfDay::Night => TimeOfDay::Morning,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
}

/// Everything about the town that is not progression: map, character, clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownState {
    town_map: TownMap,
    character: Character,
    #[serde(rename = "currentTime", default)]
    time_of_day: TimeOfDay,
    #[serde(rename = "currentWeather", default)]
    weather: Weather,
    #[serde(skip)]
    clock: f32,
}

impl Default for TownState {
    fn default() -> Self {
        Self::new()
    }
}

impl TownState {
    /// Player spawn, just below Home's entrance.
    pub const DEFAULT_SPAWN: Vec2 = Vec2::new(498.0, 456.0);
    /// Reach used by [`find_nearest_building`](Self::find_nearest_building) callers.
    pub const INTERACTION_REACH: f32 = 50.0;

    /// The default town: 1024x768 with the five starting buildings.
    pub fn new() -> Self {
        let mut town_map = TownMap {
            size: Vec2::new(1024.0, 768.0),
            character_spawn_point: Self::DEFAULT_SPAWN,
            background_texture: "town_background.png".into(),
            buildings: Vec::new(),
        };
        for building in default_buildings() {
            town_map.add_building(building);
        }
        Self::with_map(town_map)
    }

    /// A town over an arbitrary map, with the character at its spawn point.
    pub fn with_map(town_map: TownMap) -> Self {
        let character = Character::new("Player", town_map.character_spawn_point);
        Self {
            town_map,
            character,
            time_of_day: TimeOfDay::default(),
            weather: Weather::default(),
            clock: 0.0,
        }
    }

    pub fn town_map(&self) -> &TownMap {
        &self.town_map
    }

    pub fn town_map_mut(&mut self) -> &mut TownMap {
        &mut self.town_map
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }

    pub fn set_character(&mut self, character: Character) {
        self.character = character;
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        self.time_of_day
    }

    pub fn set_time_of_day(&mut self, time: TimeOfDay) {
        self.time_of_day = time;
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn set_weather(&mut self, weather: Weather) {
        self.weather = weather;
    }

    /// Building whose entrance is closest to `position`, strictly within `max_distance`.
    pub fn find_nearest_building(&self, position: Vec2, max_distance: f32) -> Option<&Building> {
        let mut best: Option<(&Building, f32)> = None;
        for b in &self.town_map.buildings {
            let d = b.entrance_position.distance(position);
            if d < best.map_or(max_distance, |(_, bd)| bd) {
                best = Some((b, d));
            }
        }
        best.map(|(b, _)| b)
    }

    pub fn buildings_in_range(&self, position: Vec2, range: f32) -> Vec<&Building> {
        self.town_map.buildings_near(position, range)
    }

    pub fn can_interact_with_building(&self, id: &str) -> bool {
        self.town_map.find_building(id).is_some_and(|b| b.unlocked)
    }

    pub fn unlock_building(&mut self, id: &str) -> bool {
        let Some(b) = self.town_map.find_building_mut(id) else {
            return false;
        };
        b.unlocked = true;
        tracing::debug!(building = id, "unlocked");
        true
    }

    /// Raise an unlocked building one level, up to the cap.
    pub fn upgrade_building(&mut self, id: &str) -> bool {
        match self.town_map.find_building_mut(id) {
            Some(b) if b.unlocked && b.level < MAX_BUILDING_LEVEL => {
                b.level += 1;
                tracing::debug!(building = id, level = b.level, "upgraded");
                true
            }
            _ => false,
        }
    }

    /// Mirror a progression level onto every building of `kind`. Returns how many changed.
    pub fn set_building_level(&mut self, kind: BuildingType, level: u32) -> usize {
        let level = level.clamp(1, MAX_BUILDING_LEVEL);
        let mut changed = 0;
        let buildings = self.town_map.buildings.iter_mut();
        for b in buildings.filter(|b| b.kind == kind) {
            if b.level != level {
                b.level = level;
                changed += 1;
            }
        }
        changed
    }

    /// Attach a decoration id to an unlocked building; duplicates are ignored.
    pub fn add_decoration_to_building(&mut self, id: &str, decoration_id: &str) -> bool {
        match self.town_map.find_building_mut(id) {
            Some(b) if b.unlocked && !b.decorations.iter().any(|d| d == decoration_id) => {
                b.decorations.push(decoration_id.to_owned());
                true
            }
            _ => false,
        }
    }

    /// Advance the town clock. The time of day rotates every five minutes.
    pub fn update(&mut self, dt: f32) {
        self.clock += dt;
        if self.clock >= TIME_OF_DAY_PERIOD {
            self.clock = 0.0;
            self.time_of_day = self.time_of_day.next();
            tracing::debug!(time = ?self.time_of_day, "time of day changed");
        }
    }

    /// Back to a fresh game on the same map: only Home unlocked, all at level 1.
    pub fn reset(&mut self) {
        self.character = Character::new("Player", self.town_map.character_spawn_point);
        self.time_of_day = TimeOfDay::default();
        self.weather = Weather::default();
        self.clock = 0.0;
        for b in &mut self.town_map.buildings {
            b.unlocked = b.kind == BuildingType::Home;
            b.level = 1;
            b.decorations.clear();
        }
    }

    pub fn debug_info(&self) -> Vec<String> {
        let map = &self.town_map;
        let pos = self.character.position;
        let mut info = vec![
            format!("Map size: {}x{}", map.size.x, map.size.y),
            format!("Character position: ({:.1}, {:.1})", pos.x, pos.y),
            format!("Time of day: {:?}", self.time_of_day),
            format!("Weather: {:?}", self.weather),
            format!("Buildings: {}", map.buildings.len()),
        ];
        for b in &map.buildings {
            let status = if b.unlocked { "unlocked" } else { "locked" };
            info.push(format!("  {} (level {}, {status})", b.name, b.level));
        }
        info
    }

    pub fn to_json(&self) -> Result<String, TownError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Move the character to a spawn point when its box sits inside a
    /// building or off the map. Tries the map's spawn point, then
    /// [`DEFAULT_SPAWN`](Self::DEFAULT_SPAWN). Returns true when it moved.
    pub fn respawn_if_blocked(&mut self) -> bool {
        let map = &self.town_map;
        let from = self.character.position;
        if map.is_position_valid(from, Character::SIZE) {
            return false;
        }
        let spawn = if map.is_position_valid(map.character_spawn_point, Character::SIZE) {
            map.character_spawn_point
        } else {
            Self::DEFAULT_SPAWN
        };
        tracing::warn!(?from, to = ?spawn, "character position blocked, respawning");
        self.character.position = spawn;
        self.character.state = CharacterState::Idle;
        true
    }

    /// Parse a saved town. Rejects maps with a non-positive size and moves a
    /// blocked character back to spawn.
    pub fn from_json(json: &str) -> Result<Self, TownError> {
        let mut state: TownState = serde_json::from_str(json)?;
        let size = state.town_map.size;
        if size.x <= 0.0 || size.y <= 0.0 {
            return Err(TownError::InvalidMap(format!(
                "size {}x{} must be positive",
                size.x, size.y
            )));
        }
        state.respawn_if_blocked();
        Ok(state)
    }
}

fn default_buildings() -> Vec<Building> {
    vec![
        Building::new(
            "home",
            "Home",
            BuildingType::Home,
            Vec2::new(450.0, 350.0),
            Vec2::new(128.0, 96.0),
        ),
        Building::new(
            "coffee_shop",
            "Coffee Shop",
            BuildingType::CoffeeShop,
            Vec2::new(200.0, 200.0),
            Vec2::new(96.0, 128.0),
        ),
        Building::new(
            "bulletin_board",
            "Bulletin Board",
            BuildingType::BulletinBoard,
            Vec2::new(600.0, 150.0),
            Vec2::new(80.0, 96.0),
        ),
        Building::new(
            "library",
            "Library",
            BuildingType::Library,
            Vec2::new(750.0, 300.0),
            Vec2::new(120.0, 100.0),
        ),
        Building::new(
            "gym",
            "Gym",
            BuildingType::Gym,
            Vec2::new(150.0, 500.0),
            Vec2::new(110.0, 90.0),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_town_layout() {
        let town = TownState::new();
        let map = town.town_map();
        assert_eq!(map.size, Vec2::new(1024.0, 768.0));
        assert_eq!(map.buildings.len(), 5);
        assert_eq!(town.character().position, TownState::DEFAULT_SPAWN);
        assert!(map.is_position_valid(map.character_spawn_point, Character::SIZE));
    }

    #[test]
    fn nearest_building_by_entrance() {
        let town = TownState::new();
        // Home's entrance is (514, 446).
        let reach = TownState::INTERACTION_REACH;
        let near = town.find_nearest_building(Vec2::new(514.0, 470.0), reach);
        assert_eq!(near.map(|b| b.id.as_str()), Some("home"));
        assert!(town.find_nearest_building(Vec2::ZERO, reach).is_none());
    }

    #[test]
    fn reset_locks_all_but_home() {
        let mut town = TownState::new();
        assert!(town.upgrade_building("gym"));
        assert!(town.add_decoration_to_building("gym", "premium_weights"));
        town.reset();
        for b in &town.town_map().buildings {
            assert_eq!(b.unlocked, b.kind == BuildingType::Home);
            assert_eq!(b.level, 1);
            assert!(b.decorations.is_empty());
        }
        assert!(!town.can_interact_with_building("gym"));
        assert!(!town.upgrade_building("gym"));
        assert!(town.unlock_building("gym"));
        assert!(town.can_interact_with_building("gym"));
    }

    #[test]
    fn upgrade_stops_at_cap() {
        let mut town = TownState::new();
        for _ in 0..10 {
            town.upgrade_building("home");
        }
        let home = town.town_map().find_building("home").unwrap();
        assert_eq!(home.level, MAX_BUILDING_LEVEL);
    }

    #[test]
    fn decorations_are_deduplicated() {
        let mut town = TownState::new();
        assert!(town.add_decoration_to_building("home", "house_plant"));
        assert!(!town.add_decoration_to_building("home", "house_plant"));
        assert!(!town.add_decoration_to_building("castle", "house_plant"));
    }

    #[test]
    fn clock_rotates_time_of_day() {
        let mut town = TownState::new();
        town.update(299.0);
        assert_eq!(town.time_of_day(), TimeOfDay::Morning);
        town.update(1.0);
        assert_eq!(town.time_of_day(), TimeOfDay::Afternoon);
        for _ in 0..3 {
            town.update(300.0);
        }
        assert_eq!(town.time_of_day(), TimeOfDay::Morning);
    }

    #[test]
    fn set_level_mirrors_onto_kind() {
        let mut town = TownState::new();
        assert_eq!(town.set_building_level(BuildingType::Library, 3), 1);
        assert_eq!(town.set_building_level(BuildingType::Library, 3), 0);
        assert_eq!(town.town_map().find_building("library").unwrap().level, 3);
    }

    #[test]
    fn json_round_trip() {
        let mut town = TownState::new();
        town.upgrade_building("coffee_shop");
        town.set_weather(Weather::Rainy);
        let json = town.to_json().unwrap();
        let back = TownState::from_json(&json).unwrap();
        assert_eq!(back, town);
    }

    #[test]
    fn rejects_degenerate_map() {
        let json = r#"{
            "townMap": {"size": {"x": 0, "y": 10}},
            "character": {"name": "P", "position": {"x": 0, "y": 0}}
        }"#;
        let err = TownState::from_json(json).unwrap_err();
        assert!(matches!(err, TownError::InvalidMap(_)));
    }

    #[test]
    fn blocked_character_respawns_on_load() {
        let mut town = TownState::new();
        // Inside Home's footprint.
        town.character_mut().position = Vec2::new(470.0, 360.0);
        let back = TownState::from_json(&town.to_json().unwrap()).unwrap();
        assert_eq!(back.character().position, TownState::DEFAULT_SPAWN);

        town.character_mut().position = Vec2::new(-40.0, 100.0);
        let back = TownState::from_json(&town.to_json().unwrap()).unwrap();
        assert_eq!(back.character().position, TownState::DEFAULT_SPAWN);
    }

    #[test]
    fn respawn_prefers_the_map_spawn() {
        let map = TownMap {
            size: Vec2::new(300.0, 300.0),
            character_spawn_point: Vec2::new(20.0, 20.0),
            ..TownMap::default()
        };
        let mut town = TownState::with_map(map);
        assert!(!town.respawn_if_blocked());
        town.character_mut().position = Vec2::new(290.0, 10.0);
        assert!(town.respawn_if_blocked());
        assert_eq!(town.character().position, Vec2::new(20.0, 20.0));
    }
}
