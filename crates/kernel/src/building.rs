use focustown_common::wire::{xy, xy_opt};
use focustown_common::{BuildingType, Rect};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A building on the town map.
///
/// `entrance_position` is the bottom-centre of the footprint and is derived
/// when a saved record omits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "BuildingRecord")]
pub struct Building {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BuildingType,
    #[serde(with = "xy")]
    pub position: Vec2,
    #[serde(with = "xy")]
    pub size: Vec2,
    #[serde(with = "xy")]
    pub entrance_position: Vec2,
    pub unlocked: bool,
    pub level: u32,
    pub decorations: Vec<String>,
}

/// Lenient on-disk shape: every field may be missing.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildingRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default = "default_kind")]
    kind: BuildingType,
    #[serde(default, with = "xy")]
    position: Vec2,
    #[serde(default = "default_size", with = "xy")]
    size: Vec2,
    #[serde(default, with = "xy_opt")]
    entrance_position: Option<Vec2>,
    #[serde(default = "default_true")]
    unlocked: bool,
    #[serde(default = "default_level")]
    level: u32,
    #[serde(default)]
    decorations: Vec<String>,
}

fn default_kind() -> BuildingType {
    BuildingType::Home
}

fn default_size() -> Vec2 {
    Vec2::splat(64.0)
}

fn default_true() -> bool {
    true
}

fn default_level() -> u32 {
    1
}

impl From<BuildingRecord> for Building {
    fn from(r: BuildingRecord) -> Self {
        let entrance_position = r
            .entrance_position
            .unwrap_or_else(|| entrance_of(r.position, r.size));
        Self {
            id: r.id,
            name: r.name,
            kind: r.kind,
            position: r.position,
            size: r.size,
            entrance_position,
            unlocked: r.unlocked,
            level: r.level,
            decorations: r.decorations,
        }
    }
}

fn entrance_of(position: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(position.x + size.x / 2.0, position.y + size.y)
}

impl Building {
    /// Default interaction distance around the entrance.
    pub const ENTRANCE_REACH: f32 = 32.0;

    /// A level-1, unlocked building with no decorations.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: BuildingType,
        position: Vec2,
        size: Vec2,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            position,
            size,
            entrance_position: entrance_of(position, size),
            unlocked: true,
            level: 1,
            decorations: Vec::new(),
        }
    }

    pub fn locked(mut self) -> Self {
        self.unlocked = false;
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size / 2.0
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.bounds().contains_point(point)
    }

    pub fn is_near_entrance(&self, point: Vec2, reach: f32) -> bool {
        point.distance(self.entrance_position) <= reach
    }
}

/// The fixed-size town rectangle and its ordered buildings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownMap {
    #[serde(default = "default_map_size", with = "xy")]
    pub size: Vec2,
    #[serde(default = "default_spawn", with = "xy")]
    pub character_spawn_point: Vec2,
    #[serde(default)]
    pub background_texture: String,
    #[serde(default)]
    pub buildings: Vec<Building>,
}

fn default_map_size() -> Vec2 {
    Vec2::new(800.0, 600.0)
}

fn default_spawn() -> Vec2 {
    Vec2::new(400.0, 300.0)
}

impl Default for TownMap {
    fn default() -> Self {
        Self {
            size: default_map_size(),
            character_spawn_point: default_spawn(),
            background_texture: String::new(),
            buildings: Vec::new(),
        }
    }
}

impl TownMap {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(Vec2::ZERO, self.size)
    }

    pub fn add_building(&mut self, building: Building) {
        self.buildings.push(building);
    }

    pub fn remove_building(&mut self, id: &str) -> Option<Building> {
        let idx = self.buildings.iter().position(|b| b.id == id)?;
        Some(self.buildings.remove(idx))
    }

    pub fn find_building(&self, id: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    pub fn find_building_mut(&mut self, id: &str) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.id == id)
    }

    pub fn buildings_of_kind(&self, kind: BuildingType) -> impl Iterator<Item = &Building> {
        self.buildings.iter().filter(move |b| b.kind == kind)
    }

    /// First building whose footprint contains `point` (edges included).
    pub fn find_building_at(&self, point: Vec2) -> Option<&Building> {
        self.buildings.iter().find(|b| b.contains_point(point))
    }

    /// Buildings whose centre lies within `radius` of `point`.
    pub fn buildings_near(&self, point: Vec2, radius: f32) -> Vec<&Building> {
        self.buildings
            .iter()
            .filter(|b| b.center().distance(point) <= radius)
            .collect()
    }

    /// First building, in map order, whose footprint overlaps `rect`.
    pub fn colliding_building(&self, rect: &Rect) -> Option<&Building> {
        self.buildings.iter().find(|b| b.bounds().overlaps(rect))
    }

    /// A character box at `position` is inside the map and clear of every footprint.
    pub fn is_position_valid(&self, position: Vec2, character_size: Vec2) -> bool {
        let rect = Rect::from_pos_size(position, character_size);
        self.bounds().contains_rect(&rect) && self.colliding_building(&rect).is_none()
    }

    /// Clamp each axis into `[0, map - character]`.
    pub fn clamp_to_map(&self, position: Vec2, character_size: Vec2) -> Vec2 {
        let max = self.size - character_size;
        Vec2::new(
            position.x.min(max.x).max(0.0),
            position.y.min(max.y).max(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cafe() -> Building {
        Building::new(
            "coffee_shop",
            "Coffee Shop",
            BuildingType::CoffeeShop,
            Vec2::new(200.0, 200.0),
            Vec2::new(96.0, 128.0),
        )
    }

    #[test]
    fn entrance_is_bottom_centre() {
        let b = cafe();
        assert_eq!(b.entrance_position, Vec2::new(248.0, 328.0));
        assert!(b.is_near_entrance(Vec2::new(248.0, 350.0), Building::ENTRANCE_REACH));
        assert!(!b.is_near_entrance(Vec2::new(248.0, 400.0), Building::ENTRANCE_REACH));
    }

    #[test]
    fn building_json_shape() {
        let json = serde_json::to_value(cafe()).unwrap();
        assert_eq!(json["type"], 1);
        assert_eq!(json["position"]["x"], 200.0);
        assert_eq!(json["entrancePosition"]["y"], 328.0);
        assert_eq!(json["unlocked"], true);
    }

    #[test]
    fn sparse_building_record_gets_defaults() {
        let b: Building =
            serde_json::from_str(r#"{"id":"shed","position":{"x":10,"y":20}}"#).unwrap();
        assert_eq!(b.kind, BuildingType::Home);
        assert_eq!(b.size, Vec2::splat(64.0));
        assert_eq!(b.entrance_position, Vec2::new(42.0, 84.0));
        assert!(b.unlocked);
        assert_eq!(b.level, 1);
        assert!(b.decorations.is_empty());
    }

    #[test]
    fn map_validity_uses_the_whole_box() {
        let mut map = TownMap {
            size: Vec2::new(500.0, 500.0),
            ..TownMap::default()
        };
        map.add_building(cafe().locked());
        let size = Vec2::splat(32.0);

        assert!(map.is_position_valid(Vec2::new(10.0, 10.0), size));
        // Corner clips the footprint though the centre is outside.
        assert!(!map.is_position_valid(Vec2::new(170.0, 170.0), size));
        // Touching the left edge exactly is allowed.
        assert!(map.is_position_valid(Vec2::new(168.0, 250.0), size));
        assert!(!map.is_position_valid(Vec2::new(-1.0, 10.0), size));
        assert!(!map.is_position_valid(Vec2::new(470.0, 10.0), size));
    }

    #[test]
    fn clamp_keeps_box_inside() {
        let map = TownMap::default();
        let size = Vec2::splat(32.0);
        assert_eq!(
            map.clamp_to_map(Vec2::new(-50.0, 900.0), size),
            Vec2::new(0.0, 568.0)
        );
    }

    #[test]
    fn lookups() {
        let mut map = TownMap::default();
        map.add_building(cafe());
        assert!(map.find_building("coffee_shop").is_some());
        let hit = map.find_building_at(Vec2::new(296.0, 328.0));
        assert_eq!(hit.map(|b| b.id.as_str()), Some("coffee_shop"));
        assert_eq!(map.buildings_near(Vec2::new(248.0, 264.0), 1.0).len(), 1);
        assert_eq!(map.buildings_of_kind(BuildingType::Gym).count(), 0);
        assert!(map.remove_building("coffee_shop").is_some());
        assert!(map.remove_building("coffee_shop").is_none());
    }

    #[test]
    fn map_defaults_when_fields_missing() {
        let map: TownMap = serde_json::from_str("{}").unwrap();
        assert_eq!(map.size, Vec2::new(800.0, 600.0));
        assert_eq!(map.character_spawn_point, Vec2::new(400.0, 300.0));
        assert!(map.buildings.is_empty());
    }
}
