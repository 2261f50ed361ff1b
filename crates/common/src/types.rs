use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest level any building can reach.
pub const MAX_BUILDING_LEVEL: u32 = 5;

/// Opaque entity identity. The world hands these out starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(pub u32);

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Scene identifier. Scene 0 is the town itself; interiors use other ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub u32);

impl SceneId {
    pub const MAIN: SceneId = SceneId(0);

    pub fn is_main(self) -> bool {
        self == Self::MAIN
    }
}

/// Axis-aligned rectangle anchored at its top-left corner (y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Strict overlap test. Shared edges are not a collision.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Inclusive point test.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// True when `inner` lies entirely inside `self` (edges included).
    pub fn contains_rect(&self, inner: &Rect) -> bool {
        inner.x >= self.x
            && inner.y >= self.y
            && inner.right() <= self.right()
            && inner.bottom() <= self.bottom()
    }

    /// Same size, moved so its top-left corner sits at `pos`.
    pub fn at(&self, pos: Vec2) -> Rect {
        Rect::new(pos.x, pos.y, self.width, self.height)
    }
}

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLUE: Rgba = Rgba::new(0, 121, 241, 255);
    pub const ORANGE: Rgba = Rgba::new(255, 161, 0, 255);
    pub const YELLOW: Rgba = Rgba::new(253, 249, 0, 255);
    pub const PURPLE: Rgba = Rgba::new(200, 122, 255, 255);
    pub const RED: Rgba = Rgba::new(230, 41, 55, 255);
    pub const GOLD: Rgba = Rgba::new(255, 203, 0, 255);
    pub const BROWN: Rgba = Rgba::new(127, 106, 79, 255);
    pub const DARK_GRAY: Rgba = Rgba::new(80, 80, 80, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with alpha replaced by `alpha` in `0.0..=1.0`.
    pub fn fade(self, alpha: f32) -> Self {
        let a = (255.0 * alpha.clamp(0.0, 1.0)) as u8;
        Self { a, ..self }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Returned when an integer does not name a building kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown building type {0}")]
pub struct UnknownBuildingType(pub u8);

/// Kinds of building in town. Serialised as the integer discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum BuildingType {
    Home = 0,
    CoffeeShop = 1,
    BulletinBoard = 2,
    Library = 3,
    Gym = 4,
    Decoration = 5,
}

impl BuildingType {
    /// Kinds that carry a level and can be upgraded.
    pub const UPGRADABLE: [BuildingType; 5] = [
        BuildingType::Home,
        BuildingType::CoffeeShop,
        BuildingType::BulletinBoard,
        BuildingType::Library,
        BuildingType::Gym,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Snake-case key used in asset ids and config files.
    pub fn key(self) -> &'static str {
        match self {
            BuildingType::Home => "home",
            BuildingType::CoffeeShop => "coffee_shop",
            BuildingType::BulletinBoard => "bulletin_board",
            BuildingType::Library => "library",
            BuildingType::Gym => "gym",
            BuildingType::Decoration => "decoration",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "home" => Some(BuildingType::Home),
            "coffee_shop" => Some(BuildingType::CoffeeShop),
            "bulletin_board" => Some(BuildingType::BulletinBoard),
            "library" => Some(BuildingType::Library),
            "gym" => Some(BuildingType::Gym),
            "decoration" => Some(BuildingType::Decoration),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BuildingType::Home => "Home",
            BuildingType::CoffeeShop => "Coffee Shop",
            BuildingType::BulletinBoard => "Bulletin Board",
            BuildingType::Library => "Library",
            BuildingType::Gym => "Gym",
            BuildingType::Decoration => "Decoration",
        }
    }
}

impl From<BuildingType> for u8 {
    fn from(kind: BuildingType) -> u8 {
        kind as u8
    }
}

impl TryFrom<u8> for BuildingType {
    type Error = UnknownBuildingType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BuildingType::Home),
            1 => Ok(BuildingType::CoffeeShop),
            2 => Ok(BuildingType::BulletinBoard),
            3 => Ok(BuildingType::Library),
            4 => Ok(BuildingType::Gym),
            5 => Ok(BuildingType::Decoration),
            other => Err(UnknownBuildingType(other)),
        }
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Facing direction of a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    /// Dominant axis of `v`. Horizontal wins only when `|x| > |y|`, so ties
    /// face vertically. Screen y grows downward.
    pub fn dominant(v: Vec2) -> Self {
        if v.x.abs() > v.y.abs() {
            if v.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if v.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    pub fn to_vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Locomotion / activity state of the player character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterState {
    #[default]
    Idle,
    Walking,
    Interacting,
    Focused,
}

impl CharacterState {
    pub fn as_str(self) -> &'static str {
        match self {
            CharacterState::Idle => "idle",
            CharacterState::Walking => "walking",
            CharacterState::Interacting => "interacting",
            CharacterState::Focused => "focused",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        let inside = Rect::new(9.0, 9.0, 5.0, 5.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn contains_point_is_inclusive() {
        let r = Rect::new(0.0, 0.0, 4.0, 4.0);
        assert!(r.contains_point(Vec2::new(4.0, 4.0)));
        assert!(!r.contains_point(Vec2::new(4.1, 0.0)));
    }

    #[test]
    fn building_type_serialises_as_int() {
        let json = serde_json::to_string(&BuildingType::Library).unwrap();
        assert_eq!(json, "3");
        let back: BuildingType = serde_json::from_str("1").unwrap();
        assert_eq!(back, BuildingType::CoffeeShop);
        assert!(serde_json::from_str::<BuildingType>("9").is_err());
    }

    #[test]
    fn building_type_keys_round_trip() {
        for kind in BuildingType::UPGRADABLE {
            assert_eq!(BuildingType::from_key(kind.key()), Some(kind));
        }
        assert_eq!(BuildingType::from_key("castle"), None);
    }

    #[test]
    fn dominant_direction_tie_goes_vertical() {
        assert_eq!(Direction::dominant(Vec2::new(1.0, 1.0)), Direction::Down);
        assert_eq!(Direction::dominant(Vec2::new(-1.0, -1.0)), Direction::Up);
        assert_eq!(Direction::dominant(Vec2::new(1.0, 0.5)), Direction::Right);
        assert_eq!(Direction::dominant(Vec2::new(-0.7, 0.2)), Direction::Left);
    }

    #[test]
    fn fade_scales_alpha() {
        assert_eq!(Rgba::BLUE.fade(0.1).a, 25);
        assert_eq!(Rgba::BLUE.fade(2.0).a, 255);
    }
}
