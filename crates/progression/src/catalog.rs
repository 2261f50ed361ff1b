use focustown_common::{BuildingType, Rgba};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecorationCategory {
    Furniture,
    Plants,
    Equipment,
    Art,
    Lighting,
}

impl DecorationCategory {
    pub const ALL: [DecorationCategory; 5] = [
        DecorationCategory::Furniture,
        DecorationCategory::Plants,
        DecorationCategory::Equipment,
        DecorationCategory::Art,
        DecorationCategory::Lighting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DecorationCategory::Furniture => "furniture",
            DecorationCategory::Plants => "plants",
            DecorationCategory::Equipment => "equipment",
            DecorationCategory::Art => "art",
            DecorationCategory::Lighting => "lighting",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for DecorationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchasable decoration. `unlocked` mirrors whether the owning building
/// has reached `required_level` and is refreshed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub required_level: u32,
    pub compatible_building: BuildingType,
    pub category: DecorationCategory,
    pub unlocked: bool,
    pub width: f32,
    pub height: f32,
    pub sprite_id: String,
    pub tint: Rgba,
    pub can_place_multiple: bool,
    pub max_instances: u32,
}

impl Decoration {
    /// A single-instance Home furniture item until [`Decoration::fits`] says otherwise.
    pub fn new(id: &str, name: &str, cost: u32, required_level: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            cost,
            required_level,
            compatible_building: BuildingType::Home,
            category: DecorationCategory::Furniture,
            unlocked: false,
            width: 32.0,
            height: 32.0,
            sprite_id: id.to_string(),
            tint: Rgba::WHITE,
            can_place_multiple: false,
            max_instances: 1,
        }
    }

    pub fn fits(mut self, building: BuildingType, category: DecorationCategory) -> Self {
        self.compatible_building = building;
        self.category = category;
        self
    }

    fn about(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    fn up_to(mut self, max_instances: u32) -> Self {
        self.can_place_multiple = true;
        self.max_instances = max_instances;
        self
    }

    /// How many copies one building may hold.
    pub fn instance_cap(&self) -> u32 {
        if self.can_place_multiple {
            self.max_instances
        } else {
            1
        }
    }
}

/// A decoration instance inside a building interior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedDecoration {
    #[serde(rename = "id")]
    pub decoration_id: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "unit_scale")]
    pub scale: f32,
    #[serde(default = "visible")]
    pub visible: bool,
}

fn unit_scale() -> f32 {
    1.0
}

fn visible() -> bool {
    true
}

impl PlacedDecoration {
    pub fn new(decoration_id: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            decoration_id: decoration_id.into(),
            x,
            y,
            rotation: 0.0,
            scale: 1.0,
            visible: true,
        }
    }

    /// Same decoration within `tolerance` of `(x, y)` on both axes.
    pub fn matches(&self, decoration_id: &str, x: f32, y: f32, tolerance: f32) -> bool {
        self.decoration_id == decoration_id
            && (self.x - x).abs() < tolerance
            && (self.y - y).abs() < tolerance
    }
}

/// The built-in catalog, grouped by building.
pub fn default_catalog() -> Vec<Decoration> {
    use BuildingType::{BulletinBoard, CoffeeShop, Gym, Home, Library};
    use DecorationCategory::*;
    vec![
        Decoration::new("coffee_plant", "Coffee Plant", 50, 2)
            .fits(CoffeeShop, Plants)
            .about("A coffee plant that adds natural ambiance")
            .up_to(3),
        Decoration::new("espresso_machine", "Espresso Machine", 200, 2)
            .fits(CoffeeShop, Equipment)
            .about("Professional espresso machine for premium coffee"),
        Decoration::new("cozy_chair", "Cozy Armchair", 100, 3)
            .fits(CoffeeShop, Furniture)
            .about("Comfortable seating for customers")
            .up_to(4),
        Decoration::new("art_painting", "Coffee Art", 150, 3)
            .fits(CoffeeShop, Art)
            .about("Coffee-themed artwork")
            .up_to(2),
        Decoration::new("ambient_lighting", "Warm Lighting", 80, 3)
            .fits(CoffeeShop, Lighting)
            .about("Soft, warm lighting"),
        Decoration::new("extra_monitor", "Additional Monitor", 120, 2)
            .fits(BulletinBoard, Equipment)
            .about("Extra screen for task management")
            .up_to(3),
        Decoration::new("ergonomic_desk", "Ergonomic Desk", 180, 3)
            .fits(BulletinBoard, Furniture)
            .about("Adjustable workspace"),
        Decoration::new("task_organizer", "Task Organizer", 60, 2)
            .fits(BulletinBoard, Furniture)
            .about("Physical organisation system for tasks")
            .up_to(2),
        Decoration::new("premium_bookshelf", "Premium Bookshelf", 200, 2)
            .fits(Library, Furniture)
            .about("Bookshelf stocked with rare books")
            .up_to(4),
        Decoration::new("reading_chair", "Reading Chair", 150, 3)
            .fits(Library, Furniture)
            .about("Chair for long reading sessions")
            .up_to(3),
        Decoration::new("reading_lamp", "Reading Lamp", 80, 2)
            .fits(Library, Lighting)
            .about("Lighting for reading and writing")
            .up_to(3),
        Decoration::new("antique_globe", "Antique Globe", 120, 4)
            .fits(Library, Art)
            .about("An antique globe"),
        Decoration::new("premium_weights", "Premium Weights", 150, 2)
            .fits(Gym, Equipment)
            .about("Weight set for strength training"),
        Decoration::new("advanced_treadmill", "Advanced Treadmill", 300, 3)
            .fits(Gym, Equipment)
            .about("Cardio equipment"),
        Decoration::new("workout_bench", "Workout Bench", 100, 2)
            .fits(Gym, Furniture)
            .about("Adjustable bench")
            .up_to(2),
        Decoration::new("motivational_mirror", "Motivational Mirror", 80, 3)
            .fits(Gym, Art)
            .about("Mirror with motivational quotes")
            .up_to(3),
        Decoration::new("comfortable_sofa", "Comfortable Sofa", 200, 2)
            .fits(Home, Furniture)
            .about("Sofa for relaxation"),
        Decoration::new("house_plant", "House Plant", 40, 2)
            .fits(Home, Plants)
            .about("A plant that purifies the air")
            .up_to(5),
        Decoration::new("family_photo", "Family Photo", 30, 1)
            .fits(Home, Art)
            .about("Cherished family memories")
            .up_to(3),
        Decoration::new("elegant_chandelier", "Elegant Chandelier", 250, 4)
            .fits(Home, Lighting)
            .about("Chandelier for an elegant room"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_ids_are_unique() {
        let catalog = default_catalog();
        let ids: HashSet<_> = catalog.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
        assert_eq!(catalog.len(), 20);
    }

    #[test]
    fn instance_caps() {
        let catalog = default_catalog();
        let find = |id: &str| catalog.iter().find(|d| d.id == id).unwrap().instance_cap();
        assert_eq!(find("coffee_plant"), 3);
        assert_eq!(find("espresso_machine"), 1);
        assert_eq!(find("house_plant"), 5);
    }

    #[test]
    fn placed_decoration_json_defaults() {
        let json = r#"{"id":"house_plant","x":1,"y":2}"#;
        let p: PlacedDecoration = serde_json::from_str(json).unwrap();
        assert_eq!(p.scale, 1.0);
        assert!(p.visible);
        assert_eq!(p.rotation, 0.0);
        assert!(p.matches("house_plant", 4.9, 2.0, 5.0));
        assert!(!p.matches("house_plant", 6.0, 2.0, 5.0));
    }

    #[test]
    fn category_names() {
        let art = DecorationCategory::from_name("art");
        assert_eq!(art, Some(DecorationCategory::Art));
        assert_eq!(DecorationCategory::from_name("rugs"), None);
    }
}
