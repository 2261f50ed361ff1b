use crate::visuals;
use focustown_common::{BuildingType, Rgba};
use serde::{Deserialize, Serialize};

const BASE_UPGRADE_COST: u32 = 100;
const BASE_XP_REQUIREMENT: u32 = 500;
const XP_SCALING_FACTOR: f32 = 1.5;
const COST_SCALING_FACTOR: f32 = 2.0;

/// What it takes to reach `level`, and what the building gains there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingUpgrade {
    pub kind: BuildingType,
    pub level: u32,
    pub required_xp: u32,
    pub cost: u32,
    pub name: String,
    pub description: String,
    pub new_decorations: Vec<String>,
    pub exterior_sprite_id: String,
    pub interior_background_id: String,
    pub ambient_color: Rgba,
    pub efficiency_bonus: f32,
    pub capacity_increase: u32,
    pub new_features: Vec<String>,
}

impl BuildingUpgrade {
    fn bare(kind: BuildingType, level: u32, required_xp: u32, cost: u32) -> Self {
        Self {
            kind,
            level,
            required_xp,
            cost,
            name: String::new(),
            description: String::new(),
            new_decorations: Vec::new(),
            exterior_sprite_id: visuals::exterior_sprite_id(kind, level),
            interior_background_id: visuals::interior_background_id(kind, level),
            ambient_color: visuals::ambient_color(kind, level),
            efficiency_bonus: 1.0,
            capacity_increase: 0,
            new_features: Vec::new(),
        }
    }

    /// Generic requirement for a level with no authored entry. Each power is
    /// truncated to an integer before scaling the base.
    pub fn fallback(kind: BuildingType, level: u32) -> Self {
        let exponent = level.saturating_sub(1) as i32;
        let xp = BASE_XP_REQUIREMENT * XP_SCALING_FACTOR.powi(exponent) as u32;
        let cost = BASE_UPGRADE_COST * COST_SCALING_FACTOR.powi(exponent) as u32;
        Self::bare(kind, level, xp, cost)
    }
}

struct Row {
    level: u32,
    xp: u32,
    cost: u32,
    name: &'static str,
    description: &'static str,
    efficiency: f32,
    capacity: u32,
    decorations: &'static [&'static str],
}

const COFFEE_SHOP: [Row; 4] = [
    Row {
        level: 2,
        xp: 500,
        cost: 100,
        name: "Espresso Machine",
        description: "Faster pomodoro sessions with premium coffee",
        efficiency: 1.1,
        capacity: 0,
        decorations: &["espresso_machine", "coffee_plant"],
    },
    Row {
        level: 3,
        xp: 1200,
        cost: 250,
        name: "Artisan Café",
        description: "Beautiful interior with specialty drinks",
        efficiency: 1.2,
        capacity: 0,
        decorations: &["art_painting", "cozy_chair", "ambient_lighting"],
    },
    Row {
        level: 4,
        xp: 2500,
        cost: 500,
        name: "Premium Roastery",
        description: "Professional equipment and premium atmosphere",
        efficiency: 1.3,
        capacity: 0,
        decorations: &["roasting_machine", "premium_counter", "golden_accents"],
    },
    Row {
        level: 5,
        xp: 5000,
        cost: 1000,
        name: "Master Café",
        description: "The ultimate coffee experience with prestige effects",
        efficiency: 1.5,
        capacity: 0,
        decorations: &["master_machine", "golden_steam", "prestige_aura"],
    },
];

const BULLETIN_BOARD: [Row; 4] = [
    Row {
        level: 2,
        xp: 400,
        cost: 80,
        name: "Digital Board",
        description: "Enhanced task organization with digital features",
        efficiency: 1.1,
        capacity: 5,
        decorations: &[],
    },
    Row {
        level: 3,
        xp: 1000,
        cost: 200,
        name: "Smart Board",
        description: "Task suggestions and automation",
        efficiency: 1.2,
        capacity: 10,
        decorations: &[],
    },
    Row {
        level: 4,
        xp: 2000,
        cost: 400,
        name: "Command Center",
        description: "Multi-screen setup with advanced analytics",
        efficiency: 1.3,
        capacity: 20,
        decorations: &[],
    },
    Row {
        level: 5,
        xp: 4000,
        cost: 800,
        name: "Mission Control",
        description: "Ultimate productivity hub with holographic displays",
        efficiency: 1.5,
        capacity: 50,
        decorations: &[],
    },
];

const LIBRARY: [Row; 4] = [
    Row {
        level: 2,
        xp: 600,
        cost: 120,
        name: "Digital Archive",
        description: "Digital cataloguing and search",
        efficiency: 1.1,
        capacity: 0,
        decorations: &[],
    },
    Row {
        level: 3,
        xp: 1500,
        cost: 300,
        name: "Research Center",
        description: "Research tools and comfortable reading areas",
        efficiency: 1.2,
        capacity: 0,
        decorations: &[],
    },
    Row {
        level: 4,
        xp: 3000,
        cost: 600,
        name: "Knowledge Hub",
        description: "Research assistant and premium collections",
        efficiency: 1.3,
        capacity: 0,
        decorations: &[],
    },
    Row {
        level: 5,
        xp: 6000,
        cost: 1200,
        name: "Wisdom Sanctuary",
        description: "A repository of ancient wisdom",
        efficiency: 1.5,
        capacity: 0,
        decorations: &[],
    },
];

const GYM: [Row; 4] = [
    Row {
        level: 2,
        xp: 450,
        cost: 90,
        name: "Fitness Center",
        description: "Modern equipment and better tracking",
        efficiency: 1.1,
        capacity: 0,
        decorations: &[],
    },
    Row {
        level: 3,
        xp: 1100,
        cost: 220,
        name: "Athletic Club",
        description: "Premium equipment and personal training",
        efficiency: 1.2,
        capacity: 0,
        decorations: &[],
    },
    Row {
        level: 4,
        xp: 2200,
        cost: 440,
        name: "Performance Lab",
        description: "Scientific training methods and biometric tracking",
        efficiency: 1.3,
        capacity: 0,
        decorations: &[],
    },
    Row {
        level: 5,
        xp: 4500,
        cost: 900,
        name: "Champion's Arena",
        description: "Elite training facility with legendary equipment",
        efficiency: 1.5,
        capacity: 0,
        decorations: &[],
    },
];

const HOME: [Row; 4] = [
    Row {
        level: 2,
        xp: 300,
        cost: 60,
        name: "Cozy Home",
        description: "Comfortable living space with basic amenities",
        efficiency: 1.05,
        capacity: 0,
        decorations: &[],
    },
    Row {
        level: 3,
        xp: 800,
        cost: 160,
        name: "Smart Home",
        description: "Automated systems and modern conveniences",
        efficiency: 1.1,
        capacity: 0,
        decorations: &[],
    },
    Row {
        level: 4,
        xp: 1600,
        cost: 320,
        name: "Luxury Home",
        description: "Premium finishes and high-end appliances",
        efficiency: 1.15,
        capacity: 0,
        decorations: &[],
    },
    Row {
        level: 5,
        xp: 3200,
        cost: 640,
        name: "Dream Home",
        description: "Every comfort imaginable",
        efficiency: 1.2,
        capacity: 0,
        decorations: &[],
    },
];

/// Authored upgrades for `kind`, ordered by level. Empty for decorations.
pub fn upgrade_table(kind: BuildingType) -> Vec<BuildingUpgrade> {
    let rows: &[Row] = match kind {
        BuildingType::Home => &HOME,
        BuildingType::CoffeeShop => &COFFEE_SHOP,
        BuildingType::BulletinBoard => &BULLETIN_BOARD,
        BuildingType::Library => &LIBRARY,
        BuildingType::Gym => &GYM,
        BuildingType::Decoration => &[],
    };
    rows.iter()
        .map(|row| BuildingUpgrade {
            name: row.name.to_string(),
            description: row.description.to_string(),
            new_decorations: row.decorations.iter().map(|d| d.to_string()).collect(),
            efficiency_bonus: row.efficiency,
            capacity_increase: row.capacity,
            ..BuildingUpgrade::bare(kind, row.level, row.xp, row.cost)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use focustown_common::MAX_BUILDING_LEVEL;

    #[test]
    fn every_upgradable_kind_has_levels_two_to_max() {
        for kind in BuildingType::UPGRADABLE {
            let levels: Vec<u32> = upgrade_table(kind).iter().map(|u| u.level).collect();
            assert_eq!(levels, (2..=MAX_BUILDING_LEVEL).collect::<Vec<_>>());
        }
        assert!(upgrade_table(BuildingType::Decoration).is_empty());
    }

    #[test]
    fn requirements_rise_with_level() {
        for kind in BuildingType::UPGRADABLE {
            let table = upgrade_table(kind);
            for pair in table.windows(2) {
                assert!(pair[1].required_xp > pair[0].required_xp);
                assert!(pair[1].cost > pair[0].cost);
            }
        }
    }

    #[test]
    fn coffee_shop_level_two() {
        let table = upgrade_table(BuildingType::CoffeeShop);
        let l2 = &table[0];
        assert_eq!((l2.required_xp, l2.cost), (500, 100));
        assert_eq!(l2.name, "Espresso Machine");
        assert_eq!(l2.exterior_sprite_id, "coffee_shop_level_2");
        assert_eq!(l2.new_decorations, vec!["espresso_machine", "coffee_plant"]);
    }

    #[test]
    fn fallback_truncates_powers() {
        let u = BuildingUpgrade::fallback(BuildingType::Decoration, 3);
        // 1.5^2 = 2.25 -> 2, 2^2 = 4.
        assert_eq!(u.required_xp, 1000);
        assert_eq!(u.cost, 400);
    }
}
