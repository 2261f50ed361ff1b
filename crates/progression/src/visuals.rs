//! Pure per-(kind, level) presentation lookups.

use focustown_common::{BuildingType, Rgba};

pub fn exterior_sprite_id(kind: BuildingType, level: u32) -> String {
    let base = match kind {
        BuildingType::Decoration => "building",
        other => other.key(),
    };
    format!("{base}_level_{level}")
}

pub fn interior_background_id(kind: BuildingType, level: u32) -> String {
    let base = match kind {
        BuildingType::Home => "home_interior",
        BuildingType::CoffeeShop => "coffee_interior",
        BuildingType::BulletinBoard => "bulletin_interior",
        BuildingType::Library => "library_interior",
        BuildingType::Gym => "gym_interior",
        BuildingType::Decoration => "interior",
    };
    format!("{base}_level_{level}")
}

/// Theme colour, more opaque at higher levels.
pub fn ambient_color(kind: BuildingType, level: u32) -> Rgba {
    let base = match kind {
        BuildingType::Home => Rgba::BLUE,
        BuildingType::CoffeeShop => Rgba::ORANGE,
        BuildingType::BulletinBoard => Rgba::YELLOW,
        BuildingType::Library => Rgba::PURPLE,
        BuildingType::Gym => Rgba::RED,
        BuildingType::Decoration => Rgba::WHITE,
    };
    base.fade(0.1 + level.saturating_sub(1) as f32 * 0.05)
}

/// Reward multiplier: ten percent per level above the first.
pub fn efficiency_bonus(level: u32) -> f32 {
    1.0 + level.saturating_sub(1) as f32 * 0.1
}

pub fn prestige_effect(kind: BuildingType) -> &'static str {
    match kind {
        BuildingType::CoffeeShop => "Golden Steam Effect",
        BuildingType::BulletinBoard => "Sparkling Notes",
        BuildingType::Library => "Glowing Books",
        BuildingType::Gym => "Power Aura",
        BuildingType::Home => "Cozy Warmth",
        BuildingType::Decoration => "Prestige Glow",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_ids() {
        assert_eq!(
            exterior_sprite_id(BuildingType::CoffeeShop, 3),
            "coffee_shop_level_3"
        );
        assert_eq!(
            interior_background_id(BuildingType::Gym, 1),
            "gym_interior_level_1"
        );
    }

    #[test]
    fn ambient_alpha_grows_with_level() {
        assert_eq!(ambient_color(BuildingType::Home, 1).a, 25);
        assert_eq!(ambient_color(BuildingType::Home, 5).a, 76);
        assert_eq!(ambient_color(BuildingType::Library, 1).r, Rgba::PURPLE.r);
    }

    #[test]
    fn efficiency_steps() {
        assert_eq!(efficiency_bonus(1), 1.0);
        assert!((efficiency_bonus(3) - 1.2).abs() < 1e-6);
    }
}
