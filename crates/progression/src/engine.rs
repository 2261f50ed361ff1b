use crate::catalog::{Decoration, DecorationCategory, PlacedDecoration, default_catalog};
use crate::ledger::Ledger;
use crate::snapshot::{ProgressionSnapshot, kind_key, parse_kind_key};
use crate::upgrades::{BuildingUpgrade, upgrade_table};
use crate::visuals;
use focustown_common::{BuildingType, MAX_BUILDING_LEVEL, Rgba};
use std::collections::BTreeMap;

/// Interior area a decoration may be placed in.
const PLACEMENT_WIDTH: f32 = 1000.0;
const PLACEMENT_HEIGHT: f32 = 700.0;
/// Coordinate slack when looking up a placed decoration.
pub const PLACEMENT_TOLERANCE: f32 = 5.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProgressionError {
    #[error("{0} has no upgrade path")]
    NotUpgradable(BuildingType),
    #[error("{0} is already at the maximum level")]
    MaxLevel(BuildingType),
    #[error("not enough XP: need {required}, have {available}")]
    InsufficientXp { required: u32, available: u32 },
    #[error("not enough currency: need {required}, have {available}")]
    InsufficientFunds { required: u32, available: u32 },
    #[error("ledger refused to spend {0}")]
    SpendRejected(u32),
    #[error("unknown decoration {0:?}")]
    UnknownDecoration(String),
    #[error("decoration {0:?} already purchased")]
    AlreadyPurchased(String),
    #[error("building level {current} is below the required {required}")]
    LevelTooLow { required: u32, current: u32 },
    #[error("decoration {0:?} has not been purchased")]
    NotPurchased(String),
    #[error("placement ({x}, {y}) is out of bounds")]
    OutOfBounds { x: f32, y: f32 },
    #[error("decoration {id:?} already placed {max} time(s)")]
    InstanceCap { id: String, max: u32 },
}

/// Notifications queued by mutating calls, drained by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressionEvent {
    BuildingUpgraded { kind: BuildingType, level: u32 },
    DecorationPurchased { id: String },
    DecorationPlaced { kind: BuildingType, id: String },
    /// XP first reached the next level's threshold. Currency is not checked.
    UpgradeReady { kind: BuildingType },
}

#[derive(Debug, Clone, PartialEq)]
struct BuildingProgress {
    level: u32,
    xp: u32,
    placed: Vec<PlacedDecoration>,
}

impl Default for BuildingProgress {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            placed: Vec::new(),
        }
    }
}

/// Per-building levels, XP and decoration layout, plus the global set of
/// purchased decorations.
#[derive(Debug, Clone)]
pub struct ProgressionEngine {
    buildings: BTreeMap<BuildingType, BuildingProgress>,
    purchased: Vec<String>,
    catalog: Vec<Decoration>,
    upgrades: BTreeMap<BuildingType, Vec<BuildingUpgrade>>,
    events: Vec<ProgressionEvent>,
}

impl Default for ProgressionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressionEngine {
    /// Every upgradable building at level 1 with no XP.
    pub fn new() -> Self {
        let buildings = BuildingType::UPGRADABLE
            .into_iter()
            .map(|kind| (kind, BuildingProgress::default()))
            .collect();
        let upgrades = BuildingType::UPGRADABLE
            .into_iter()
            .map(|kind| (kind, upgrade_table(kind)))
            .collect();
        let mut engine = Self {
            buildings,
            purchased: Vec::new(),
            catalog: default_catalog(),
            upgrades,
            events: Vec::new(),
        };
        engine.unlock_decorations();
        engine
    }

    /// Level of `kind`; 1 for kinds without an upgrade path.
    pub fn building_level(&self, kind: BuildingType) -> u32 {
        self.buildings.get(&kind).map_or(1, |b| b.level)
    }

    pub fn building_xp(&self, kind: BuildingType) -> u32 {
        self.buildings.get(&kind).map_or(0, |b| b.xp)
    }

    /// Grow the XP counter. Never upgrades by itself.
    pub fn add_building_xp(&mut self, kind: BuildingType, amount: u32) {
        let required = self.required_xp_for_next_level(kind);
        let Some(progress) = self.buildings.get_mut(&kind) else {
            return;
        };
        let before = progress.xp;
        progress.xp = progress.xp.saturating_add(amount);
        tracing::trace!(kind = kind.key(), xp = progress.xp, "building xp added");
        if let Some(required) = required {
            if before < required && progress.xp >= required {
                tracing::debug!(kind = kind.key(), "upgrade ready");
                self.events.push(ProgressionEvent::UpgradeReady { kind });
            }
        }
    }

    pub fn can_upgrade_building<L: Ledger + ?Sized>(&self, kind: BuildingType, ledger: &L) -> bool {
        self.check_upgrade(kind, ledger).is_ok()
    }

    fn check_upgrade<L: Ledger + ?Sized>(
        &self,
        kind: BuildingType,
        ledger: &L,
    ) -> Result<BuildingUpgrade, ProgressionError> {
        let progress = self
            .buildings
            .get(&kind)
            .ok_or(ProgressionError::NotUpgradable(kind))?;
        let next = self
            .next_upgrade(kind)
            .ok_or(ProgressionError::MaxLevel(kind))?;
        if progress.xp < next.required_xp {
            return Err(ProgressionError::InsufficientXp {
                required: next.required_xp,
                available: progress.xp,
            });
        }
        if ledger.balance() < next.cost {
            return Err(ProgressionError::InsufficientFunds {
                required: next.cost,
                available: ledger.balance(),
            });
        }
        Ok(next)
    }

    /// Raise `kind` by exactly one level, paying the next upgrade's cost.
    /// Nothing changes unless every check passes and the ledger pays.
    pub fn try_upgrade_building<L: Ledger + ?Sized>(
        &mut self,
        kind: BuildingType,
        ledger: &mut L,
    ) -> Result<u32, ProgressionError> {
        let next = self.check_upgrade(kind, &*ledger)?;
        if !ledger.spend(next.cost) {
            return Err(ProgressionError::SpendRejected(next.cost));
        }
        let progress = self
            .buildings
            .get_mut(&kind)
            .ok_or(ProgressionError::NotUpgradable(kind))?;
        progress.level += 1;
        let level = progress.level;
        self.unlock_decorations();
        tracing::debug!(
            kind = kind.key(),
            level,
            cost = next.cost,
            "building upgraded"
        );
        self.events
            .push(ProgressionEvent::BuildingUpgraded { kind, level });
        Ok(level)
    }

    pub fn upgrade_building<L: Ledger + ?Sized>(
        &mut self,
        kind: BuildingType,
        ledger: &mut L,
    ) -> bool {
        self.try_upgrade_building(kind, ledger).is_ok()
    }

    pub fn decoration(&self, id: &str) -> Option<&Decoration> {
        self.catalog.iter().find(|d| d.id == id)
    }

    pub fn catalog(&self) -> &[Decoration] {
        &self.catalog
    }

    pub fn decoration_categories(&self) -> &'static [DecorationCategory] {
        &DecorationCategory::ALL
    }

    pub fn decorations_by_category(&self, category: DecorationCategory) -> Vec<&Decoration> {
        self.catalog
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Catalog entries for `kind` that its current level allows.
    pub fn available_decorations(&self, kind: BuildingType) -> Vec<&Decoration> {
        let level = self.building_level(kind);
        self.catalog
            .iter()
            .filter(|d| d.compatible_building == kind && d.required_level <= level)
            .collect()
    }

    /// Purchased catalog entries belonging to `kind`, in purchase order.
    pub fn purchased_decorations(&self, kind: BuildingType) -> Vec<&Decoration> {
        self.purchased
            .iter()
            .filter_map(|id| self.decoration(id))
            .filter(|d| d.compatible_building == kind)
            .collect()
    }

    pub fn purchased_ids(&self) -> &[String] {
        &self.purchased
    }

    pub fn is_purchased(&self, id: &str) -> bool {
        self.purchased.iter().any(|p| p == id)
    }

    fn check_purchase<L: Ledger + ?Sized>(
        &self,
        id: &str,
        ledger: &L,
    ) -> Result<&Decoration, ProgressionError> {
        let decoration = self
            .decoration(id)
            .ok_or_else(|| ProgressionError::UnknownDecoration(id.to_string()))?;
        if self.is_purchased(id) {
            return Err(ProgressionError::AlreadyPurchased(id.to_string()));
        }
        let current = self.building_level(decoration.compatible_building);
        if current < decoration.required_level {
            return Err(ProgressionError::LevelTooLow {
                required: decoration.required_level,
                current,
            });
        }
        if ledger.balance() < decoration.cost {
            return Err(ProgressionError::InsufficientFunds {
                required: decoration.cost,
                available: ledger.balance(),
            });
        }
        Ok(decoration)
    }

    pub fn can_purchase_decoration<L: Ledger + ?Sized>(&self, id: &str, ledger: &L) -> bool {
        self.check_purchase(id, ledger).is_ok()
    }

    pub fn try_purchase_decoration<L: Ledger + ?Sized>(
        &mut self,
        id: &str,
        ledger: &mut L,
    ) -> Result<(), ProgressionError> {
        let cost = self.check_purchase(id, &*ledger)?.cost;
        if !ledger.spend(cost) {
            return Err(ProgressionError::SpendRejected(cost));
        }
        self.purchased.push(id.to_string());
        tracing::debug!(id, cost, "decoration purchased");
        self.events
            .push(ProgressionEvent::DecorationPurchased { id: id.to_string() });
        Ok(())
    }

    pub fn purchase_decoration<L: Ledger + ?Sized>(&mut self, id: &str, ledger: &mut L) -> bool {
        self.try_purchase_decoration(id, ledger).is_ok()
    }

    fn placement_valid(x: f32, y: f32) -> bool {
        (0.0..=PLACEMENT_WIDTH).contains(&x) && (0.0..=PLACEMENT_HEIGHT).contains(&y)
    }

    fn instance_count(&self, kind: BuildingType, id: &str) -> u32 {
        self.placed_decorations(kind)
            .iter()
            .filter(|p| p.decoration_id == id)
            .count() as u32
    }

    /// Put a purchased decoration into `kind`'s interior at `(x, y)`.
    pub fn try_place_decoration(
        &mut self,
        kind: BuildingType,
        id: &str,
        x: f32,
        y: f32,
    ) -> Result<(), ProgressionError> {
        if !self.is_purchased(id) {
            return Err(ProgressionError::NotPurchased(id.to_string()));
        }
        if !Self::placement_valid(x, y) {
            return Err(ProgressionError::OutOfBounds { x, y });
        }
        let max = self.decoration(id).map_or(1, Decoration::instance_cap);
        if self.instance_count(kind, id) >= max {
            return Err(ProgressionError::InstanceCap {
                id: id.to_string(),
                max,
            });
        }
        let progress = self
            .buildings
            .get_mut(&kind)
            .ok_or(ProgressionError::NotUpgradable(kind))?;
        progress.placed.push(PlacedDecoration::new(id, x, y));
        tracing::debug!(kind = kind.key(), id, x, y, "decoration placed");
        self.events.push(ProgressionEvent::DecorationPlaced {
            kind,
            id: id.to_string(),
        });
        Ok(())
    }

    pub fn place_decoration(&mut self, kind: BuildingType, id: &str, x: f32, y: f32) -> bool {
        self.try_place_decoration(kind, id, x, y).is_ok()
    }

    /// Remove the first placement of `id` near `(x, y)`.
    pub fn remove_decoration(&mut self, kind: BuildingType, id: &str, x: f32, y: f32) -> bool {
        let Some(progress) = self.buildings.get_mut(&kind) else {
            return false;
        };
        match progress
            .placed
            .iter()
            .position(|p| p.matches(id, x, y, PLACEMENT_TOLERANCE))
        {
            Some(index) => {
                progress.placed.remove(index);
                true
            }
            None => false,
        }
    }

    /// Move the first placement of `id` near `from` to `to`, if `to` is in bounds.
    pub fn move_decoration(
        &mut self,
        kind: BuildingType,
        id: &str,
        from: (f32, f32),
        to: (f32, f32),
    ) -> bool {
        if !Self::placement_valid(to.0, to.1) {
            return false;
        }
        let Some(progress) = self.buildings.get_mut(&kind) else {
            return false;
        };
        match progress
            .placed
            .iter_mut()
            .find(|p| p.matches(id, from.0, from.1, PLACEMENT_TOLERANCE))
        {
            Some(placed) => {
                placed.x = to.0;
                placed.y = to.1;
                true
            }
            None => false,
        }
    }

    pub fn placed_decorations(&self, kind: BuildingType) -> &[PlacedDecoration] {
        self.buildings
            .get(&kind)
            .map_or(&[][..], |b| b.placed.as_slice())
    }

    fn unlock_decorations(&mut self) {
        for decoration in &mut self.catalog {
            let level = self
                .buildings
                .get(&decoration.compatible_building)
                .map_or(1, |b| b.level);
            decoration.unlocked = level >= decoration.required_level;
        }
    }

    pub fn building_exterior_sprite(&self, kind: BuildingType) -> String {
        visuals::exterior_sprite_id(kind, self.building_level(kind))
    }

    pub fn building_interior_background(&self, kind: BuildingType) -> String {
        visuals::interior_background_id(kind, self.building_level(kind))
    }

    pub fn building_ambient_color(&self, kind: BuildingType) -> Rgba {
        visuals::ambient_color(kind, self.building_level(kind))
    }

    pub fn building_efficiency_bonus(&self, kind: BuildingType) -> f32 {
        visuals::efficiency_bonus(self.building_level(kind))
    }

    /// The authored next level for `kind`, or the formula fallback when the
    /// table has no entry. `None` at max level.
    pub fn next_upgrade(&self, kind: BuildingType) -> Option<BuildingUpgrade> {
        let level = self.building_level(kind);
        if level >= MAX_BUILDING_LEVEL {
            return None;
        }
        let next = level + 1;
        let authored = self
            .all_upgrades(kind)
            .iter()
            .find(|u| u.level == next)
            .cloned();
        Some(authored.unwrap_or_else(|| BuildingUpgrade::fallback(kind, next)))
    }

    pub fn all_upgrades(&self, kind: BuildingType) -> &[BuildingUpgrade] {
        self.upgrades.get(&kind).map_or(&[][..], Vec::as_slice)
    }

    pub fn upgrade_cost(&self, kind: BuildingType) -> Option<u32> {
        self.next_upgrade(kind).map(|u| u.cost)
    }

    pub fn required_xp_for_next_level(&self, kind: BuildingType) -> Option<u32> {
        self.next_upgrade(kind).map(|u| u.required_xp)
    }

    pub fn is_building_max_level(&self, kind: BuildingType) -> bool {
        self.building_level(kind) >= MAX_BUILDING_LEVEL
    }

    pub fn has_building_prestige(&self, kind: BuildingType) -> bool {
        self.is_building_max_level(kind)
    }

    pub fn building_prestige_effect(&self, kind: BuildingType) -> Option<&'static str> {
        self.has_building_prestige(kind)
            .then(|| visuals::prestige_effect(kind))
    }

    pub fn events(&self) -> &[ProgressionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ProgressionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> ProgressionSnapshot {
        let mut snapshot = ProgressionSnapshot {
            purchased_decorations: self.purchased.clone(),
            ..ProgressionSnapshot::default()
        };
        for (kind, progress) in &self.buildings {
            let key = kind_key(*kind);
            snapshot.building_levels.insert(key.clone(), progress.level);
            snapshot.building_xp.insert(key.clone(), progress.xp);
            if !progress.placed.is_empty() {
                snapshot
                    .placed_decorations
                    .insert(key, progress.placed.clone());
            }
        }
        snapshot
    }

    /// Replace all progression state with `snapshot`. Keys that do not name
    /// an upgradable building are skipped; levels are clamped to the valid
    /// range; duplicate purchases collapse to one. Queued events are kept.
    pub fn restore(&mut self, snapshot: &ProgressionSnapshot) {
        for progress in self.buildings.values_mut() {
            *progress = BuildingProgress::default();
        }
        for (key, level) in &snapshot.building_levels {
            if let Some(progress) = parse_kind_key(key).and_then(|k| self.buildings.get_mut(&k)) {
                progress.level = (*level).clamp(1, MAX_BUILDING_LEVEL);
            } else {
                tracing::debug!(key = key.as_str(), "skipping unknown building level key");
            }
        }
        for (key, xp) in &snapshot.building_xp {
            if let Some(progress) = parse_kind_key(key).and_then(|k| self.buildings.get_mut(&k)) {
                progress.xp = *xp;
            }
        }
        for (key, placed) in &snapshot.placed_decorations {
            if let Some(progress) = parse_kind_key(key).and_then(|k| self.buildings.get_mut(&k)) {
                progress.placed = placed.clone();
            }
        }
        self.purchased.clear();
        for id in &snapshot.purchased_decorations {
            if !self.is_purchased(id) {
                self.purchased.push(id.clone());
            }
        }
        self.unlock_decorations();
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        self.snapshot().to_json()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut engine = Self::new();
        engine.restore(&ProgressionSnapshot::from_json(json)?);
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Wallet;

    /// Reports a healthy balance but refuses every spend.
    struct Frozen;

    impl Ledger for Frozen {
        fn balance(&self) -> u32 {
            10_000
        }
        fn spend(&mut self, _amount: u32) -> bool {
            false
        }
        fn award(&mut self, _amount: u32, _reason: &str) {}
    }

    #[test]
    fn coffee_shop_upgrade_needs_xp_and_currency() {
        let mut engine = ProgressionEngine::new();
        let mut wallet = Wallet::new(150);

        engine.add_building_xp(BuildingType::CoffeeShop, 499);
        assert!(!engine.can_upgrade_building(BuildingType::CoffeeShop, &wallet));
        assert_eq!(
            engine.try_upgrade_building(BuildingType::CoffeeShop, &mut wallet),
            Err(ProgressionError::InsufficientXp {
                required: 500,
                available: 499
            })
        );

        engine.add_building_xp(BuildingType::CoffeeShop, 1);
        assert!(engine.can_upgrade_building(BuildingType::CoffeeShop, &wallet));
        assert!(engine.upgrade_building(BuildingType::CoffeeShop, &mut wallet));
        assert_eq!(engine.building_level(BuildingType::CoffeeShop), 2);
        assert_eq!(wallet.balance(), 50);
        assert_eq!(
            engine.drain_events(),
            vec![
                ProgressionEvent::UpgradeReady {
                    kind: BuildingType::CoffeeShop
                },
                ProgressionEvent::BuildingUpgraded {
                    kind: BuildingType::CoffeeShop,
                    level: 2
                },
            ]
        );
    }

    #[test]
    fn xp_without_currency_is_not_enough() {
        let mut engine = ProgressionEngine::new();
        let mut wallet = Wallet::new(99);
        engine.add_building_xp(BuildingType::CoffeeShop, 10_000);
        assert_eq!(
            engine.try_upgrade_building(BuildingType::CoffeeShop, &mut wallet),
            Err(ProgressionError::InsufficientFunds {
                required: 100,
                available: 99
            })
        );
    }

    #[test]
    fn failed_upgrade_changes_nothing() {
        let mut engine = ProgressionEngine::new();
        engine.add_building_xp(BuildingType::Gym, 450);
        engine.drain_events();
        let before = engine.snapshot();

        let mut frozen = Frozen;
        assert_eq!(
            engine.try_upgrade_building(BuildingType::Gym, &mut frozen),
            Err(ProgressionError::SpendRejected(90))
        );
        let mut poor = Wallet::new(89);
        assert!(!engine.upgrade_building(BuildingType::Gym, &mut poor));

        assert_eq!(engine.snapshot(), before);
        assert_eq!(poor.balance(), 89);
        assert!(engine.events().is_empty());
    }

    #[test]
    fn levels_only_climb_one_at_a_time_to_max() {
        let mut engine = ProgressionEngine::new();
        let mut wallet = Wallet::new(1_000_000);
        engine.add_building_xp(BuildingType::Home, 1_000_000);

        let mut last = engine.building_level(BuildingType::Home);
        for _ in 0..10 {
            let ok = engine.upgrade_building(BuildingType::Home, &mut wallet);
            let now = engine.building_level(BuildingType::Home);
            if ok {
                assert_eq!(now, last + 1);
            } else {
                assert_eq!(now, last);
            }
            last = now;
        }
        assert_eq!(last, MAX_BUILDING_LEVEL);
        assert_eq!(
            engine.try_upgrade_building(BuildingType::Home, &mut wallet),
            Err(ProgressionError::MaxLevel(BuildingType::Home))
        );
        assert_eq!(wallet.total_spent(), 60 + 160 + 320 + 640);
        assert!(engine.has_building_prestige(BuildingType::Home));
        assert_eq!(
            engine.building_prestige_effect(BuildingType::Home),
            Some("Cozy Warmth")
        );
        assert_eq!(engine.next_upgrade(BuildingType::Home), None);
    }

    #[test]
    fn upgrade_ready_fires_once() {
        let mut engine = ProgressionEngine::new();
        engine.add_building_xp(BuildingType::Library, 300);
        engine.add_building_xp(BuildingType::Library, 300);
        engine.add_building_xp(BuildingType::Library, 300);
        let ready = engine
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, ProgressionEvent::UpgradeReady { .. }))
            .count();
        assert_eq!(ready, 1);
    }

    #[test]
    fn decoration_purchase_is_level_gated() {
        let mut engine = ProgressionEngine::new();
        let mut wallet = Wallet::new(1_000);
        assert!(!engine.can_purchase_decoration("coffee_plant", &wallet));
        assert_eq!(
            engine.try_purchase_decoration("coffee_plant", &mut wallet),
            Err(ProgressionError::LevelTooLow {
                required: 2,
                current: 1
            })
        );

        engine.add_building_xp(BuildingType::CoffeeShop, 500);
        assert!(engine.upgrade_building(BuildingType::CoffeeShop, &mut wallet));
        assert!(engine.can_purchase_decoration("coffee_plant", &wallet));
        assert!(engine.purchase_decoration("coffee_plant", &mut wallet));
        assert_eq!(wallet.balance(), 1_000 - 100 - 50);
        assert_eq!(
            engine.try_purchase_decoration("coffee_plant", &mut wallet),
            Err(ProgressionError::AlreadyPurchased("coffee_plant".into()))
        );
        assert!(!engine.purchase_decoration("throne", &mut wallet));
        assert!(engine.decoration("coffee_plant").unwrap().unlocked);
    }

    fn with_plant() -> (ProgressionEngine, Wallet) {
        let mut engine = ProgressionEngine::new();
        let mut wallet = Wallet::new(1_000);
        engine.add_building_xp(BuildingType::CoffeeShop, 500);
        assert!(engine.upgrade_building(BuildingType::CoffeeShop, &mut wallet));
        assert!(engine.purchase_decoration("coffee_plant", &mut wallet));
        assert!(engine.purchase_decoration("espresso_machine", &mut wallet));
        engine.drain_events();
        (engine, wallet)
    }

    #[test]
    fn placement_respects_caps_and_bounds() {
        let (mut engine, _) = with_plant();
        let cafe = BuildingType::CoffeeShop;

        assert_eq!(
            engine.try_place_decoration(cafe, "cozy_chair", 10.0, 10.0),
            Err(ProgressionError::NotPurchased("cozy_chair".into()))
        );
        assert_eq!(
            engine.try_place_decoration(cafe, "coffee_plant", 1001.0, 10.0),
            Err(ProgressionError::OutOfBounds { x: 1001.0, y: 10.0 })
        );
        for i in 0..3 {
            assert!(engine.place_decoration(cafe, "coffee_plant", 100.0 * i as f32, 50.0));
        }
        assert_eq!(
            engine.try_place_decoration(cafe, "coffee_plant", 400.0, 50.0),
            Err(ProgressionError::InstanceCap {
                id: "coffee_plant".into(),
                max: 3
            })
        );
        assert!(engine.place_decoration(cafe, "espresso_machine", 0.0, 700.0));
        assert!(!engine.place_decoration(cafe, "espresso_machine", 20.0, 20.0));

        assert_eq!(engine.placed_decorations(cafe).len(), 4);
        assert_eq!(engine.drain_events().len(), 4);
    }

    #[test]
    fn remove_and_move_use_tolerance() {
        let (mut engine, _) = with_plant();
        let cafe = BuildingType::CoffeeShop;
        assert!(engine.place_decoration(cafe, "coffee_plant", 100.0, 100.0));

        assert!(!engine.move_decoration(cafe, "coffee_plant", (110.0, 100.0), (200.0, 200.0)));
        assert!(!engine.move_decoration(cafe, "coffee_plant", (102.0, 98.0), (2000.0, 0.0)));
        assert!(engine.move_decoration(cafe, "coffee_plant", (102.0, 98.0), (200.0, 200.0)));
        assert_eq!(engine.placed_decorations(cafe)[0].x, 200.0);

        assert!(!engine.remove_decoration(cafe, "coffee_plant", 100.0, 100.0));
        assert!(engine.remove_decoration(cafe, "coffee_plant", 203.0, 197.0));
        assert!(engine.placed_decorations(cafe).is_empty());
    }

    #[test]
    fn derived_views_follow_level() {
        let (engine, _) = with_plant();
        let cafe = BuildingType::CoffeeShop;
        assert_eq!(engine.building_exterior_sprite(cafe), "coffee_shop_level_2");
        assert_eq!(
            engine.building_interior_background(cafe),
            "coffee_interior_level_2"
        );
        assert!((engine.building_efficiency_bonus(cafe) - 1.1).abs() < 1e-6);
        assert_eq!(engine.upgrade_cost(cafe), Some(250));
        assert_eq!(engine.required_xp_for_next_level(cafe), Some(1200));
        assert_eq!(engine.building_prestige_effect(cafe), None);

        let ids: Vec<_> = engine
            .available_decorations(cafe)
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ids, vec!["coffee_plant", "espresso_machine"]);
        assert_eq!(engine.purchased_decorations(cafe).len(), 2);
        assert!(engine.purchased_decorations(BuildingType::Gym).is_empty());
        let lighting = engine.decorations_by_category(DecorationCategory::Lighting);
        assert_eq!(lighting.len(), 3);
    }

    #[test]
    fn snapshot_round_trip() {
        let (mut engine, _) = with_plant();
        let cafe = BuildingType::CoffeeShop;
        engine.add_building_xp(BuildingType::Gym, 42);
        assert!(engine.place_decoration(cafe, "coffee_plant", 10.0, 20.0));
        assert!(engine.place_decoration(cafe, "coffee_plant", 30.0, 40.0));

        let json = engine.to_json().unwrap();
        let back = ProgressionEngine::from_json(&json).unwrap();
        for kind in BuildingType::UPGRADABLE {
            assert_eq!(back.building_level(kind), engine.building_level(kind));
            assert_eq!(back.building_xp(kind), engine.building_xp(kind));
            assert_eq!(
                back.placed_decorations(kind),
                engine.placed_decorations(kind)
            );
        }
        assert_eq!(back.purchased_ids(), engine.purchased_ids());
        assert_eq!(back.snapshot(), engine.snapshot());
    }

    #[test]
    fn restore_skips_unknown_keys_and_clamps_levels() {
        let json = r#"{
            "buildingLevels": {"0": 9, "1": 0, "7": 3, "gym": 2},
            "buildingXP": {"2": 40, "42": 1},
            "purchasedDecorations": ["house_plant", "house_plant"],
            "placedDecorations": {"0": [{"id": "house_plant", "x": 5, "y": 6}], "9": []}
        }"#;
        let engine = ProgressionEngine::from_json(json).unwrap();
        assert_eq!(
            engine.building_level(BuildingType::Home),
            MAX_BUILDING_LEVEL
        );
        assert_eq!(engine.building_level(BuildingType::CoffeeShop), 1);
        assert_eq!(engine.building_xp(BuildingType::BulletinBoard), 40);
        assert_eq!(engine.purchased_ids(), ["house_plant".to_string()]);
        let placed = engine.placed_decorations(BuildingType::Home);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].scale, 1.0);
        assert!(engine.decoration("elegant_chandelier").unwrap().unlocked);
    }
}
