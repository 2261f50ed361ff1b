use focustown_common::Rect;
use focustown_kernel::{Building, TownMap};
use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    Building,
    Boundary,
}

/// A single reported contact. `normal` points away from the obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    pub kind: CollisionKind,
    pub point: Vec2,
    pub normal: Vec2,
    pub object_id: String,
}

/// Buildings first, then map edges.
pub fn check_collision(map: &TownMap, position: Vec2, size: Vec2) -> Option<Collision> {
    check_building_collision(map, position, size)
        .or_else(|| check_boundary_collision(map, position, size))
}

/// First building in map order whose footprint overlaps the box. Locked
/// buildings block just like unlocked ones.
pub fn check_building_collision(map: &TownMap, position: Vec2, size: Vec2) -> Option<Collision> {
    let rect = Rect::from_pos_size(position, size);
    let building = map.colliding_building(&rect)?;
    Some(Collision {
        kind: CollisionKind::Building,
        point: rect.center(),
        normal: face_normal(&rect, building),
        object_id: building.id.clone(),
    })
}

/// Map edges, checked left, right, top, bottom.
pub fn check_boundary_collision(map: &TownMap, position: Vec2, size: Vec2) -> Option<Collision> {
    let (point, normal, id) = if position.x < 0.0 {
        (Vec2::new(0.0, position.y), Vec2::X, "left_boundary")
    } else if position.x + size.x > map.size.x {
        (Vec2::new(map.size.x, position.y), Vec2::NEG_X, "right_boundary")
    } else if position.y < 0.0 {
        (Vec2::new(position.x, 0.0), Vec2::Y, "top_boundary")
    } else if position.y + size.y > map.size.y {
        (Vec2::new(position.x, map.size.y), Vec2::NEG_Y, "bottom_boundary")
    } else {
        return None;
    };
    Some(Collision {
        kind: CollisionKind::Boundary,
        point,
        normal,
        object_id: id.to_string(),
    })
}

/// Normal of the footprint face the box penetrates least. Equal penetration
/// on both axes picks the vertical face.
fn face_normal(rect: &Rect, building: &Building) -> Vec2 {
    let footprint = building.bounds();
    let overlap_x = rect.right().min(footprint.right()) - rect.x.max(footprint.x);
    let overlap_y = rect.bottom().min(footprint.bottom()) - rect.y.max(footprint.y);
    let away = rect.center() - footprint.center();
    if overlap_x < overlap_y {
        Vec2::new(if away.x >= 0.0 { 1.0 } else { -1.0 }, 0.0)
    } else {
        Vec2::new(0.0, if away.y >= 0.0 { 1.0 } else { -1.0 })
    }
}

/// Remove the component of `velocity` along `normal`.
pub fn slide_along(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - normal * velocity.dot(normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use focustown_common::BuildingType;

    fn map_with_block() -> TownMap {
        let mut map = TownMap::default();
        map.add_building(Building::new(
            "block",
            "Block",
            BuildingType::Library,
            Vec2::new(100.0, 100.0),
            Vec2::new(50.0, 50.0),
        ));
        map
    }

    #[test]
    fn building_hit_reports_id_and_kind() {
        let map = map_with_block();
        let hit = check_collision(&map, Vec2::new(110.0, 110.0), Vec2::splat(32.0)).unwrap();
        assert_eq!(hit.kind, CollisionKind::Building);
        assert_eq!(hit.object_id, "block");
        assert_eq!(hit.point, Vec2::new(126.0, 126.0));
    }

    #[test]
    fn buildings_win_over_boundaries() {
        let mut map = map_with_block();
        map.size = Vec2::new(140.0, 140.0);
        let hit = check_collision(&map, Vec2::new(110.0, 110.0), Vec2::splat(32.0)).unwrap();
        assert_eq!(hit.kind, CollisionKind::Building);
    }

    #[test]
    fn boundary_order_is_left_right_top_bottom() {
        let map = TownMap::default();
        let size = Vec2::splat(32.0);
        let left = check_boundary_collision(&map, Vec2::new(-1.0, -1.0), size).unwrap();
        assert_eq!(left.object_id, "left_boundary");
        assert_eq!(left.normal, Vec2::X);
        let right = check_boundary_collision(&map, Vec2::new(790.0, -1.0), size).unwrap();
        assert_eq!(right.object_id, "right_boundary");
        let bottom = check_boundary_collision(&map, Vec2::new(10.0, 590.0), size).unwrap();
        assert_eq!(bottom.normal, Vec2::NEG_Y);
        assert!(check_boundary_collision(&map, Vec2::new(768.0, 568.0), size).is_none());
    }

    #[test]
    fn face_normal_follows_shallow_axis() {
        let map = map_with_block();
        let size = Vec2::splat(32.0);
        // Coming in from the left, barely overlapping in x.
        let hit = check_building_collision(&map, Vec2::new(70.0, 110.0), size).unwrap();
        assert_eq!(hit.normal, Vec2::NEG_X);
        // Coming down from above.
        let hit = check_building_collision(&map, Vec2::new(110.0, 70.0), size).unwrap();
        assert_eq!(hit.normal, Vec2::NEG_Y);
    }

    #[test]
    fn slide_drops_normal_component() {
        let v = slide_along(Vec2::new(3.0, 4.0), Vec2::NEG_Y);
        assert_eq!(v, Vec2::new(3.0, 0.0));
    }
}
