//! `{x, y}` wire format for [`glam::Vec2`].
//!
//! glam serialises vectors as bare arrays; saved towns use objects. Use with
//! `#[serde(with = "focustown_common::wire::xy")]`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct Xy {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
}

impl From<Vec2> for Xy {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Xy> for Vec2 {
    fn from(xy: Xy) -> Self {
        Vec2::new(xy.x, xy.y)
    }
}

pub mod xy {
    use super::Xy;
    use glam::Vec2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &Vec2, serializer: S) -> Result<S::Ok, S::Error> {
        Xy::from(*v).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec2, D::Error> {
        Xy::deserialize(deserializer).map(Vec2::from)
    }
}

/// Same as [`xy`] for optional vectors; pair with `#[serde(default)]`.
pub mod xy_opt {
    use super::Xy;
    use glam::Vec2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &Option<Vec2>, serializer: S) -> Result<S::Ok, S::Error> {
        v.map(Xy::from).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec2>, D::Error> {
        Ok(Option::<Xy>::deserialize(deserializer)?.map(Vec2::from))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "super::xy")]
        at: Vec2,
    }

    #[test]
    fn vec2_as_object() {
        let h = Holder {
            at: Vec2::new(1.5, -2.0),
        };
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, r#"{"at":{"x":1.5,"y":-2.0}}"#);
        let back: Holder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn missing_axis_defaults_to_zero() {
        let h: Holder = serde_json::from_str(r#"{"at":{"x":3.0}}"#).unwrap();
        assert_eq!(h.at, Vec2::new(3.0, 0.0));
    }
}
