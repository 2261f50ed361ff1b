use crate::catalog::PlacedDecoration;
use focustown_common::BuildingType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persisted progression state. Maps are keyed by the building type's
/// integer discriminant written as a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionSnapshot {
    #[serde(default)]
    pub building_levels: BTreeMap<String, u32>,
    #[serde(rename = "buildingXP", default)]
    pub building_xp: BTreeMap<String, u32>,
    #[serde(default)]
    pub purchased_decorations: Vec<String>,
    #[serde(default)]
    pub placed_decorations: BTreeMap<String, Vec<PlacedDecoration>>,
}

impl ProgressionSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

pub(crate) fn kind_key(kind: BuildingType) -> String {
    kind.index().to_string()
}

/// `None` for keys that do not name an upgradable building type.
pub(crate) fn parse_kind_key(key: &str) -> Option<BuildingType> {
    let kind = BuildingType::try_from(key.trim().parse::<u8>().ok()?).ok()?;
    BuildingType::UPGRADABLE.contains(&kind).then_some(kind)
}
