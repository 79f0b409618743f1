use crate::filter_types::EntityStatus;
use crate::ids::EntityId;

/// Base attribute set reported by the remote catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub special_attack: u32,
    pub special_defense: u32,
}

impl BaseStats {
    pub fn total(&self) -> u32 {
        self.hp
            .saturating_add(self.attack)
            .saturating_add(self.defense)
            .saturating_add(self.speed)
            .saturating_add(self.special_attack)
            .saturating_add(self.special_defense)
    }
}

/// A remote-sourced catalog record, already validated at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CatalogEntity {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    /// Display name of the primary category.
    pub category: String,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: BaseStats,
    /// Aggregate attribute score the status is derived from.
    pub score: u32,
    pub image_url: Option<String>,
    pub height: Option<u32>,
    pub weight: Option<u32>,
}

impl CatalogEntity {
    pub fn status(&self) -> EntityStatus {
        EntityStatus::from_score(self.score)
    }
}

/// A category as reported by the remote catalog, with its population.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CategorySummary {
    pub token: String,
    pub display_name: String,
    pub entity_count: u64,
}
