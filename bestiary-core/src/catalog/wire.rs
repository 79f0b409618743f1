//! Wire schema of the catalog proxy and its conversion into model types.
//!
//! Records are decoded into these private shapes first, then validated.
//! Anything that does not fit becomes [`CatalogError::DataFetch`].

use bestiary_model::{
    BaseStats, CatalogEntity, CategorySummary, EntityId, RemotePage, UiCategory,
};
use serde::Deserialize;

use crate::error::{CatalogError, Result};

#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope {
    data: Vec<CreatureRecord>,
    pagination: PaginationRecord,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaginationRecord {
    page: u32,
    limit: u32,
    total: u64,
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatureRecord {
    id: RawId,
    name: String,
    height: Option<u32>,
    weight: Option<u32>,
    hp: Option<u32>,
    attack: Option<u32>,
    defense: Option<u32>,
    speed: Option<u32>,
    special_attack: Option<u32>,
    special_defense: Option<u32>,
    total_stats: Option<u32>,
    image_url: Option<String>,
    #[serde(default)]
    types: Vec<TypeSlot>,
    #[serde(default)]
    abilities: Vec<AbilitySlot>,
    species: Option<SpeciesRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TypeSlot {
    slot: u32,
    #[serde(rename = "type")]
    kind: TypeName,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TypeName {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AbilitySlot {
    slot: u32,
    ability_name: String,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpeciesRecord {
    flavor_text_en: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TypeRecord {
    name: String,
    #[serde(rename = "_count")]
    count: Option<TypeCount>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TypeCount {
    #[serde(default)]
    pokemon: u64,
}

impl ListEnvelope {
    pub(crate) fn into_remote_page(self) -> Result<RemotePage> {
        let items = self
            .data
            .into_iter()
            .map(CreatureRecord::into_entity)
            .collect::<Result<Vec<_>>>()?;
        let pagination = self.pagination;
        if pagination.limit > 0 && items.len() > pagination.limit as usize {
            return Err(CatalogError::data(format!(
                "page holds {} records but limit is {}",
                items.len(),
                pagination.limit
            )));
        }
        Ok(RemotePage {
            items,
            total_count: pagination.total,
            page_number: pagination.page,
            page_size: pagination.limit,
            total_pages: pagination.total_pages,
        })
    }
}

impl CreatureRecord {
    pub(crate) fn into_entity(mut self) -> Result<CatalogEntity> {
        let raw_id = match self.id {
            RawId::Number(n) => n.to_string(),
            RawId::Text(text) => text,
        };
        let id = EntityId::new(raw_id)
            .map_err(|err| CatalogError::data(format!("record has unusable id: {err}")))?;
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CatalogError::data(format!("record {id} has no name")));
        }
        let name = capitalize(name);

        self.types.sort_by_key(|slot| slot.slot);
        self.abilities.sort_by_key(|slot| slot.slot);
        let types: Vec<String> = self
            .types
            .into_iter()
            .map(|slot| slot.kind.name.to_lowercase())
            .collect();
        let category = types
            .first()
            .and_then(|primary| UiCategory::lookup(primary))
            .unwrap_or(UiCategory::Normal)
            .display_name()
            .to_string();

        let stats = BaseStats {
            hp: self.hp.unwrap_or_default(),
            attack: self.attack.unwrap_or_default(),
            defense: self.defense.unwrap_or_default(),
            speed: self.speed.unwrap_or_default(),
            special_attack: self.special_attack.unwrap_or_default(),
            special_defense: self.special_defense.unwrap_or_default(),
        };
        let score = self.total_stats.unwrap_or_else(|| stats.total());

        let description = self
            .species
            .and_then(|species| species.flavor_text_en)
            .map(|text| fold_flavor_text(&text))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| {
                let joined = if types.is_empty() {
                    "unknown".to_string()
                } else {
                    types.join("/")
                };
                format!("A {joined} type creature.")
            });

        let abilities = self
            .abilities
            .into_iter()
            .map(|slot| {
                if slot.is_hidden {
                    format!("{} (hidden)", slot.ability_name)
                } else {
                    slot.ability_name
                }
            })
            .collect();

        Ok(CatalogEntity {
            id,
            name,
            description,
            category,
            types,
            abilities,
            stats,
            score,
            image_url: self.image_url.filter(|url| !url.trim().is_empty()),
            height: self.height,
            weight: self.weight,
        })
    }
}

impl TypeRecord {
    pub(crate) fn into_summary(self) -> CategorySummary {
        let token = self.name.trim().to_lowercase();
        let display_name = UiCategory::lookup(&token)
            .map(|category| category.display_name().to_string())
            .unwrap_or_else(|| capitalize(&token));
        CategorySummary {
            token,
            display_name,
            entity_count: self.count.map(|count| count.pokemon).unwrap_or_default(),
        }
    }
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn fold_flavor_text(raw: &str) -> String {
    raw.replace(['\u{c}', '\n'], " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestiary_model::EntityStatus;

    fn record(json: &str) -> Result<CatalogEntity> {
        serde_json::from_str::<CreatureRecord>(json)
            .expect("record json")
            .into_entity()
    }

    #[test]
    fn derives_display_fields() {
        let entity = record(
            r#"{
                "id": 6,
                "name": "charizard",
                "hp": 78, "attack": 84, "defense": 78, "speed": 100,
                "specialAttack": 109, "specialDefense": 85,
                "imageUrl": "https://img.example/6.png",
                "types": [
                    {"slot": 2, "type": {"name": "flying"}},
                    {"slot": 1, "type": {"name": "fire"}}
                ],
                "abilities": [
                    {"slot": 3, "abilityName": "solar-power", "isHidden": true},
                    {"slot": 1, "abilityName": "blaze"}
                ],
                "species": {"flavorTextEn": "Spits fire that\fis hot enough\nto melt boulders."}
            }"#,
        )
        .unwrap();

        assert_eq!(entity.id.as_str(), "6");
        assert_eq!(entity.name, "Charizard");
        assert_eq!(entity.category, "Fire");
        assert_eq!(entity.types, ["fire", "flying"]);
        assert_eq!(entity.abilities, ["blaze", "solar-power (hidden)"]);
        assert_eq!(entity.score, 534);
        assert_eq!(entity.status(), EntityStatus::Active);
        assert_eq!(
            entity.description,
            "Spits fire that is hot enough to melt boulders."
        );
    }

    #[test]
    fn total_stats_drives_status_and_description_falls_back() {
        let entity = record(
            r#"{"id": "150", "name": "mewtwo", "totalStats": 680,
                "types": [{"slot": 1, "type": {"name": "psychic"}}]}"#,
        )
        .unwrap();
        assert_eq!(entity.status(), EntityStatus::Pending);
        assert_eq!(entity.description, "A psychic type creature.");
    }

    #[test]
    fn unknown_primary_type_is_normal() {
        let entity =
            record(r#"{"id": 1, "name": "x", "types": [{"slot": 1, "type": {"name": "shadow"}}]}"#)
                .unwrap();
        assert_eq!(entity.category, "Normal");
        assert_eq!(entity.status(), EntityStatus::Inactive);
    }

    #[test]
    fn blank_name_or_id_is_a_data_error() {
        assert!(matches!(
            record(r#"{"id": "  ", "name": "x"}"#),
            Err(CatalogError::DataFetch { .. })
        ));
        assert!(matches!(
            record(r#"{"id": 3, "name": " "}"#),
            Err(CatalogError::DataFetch { .. })
        ));
    }

    #[test]
    fn type_records_become_summaries() {
        let summary = serde_json::from_str::<TypeRecord>(
            r#"{"id": 10, "name": "fire", "_count": {"pokemon": 64}}"#,
        )
        .unwrap()
        .into_summary();
        assert_eq!(summary.token, "fire");
        assert_eq!(summary.display_name, "Fire");
        assert_eq!(summary.entity_count, 64);
    }
}
