use std::fmt;

/// Server-sortable keys exposed to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortKey {
    #[default]
    Name,
    Date,
    Category,
}

impl SortKey {
    pub fn all() -> &'static [SortKey] {
        &[SortKey::Name, SortKey::Date, SortKey::Category]
    }

    /// Parse the UI parameter form (`name`, `date`, `category`).
    pub fn parse(raw: &str) -> Option<SortKey> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name" => Some(SortKey::Name),
            "date" => Some(SortKey::Date),
            "category" => Some(SortKey::Category),
            _ => None,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Date => "date",
            SortKey::Category => "category",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortOrder {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "asc"))]
    Ascending,
    #[cfg_attr(feature = "serde", serde(rename = "desc"))]
    Descending,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<SortOrder> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Ascending),
            "desc" => Some(SortOrder::Descending),
            _ => None,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    pub fn toggled(self) -> SortOrder {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Aggregate score above which an entity is reported as pending.
pub const PENDING_SCORE_THRESHOLD: u32 = 600;
/// Aggregate score below which an entity is reported as inactive.
pub const INACTIVE_SCORE_THRESHOLD: u32 = 300;

/// Status derived from an entity's aggregate attribute score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EntityStatus {
    Active,
    Inactive,
    Pending,
}

impl EntityStatus {
    pub fn all() -> &'static [EntityStatus] {
        &[
            EntityStatus::Active,
            EntityStatus::Inactive,
            EntityStatus::Pending,
        ]
    }

    /// `> 600` is pending, `< 300` is inactive, everything else is active.
    pub fn from_score(score: u32) -> EntityStatus {
        if score > PENDING_SCORE_THRESHOLD {
            EntityStatus::Pending
        } else if score < INACTIVE_SCORE_THRESHOLD {
            EntityStatus::Inactive
        } else {
            EntityStatus::Active
        }
    }

    pub fn parse(raw: &str) -> Option<EntityStatus> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Some(EntityStatus::Active),
            "inactive" => Some(EntityStatus::Inactive),
            "pending" => Some(EntityStatus::Pending),
            _ => None,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            EntityStatus::Active => "active",
            EntityStatus::Inactive => "inactive",
            EntityStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Categories known to the UI, keyed by their display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiCategory {
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
    Fighting,
    Poison,
    Ground,
    Flying,
    Bug,
    Rock,
    Ghost,
    Steel,
    Normal,
}

impl UiCategory {
    pub fn all() -> &'static [UiCategory] {
        use UiCategory::*;
        &[
            Fire, Water, Grass, Electric, Psychic, Ice, Dragon, Dark, Fairy,
            Fighting, Poison, Ground, Flying, Bug, Rock, Ghost, Steel, Normal,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UiCategory::Fire => "Fire",
            UiCategory::Water => "Water",
            UiCategory::Grass => "Grass",
            UiCategory::Electric => "Electric",
            UiCategory::Psychic => "Psychic",
            UiCategory::Ice => "Ice",
            UiCategory::Dragon => "Dragon",
            UiCategory::Dark => "Dark",
            UiCategory::Fairy => "Fairy",
            UiCategory::Fighting => "Fighting",
            UiCategory::Poison => "Poison",
            UiCategory::Ground => "Ground",
            UiCategory::Flying => "Flying",
            UiCategory::Bug => "Bug",
            UiCategory::Rock => "Rock",
            UiCategory::Ghost => "Ghost",
            UiCategory::Steel => "Steel",
            UiCategory::Normal => "Normal",
        }
    }

    /// Token understood by the remote `type` filter.
    pub fn remote_token(&self) -> &'static str {
        match self {
            UiCategory::Fire => "fire",
            UiCategory::Water => "water",
            UiCategory::Grass => "grass",
            UiCategory::Electric => "electric",
            UiCategory::Psychic => "psychic",
            UiCategory::Ice => "ice",
            UiCategory::Dragon => "dragon",
            UiCategory::Dark => "dark",
            UiCategory::Fairy => "fairy",
            UiCategory::Fighting => "fighting",
            UiCategory::Poison => "poison",
            UiCategory::Ground => "ground",
            UiCategory::Flying => "flying",
            UiCategory::Bug => "bug",
            UiCategory::Rock => "rock",
            UiCategory::Ghost => "ghost",
            UiCategory::Steel => "steel",
            UiCategory::Normal => "normal",
        }
    }

    /// Case-insensitive lookup by display name (which also matches the
    /// remote token, since tokens are the lower-cased display names).
    pub fn lookup(raw: &str) -> Option<UiCategory> {
        let needle = raw.trim();
        UiCategory::all()
            .iter()
            .copied()
            .find(|category| category.display_name().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for UiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
