//! Translation of raw UI parameters into a canonical [`QueryDescriptor`].
//!
//! Normalization is total: every input yields a descriptor. Malformed values
//! fall back to their defaults instead of failing, so callers never need an
//! error path between the parameter surface and the fetcher.

use std::num::NonZeroU32;

use bestiary_model::{
    EntityStatus, FilterKey, QueryDescriptor, RawQueryParams, SortKey,
    SortOrder, UiCategory,
};

/// Value the UI uses for "no constraint" on select-style filters.
pub const ANY_VALUE: &str = "all";

/// Normalize raw UI parameters. Pure and infallible.
pub fn normalize(raw: &RawQueryParams) -> QueryDescriptor {
    QueryDescriptor {
        text: raw.get(FilterKey::Query).and_then(normalize_text),
        category: raw.get(FilterKey::Category).and_then(category_token),
        status: raw.get(FilterKey::Status).and_then(EntityStatus::parse),
        sort_key: raw
            .get(FilterKey::Sort)
            .and_then(SortKey::parse)
            .unwrap_or_default(),
        sort_order: raw
            .get(FilterKey::Order)
            .and_then(SortOrder::parse)
            .unwrap_or_default(),
        page: raw
            .get(FilterKey::Page)
            .map(parse_page)
            .unwrap_or(NonZeroU32::MIN),
        favorites_only: raw
            .get(FilterKey::Favorites)
            .is_some_and(parse_flag),
    }
}

fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Map a category display name to its remote filter token. Unknown
/// categories pass through lower-cased.
pub fn category_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ANY_VALUE) {
        return None;
    }
    match UiCategory::lookup(trimmed) {
        Some(category) => Some(category.remote_token().to_string()),
        None => Some(trimmed.to_lowercase()),
    }
}

/// Pages below one, or anything non-numeric, coerce to page one.
pub fn parse_page(raw: &str) -> NonZeroU32 {
    raw.trim()
        .parse::<u32>()
        .ok()
        .and_then(NonZeroU32::new)
        .unwrap_or(NonZeroU32::MIN)
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
