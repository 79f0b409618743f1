use std::num::NonZeroU32;

use crate::filter_types::{EntityStatus, SortKey, SortOrder};

/// Keys of the flat UI parameter surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Query,
    Category,
    Status,
    Sort,
    Order,
    Page,
    Favorites,
}

impl FilterKey {
    pub fn all() -> &'static [FilterKey] {
        &[
            FilterKey::Query,
            FilterKey::Category,
            FilterKey::Status,
            FilterKey::Sort,
            FilterKey::Order,
            FilterKey::Page,
            FilterKey::Favorites,
        ]
    }

    pub fn param_name(&self) -> &'static str {
        match self {
            FilterKey::Query => "q",
            FilterKey::Category => "category",
            FilterKey::Status => "status",
            FilterKey::Sort => "sort",
            FilterKey::Order => "order",
            FilterKey::Page => "page",
            FilterKey::Favorites => "favorites",
        }
    }

    pub fn from_param_name(name: &str) -> Option<FilterKey> {
        FilterKey::all()
            .iter()
            .copied()
            .find(|key| key.param_name() == name)
    }
}

/// Raw, unvalidated UI parameters. Any subset may be absent and values are
/// kept exactly as the UI produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawQueryParams {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub q: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub category: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub status: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub sort: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub order: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub page: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub favorites: Option<String>,
}

impl RawQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect from `(name, value)` pairs such as a decoded query string.
    /// Unknown names are ignored; later duplicates win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = RawQueryParams::default();
        for (name, value) in pairs {
            if let Some(key) = FilterKey::from_param_name(name.as_ref()) {
                params.set(key, value);
            }
        }
        params
    }

    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    pub fn set(&mut self, key: FilterKey, value: impl Into<String>) {
        *self.slot_mut(key) = Some(value.into());
    }

    pub fn remove(&mut self, key: FilterKey) -> Option<String> {
        self.slot_mut(key).take()
    }

    pub fn with(mut self, key: FilterKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        FilterKey::all().iter().all(|key| self.get(*key).is_none())
    }

    /// Present parameters in canonical key order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        FilterKey::all()
            .iter()
            .filter_map(|key| {
                self.get(*key)
                    .map(|value| (key.param_name(), value.to_string()))
            })
            .collect()
    }

    fn slot(&self, key: FilterKey) -> &Option<String> {
        match key {
            FilterKey::Query => &self.q,
            FilterKey::Category => &self.category,
            FilterKey::Status => &self.status,
            FilterKey::Sort => &self.sort,
            FilterKey::Order => &self.order,
            FilterKey::Page => &self.page,
            FilterKey::Favorites => &self.favorites,
        }
    }

    fn slot_mut(&mut self, key: FilterKey) -> &mut Option<String> {
        match key {
            FilterKey::Query => &mut self.q,
            FilterKey::Category => &mut self.category,
            FilterKey::Status => &mut self.status,
            FilterKey::Sort => &mut self.sort,
            FilterKey::Order => &mut self.order,
            FilterKey::Page => &mut self.page,
            FilterKey::Favorites => &mut self.favorites,
        }
    }
}

/// Canonical, validated representation of a user's query intent.
///
/// Absent fields mean "no constraint"; `category` holds the remote filter
/// token rather than the display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct QueryDescriptor {
    pub text: Option<String>,
    pub category: Option<String>,
    pub status: Option<EntityStatus>,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    pub page: NonZeroU32,
    pub favorites_only: bool,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self {
            text: None,
            category: None,
            status: None,
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
            page: NonZeroU32::MIN,
            favorites_only: false,
        }
    }
}

impl QueryDescriptor {
    pub fn page_number(&self) -> u32 {
        self.page.get()
    }

    /// Whether any predicate must be evaluated after the remote fetch.
    /// `remote_status_filter` tells whether the remote enforces `status`.
    pub fn has_client_only_filters(&self, remote_status_filter: bool) -> bool {
        self.favorites_only || (self.status.is_some() && !remote_status_filter)
    }

    /// Render back into the flat UI parameter surface. Defaults are omitted
    /// so the output matches what the UI would push.
    pub fn to_params(&self) -> RawQueryParams {
        let mut params = RawQueryParams::default();
        if let Some(text) = &self.text {
            params.set(FilterKey::Query, text.clone());
        }
        if let Some(category) = &self.category {
            params.set(FilterKey::Category, category.clone());
        }
        if let Some(status) = self.status {
            params.set(FilterKey::Status, status.as_param());
        }
        if self.sort_key != SortKey::default() {
            params.set(FilterKey::Sort, self.sort_key.as_param());
        }
        if self.sort_order != SortOrder::default() {
            params.set(FilterKey::Order, self.sort_order.as_param());
        }
        if self.page.get() > 1 {
            params.set(FilterKey::Page, self.page.get().to_string());
        }
        if self.favorites_only {
            params.set(FilterKey::Favorites, "true");
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_ignores_unknown_names() {
        let params = RawQueryParams::from_pairs([
            ("q", "pika"),
            ("utm_source", "mail"),
            ("page", "3"),
        ]);
        assert_eq!(params.get(FilterKey::Query), Some("pika"));
        assert_eq!(params.get(FilterKey::Page), Some("3"));
        assert_eq!(params.to_pairs().len(), 2);
    }

    #[test]
    fn default_descriptor_renders_no_params() {
        assert!(QueryDescriptor::default().to_params().is_empty());
    }

    #[test]
    fn client_only_filters_depend_on_remote_capability() {
        let descriptor = QueryDescriptor {
            status: Some(EntityStatus::Pending),
            ..QueryDescriptor::default()
        };
        assert!(descriptor.has_client_only_filters(false));
        assert!(!descriptor.has_client_only_filters(true));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn descriptor_serializes_with_ui_spelling() {
        let descriptor = QueryDescriptor {
            sort_order: SortOrder::Descending,
            favorites_only: true,
            ..QueryDescriptor::default()
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["sortKey"], "name");
        assert_eq!(json["sortOrder"], "desc");
        assert_eq!(json["page"], 1);
        assert_eq!(json["favoritesOnly"], true);
    }
}
