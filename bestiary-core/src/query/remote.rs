//! Remote request shape for a [`QueryDescriptor`].

use bestiary_model::{QueryDescriptor, SortKey};

/// Capabilities of the remote list endpoint that change the request shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteQueryOptions {
    pub page_size: u32,
    /// Whether the remote evaluates `status` itself.
    pub status_filter: bool,
}

impl Default for RemoteQueryOptions {
    fn default() -> Self {
        Self {
            page_size: 20,
            status_filter: false,
        }
    }
}

/// Query string for the remote list endpoint. `favoritesOnly` never appears
/// here: the remote has no notion of local favorites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteQuery {
    pairs: Vec<(&'static str, String)>,
}

impl RemoteQuery {
    pub fn for_descriptor(
        descriptor: &QueryDescriptor,
        options: RemoteQueryOptions,
    ) -> Self {
        let mut pairs = vec![
            ("page", descriptor.page_number().to_string()),
            ("limit", options.page_size.to_string()),
        ];
        if let Some(text) = &descriptor.text {
            pairs.push(("search", text.clone()));
        }
        if let Some(category) = &descriptor.category {
            pairs.push(("type", category.clone()));
        }
        pairs.push(("sortBy", remote_sort_field(descriptor.sort_key).to_string()));
        pairs.push(("sortOrder", descriptor.sort_order.as_param().to_string()));
        if options.status_filter
            && let Some(status) = descriptor.status
        {
            pairs.push(("status", status.as_param().to_string()));
        }
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Server-side sort field for a UI sort key. The list endpoint orders by
/// `name`, `id` or `totalStats` only; anything else silently sorts by id
/// ascending, so category sorts go by the aggregate score.
pub fn remote_sort_field(key: SortKey) -> &'static str {
    match key {
        SortKey::Name => "name",
        SortKey::Date => "id",
        SortKey::Category => "totalStats",
    }
}
