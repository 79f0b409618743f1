use crate::entity::CatalogEntity;

/// One page as returned by the remote catalog, before any client-only
/// predicate runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RemotePage {
    pub items: Vec<CatalogEntity>,
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// The page exposed to the UI after reconciliation with local state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ReconciledPage {
    pub items: Vec<CatalogEntity>,
    pub effective_total: u64,
    pub effective_page_count: u32,
    pub page: u32,
    /// Set when a client-only filter shrank the page. The totals then only
    /// describe the fetched page, not the filtered catalog.
    pub approximate: bool,
}

impl ReconciledPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_multiple_pages(&self) -> bool {
        self.effective_page_count > 1
    }
}
