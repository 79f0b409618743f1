//! Merge of a fetched remote page with client-only state.

use bestiary_model::{QueryDescriptor, ReconciledPage, RemotePage};
use tracing::debug;

use crate::favorites::{FavoriteSet, FavoritesStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciler {
    page_size: u32,
    remote_status_filter: bool,
}

impl Reconciler {
    pub fn new(page_size: u32, remote_status_filter: bool) -> Self {
        Self {
            page_size: page_size.max(1),
            remote_status_filter,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Reconcile against the favorites currently in `store`. The store is
    /// read on every call and only when the descriptor asks for favorites.
    pub fn reconcile(
        &self,
        remote: &RemotePage,
        descriptor: &QueryDescriptor,
        store: &FavoritesStore,
    ) -> ReconciledPage {
        let favorites = if descriptor.favorites_only {
            store.get_all()
        } else {
            FavoriteSet::new()
        };
        self.reconcile_with(remote, descriptor, &favorites)
    }

    /// Deterministic core of [`Reconciler::reconcile`]. Favorites filter runs
    /// before the status filter and remote order is preserved.
    pub fn reconcile_with(
        &self,
        remote: &RemotePage,
        descriptor: &QueryDescriptor,
        favorites: &FavoriteSet,
    ) -> ReconciledPage {
        let local_status = descriptor.status.filter(|_| !self.remote_status_filter);

        let items: Vec<_> = remote
            .items
            .iter()
            .filter(|item| !descriptor.favorites_only || favorites.contains(&item.id))
            .filter(|item| local_status.is_none_or(|status| item.status() == status))
            .cloned()
            .collect();

        let page = if remote.page_number == 0 {
            descriptor.page_number()
        } else {
            remote.page_number
        };

        if items.len() == remote.items.len() {
            return ReconciledPage {
                items,
                effective_total: remote.total_count,
                effective_page_count: remote.total_pages,
                page,
                approximate: false,
            };
        }

        let visible = items.len() as u64;
        let page_count = visible.div_ceil(u64::from(self.page_size));
        debug!(
            fetched = remote.items.len(),
            visible,
            page,
            "client-only filters reduced page"
        );
        ReconciledPage {
            items,
            effective_total: visible,
            effective_page_count: u32::try_from(page_count).unwrap_or(u32::MAX),
            page,
            approximate: true,
        }
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(20, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestiary_model::{BaseStats, CatalogEntity, EntityId, EntityStatus};
    use std::num::NonZeroU32;

    fn entity(id: &str, score: u32) -> CatalogEntity {
        CatalogEntity {
            id: EntityId::new(id).unwrap(),
            name: format!("Creature {id}"),
            description: String::new(),
            category: "Normal".into(),
            types: vec!["normal".into()],
            abilities: Vec::new(),
            stats: BaseStats::default(),
            score,
            image_url: None,
            height: None,
            weight: None,
        }
    }

    fn page(ids: &[&str], total_count: u64, page_number: u32) -> RemotePage {
        RemotePage {
            items: ids.iter().map(|id| entity(id, 400)).collect(),
            total_count,
            page_number,
            page_size: 20,
            total_pages: total_count.div_ceil(20) as u32,
        }
    }

    fn ids(page: &ReconciledPage) -> Vec<&str> {
        page.items.iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn passthrough_without_client_filters() {
        let names: Vec<String> = (21..=40).map(|n| n.to_string()).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let remote = page(&refs, 1025, 2);
        let descriptor = QueryDescriptor {
            page: NonZeroU32::new(2).unwrap(),
            ..QueryDescriptor::default()
        };

        let reconciled =
            Reconciler::default().reconcile_with(&remote, &descriptor, &FavoriteSet::new());
        assert_eq!(reconciled.items.len(), 20);
        assert_eq!(reconciled.effective_total, 1025);
        assert_eq!(reconciled.effective_page_count, 52);
        assert_eq!(reconciled.page, 2);
        assert!(!reconciled.approximate);
    }

    #[test]
    fn favorites_only_keeps_remote_order() {
        let store = FavoritesStore::in_memory();
        store.add(EntityId::new("7").unwrap()).unwrap();
        store.add(EntityId::new("4").unwrap()).unwrap();

        let remote = page(&["1", "4", "7", "9"], 4, 1);
        let descriptor = QueryDescriptor {
            favorites_only: true,
            ..QueryDescriptor::default()
        };
        let reconciled = Reconciler::default().reconcile(&remote, &descriptor, &store);
        assert_eq!(ids(&reconciled), ["4", "7"]);
        assert_eq!(reconciled.effective_total, 2);
        assert_eq!(reconciled.effective_page_count, 1);
        assert!(reconciled.approximate);
    }

    #[test]
    fn favorites_are_read_at_call_time() {
        let store = FavoritesStore::in_memory();
        let remote = page(&["1", "4"], 2, 1);
        let descriptor = QueryDescriptor {
            favorites_only: true,
            ..QueryDescriptor::default()
        };
        let reconciler = Reconciler::default();
        assert!(reconciler.reconcile(&remote, &descriptor, &store).is_empty());

        store.add(EntityId::new("1").unwrap()).unwrap();
        assert_eq!(ids(&reconciler.reconcile(&remote, &descriptor, &store)), ["1"]);
    }

    #[test]
    fn status_filter_applies_after_favorites_unless_remote_enforced() {
        let mut remote = page(&[], 4, 1);
        remote.items = vec![
            entity("1", 250),
            entity("2", 650),
            entity("3", 450),
            entity("4", 700),
        ];
        let favorites: FavoriteSet = ["1", "2", "3"]
            .into_iter()
            .map(|id| EntityId::new(id).unwrap())
            .collect();
        let descriptor = QueryDescriptor {
            status: Some(EntityStatus::Pending),
            favorites_only: true,
            ..QueryDescriptor::default()
        };

        let local = Reconciler::new(20, false).reconcile_with(&remote, &descriptor, &favorites);
        assert_eq!(ids(&local), ["2"]);
        assert_eq!(local.effective_total, 1);

        let descriptor = QueryDescriptor {
            favorites_only: false,
            ..descriptor
        };
        let enforced = Reconciler::new(20, true).reconcile_with(&remote, &descriptor, &favorites);
        assert_eq!(enforced.items.len(), 4);
        assert_eq!(enforced.effective_total, 4);
        assert!(!enforced.approximate);
    }

    #[test]
    fn filter_that_keeps_everything_passes_totals_through() {
        let remote = page(&["4", "7"], 90, 3);
        let favorites: FavoriteSet = ["4", "7"]
            .into_iter()
            .map(|id| EntityId::new(id).unwrap())
            .collect();
        let descriptor = QueryDescriptor {
            favorites_only: true,
            ..QueryDescriptor::default()
        };
        let reconciled = Reconciler::default().reconcile_with(&remote, &descriptor, &favorites);
        assert_eq!(reconciled.effective_total, 90);
        assert_eq!(reconciled.page, 3);
    }

    #[test]
    fn never_grows_the_page() {
        let remote = page(&["1", "2", "3", "4", "5"], 5, 1);
        let everyone: FavoriteSet = ["2", "5", "8"]
            .into_iter()
            .map(|id| EntityId::new(id).unwrap())
            .collect();
        for status in [None, Some(EntityStatus::Active), Some(EntityStatus::Inactive)] {
            for favorites_only in [false, true] {
                let descriptor = QueryDescriptor {
                    status,
                    favorites_only,
                    ..QueryDescriptor::default()
                };
                let reconciled =
                    Reconciler::default().reconcile_with(&remote, &descriptor, &everyone);
                assert!(reconciled.items.len() <= remote.items.len());
            }
        }
    }
}
