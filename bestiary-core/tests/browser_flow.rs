use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bestiary_core::prelude::*;
use bestiary_core::Result;
use parking_lot::Mutex;
use tokio::sync::oneshot;

#[derive(Debug, Default)]
struct ScriptedSource {
    calls: Mutex<Vec<QueryDescriptor>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    failure: Mutex<Option<CatalogError>>,
}

impl ScriptedSource {
    fn gate(&self, text: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(text.to_string(), rx);
        tx
    }

    fn fail_with(&self, error: Option<CatalogError>) {
        *self.failure.lock() = error;
    }

    fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn texts(&self) -> Vec<Option<String>> {
        self.calls.lock().iter().map(|d| d.text.clone()).collect()
    }
}

fn entity(id: u64, score: u32) -> CatalogEntity {
    CatalogEntity {
        id: EntityId::from(id),
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

#[async_trait]
impl CatalogSource for ScriptedSource {
    fn page_size(&self) -> u32 {
        20
    }

    async fn fetch_page(
        &self,
        descriptor: &QueryDescriptor,
        _token: &RequestToken,
    ) -> Result<RemotePage> {
        self.calls.lock().push(descriptor.clone());
        let gate = descriptor
            .text
            .as_ref()
            .and_then(|text| self.gates.lock().remove(text));
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if let Some(error) = self.failure.lock().clone() {
            return Err(error);
        }
        let page = descriptor.page_number();
        let first = u64::from(page - 1) * 20 + 1;
        Ok(RemotePage {
            items: (first..first + 20).map(|id| entity(id, 300 + id as u32)).collect(),
            total_count: 1025,
            page_number: page,
            page_size: 20,
            total_pages: 52,
        })
    }

    async fn fetch_entity(&self, id: &EntityId) -> Result<CatalogEntity> {
        Err(CatalogError::not_found(format!("creature \"{id}\" not found")))
    }

    async fn fetch_categories(&self) -> Result<Vec<CategorySummary>> {
        Ok(Vec::new())
    }
}

fn browser_with(
    params: RawQueryParams,
) -> (Arc<CatalogBrowser>, Arc<ScriptedSource>, Arc<FavoritesStore>) {
    let source = Arc::new(ScriptedSource::default());
    let favorites = Arc::new(FavoritesStore::in_memory());
    let browser = Arc::new(CatalogBrowser::new(
        source.clone(),
        favorites.clone(),
        BrowserOptions {
            initial_params: params,
            ..BrowserOptions::default()
        },
    ));
    (browser, source, favorites)
}

#[tokio::test]
async fn second_page_passes_remote_totals_through() {
    let (browser, _source, _favorites) = browser_with(RawQueryParams::new());
    browser.load().await;

    let settled = browser.go_to_page(2).await.expect("page 2 is in range");
    let page = settled.into_published().unwrap().unwrap();
    assert_eq!(page.page, 2);
    assert_eq!(page.items.len(), 20);
    assert_eq!(page.effective_total, 1025);
    assert_eq!(page.effective_page_count, 52);
    assert_eq!(browser.state().page(), Some(&page));

    assert!(browser.go_to_page(53).await.is_none());
    assert!(browser.go_to_page(0).await.is_none());
}

#[tokio::test]
async fn newer_filter_wins_over_slow_search() {
    let (browser, source, _favorites) = browser_with(RawQueryParams::new());
    let _release_slow = source.gate("slow");

    let slow = tokio::spawn({
        let browser = Arc::clone(&browser);
        async move { browser.set_filter(FilterKey::Query, "slow").await }
    });
    while source.call_count() == 0 {
        tokio::task::yield_now().await;
    }

    let fast = browser.set_filter(FilterKey::Query, "fast").await;
    assert!(fast.is_published());
    assert_eq!(slow.await.unwrap(), Settlement::Discarded);

    match browser.state() {
        ViewState::Ready { descriptor, .. } => {
            assert_eq!(descriptor.text.as_deref(), Some("fast"));
        }
        other => panic!("expected ready state, got {other:?}"),
    }
    assert!(browser.stream().is_idle());
}

#[tokio::test]
async fn failures_publish_and_retry_recovers() {
    let (browser, source, _favorites) = browser_with(RawQueryParams::new());
    source.fail_with(Some(CatalogError::network("connection refused")));

    browser.load().await;
    let error = browser.state().error().cloned().expect("failed state");
    let presentation = error.presentation();
    assert_eq!(presentation.title, "Connection Problem");
    assert_eq!(presentation.retry_label, "Retry Connection");

    source.fail_with(None);
    assert!(browser.retry().await.is_published());
    assert!(browser.state().page().is_some());
}

#[tokio::test]
async fn stop_publishes_nothing() {
    let (browser, source, _favorites) =
        browser_with(RawQueryParams::new().with(FilterKey::Query, "slow"));
    let _release = source.gate("slow");

    let pending = tokio::spawn({
        let browser = Arc::clone(&browser);
        async move { browser.load().await }
    });
    while source.call_count() == 0 {
        tokio::task::yield_now().await;
    }
    browser.stop();

    assert_eq!(pending.await.unwrap(), Settlement::Discarded);
    assert!(browser.state().is_loading());
    assert!(browser.stream().is_idle());
}

#[tokio::test]
async fn filter_operations_reset_the_page() {
    let (browser, source, _favorites) =
        browser_with(RawQueryParams::new().with(FilterKey::Page, "3"));
    browser.load().await;
    assert_eq!(browser.descriptor().page_number(), 3);

    browser.set_filter(FilterKey::Category, "Fire").await;
    assert_eq!(browser.descriptor().page_number(), 1);
    assert_eq!(browser.descriptor().category.as_deref(), Some("fire"));

    browser.set_filter(FilterKey::Category, "all").await;
    assert_eq!(browser.descriptor().category, None);

    browser.toggle_sort_order().await;
    assert_eq!(browser.descriptor().sort_order, SortOrder::Descending);
    browser.toggle_sort_order().await;
    assert_eq!(browser.descriptor().sort_order, SortOrder::Ascending);

    browser.toggle_favorites_only().await;
    assert!(browser.descriptor().favorites_only);

    browser.clear_all().await;
    assert_eq!(browser.descriptor(), QueryDescriptor::default());
    assert!(browser.params().is_empty());

    assert!(browser.apply_search_text("").await.is_none());
    assert!(browser.apply_search_text(" char ").await.is_some());
    assert!(browser.apply_search_text("char").await.is_none());
    assert_eq!(source.texts().last().cloned().flatten().as_deref(), Some("char"));
}

#[tokio::test]
async fn favorites_changes_re_reconcile_without_fetching() {
    let (browser, source, favorites) =
        browser_with(RawQueryParams::new().with(FilterKey::Favorites, "true"));
    browser.spawn_listeners();
    let mut states = browser.subscribe();

    let page = browser.load().await.into_published().unwrap().unwrap();
    assert!(page.is_empty());
    assert_eq!(source.call_count(), 1);

    favorites.add(EntityId::from(4)).unwrap();
    favorites.add(EntityId::from(7)).unwrap();
    let state = states
        .wait_for(|state| state.page().is_some_and(|page| page.items.len() == 2))
        .await
        .unwrap()
        .clone();
    let page = state.page().unwrap();
    let ids: Vec<_> = page.items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, ["4", "7"]);
    assert_eq!(page.effective_total, 2);
    assert!(page.approximate);
    assert_eq!(source.call_count(), 1);
    browser.stop();
}

#[tokio::test(start_paused = true)]
async fn debounced_typing_loads_once() {
    let (browser, source, _favorites) = browser_with(RawQueryParams::new());
    browser.spawn_listeners();
    let mut states = browser.subscribe();

    for text in ["p", "pi", "pik"] {
        browser.search_input(text);
        tokio::time::sleep(Duration::from_millis(150)).await;
    }
    states
        .wait_for(|state| match state {
            ViewState::Ready { descriptor, .. } => descriptor.text.as_deref() == Some("pik"),
            _ => false,
        })
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(source.texts(), [Some("pik".to_string())]);
    browser.stop();
}

#[tokio::test(start_paused = true)]
async fn whitespace_keystroke_keeps_page_change_in_flight() {
    let (browser, source, _favorites) =
        browser_with(RawQueryParams::new().with(FilterKey::Query, "pik"));
    browser.spawn_listeners();
    browser.load().await;
    let release = source.gate("pik");

    let paging = tokio::spawn({
        let browser = Arc::clone(&browser);
        async move { browser.go_to_page(2).await }
    });
    while source.call_count() < 2 {
        tokio::task::yield_now().await;
    }

    browser.search_input("pik ");
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(browser.state().is_loading());
    assert!(!browser.stream().is_idle());

    release.send(()).unwrap();
    let settled = paging.await.unwrap().expect("page 2 is in range");
    assert_eq!(settled.into_published().unwrap().unwrap().page, 2);
    assert_eq!(browser.state().page().map(|page| page.page), Some(2));
    assert_eq!(source.call_count(), 2);
    browser.stop();
}

#[tokio::test]
async fn favorites_refresh_yields_to_in_flight_load() {
    let (browser, source, favorites) = browser_with(
        RawQueryParams::new()
            .with(FilterKey::Query, "bulba")
            .with(FilterKey::Favorites, "true"),
    );
    browser.load().await;
    let release = source.gate("bulba");

    let reloading = tokio::spawn({
        let browser = Arc::clone(&browser);
        async move { browser.retry().await }
    });
    while source.call_count() < 2 {
        tokio::task::yield_now().await;
    }

    favorites.add(EntityId::from(3)).unwrap();
    assert!(browser.refresh_favorites().is_none());
    assert!(browser.state().is_loading());

    release.send(()).unwrap();
    assert!(reloading.await.unwrap().is_published());
    let page = browser.state().page().cloned().expect("ready state");
    let ids: Vec<_> = page.items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, ["3"]);
    assert!(browser.refresh_favorites().is_some());
}
