//! List-view session: the "list" query stream plus its filter bar.
//!
//! The browser owns the raw parameter set, drives fetches through a
//! [`QueryStream`] and publishes [`ViewState`] on a watch channel. Favorites
//! changes re-reconcile the last fetched page without another remote call.

use std::sync::{Arc, Weak};
use std::time::Duration;

use bestiary_model::{FilterKey, QueryDescriptor, RawQueryParams, ReconciledPage, RemotePage};
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::catalog::CatalogSource;
use crate::coordinator::{QueryStream, Settlement};
use crate::debounce::{DEFAULT_SEARCH_DEBOUNCE, DebouncedQueryEmitter};
use crate::error::CatalogError;
use crate::favorites::FavoritesStore;
use crate::query::{ANY_VALUE, normalize};
use crate::reconcile::Reconciler;

pub const LIST_STREAM: &str = "list";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading {
        descriptor: QueryDescriptor,
    },
    Ready {
        descriptor: QueryDescriptor,
        page: ReconciledPage,
    },
    Failed {
        descriptor: QueryDescriptor,
        error: CatalogError,
    },
}

impl ViewState {
    pub fn page(&self) -> Option<&ReconciledPage> {
        match self {
            ViewState::Ready { page, .. } => Some(page),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CatalogError> {
        match self {
            ViewState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }
}

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub initial_params: RawQueryParams,
    pub search_debounce: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            initial_params: RawQueryParams::default(),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

#[derive(Debug)]
struct FetchedPage {
    descriptor: QueryDescriptor,
    remote: RemotePage,
}

#[derive(Debug)]
pub struct CatalogBrowser {
    source: Arc<dyn CatalogSource>,
    favorites: Arc<FavoritesStore>,
    reconciler: Reconciler,
    stream: Arc<QueryStream>,
    params: Mutex<RawQueryParams>,
    last_fetched: Mutex<Option<FetchedPage>>,
    state: watch::Sender<ViewState>,
    search: DebouncedQueryEmitter,
    search_rx: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
    shutdown: CancellationToken,
}

impl CatalogBrowser {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        favorites: Arc<FavoritesStore>,
        options: BrowserOptions,
    ) -> Self {
        let reconciler = Reconciler::new(source.page_size(), source.remote_status_filter());
        let stream = Arc::new(QueryStream::new(LIST_STREAM));
        let (search, search_rx) =
            DebouncedQueryEmitter::for_stream(options.search_debounce, Arc::clone(&stream));
        search.mount(options.initial_params.get(FilterKey::Query).unwrap_or_default());
        let (state, _) = watch::channel(ViewState::Idle);

        Self {
            source,
            favorites,
            reconciler,
            stream,
            params: Mutex::new(options.initial_params),
            last_fetched: Mutex::new(None),
            state,
            search,
            search_rx: Mutex::new(Some(search_rx)),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn params(&self) -> RawQueryParams {
        self.params.lock().clone()
    }

    pub fn descriptor(&self) -> QueryDescriptor {
        normalize(&self.params.lock())
    }

    pub fn stream(&self) -> &Arc<QueryStream> {
        &self.stream
    }

    pub fn favorites(&self) -> &Arc<FavoritesStore> {
        &self.favorites
    }

    /// Spawn the favorites listener and the debounced search pump. Both exit
    /// on [`CatalogBrowser::stop`] or once the browser is dropped.
    pub fn spawn_listeners(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        let mut handles = vec![tokio::spawn(favorites_listener(
            Arc::downgrade(self),
            self.favorites.subscribe(),
            self.shutdown.clone(),
        ))];
        if let Some(rx) = self.search_rx.lock().take() {
            handles.push(tokio::spawn(search_pump(
                Arc::downgrade(self),
                rx,
                self.shutdown.clone(),
            )));
        }
        handles
    }

    /// Fetch and publish the page for the current parameters. A superseded
    /// or stopped load publishes nothing.
    pub async fn load(&self) -> Settlement<ReconciledPage> {
        let descriptor = self.descriptor();
        let token = self.stream.start();
        debug!(request_id = %token.id(), page = descriptor.page_number(), "loading catalog page");
        self.state.send_replace(ViewState::Loading {
            descriptor: descriptor.clone(),
        });

        let result = token.guard(self.source.fetch_page(&descriptor, &token)).await;
        match self.stream.settle(&token, result) {
            Settlement::Published(Ok(remote)) => {
                let page = self.reconciler.reconcile(&remote, &descriptor, &self.favorites);
                *self.last_fetched.lock() = Some(FetchedPage {
                    descriptor: descriptor.clone(),
                    remote,
                });
                self.state.send_replace(ViewState::Ready {
                    descriptor,
                    page: page.clone(),
                });
                Settlement::Published(Ok(page))
            }
            Settlement::Published(Err(error)) => {
                warn!(error = %error, "catalog load failed");
                self.state.send_replace(ViewState::Failed {
                    descriptor,
                    error: error.clone(),
                });
                Settlement::Published(Err(error))
            }
            Settlement::Discarded => Settlement::Discarded,
        }
    }

    /// Re-run the current query after a failure.
    pub async fn retry(&self) -> Settlement<ReconciledPage> {
        info!("retrying catalog load");
        self.load().await
    }

    /// Set one filter. Empty values and `all` clear it. Any filter other
    /// than the page itself sends the view back to page one.
    pub async fn set_filter(&self, key: FilterKey, value: &str) -> Settlement<ReconciledPage> {
        self.search.cancel_pending();
        {
            let mut params = self.params.lock();
            let value = value.trim();
            if value.is_empty() || value.eq_ignore_ascii_case(ANY_VALUE) {
                params.remove(key);
            } else {
                params.set(key, value);
            }
            if key != FilterKey::Page {
                params.remove(FilterKey::Page);
            }
            if key == FilterKey::Query {
                self.search.sync_applied(params.get(FilterKey::Query).unwrap_or_default());
            }
        }
        self.load().await
    }

    pub async fn toggle_sort_order(&self) -> Settlement<ReconciledPage> {
        self.search.cancel_pending();
        {
            let mut params = self.params.lock();
            let toggled = normalize(&params).sort_order.toggled();
            params.set(FilterKey::Order, toggled.as_param());
            params.remove(FilterKey::Page);
        }
        self.load().await
    }

    pub async fn toggle_favorites_only(&self) -> Settlement<ReconciledPage> {
        self.search.cancel_pending();
        {
            let mut params = self.params.lock();
            if normalize(&params).favorites_only {
                params.remove(FilterKey::Favorites);
            } else {
                params.set(FilterKey::Favorites, "true");
            }
            params.remove(FilterKey::Page);
        }
        self.load().await
    }

    pub async fn clear_all(&self) -> Settlement<ReconciledPage> {
        self.search.cancel_pending();
        *self.params.lock() = RawQueryParams::default();
        self.search.sync_applied("");
        self.load().await
    }

    /// Navigate to `page` if it lies within the published page count.
    /// Returns `None` when the request is out of range.
    pub async fn go_to_page(&self, page: u32) -> Option<Settlement<ReconciledPage>> {
        let page_count = self.state.borrow().page().map(|p| p.effective_page_count)?;
        if page < 1 || page > page_count {
            debug!(page, page_count, "ignoring out-of-range page request");
            return None;
        }
        self.params.lock().set(FilterKey::Page, page.to_string());
        Some(self.load().await)
    }

    /// Buffer a search keystroke behind the debounce timer.
    pub fn search_input(&self, text: impl Into<String>) {
        self.search.push(text);
    }

    /// Apply debounced search text. Returns `None` when it matches the
    /// current query.
    pub async fn apply_search_text(&self, text: &str) -> Option<Settlement<ReconciledPage>> {
        let trimmed = text.trim();
        {
            let mut params = self.params.lock();
            let current = normalize(&params).text;
            if current.as_deref().unwrap_or_default() == trimmed {
                return None;
            }
            if trimmed.is_empty() {
                params.remove(FilterKey::Query);
            } else {
                params.set(FilterKey::Query, trimmed);
            }
            params.remove(FilterKey::Page);
        }
        Some(self.load().await)
    }

    /// Re-reconcile the last fetched page against current favorites. Skipped
    /// while a request is in flight or when parameters moved on.
    pub fn refresh_favorites(&self) -> Option<ReconciledPage> {
        if !self.stream.is_idle() {
            return None;
        }
        let descriptor = self.descriptor();
        let page = {
            let fetched = self.last_fetched.lock();
            let fetched = fetched.as_ref().filter(|f| f.descriptor == descriptor)?;
            self.reconciler
                .reconcile(&fetched.remote, &descriptor, &self.favorites)
        };

        // A load publishes `Loading` only after its token is in flight, so
        // re-checking under the watch lock orders this write before it.
        let published = self.state.send_if_modified(|state| {
            if !self.stream.is_idle() || self.descriptor() != descriptor {
                return false;
            }
            *state = ViewState::Ready {
                descriptor: descriptor.clone(),
                page: page.clone(),
            };
            true
        });
        if !published {
            debug!("load started during favorites refresh, keeping its state");
            return None;
        }
        debug!(items = page.items.len(), "re-reconciled page after favorites change");
        Some(page)
    }

    /// Unmount: abort the in-flight request, drop buffered keystrokes and
    /// stop background listeners. Nothing is published.
    pub fn stop(&self) {
        self.search.cancel_pending();
        self.stream.stop();
        self.shutdown.cancel();
    }
}

async fn favorites_listener(
    browser: Weak<CatalogBrowser>,
    mut rx: broadcast::Receiver<crate::favorites::FavoritesChanged>,
    shutdown: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            _ = shutdown.cancelled() => break,
            event = rx.recv() => event,
        };
        match event {
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                let Some(browser) = browser.upgrade() else { break };
                browser.refresh_favorites();
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn search_pump(
    browser: Weak<CatalogBrowser>,
    mut rx: mpsc::UnboundedReceiver<String>,
    shutdown: CancellationToken,
) {
    loop {
        let text = tokio::select! {
            _ = shutdown.cancelled() => break,
            text = rx.recv() => match text {
                Some(text) => text,
                None => break,
            },
        };
        let Some(browser) = browser.upgrade() else { break };
        browser.apply_search_text(&text).await;
    }
}
