//! Per-stream request tracking.
//!
//! A [`QueryStream`] owns at most one current [`RequestToken`]. Starting a
//! request aborts the previous token; only a settle carrying the current,
//! un-aborted token may publish. Publication is decided here and not by the
//! transport, so a fetch that ignores its abort signal is still dropped.

use std::fmt;
use std::future::Future;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{CatalogError, Result};

/// Monotonic identifier for a request within one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cancellation handle handed to a single fetch.
#[derive(Debug, Clone)]
pub struct RequestToken {
    id: RequestId,
    cancel: CancellationToken,
}

impl RequestToken {
    /// A token that belongs to no stream. Useful for one-off fetches.
    pub fn detached() -> Self {
        Self {
            id: RequestId(0),
            cancel: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn abort(&self) {
        self.cancel.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the token is aborted.
    pub async fn aborted(&self) {
        self.cancel.cancelled().await
    }

    /// Race `fut` against this token. Aborting wins with
    /// [`CatalogError::Cancelled`]; an already-aborted token never polls `fut`.
    pub async fn guard<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_aborted() {
            return Err(CatalogError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(CatalogError::Cancelled),
            result = fut => result,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    InFlight(RequestId),
}

/// Outcome of settling a request against its stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement<T> {
    /// The token was current; the caller must publish this result.
    Published(Result<T>),
    /// Superseded, stopped, or cancelled. Nothing may be published.
    Discarded,
}

impl<T> Settlement<T> {
    pub fn is_published(&self) -> bool {
        matches!(self, Settlement::Published(_))
    }

    pub fn into_published(self) -> Option<Result<T>> {
        match self {
            Settlement::Published(result) => Some(result),
            Settlement::Discarded => None,
        }
    }
}

#[derive(Debug, Default)]
struct StreamInner {
    issued: u64,
    current: Option<RequestToken>,
}

/// Cancellation coordinator for one logical query stream.
#[derive(Debug)]
pub struct QueryStream {
    name: &'static str,
    inner: Mutex<StreamInner>,
}

impl QueryStream {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(StreamInner::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Abort whatever is in flight and issue a fresh current token.
    pub fn start(&self) -> RequestToken {
        let mut inner = self.inner.lock();
        if let Some(previous) = inner.current.take() {
            previous.abort();
            debug!(stream = self.name, request_id = %previous.id, "superseded in-flight request");
        }
        inner.issued += 1;
        let token = RequestToken {
            id: RequestId(inner.issued),
            cancel: CancellationToken::new(),
        };
        inner.current = Some(token.clone());
        token
    }

    /// Decide whether `result` may be published. Only the current token
    /// transitions the stream back to idle.
    pub fn settle<T>(&self, token: &RequestToken, result: Result<T>) -> Settlement<T> {
        let mut inner = self.inner.lock();
        let is_current = inner
            .current
            .as_ref()
            .is_some_and(|current| current.id == token.id);
        if !is_current {
            debug!(stream = self.name, request_id = %token.id, "discarding stale result");
            return Settlement::Discarded;
        }
        inner.current = None;
        if token.is_aborted() || matches!(result, Err(CatalogError::Cancelled)) {
            debug!(stream = self.name, request_id = %token.id, "request cancelled before settling");
            return Settlement::Discarded;
        }
        Settlement::Published(result)
    }

    /// Abort the current token, if any, and return to idle without
    /// publishing.
    pub fn stop(&self) {
        if let Some(current) = self.inner.lock().current.take() {
            current.abort();
            debug!(stream = self.name, request_id = %current.id, "stopped in-flight request");
        }
    }

    pub fn state(&self) -> StreamState {
        match &self.inner.lock().current {
            Some(token) => StreamState::InFlight(token.id),
            None => StreamState::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state() == StreamState::Idle
    }

    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.state() == StreamState::InFlight(token.id)
    }

    /// Start a request, run `make` under its token and settle the outcome.
    pub async fn run<T, F, Fut>(&self, make: F) -> Settlement<T>
    where
        F: FnOnce(RequestToken) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let token = self.start();
        let result = token.guard(make(token.clone())).await;
        self.settle(&token, result)
    }
}
