//! Debounced free-text search input.
//!
//! Keystrokes restart a single timer. When it fires, the in-flight request
//! of the attached stream is stopped and the latest text is forwarded over
//! an mpsc channel. The mount value is recorded as already applied, so the
//! initial render never triggers a second fetch. Values are compared and
//! forwarded trimmed, the same way the query normalizer reads them.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::coordinator::QueryStream;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
struct EmitterState {
    applied: String,
    generation: u64,
    pending: Option<CancellationToken>,
}

#[derive(Debug)]
struct Inner {
    delay: Duration,
    stream: Option<Arc<QueryStream>>,
    sender: mpsc::UnboundedSender<String>,
    state: Mutex<EmitterState>,
}

/// Handle to a debounced search input. Cheap to clone. Requires a tokio
/// runtime for [`DebouncedQueryEmitter::push`].
#[derive(Debug, Clone)]
pub struct DebouncedQueryEmitter {
    inner: Arc<Inner>,
}

impl DebouncedQueryEmitter {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        Self::build(delay, None)
    }

    /// Like [`DebouncedQueryEmitter::new`], stopping `stream`'s in-flight
    /// request whenever a value is forwarded.
    pub fn for_stream(
        delay: Duration,
        stream: Arc<QueryStream>,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        Self::build(delay, Some(stream))
    }

    fn build(
        delay: Duration,
        stream: Option<Arc<QueryStream>>,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let emitter = Self {
            inner: Arc::new(Inner {
                delay,
                stream,
                sender,
                state: Mutex::new(EmitterState::default()),
            }),
        };
        (emitter, receiver)
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    /// Record the value the view was first rendered with. Never emitted.
    pub fn mount(&self, initial: impl Into<String>) {
        let mut state = self.inner.state.lock();
        state.applied = initial.into().trim().to_string();
    }

    /// Buffer a keystroke. Any timer still waiting is cancelled.
    pub fn push(&self, text: impl Into<String>) {
        let text = text.into();
        let (generation, cancel) = {
            let mut state = self.inner.state.lock();
            if let Some(previous) = state.pending.take() {
                previous.cancel();
            }
            state.generation += 1;
            let cancel = CancellationToken::new();
            state.pending = Some(cancel.clone());
            (state.generation, cancel)
        };

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(inner.delay) => inner.fire(generation, text),
            }
        });
    }

    /// Drop any buffered keystroke without emitting it.
    pub fn cancel_pending(&self) {
        if let Some(pending) = self.inner.state.lock().pending.take() {
            pending.cancel();
        }
    }

    /// Mark `text` as applied by some other path (e.g. clearing filters), so
    /// a later identical keystroke does not emit.
    pub fn sync_applied(&self, text: impl Into<String>) {
        self.inner.state.lock().applied = text.into().trim().to_string();
    }

    pub fn has_pending(&self) -> bool {
        self.inner.state.lock().pending.is_some()
    }
}

impl Inner {
    fn fire(&self, generation: u64, text: String) {
        let text = text.trim().to_string();
        {
            let mut state = self.state.lock();
            if state.generation != generation {
                return;
            }
            state.pending = None;
            if state.applied == text {
                debug!("debounced search unchanged, not emitting");
                return;
            }
            state.applied = text.clone();
        }
        if let Some(stream) = &self.stream {
            stream.stop();
        }
        debug!(query = %text, "debounced search fired");
        // Receiver gone means the view was torn down.
        let _ = self.sender.send(text);
    }
}
