//! Concurrent asset loader with async fetch tasks
//!
//! Fetching and parsing are external: the host supplies an async fetch
//! function; the loader runs it on a tokio runtime with bounded
//! concurrency and hands completions back through a channel the frame tick
//! drains. Loads may finish in any order. There is no cancellation, no
//! timeout, and no retry; a fetch that never resolves simply never
//! produces an event.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::scene::node::MeshBounds;

/// Loaded-model surrogate produced by the fetch function: the named
/// local-space bounds of each mesh in the model hierarchy.
#[derive(Clone, Debug)]
pub struct AssetData {
    pub url: String,
    pub meshes: Vec<MeshBounds>,
}

/// Result of a load operation, drained on the frame tick.
#[derive(Clone, Debug)]
pub enum LoadEvent {
    /// Mid-fetch progress report
    Progress { url: String, ratio: f32 },
    /// Fetch completed successfully
    Loaded { url: String, asset: AssetData },
    /// Fetch failed; the slot permanently never appears
    Failed { url: String, error: String },
}

/// Progress handle passed to the fetch function.
#[derive(Clone)]
pub struct ProgressReporter {
    url: String,
    tx: mpsc::UnboundedSender<LoadEvent>,
}

impl ProgressReporter {
    /// Report download/parse progress in [0, 1].
    pub fn report(&self, ratio: f32) {
        let _ = self.tx.send(LoadEvent::Progress {
            url: self.url.clone(),
            ratio,
        });
    }
}

/// Future returned by a fetch function.
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<AssetData, String>> + Send>>;

/// Host-supplied async fetch: URL in, asset (or error string) out.
pub type FetchFn = Arc<dyn Fn(String, ProgressReporter) -> FetchFuture + Send + Sync>;

/// Concurrent asset loader.
pub struct AssetLoader {
    /// Channel for sending fetch requests to the worker task
    request_tx: mpsc::UnboundedSender<String>,
    /// Channel for receiving load events
    event_rx: mpsc::UnboundedReceiver<LoadEvent>,
    /// URLs currently in flight
    pending: HashSet<String>,
    /// Dedicated runtime, if not running on the caller's
    #[allow(dead_code)]
    runtime: Option<Runtime>,
}

impl AssetLoader {
    /// Create a loader with its own tokio runtime.
    ///
    /// # Arguments
    /// * `fetch` - async fetch function for one URL
    /// * `max_concurrent` - maximum simultaneous fetches
    pub fn new(fetch: FetchFn, max_concurrent: usize) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<String>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<LoadEvent>();

        let runtime = Runtime::new().expect("failed to create tokio runtime");

        runtime.spawn(async move {
            Self::worker_loop(fetch, max_concurrent, &mut request_rx, event_tx).await;
        });

        Self {
            request_tx,
            event_rx,
            pending: HashSet::new(),
            runtime: Some(runtime),
        }
    }

    /// Create a loader on the current tokio runtime.
    ///
    /// Panics if called outside a tokio runtime context.
    pub fn new_with_current_runtime(fetch: FetchFn, max_concurrent: usize) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<String>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<LoadEvent>();

        tokio::spawn(async move {
            Self::worker_loop(fetch, max_concurrent, &mut request_rx, event_tx).await;
        });

        Self {
            request_tx,
            event_rx,
            pending: HashSet::new(),
            runtime: None,
        }
    }

    /// Worker loop that runs fetches with concurrency control.
    async fn worker_loop(
        fetch: FetchFn,
        max_concurrent: usize,
        request_rx: &mut mpsc::UnboundedReceiver<String>,
        event_tx: mpsc::UnboundedSender<LoadEvent>,
    ) {
        use tokio::task::JoinSet;

        let mut active = JoinSet::new();
        let mut queue: Vec<String> = Vec::new();

        loop {
            tokio::select! {
                Some(url) = request_rx.recv() => {
                    queue.push(url);
                }

                Some(result) = active.join_next(), if !active.is_empty() => {
                    if let Err(e) = result {
                        // the event never arrives; the slot stays pending
                        log::error!("asset fetch task panicked: {}", e);
                    }
                }

                else => {
                    if queue.is_empty() && active.is_empty() {
                        break;
                    }
                }
            }

            while active.len() < max_concurrent && !queue.is_empty() {
                let url = queue.remove(0);
                let fetch = fetch.clone();
                let tx = event_tx.clone();

                active.spawn(async move {
                    let reporter = ProgressReporter {
                        url: url.clone(),
                        tx: tx.clone(),
                    };
                    match fetch(url.clone(), reporter).await {
                        Ok(asset) => {
                            let _ = tx.send(LoadEvent::Loaded { url, asset });
                        }
                        Err(error) => {
                            let _ = tx.send(LoadEvent::Failed { url, error });
                        }
                    }
                });
            }
        }
    }

    /// Request a URL to be fetched.
    ///
    /// Returns `false` if that URL is already in flight; a URL shared by
    /// several placement slots is fetched once.
    pub fn request(&mut self, url: &str) -> bool {
        if self.pending.contains(url) {
            return false;
        }

        self.pending.insert(url.to_string());
        self.request_tx
            .send(url.to_string())
            .expect("loader worker died");

        true
    }

    /// Poll for load events (non-blocking).
    ///
    /// Returns all currently available events in completion order.
    pub fn poll_events(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();

        while let Ok(event) = self.event_rx.try_recv() {
            match &event {
                LoadEvent::Loaded { url, .. } | LoadEvent::Failed { url, .. } => {
                    self.pending.remove(url);
                }
                LoadEvent::Progress { .. } => {}
            }
            events.push(event);
        }

        events
    }

    /// Number of URLs still in flight.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check whether a URL is in flight.
    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(url)
    }
}
