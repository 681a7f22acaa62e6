//! Rate-limited remote search controller.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::client::SearchClient;
use crate::config::SearchConfig;
use crate::config::Trigger;
use crate::notify::ChangeNotifier;
use crate::transport::Transport;

/// Scheduling state shared with timer tasks.
#[derive(Debug)]
struct Schedule {
    /// When this controller last started a fetch.
    last_run: Option<Instant>,
    /// Cancellation token for the single armed timer, if any.
    pending: Option<CancellationToken>,
}

/// Throttled/debounced search over a remote endpoint.
///
/// `RemoteSearch` turns a stream of raw query strings into at most one
/// armed timer and a bounded series of fetches, and republishes the latest
/// results together with a loading flag. Failures never propagate out of
/// the controller: every anomaly is logged and degrades to empty results.
///
/// Cheap to clone; clones share all state. Call
/// [`cancel_pending`](RemoteSearch::cancel_pending) when the search session
/// ends so an armed timer cannot fire afterwards.
///
/// # Example
///
/// ```ignore
/// use tagwire_lib::{RemoteSearch, SearchConfig};
///
/// let search = RemoteSearch::new(
///     SearchConfig::new("https://api.example.com/search?q={{value}}"),
/// );
/// search.submit("ru");
/// search.submit("rust"); // debounced: only this query fires
/// // ...after a change notification:
/// let items = search.results();
/// search.cancel_pending();
/// ```
#[derive(Debug, Clone)]
pub struct RemoteSearch {
    inner: Arc<RemoteSearchInner>,
}

#[derive(Debug)]
struct RemoteSearchInner {
    client: SearchClient,
    trigger: Trigger,
    rate: Duration,
    results: RwLock<Vec<Value>>,
    loading: AtomicBool,
    schedule: Mutex<Schedule>,
    notifier: Option<ChangeNotifier>,
}

impl RemoteSearch {
    /// Creates a controller with the default HTTP transport and no change
    /// notifier.
    pub fn new(config: SearchConfig) -> Self {
        Self::builder(config).build()
    }

    /// Creates a builder for a controller with a custom transport or a
    /// change notifier.
    pub fn builder(config: SearchConfig) -> RemoteSearchBuilder {
        RemoteSearchBuilder {
            config,
            transport: None,
            notifier: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Latest results, in API response order.
    pub fn results(&self) -> Vec<Value> {
        self.inner
            .results
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// `true` between the start and conclusion of a fetch.
    ///
    /// Stays `false` while a timer is armed but has not fired yet.
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::SeqCst)
    }

    /// `true` while a scheduled fetch is armed and has not fired yet.
    pub fn has_pending(&self) -> bool {
        self.lock_schedule().pending.is_some()
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    /// Feeds one query from the input stream.
    ///
    /// The query is trimmed on entry. A trimmed-empty query (or a missing
    /// URL template) clears the results and drops any armed timer, so the
    /// cleared state cannot be overwritten by a stale scheduled fetch.
    /// Otherwise the trimmed query is captured as it is now and fired or
    /// scheduled according to the configured [`Trigger`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, query: &str) {
        let query = query.trim();

        if query.is_empty() || !self.inner.client.is_configured() {
            self.cancel_pending();
            self.set_results(Vec::new());
            self.notify();
            return;
        }

        match self.inner.trigger {
            Trigger::Debounce => {
                let mut schedule = self.lock_schedule();
                self.arm(&mut schedule, self.inner.rate, query.to_string());
            }
            Trigger::Throttle => {
                let now = Instant::now();
                let mut schedule = self.lock_schedule();
                match schedule.last_run {
                    Some(at) if now.duration_since(at) < self.inner.rate => {
                        // Trailing fetch at the window boundary.
                        let delay = self.inner.rate - now.duration_since(at);
                        self.arm(&mut schedule, delay, query.to_string());
                    }
                    _ => {
                        schedule.last_run = Some(now);
                        self.spawn_fetch(query.to_string());
                    }
                }
            }
        }
    }

    /// Cancels the armed timer, if any, without executing it.
    ///
    /// Fetches already in flight are unaffected and run to completion.
    pub fn cancel_pending(&self) {
        if let Some(token) = self.lock_schedule().pending.take() {
            token.cancel();
        }
    }

    /// Replaces any armed timer with a new one firing after `delay`.
    fn arm(&self, schedule: &mut Schedule, delay: Duration, query: String) {
        if let Some(previous) = schedule.pending.take() {
            previous.cancel();
        }

        let token = CancellationToken::new();
        schedule.pending = Some(token.clone());

        let controller = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    {
                        let mut schedule = controller.lock_schedule();
                        schedule.last_run = Some(Instant::now());
                        // A cancel that raced the fire owns the slot now.
                        if !token.is_cancelled() {
                            schedule.pending = None;
                        }
                    }
                    controller.fetch(query).await;
                }
            }
        });
    }

    fn spawn_fetch(&self, query: String) {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.fetch(query).await;
        });
    }

    /// Runs one fetch to conclusion.
    ///
    /// When fetches overlap, completion order wins; superseded requests are
    /// not cancelled.
    async fn fetch(&self, query: String) {
        self.inner.loading.store(true, Ordering::SeqCst);
        self.notify();

        let results = match self.inner.client.search(&query).await {
            Ok(items) => items,
            Err(e) => {
                log::warn!("search for {query:?} failed: {e}");
                Vec::new()
            }
        };

        self.set_results(results);
        self.inner.loading.store(false, Ordering::SeqCst);
        self.notify();
    }

    fn set_results(&self, results: Vec<Value>) {
        if let Ok(mut guard) = self.inner.results.write() {
            *guard = results;
        }
    }

    fn notify(&self) {
        if let Some(notifier) = &self.inner.notifier {
            notifier.notify();
        }
    }

    fn lock_schedule(&self) -> MutexGuard<'_, Schedule> {
        self.inner
            .schedule
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Builder for [`RemoteSearch`].
pub struct RemoteSearchBuilder {
    config: SearchConfig,
    transport: Option<Arc<dyn Transport>>,
    notifier: Option<ChangeNotifier>,
}

impl RemoteSearchBuilder {
    /// Uses `transport` instead of the default reqwest transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Signals `notifier` whenever results or the loading flag change.
    pub fn notifier(mut self, notifier: ChangeNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Builds the controller.
    pub fn build(self) -> RemoteSearch {
        let client = match self.transport {
            Some(transport) => SearchClient::with_transport(&self.config, transport),
            None => SearchClient::new(&self.config),
        };

        RemoteSearch {
            inner: Arc::new(RemoteSearchInner {
                client,
                trigger: self.config.trigger,
                rate: self.config.rate,
                results: RwLock::new(Vec::new()),
                loading: AtomicBool::new(false),
                schedule: Mutex::new(Schedule {
                    last_run: None,
                    pending: None,
                }),
                notifier: self.notifier,
            }),
        }
    }
}
