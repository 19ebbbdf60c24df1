//! Search-as-you-type plumbing.
//!
//! [`Debouncer`] holds a keystroke-driven action back until input pauses;
//! [`AssetSearch`] tags every dispatched query with a ticket so an old
//! query's late answer is dropped instead of replacing newer results.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use super::{AssetService, ServiceResult};
use crate::domain::RequestSequencer;
use crate::domain::records::Asset;

/// Quiet period used when none is configured.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Runs only the most recently scheduled action, once input has been quiet
/// for the configured delay.
///
/// Scheduling spawns onto the current Tokio runtime. Dropping the debouncer
/// cancels any pending action.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl Debouncer {
    /// Debouncer with the given quiet period.
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Quiet period.
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Re-arm the timer with `action`, abandoning whatever was scheduled
    /// before.
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        });
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
            debug!("superseded pending search");
        }
    }

    /// Drop the pending action, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Asset search whose results are applied only for the latest query.
///
/// Clones share one query stream and one debouncer.
#[derive(Clone)]
pub struct AssetSearch {
    assets: AssetService,
    sequencer: Arc<RequestSequencer>,
    debouncer: Arc<Debouncer>,
}

impl AssetSearch {
    /// Wrap `assets` with a fresh query stream debounced by `delay`.
    pub fn new(assets: AssetService, delay: Duration) -> Self {
        Self {
            assets,
            sequencer: Arc::new(RequestSequencer::new()),
            debouncer: Arc::new(Debouncer::new(delay)),
        }
    }

    /// Quiet period applied by [`Self::schedule`].
    pub fn debounce(&self) -> Duration {
        self.debouncer.delay()
    }

    /// Run `query`. `Ok(None)` means a newer query was issued while this
    /// one was in flight and its results should be ignored.
    ///
    /// # Errors
    ///
    /// Fails on any gateway or decode failure of the current query. Errors
    /// from stale queries are swallowed like their results.
    pub async fn run(&self, query: &str) -> ServiceResult<Option<Vec<Asset>>> {
        latest_results(&self.assets, &self.sequencer, query).await
    }

    /// Run `query` once typing has paused, replacing any search still
    /// waiting out its quiet period. `on_results` sees the outcome only when
    /// the query is still the latest once it completes.
    pub fn schedule<F>(&self, query: impl Into<String>, on_results: F)
    where
        F: FnOnce(ServiceResult<Vec<Asset>>) + Send + 'static,
    {
        let assets = self.assets.clone();
        let sequencer = Arc::clone(&self.sequencer);
        let text = query.into();
        self.debouncer.schedule(async move {
            if let Some(outcome) = latest_results(&assets, &sequencer, &text).await.transpose() {
                on_results(outcome);
            }
        });
    }

    /// Drop a search still waiting out its quiet period.
    pub fn cancel_pending(&self) {
        self.debouncer.cancel();
    }
}

async fn latest_results(
    assets: &AssetService,
    sequencer: &RequestSequencer,
    query: &str,
) -> ServiceResult<Option<Vec<Asset>>> {
    let ticket = sequencer.issue();
    let outcome = assets.search(query).await;
    match sequencer.accept(ticket, outcome) {
        Some(result) => result.map(Some),
        None => {
            debug!(generation = ticket.generation(), "discarded stale search response");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for debounce timing and stale response handling.

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::ApiGateway;
    use crate::domain::{ApiRequest, GatewayError};
    use crate::services::test_support::fixture_clock;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, Arc<AtomicUsize>) {
        (Arc::new(Mutex::new(Vec::new())), Arc::new(AtomicUsize::new(0)))
    }

    #[tokio::test(start_paused = true)]
    async fn only_last_action_fires() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let (fired, count) = recorder();

        for query in ["c", "ch", "chairs"] {
            let log = Arc::clone(&fired);
            let runs = Arc::clone(&count);
            debouncer.schedule(async move {
                runs.fetch_add(1, Ordering::SeqCst);
                log.lock().expect("log lock").push(query);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(*fired.lock().expect("log lock"), vec!["chairs"]);
    }

    #[tokio::test(start_paused = true)]
    async fn action_waits_for_quiet_period() {
        let debouncer = Debouncer::default();
        let (_, count) = recorder();
        let runs = Arc::clone(&count);
        debouncer.schedule(async move {
            runs.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_action() {
        let debouncer = Debouncer::default();
        let (_, count) = recorder();
        let runs = Arc::clone(&count);
        debouncer.schedule(async move {
            runs.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    /// Answers short queries slowly so an older query finishes last.
    struct SlowPrefixGateway;

    #[async_trait]
    impl ApiGateway for SlowPrefixGateway {
        async fn send(&self, request: ApiRequest) -> Result<Value, GatewayError> {
            let query = request
                .payload()
                .and_then(|payload| payload.get("search"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            let delay = if query.len() < 3 { 300 } else { 50 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(json!([{ "_id": query, "name": query }]))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn late_answer_to_old_query_is_discarded() {
        let assets = AssetService::new(Arc::new(SlowPrefixGateway), fixture_clock());
        let search = AssetSearch::new(assets, DEFAULT_SEARCH_DEBOUNCE);

        let (old, new) = tokio::join!(search.run("ch"), search.run("chairs"));

        assert_eq!(old.expect("old query"), None);
        let items = new.expect("new query").expect("latest applied");
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().map(|asset| asset.name.as_str()), Some("chairs"));
    }

    /// Records every search term it is asked for.
    #[derive(Default)]
    struct RecordingGateway {
        terms: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ApiGateway for RecordingGateway {
        async fn send(&self, request: ApiRequest) -> Result<Value, GatewayError> {
            let term = request
                .payload()
                .and_then(|payload| payload.get("search"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            self.terms.lock().expect("terms lock").push(term.clone());
            Ok(json!([{ "_id": term, "name": term }]))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_search_sends_only_the_settled_query() {
        let gateway = Arc::new(RecordingGateway::default());
        let assets = AssetService::new(gateway.clone(), fixture_clock());
        let search = AssetSearch::new(assets, Duration::from_millis(250));
        let delivered: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        for query in ["m", "me", "mesa"] {
            let log = Arc::clone(&delivered);
            search.schedule(query, move |outcome| {
                let names = outcome.expect("search succeeds");
                log.lock()
                    .expect("delivery lock")
                    .extend(names.into_iter().map(|asset| asset.name));
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(search.debounce(), Duration::from_millis(250));
        assert_eq!(*gateway.terms.lock().expect("terms lock"), vec!["mesa"]);
        assert_eq!(*delivered.lock().expect("delivery lock"), vec!["mesa"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_search_never_reaches_the_gateway() {
        let gateway = Arc::new(RecordingGateway::default());
        let assets = AssetService::new(gateway.clone(), fixture_clock());
        let search = AssetSearch::new(assets, DEFAULT_SEARCH_DEBOUNCE);

        search.schedule("mesa", |_| {});
        search.cancel_pending();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(gateway.terms.lock().expect("terms lock").is_empty());
    }
}
