//! Debounced, last-writer-wins document search.

use std::sync::{Arc, Mutex};

use leptos::logging::warn;

use crate::config::SEARCH_DEBOUNCE_MS;
use crate::core::api::ApiClient;
use crate::core::debounce::{Debouncer, Sleeper};
use crate::core::error::ApiError;
use crate::core::transport::Transport;
use crate::models::DocumentSummary;
use crate::utils::dedupe_by;

/// What the view should do after one keystroke has been processed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchUpdate {
    /// Blank input: drop results, no request was made.
    Cleared,
    /// Results for the query currently in the box.
    Results {
        query: String,
        docs: Vec<DocumentSummary>,
    },
    /// A newer keystroke (or teardown) owns the view; leave it alone.
    Superseded,
    Failed { query: String, error: ApiError },
}

#[derive(Clone, Debug)]
pub struct SearchController<S> {
    debouncer: Debouncer<S>,
    latest: Arc<Mutex<String>>,
}

impl<S: Sleeper> SearchController<S> {
    pub fn new(sleeper: S) -> Self {
        Self::with_delay(sleeper, SEARCH_DEBOUNCE_MS)
    }

    pub fn with_delay(sleeper: S, delay_ms: u32) -> Self {
        Self {
            debouncer: Debouncer::new(sleeper, delay_ms),
            latest: Arc::new(Mutex::new(String::new())),
        }
    }

    fn set_latest(&self, query: &str) {
        if let Ok(mut latest) = self.latest.lock() {
            latest.clear();
            latest.push_str(query);
        }
    }

    fn is_latest(&self, query: &str) -> bool {
        self.latest.lock().is_ok_and(|latest| *latest == query)
    }

    /// Feed the raw contents of the search box.
    ///
    /// Resolves once the input has settled and the request (if any) has
    /// returned. Results that no longer match the box are reported as
    /// [`SearchUpdate::Superseded`].
    pub async fn input<T: Transport>(&self, api: &ApiClient<T>, raw: &str) -> SearchUpdate {
        let query = raw.trim().to_string();
        self.set_latest(&query);

        if query.is_empty() {
            self.debouncer.cancel();
            return SearchUpdate::Cleared;
        }

        let ticket = self.debouncer.schedule();
        if !self.debouncer.settle(ticket).await {
            return SearchUpdate::Superseded;
        }

        let result = api.search(&query).await;
        if !self.debouncer.is_current(ticket) || !self.is_latest(&query) {
            return SearchUpdate::Superseded;
        }

        match result {
            Ok(docs) => SearchUpdate::Results {
                docs: dedupe_by(docs, |d| d.original_filename.as_str()),
                query,
            },
            Err(error) => {
                warn!("[search] {:?} failed: {}", query, error);
                SearchUpdate::Failed { query, error }
            }
        }
    }

    /// Cancel the pending window and discard anything in flight.
    pub fn teardown(&self) {
        self.set_latest("");
        self.debouncer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::mock::{MockTransport, TokioSleeper, search_json, session};

    fn api(transport: &MockTransport) -> ApiClient<MockTransport> {
        ApiClient::for_session(transport.clone(), &session())
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_makes_no_request() {
        let transport = MockTransport::new();
        let search = SearchController::new(TokioSleeper);
        assert_eq!(search.input(&api(&transport), "   ").await, SearchUpdate::Cleared);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_debounce() {
        let transport = MockTransport::new();
        transport.respond_json("/search?q=notes", 200, &search_json(&[(1, "notes.txt")]));
        let search = SearchController::new(TokioSleeper);

        let start = tokio::time::Instant::now();
        let update = search.input(&api(&transport), "notes").await;
        assert!(start.elapsed() >= Duration::from_millis(300));
        assert!(matches!(update, SearchUpdate::Results { ref query, .. } if query == "notes"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_response_does_not_overwrite_newer_query() {
        let transport = MockTransport::new();
        transport.respond_json_after("/search?q=a", 1_000, 200, &search_json(&[(1, "a.txt")]));
        transport.respond_json("/search?q=ab", 200, &search_json(&[(2, "ab.txt")]));
        let search = SearchController::new(TokioSleeper);
        let api = api(&transport);

        let first = search.input(&api, "a");
        let second = async {
            // After the first debounce fired, while its request is in flight.
            tokio::time::sleep(Duration::from_millis(400)).await;
            search.input(&api, "ab").await
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, SearchUpdate::Superseded);
        assert!(matches!(second, SearchUpdate::Results { ref query, .. } if query == "ab"));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_are_deduplicated() {
        let transport = MockTransport::new();
        transport.respond_json(
            "/search?q=report",
            200,
            &search_json(&[(1, "Report.pdf"), (2, "report.PDF"), (3, "other.txt")]),
        );
        let search = SearchController::new(TokioSleeper);
        let SearchUpdate::Results { docs, .. } = search.input(&api(&transport), " report ").await
        else {
            panic!("expected results");
        };
        let names: Vec<_> = docs.iter().map(|d| d.original_filename.as_str()).collect();
        assert_eq!(names, vec!["Report.pdf", "other.txt"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_discards_in_flight() {
        let transport = MockTransport::new();
        transport.respond_json_after("/search?q=x", 500, 200, &search_json(&[(1, "x")]));
        let search = SearchController::new(TokioSleeper);
        let api = api(&transport);

        let pending = search.input(&api, "x");
        let close = async {
            tokio::time::sleep(Duration::from_millis(350)).await;
            search.teardown();
        };
        let (update, ()) = tokio::join!(pending, close);
        assert_eq!(update, SearchUpdate::Superseded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_reported() {
        let transport = MockTransport::new();
        transport.respond_json("/search?q=x", 500, r#"{"error":"index offline"}"#);
        let search = SearchController::new(TokioSleeper);
        let update = search.input(&api(&transport), "x").await;
        assert!(matches!(update, SearchUpdate::Failed { .. }));
    }
}
