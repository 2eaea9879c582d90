//! In-memory adapters for host-side tests.
//!
//! Compiled for unit tests and behind the `mock` feature for the
//! integration tests in `tests/`.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use serde_json::json;

use crate::core::blob::BlobUrls;
use crate::core::debounce::{SleepFuture, Sleeper};
use crate::core::error::{BlobError, FetchError, StorageError};
use crate::core::preview::{FileSaver, Prompter};
use crate::core::session::KeyValueStore;
use crate::core::transport::{HttpRequest, HttpResponse, Method, Transport, TransportFuture};
use crate::models::{Session, UserId, UserProfile};

// =============================================================================
// Fixtures
// =============================================================================

/// Logged-in user 1 with token `secret-token`.
pub fn session() -> Session {
    Session {
        user: UserProfile {
            user_id: UserId(1),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
        },
        token: "secret-token".into(),
    }
}

/// `{"files":[…]}` listing of `(id, filename, mime, upload_date)`.
pub fn files_json(docs: &[(i64, &str, &str, &str)]) -> String {
    let files: Vec<_> = docs
        .iter()
        .map(|(id, name, mime, date)| {
            json!({ "doc_id": id, "original_filename": name, "file_type": mime, "upload_date": date })
        })
        .collect();
    json!({ "files": files }).to_string()
}

/// `{"results":[…]}` search response of `(id, filename)` text documents.
pub fn search_json(hits: &[(i64, &str)]) -> String {
    let results: Vec<_> = hits
        .iter()
        .map(|(id, name)| {
            json!({
                "doc_id": id,
                "metadata": { "filename": name, "upload_date": "2024-01-01T00:00:00", "file_type": "text/plain" }
            })
        })
        .collect();
    json!({ "results": results, "debug_info": {} }).to_string()
}

/// Bare `SharedDocument` listing from `owner` to `recipient` of
/// `(share_id, doc_id, filename, status)`.
pub fn shares_json(owner: i64, recipient: i64, shares: &[(i64, i64, &str, &str)]) -> String {
    let shares: Vec<_> = shares
        .iter()
        .map(|(share_id, doc_id, name, status)| {
            json!({
                "share_id": share_id,
                "doc_id": doc_id,
                "owner_id": owner,
                "recipient_id": recipient,
                "display_name": name,
                "original_filename": name,
                "shared_date": "2024-01-01T00:00:00",
                "last_accessed": null,
                "expiry_date": null,
                "status": status,
            })
        })
        .collect();
    serde_json::Value::Array(shares).to_string()
}

// =============================================================================
// Transport
// =============================================================================

#[derive(Clone, Debug)]
struct Scripted {
    delay_ms: u64,
    result: Result<HttpResponse, FetchError>,
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<(Option<Method>, String), VecDeque<Scripted>>,
    requests: Vec<HttpRequest>,
}

/// Scripted transport recording every request.
///
/// Responses are matched by exact path (including query), method-specific
/// routes first. Several responses for one route are served in order and the
/// last one repeats. Unrouted requests fail with a network error.
#[derive(Clone, Debug, Default)]
pub struct MockTransport {
    state: Rc<RefCell<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Option<Method>, path: &str, scripted: Scripted) {
        self.state
            .borrow_mut()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
    }

    fn response(status: u16, content_type: &str, body: Vec<u8>) -> HttpResponse {
        HttpResponse {
            status,
            content_type: Some(content_type.to_string()),
            body,
        }
    }

    pub fn respond_json(&self, path: &str, status: u16, body: &str) {
        self.respond_json_after(path, 0, status, body);
    }

    pub fn respond_json_after(&self, path: &str, delay_ms: u64, status: u16, body: &str) {
        self.push(
            None,
            path,
            Scripted {
                delay_ms,
                result: Ok(Self::response(status, "application/json", body.as_bytes().to_vec())),
            },
        );
    }

    /// Route that only answers `method`.
    pub fn respond_method(&self, method: Method, path: &str, status: u16, body: &str) {
        self.push(
            Some(method),
            path,
            Scripted {
                delay_ms: 0,
                result: Ok(Self::response(status, "application/json", body.as_bytes().to_vec())),
            },
        );
    }

    pub fn respond_bytes(&self, path: &str, status: u16, mime: &str, bytes: Vec<u8>) {
        self.push(
            None,
            path,
            Scripted {
                delay_ms: 0,
                result: Ok(Self::response(status, mime, bytes)),
            },
        );
    }

    pub fn fail(&self, path: &str, error: FetchError) {
        self.push(
            None,
            path,
            Scripted {
                delay_ms: 0,
                result: Err(error),
            },
        );
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.borrow().requests.clone()
    }

    /// Requests sent to `path` with `method`.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.state
            .borrow()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn next(&self, request: &HttpRequest) -> Scripted {
        let mut state = self.state.borrow_mut();
        state.requests.push(request.clone());

        let keys = [
            (Some(request.method), request.path.clone()),
            (None, request.path.clone()),
        ];
        for key in keys {
            if let Some(queue) = state.routes.get_mut(&key) {
                let scripted = if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                };
                if let Some(scripted) = scripted {
                    return scripted;
                }
            }
        }
        Scripted {
            delay_ms: 0,
            result: Err(FetchError::NetworkError(format!(
                "no route for {:?} {}",
                request.method, request.path
            ))),
        }
    }
}

impl Transport for MockTransport {
    fn send(&self, request: HttpRequest) -> TransportFuture<'_, Result<HttpResponse, FetchError>> {
        let scripted = self.next(&request);
        Box::pin(async move {
            if scripted.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(scripted.delay_ms)).await;
            }
            scripted.result
        })
    }
}

// =============================================================================
// Storage
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

// =============================================================================
// Object URLs
// =============================================================================

#[derive(Debug, Default)]
struct BlobLedger {
    next: u32,
    fail_next: bool,
    live: Vec<String>,
    revoked: Vec<String>,
}

/// Issues `blob:mock/N` URLs and records revocations.
#[derive(Clone, Debug, Default)]
pub struct RecordingBlobUrls {
    ledger: Rc<RefCell<BlobLedger>>,
}

impl RecordingBlobUrls {
    pub fn live(&self) -> Vec<String> {
        self.ledger.borrow().live.clone()
    }

    pub fn revoked(&self) -> Vec<String> {
        self.ledger.borrow().revoked.clone()
    }

    pub fn created_count(&self) -> u32 {
        self.ledger.borrow().next
    }

    /// Make the next `create` fail.
    pub fn fail_next(&self) {
        self.ledger.borrow_mut().fail_next = true;
    }
}

impl BlobUrls for RecordingBlobUrls {
    fn create(&self, _bytes: &[u8], _mime: Option<&str>) -> Result<String, BlobError> {
        let mut ledger = self.ledger.borrow_mut();
        if std::mem::take(&mut ledger.fail_next) {
            return Err(BlobError::UrlCreationFailed);
        }
        ledger.next += 1;
        let url = format!("blob:mock/{}", ledger.next);
        ledger.live.push(url.clone());
        Ok(url)
    }

    fn revoke(&self, url: &str) {
        let mut ledger = self.ledger.borrow_mut();
        ledger.live.retain(|u| u != url);
        ledger.revoked.push(url.to_string());
    }
}

// =============================================================================
// Timers and user interaction
// =============================================================================

/// `tokio::time` sleeper; pair with `start_paused` tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, ms: u32) -> SleepFuture<'_> {
        Box::pin(tokio::time::sleep(Duration::from_millis(u64::from(ms))))
    }
}

/// Answers confirmations from a script; `false` once the script runs out.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPrompter {
    answers: Rc<RefCell<VecDeque<bool>>>,
    asked: Rc<RefCell<Vec<String>>>,
}

impl ScriptedPrompter {
    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Rc::new(RefCell::new(answers.into_iter().collect())),
            asked: Rc::default(),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str) -> bool {
        self.asked.borrow_mut().push(message.to_string());
        self.answers.borrow_mut().pop_front().unwrap_or(false)
    }
}

/// Records `(url, filename)` for every save.
#[derive(Clone, Debug, Default)]
pub struct RecordingSaver {
    saved: Rc<RefCell<Vec<(String, String)>>>,
}

impl RecordingSaver {
    pub fn saved(&self) -> Vec<(String, String)> {
        self.saved.borrow().clone()
    }
}

impl FileSaver for RecordingSaver {
    fn save(&self, url: &str, filename: &str) -> bool {
        self.saved
            .borrow_mut()
            .push((url.to_string(), filename.to_string()));
        true
    }
}
