//! Dashboard and file browser listings.
//!
//! The three dashboard sections load concurrently and fail independently: a
//! failed section renders empty with its error, the others render normally.

use std::cmp::Reverse;

use leptos::logging::warn;

use crate::config::RECENT_TILE_COUNT;
use crate::core::api::ApiClient;
use crate::core::error::ApiError;
use crate::core::transport::Transport;
use crate::models::{DocumentSummary, ShareGrant};
use crate::utils::parse_timestamp;

/// One independently loaded list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section<T> {
    pub items: Vec<T>,
    pub error: Option<ApiError>,
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            error: None,
        }
    }
}

impl<T> Section<T> {
    pub fn from_result(name: &str, result: Result<Vec<T>, ApiError>) -> Self {
        match result {
            Ok(items) => Self { items, error: None },
            Err(error) => {
                warn!("[dashboard] {} failed to load: {}", name, error);
                Self {
                    items: Vec::new(),
                    error: Some(error),
                }
            }
        }
    }

    fn session_expired(&self) -> bool {
        self.error.as_ref().is_some_and(ApiError::is_session_expired)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DashboardData {
    pub recent: Section<DocumentSummary>,
    pub shared_with_me: Section<ShareGrant>,
    pub shared_by_me: Section<ShareGrant>,
}

impl DashboardData {
    /// Any section was rejected with 401/403.
    pub fn session_expired(&self) -> bool {
        self.recent.session_expired()
            || self.shared_with_me.session_expired()
            || self.shared_by_me.session_expired()
    }
}

/// Fetch recent, shared-with-me and shared-by-me concurrently.
pub async fn load_dashboard<T: Transport>(api: &ApiClient<T>) -> DashboardData {
    let (recent, with_me, by_me) =
        futures::join!(api.list_recent(), api.shared_with_me(), api.shared_by_me());
    DashboardData {
        recent: Section::from_result("recent", recent),
        shared_with_me: Section::from_result("shared-with-me", with_me),
        shared_by_me: Section::from_result("shared-by-me", by_me),
    }
}

/// All owned documents, newest first.
pub async fn load_files<T: Transport>(
    api: &ApiClient<T>,
) -> Result<Vec<DocumentSummary>, ApiError> {
    let mut docs = api.list_documents().await?;
    sort_newest_first(&mut docs);
    Ok(docs)
}

/// Sort by upload date, descending. Unparseable dates sink to the end.
pub fn sort_newest_first(docs: &mut [DocumentSummary]) {
    docs.sort_by_key(|d| Reverse(parse_timestamp(&d.upload_date)));
}

/// One cell of the recent-files grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tile<'a> {
    Document(&'a DocumentSummary),
    /// Empty slot that links to the upload page.
    Upload,
}

/// Exactly [`RECENT_TILE_COUNT`] tiles: the first documents, then upload slots.
pub fn recent_tiles(docs: &[DocumentSummary]) -> Vec<Tile<'_>> {
    let shown = docs.iter().take(RECENT_TILE_COUNT).map(Tile::Document);
    let placeholders = RECENT_TILE_COUNT.saturating_sub(docs.len());
    shown
        .chain(std::iter::repeat_n(Tile::Upload, placeholders))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FetchError;
    use crate::core::mock::{MockTransport, files_json, session, shares_json};
    use crate::models::DocId;

    fn doc(id: i64, date: &str) -> DocumentSummary {
        DocumentSummary {
            doc_id: DocId(id),
            original_filename: format!("{id}.txt"),
            upload_date: date.to_string(),
            file_type: "text/plain".into(),
        }
    }

    #[tokio::test]
    async fn test_sections_fail_independently() {
        let transport = MockTransport::new();
        transport.respond_json(
            "/docs/recent",
            200,
            &files_json(&[(1, "a.txt", "text/plain", "2024-01-01T00:00:00")]),
        );
        transport.fail("/share/shared-with-me", FetchError::Timeout);
        transport.respond_json(
            "/share/shared-by-me",
            200,
            &shares_json(1, 2, &[(5, 1, "a.txt", "active")]),
        );
        let api = ApiClient::for_session(transport.clone(), &session());

        let data = load_dashboard(&api).await;
        assert_eq!(data.recent.items.len(), 1);
        assert!(data.shared_with_me.items.is_empty());
        assert!(data.shared_with_me.error.is_some());
        assert_eq!(data.shared_by_me.items.len(), 1);
        assert!(!data.session_expired());
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_session_expiry_detected() {
        let transport = MockTransport::new();
        transport.respond_json("/docs/recent", 401, "{}");
        transport.respond_json("/share/shared-with-me", 200, "[]");
        transport.respond_json("/share/shared-by-me", 200, "[]");
        let api = ApiClient::for_session(transport, &session());
        assert!(load_dashboard(&api).await.session_expired());
    }

    #[test]
    fn test_sort_newest_first() {
        let mut docs = vec![
            doc(1, "2024-01-01T00:00:00"),
            doc(2, "garbage"),
            doc(3, "2024-06-01T12:00:00"),
        ];
        sort_newest_first(&mut docs);
        let ids: Vec<_> = docs.iter().map(|d| d.doc_id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_recent_tiles_fill_with_placeholders() {
        let docs: Vec<_> = (1..=2).map(|i| doc(i, "2024-01-01")).collect();
        let tiles = recent_tiles(&docs);
        assert_eq!(tiles.len(), RECENT_TILE_COUNT);
        assert_eq!(tiles.iter().filter(|t| **t == Tile::Upload).count(), 4);
    }

    #[test]
    fn test_recent_tiles_truncate() {
        let docs: Vec<_> = (1..=9).map(|i| doc(i, "2024-01-01")).collect();
        let tiles = recent_tiles(&docs);
        assert_eq!(tiles.len(), RECENT_TILE_COUNT);
        assert!(tiles.iter().all(|t| matches!(t, Tile::Document(_))));
    }
}
