//! File browser operations: selection, rename, delete, download.

use std::collections::BTreeSet;

use futures::future::join_all;
use leptos::logging::warn;

use crate::core::api::ApiClient;
use crate::core::batch::BatchOutcome;
use crate::core::blob::BlobUrls;
use crate::core::error::{FormError, ValidationError};
use crate::core::preview::{ContentSource, FileSaver, Prompter, download};
use crate::core::transport::Transport;
use crate::models::{DocId, DocumentSummary};

// =============================================================================
// Selection
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<DocId>,
}

impl Selection {
    pub fn toggle(&mut self, id: DocId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Select every listed document, or clear if all are already selected.
    pub fn toggle_all(&mut self, docs: &[DocumentSummary]) {
        if !docs.is_empty() && docs.iter().all(|d| self.ids.contains(&d.doc_id)) {
            self.ids.clear();
        } else {
            self.ids = docs.iter().map(|d| d.doc_id).collect();
        }
    }

    pub fn all_selected(&self, docs: &[DocumentSummary]) -> bool {
        !docs.is_empty() && docs.iter().all(|d| self.ids.contains(&d.doc_id))
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> Vec<DocId> {
        self.ids.iter().copied().collect()
    }
}

// =============================================================================
// Rename
// =============================================================================

/// Trimmed, non-empty filename.
pub fn validate_filename(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::Required("Filename"));
    }
    Ok(name.to_string())
}

/// Rename on the server; returns the name that was stored.
pub async fn rename_document<T: Transport>(
    api: &ApiClient<T>,
    id: DocId,
    raw: &str,
) -> Result<String, FormError> {
    let name = validate_filename(raw)?;
    api.rename_document(id, &name).await?;
    Ok(name)
}

/// Replace the listed entry in place.
pub fn apply_rename(docs: &mut [DocumentSummary], id: DocId, name: &str) {
    if let Some(doc) = docs.iter_mut().find(|d| d.doc_id == id) {
        doc.original_filename = name.to_string();
    }
}

// =============================================================================
// Delete / Download
// =============================================================================

/// Confirm, then delete every selected document.
///
/// `None` when nothing is selected or the user declined; the selection is
/// left untouched in that case. Otherwise the selection is cleared whatever
/// the individual outcomes.
pub async fn delete_selected<T: Transport, P: Prompter>(
    api: &ApiClient<T>,
    prompter: &P,
    selection: &mut Selection,
) -> Option<BatchOutcome> {
    if selection.is_empty() {
        return None;
    }
    let noun = if selection.len() == 1 { "file" } else { "files" };
    let message = format!(
        "Are you sure you want to delete {} {noun}?",
        selection.len()
    );
    if !prompter.confirm(&message) {
        return None;
    }

    let ids = selection.ids();
    let results = join_all(ids.iter().map(|&id| async move {
        let result = api.delete_document(id).await;
        if let Err(e) = &result {
            warn!("[files] delete {} failed: {}", id, e);
        }
        (id, result)
    }))
    .await;

    selection.clear();
    Some(BatchOutcome::collect(results))
}

/// Download every selected document present in `docs`.
pub async fn download_selected<T, B, F>(
    api: &ApiClient<T>,
    urls: &B,
    saver: &F,
    docs: &[DocumentSummary],
    selection: &Selection,
) -> BatchOutcome
where
    T: Transport,
    B: BlobUrls,
    F: FileSaver,
{
    let chosen = docs.iter().filter(|d| selection.contains(d.doc_id));
    let results = join_all(chosen.map(|doc| async move {
        let result = download(
            api,
            urls,
            saver,
            ContentSource::Owned(doc.doc_id),
            &doc.original_filename,
        )
        .await;
        if let Err(e) = &result {
            warn!("[files] download {} failed: {}", doc.doc_id, e);
        }
        (doc.doc_id, result)
    }))
    .await;
    BatchOutcome::collect(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ApiError;
    use crate::core::mock::{
        MockTransport, RecordingBlobUrls, RecordingSaver, ScriptedPrompter, session,
    };
    use crate::core::transport::Method;

    fn docs(ids: &[i64]) -> Vec<DocumentSummary> {
        ids.iter()
            .map(|&id| DocumentSummary {
                doc_id: DocId(id),
                original_filename: format!("file{id}.txt"),
                upload_date: "2024-01-01T00:00:00".into(),
                file_type: "text/plain".into(),
            })
            .collect()
    }

    #[test]
    fn test_toggle_all() {
        let listed = docs(&[1, 2, 3]);
        let mut selection = Selection::default();
        selection.toggle(DocId(2));
        selection.toggle_all(&listed);
        assert_eq!(selection.len(), 3);
        assert!(selection.all_selected(&listed));
        selection.toggle_all(&listed);
        assert!(selection.is_empty());
        selection.toggle(DocId(1));
        selection.toggle(DocId(1));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_apply_rename() {
        let mut listed = docs(&[1, 2]);
        apply_rename(&mut listed, DocId(2), "renamed.txt");
        assert_eq!(listed[1].original_filename, "renamed.txt");
        assert_eq!(listed[0].original_filename, "file1.txt");
    }

    #[tokio::test]
    async fn test_blank_rename_never_sent() {
        let transport = MockTransport::new();
        let api = ApiClient::for_session(transport.clone(), &session());
        assert_eq!(
            rename_document(&api, DocId(1), "   ").await,
            Err(FormError::Validation(ValidationError::Required("Filename")))
        );
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_rename_sends_patch() {
        let transport = MockTransport::new();
        transport.respond_method(Method::Patch, "/docs/documents/4", 200, "{}");
        let api = ApiClient::for_session(transport.clone(), &session());
        assert_eq!(
            rename_document(&api, DocId(4), " new.txt ").await,
            Ok("new.txt".to_string())
        );
        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::Patch);
    }

    #[tokio::test]
    async fn test_declined_delete_keeps_selection() {
        let transport = MockTransport::new();
        let api = ApiClient::for_session(transport.clone(), &session());
        let mut selection = Selection::default();
        selection.toggle(DocId(1));

        let outcome =
            delete_selected(&api, &ScriptedPrompter::answering([false]), &mut selection).await;
        assert_eq!(outcome, None);
        assert_eq!(selection.len(), 1);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_delete_partial_failure_clears_selection() {
        let transport = MockTransport::new();
        transport.respond_json("/docs/documents/1", 200, "{}");
        transport.respond_json("/docs/documents/2", 500, r#"{"error":"locked"}"#);
        let api = ApiClient::for_session(transport, &session());
        let mut selection = Selection::default();
        selection.toggle_all(&docs(&[1, 2]));

        let outcome = delete_selected(&api, &ScriptedPrompter::answering([true]), &mut selection)
            .await
            .unwrap();
        assert_eq!(outcome.summary(), "1 of 2 succeeded");
        assert!(selection.is_empty());
    }

    #[tokio::test]
    async fn test_download_revokes_each_handle() {
        let transport = MockTransport::new();
        transport.respond_bytes("/docs/file/1", 200, "text/plain", b"one".to_vec());
        transport.respond_json("/docs/file/2", 404, "{}");
        transport.respond_bytes("/docs/file/3", 200, "text/plain", b"three".to_vec());
        let api = ApiClient::for_session(transport, &session());
        let urls = RecordingBlobUrls::default();
        let saver = RecordingSaver::default();
        let listed = docs(&[1, 2, 3]);
        let mut selection = Selection::default();
        selection.toggle_all(&listed);

        let outcome = download_selected(&api, &urls, &saver, &listed, &selection).await;
        assert_eq!(outcome.succeeded.len(), 2);
        assert_eq!(outcome.failed, vec![(DocId(2), ApiError::NotFound.to_string())]);
        assert_eq!(saver.saved().len(), 2);
        assert!(urls.live().is_empty());
    }
}
