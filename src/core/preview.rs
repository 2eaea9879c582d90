//! Document preview and single-file download.
//!
//! Preview eligibility comes from the filename allow-lists; the renderer is
//! chosen from the response content type, falling back to the extension when
//! the server sends something generic. A [`PreviewSlot`] holds at most one
//! live preview and drops stale loads.

use leptos::logging::log;

use crate::config::preview::{
    IMAGE_EXTENSIONS, MARKDOWN_EXTENSIONS, PDF_EXTENSIONS, TEXT_EXTENSIONS,
};
use crate::core::api::{ApiClient, ContentBlob};
use crate::core::blob::{BlobHandle, BlobUrls};
use crate::core::error::PreviewError;
use crate::core::transport::Transport;
use crate::models::{DocId, ShareId, extension_of};
use crate::utils::{dom, markdown_to_html};

// =============================================================================
// Classification
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Pdf,
    Text,
    Markdown,
}

impl PreviewKind {
    /// Allow-list lookup by extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = extension_of(filename)?;
        let ext = ext.as_str();
        if IMAGE_EXTENSIONS.contains(&ext) {
            Some(Self::Image)
        } else if PDF_EXTENSIONS.contains(&ext) {
            Some(Self::Pdf)
        } else if MARKDOWN_EXTENSIONS.contains(&ext) {
            Some(Self::Markdown)
        } else if TEXT_EXTENSIONS.contains(&ext) {
            Some(Self::Text)
        } else {
            None
        }
    }

    /// Classification by MIME type. Generic types yield `None`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            m if m.starts_with("image/") => Some(Self::Image),
            "application/pdf" => Some(Self::Pdf),
            "text/markdown" | "text/x-markdown" => Some(Self::Markdown),
            m if m.starts_with("text/") => Some(Self::Text),
            "application/json" | "application/xml" => Some(Self::Text),
            _ => None,
        }
    }

    /// Renderer for fetched content of a file the allow-list accepted.
    ///
    /// Markdown files served as plain text still render as Markdown.
    pub fn resolve(filename: &str, mime: Option<&str>) -> Option<Self> {
        let by_name = Self::from_filename(filename);
        match (mime.and_then(Self::from_mime), by_name) {
            (Some(Self::Text), Some(Self::Markdown)) => Some(Self::Markdown),
            (Some(kind), _) => Some(kind),
            (None, kind) => kind,
        }
    }
}

/// What a click on a document should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenIntent {
    Preview(PreviewKind),
    /// Not previewable: ask before downloading.
    ConfirmDownload,
}

impl OpenIntent {
    pub fn for_filename(filename: &str) -> Self {
        PreviewKind::from_filename(filename).map_or(Self::ConfirmDownload, Self::Preview)
    }
}

// =============================================================================
// Preview
// =============================================================================

/// Where the content comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentSource {
    Owned(DocId),
    Shared(ShareId),
}

impl ContentSource {
    pub async fn fetch<T: Transport>(
        self,
        api: &ApiClient<T>,
    ) -> Result<ContentBlob, crate::core::error::ApiError> {
        match self {
            Self::Owned(id) => api.fetch_content(id).await,
            Self::Shared(id) => api.fetch_shared_content(id).await,
        }
    }
}

#[derive(Debug)]
pub enum PreviewBody<B: BlobUrls> {
    Image(BlobHandle<B>),
    Pdf(BlobHandle<B>),
    Text(String),
    /// Sanitized HTML.
    Markdown(String),
}

#[derive(Debug)]
pub struct Preview<B: BlobUrls> {
    pub source: ContentSource,
    pub filename: String,
    pub body: PreviewBody<B>,
}

impl<B: BlobUrls> Preview<B> {
    pub fn kind(&self) -> PreviewKind {
        match self.body {
            PreviewBody::Image(_) => PreviewKind::Image,
            PreviewBody::Pdf(_) => PreviewKind::Pdf,
            PreviewBody::Text(_) => PreviewKind::Text,
            PreviewBody::Markdown(_) => PreviewKind::Markdown,
        }
    }

    /// Object URL for image/PDF bodies.
    pub fn url(&self) -> Option<&str> {
        match &self.body {
            PreviewBody::Image(h) | PreviewBody::Pdf(h) => Some(h.url()),
            _ => None,
        }
    }
}

/// Fetch and materialize a preview.
pub async fn load_preview<T: Transport, B: BlobUrls>(
    api: &ApiClient<T>,
    urls: &B,
    source: ContentSource,
    filename: &str,
) -> Result<Preview<B>, PreviewError> {
    let blob = source.fetch(api).await?;
    let kind = PreviewKind::resolve(filename, blob.mime.as_deref()).ok_or(PreviewError::Unsupported)?;
    let mime = blob.mime.as_deref();

    let body = match kind {
        PreviewKind::Image => PreviewBody::Image(BlobHandle::create(urls, &blob.bytes, mime)?),
        PreviewKind::Pdf => PreviewBody::Pdf(BlobHandle::create(
            urls,
            &blob.bytes,
            Some(mime.unwrap_or("application/pdf")),
        )?),
        PreviewKind::Text => PreviewBody::Text(String::from_utf8_lossy(&blob.bytes).into_owned()),
        PreviewKind::Markdown => {
            PreviewBody::Markdown(markdown_to_html(&String::from_utf8_lossy(&blob.bytes)))
        }
    };

    Ok(Preview {
        source,
        filename: filename.to_string(),
        body,
    })
}

/// Ticket for one preview load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewTicket(u64);

/// The single active preview of a view.
#[derive(Debug)]
pub struct PreviewSlot<B: BlobUrls> {
    active: Option<Preview<B>>,
    seq: u64,
}

impl<B: BlobUrls> Default for PreviewSlot<B> {
    fn default() -> Self {
        Self {
            active: None,
            seq: 0,
        }
    }
}

impl<B: BlobUrls> PreviewSlot<B> {
    /// Release the current preview and claim the slot for a new load.
    pub fn begin(&mut self) -> PreviewTicket {
        self.active = None;
        self.seq += 1;
        PreviewTicket(self.seq)
    }

    /// Install a finished load. Returns `false` (and releases it) if another
    /// load or a close happened since `ticket` was issued.
    pub fn complete(&mut self, ticket: PreviewTicket, preview: Preview<B>) -> bool {
        if ticket.0 != self.seq {
            return false;
        }
        self.active = Some(preview);
        true
    }

    pub fn is_current(&self, ticket: PreviewTicket) -> bool {
        ticket.0 == self.seq
    }

    pub fn close(&mut self) {
        self.active = None;
        self.seq += 1;
    }

    pub fn active(&self) -> Option<&Preview<B>> {
        self.active.as_ref()
    }
}

// =============================================================================
// Download
// =============================================================================

/// Yes/no confirmation.
pub trait Prompter {
    fn confirm(&self, message: &str) -> bool;
}

/// `window.confirm`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserPrompter;

impl Prompter for BrowserPrompter {
    fn confirm(&self, message: &str) -> bool {
        dom::confirm(message)
    }
}

/// Hands an object URL to the browser as a file download.
pub trait FileSaver {
    fn save(&self, url: &str, filename: &str) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSaver;

impl FileSaver for BrowserSaver {
    fn save(&self, url: &str, filename: &str) -> bool {
        dom::click_download(url, filename)
    }
}

/// Fetch `source` and save it; the object URL is revoked right after the save.
pub async fn download<T: Transport, B: BlobUrls, F: FileSaver>(
    api: &ApiClient<T>,
    urls: &B,
    saver: &F,
    source: ContentSource,
    filename: &str,
) -> Result<(), PreviewError> {
    let blob = source.fetch(api).await?;
    let handle = BlobHandle::create(urls, &blob.bytes, blob.mime.as_deref())?;
    if !saver.save(handle.url(), filename) {
        log!("[download] browser refused to save {}", filename);
    }
    Ok(())
}

/// Result of clicking a document.
#[derive(Debug)]
pub enum Opened<B: BlobUrls> {
    Preview(Preview<B>),
    Downloaded,
    /// Download prompt declined; nothing was fetched.
    Declined,
}

/// Preview an allow-listed file, or ask and download anything else.
pub async fn open_document<T, B, P, F>(
    api: &ApiClient<T>,
    urls: &B,
    prompter: &P,
    saver: &F,
    source: ContentSource,
    filename: &str,
) -> Result<Opened<B>, PreviewError>
where
    T: Transport,
    B: BlobUrls,
    P: Prompter,
    F: FileSaver,
{
    match OpenIntent::for_filename(filename) {
        OpenIntent::Preview(_) => load_preview(api, urls, source, filename)
            .await
            .map(Opened::Preview),
        OpenIntent::ConfirmDownload => {
            let message = format!("Preview is not available for {filename}. Download it instead?");
            if !prompter.confirm(&message) {
                return Ok(Opened::Declined);
            }
            download(api, urls, saver, source, filename).await?;
            Ok(Opened::Downloaded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ApiError;
    use crate::core::mock::{
        MockTransport, RecordingBlobUrls, RecordingSaver, ScriptedPrompter, session,
    };

    fn api(transport: &MockTransport) -> ApiClient<MockTransport> {
        ApiClient::for_session(transport.clone(), &session())
    }

    #[test]
    fn test_allow_list() {
        assert_eq!(PreviewKind::from_filename("a.PNG"), Some(PreviewKind::Image));
        assert_eq!(PreviewKind::from_filename("a.pdf"), Some(PreviewKind::Pdf));
        assert_eq!(PreviewKind::from_filename("a.md"), Some(PreviewKind::Markdown));
        assert_eq!(PreviewKind::from_filename("a.csv"), Some(PreviewKind::Text));
        assert_eq!(PreviewKind::from_filename("a.docx"), None);
        assert_eq!(OpenIntent::for_filename("a.zip"), OpenIntent::ConfirmDownload);
    }

    #[test]
    fn test_resolve_prefers_mime() {
        assert_eq!(
            PreviewKind::resolve("scan.txt", Some("image/png")),
            Some(PreviewKind::Image)
        );
        assert_eq!(
            PreviewKind::resolve("notes.md", Some("text/plain")),
            Some(PreviewKind::Markdown)
        );
        assert_eq!(
            PreviewKind::resolve("a.pdf", Some("application/octet-stream")),
            Some(PreviewKind::Pdf)
        );
    }

    #[tokio::test]
    async fn test_text_preview_decodes() {
        let transport = MockTransport::new();
        transport.respond_bytes("/docs/file/3", 200, "text/plain; charset=utf-8", b"hello".to_vec());
        let urls = RecordingBlobUrls::default();
        let preview = load_preview(&api(&transport), &urls, ContentSource::Owned(DocId(3)), "a.txt")
            .await
            .unwrap();
        assert!(matches!(preview.body, PreviewBody::Text(ref t) if t == "hello"));
        assert_eq!(urls.created_count(), 0);
    }

    #[tokio::test]
    async fn test_slot_keeps_one_preview() {
        let transport = MockTransport::new();
        transport.respond_bytes("/docs/file/1", 200, "image/png", vec![1]);
        transport.respond_bytes("/docs/file/2", 200, "application/pdf", vec![2]);
        let urls = RecordingBlobUrls::default();
        let api = api(&transport);
        let mut slot = PreviewSlot::default();

        let t1 = slot.begin();
        let p1 = load_preview(&api, &urls, ContentSource::Owned(DocId(1)), "a.png").await.unwrap();
        assert!(slot.complete(t1, p1));

        let t2 = slot.begin();
        assert_eq!(urls.revoked().len(), 1);
        let p2 = load_preview(&api, &urls, ContentSource::Owned(DocId(2)), "b.pdf").await.unwrap();
        assert!(slot.complete(t2, p2));
        assert_eq!(slot.active().map(Preview::kind), Some(PreviewKind::Pdf));

        slot.close();
        assert!(urls.live().is_empty());
    }

    #[tokio::test]
    async fn test_stale_load_is_released() {
        let transport = MockTransport::new();
        transport.respond_bytes("/docs/file/1", 200, "image/png", vec![1]);
        let urls = RecordingBlobUrls::default();
        let mut slot = PreviewSlot::default();

        let stale = slot.begin();
        slot.close();
        let preview = load_preview(&api(&transport), &urls, ContentSource::Owned(DocId(1)), "a.png")
            .await
            .unwrap();
        assert!(!slot.complete(stale, preview));
        assert!(urls.live().is_empty());
        assert!(slot.active().is_none());
    }

    #[tokio::test]
    async fn test_declined_download_makes_no_request() {
        let transport = MockTransport::new();
        let prompter = ScriptedPrompter::answering([false]);
        let saver = RecordingSaver::default();
        let opened = open_document(
            &api(&transport),
            &RecordingBlobUrls::default(),
            &prompter,
            &saver,
            ContentSource::Owned(DocId(8)),
            "archive.zip",
        )
        .await
        .unwrap();

        assert!(matches!(opened, Opened::Declined));
        assert_eq!(prompter.asked().len(), 1);
        assert!(transport.requests().is_empty());
        assert!(saver.saved().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_download_revokes_after_save() {
        let transport = MockTransport::new();
        transport.respond_bytes("/share/content/4", 200, "application/zip", vec![9]);
        let urls = RecordingBlobUrls::default();
        let saver = RecordingSaver::default();
        let opened = open_document(
            &api(&transport),
            &urls,
            &ScriptedPrompter::answering([true]),
            &saver,
            ContentSource::Shared(ShareId(4)),
            "archive.zip",
        )
        .await
        .unwrap();

        assert!(matches!(opened, Opened::Downloaded));
        assert_eq!(saver.saved()[0].1, "archive.zip");
        assert!(urls.live().is_empty());
        assert_eq!(urls.revoked(), vec![saver.saved()[0].0.clone()]);
    }

    #[tokio::test]
    async fn test_missing_content() {
        let transport = MockTransport::new();
        transport.respond_json("/docs/file/5", 404, r#"{"error":"Document not found"}"#);
        let result = load_preview(
            &api(&transport),
            &RecordingBlobUrls::default(),
            ContentSource::Owned(DocId(5)),
            "a.png",
        )
        .await;
        assert_eq!(result.map(|p| p.filename), Err(PreviewError::Api(ApiError::NotFound)));
    }
}
