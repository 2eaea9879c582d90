//! HTTP transport seam.
//!
//! [`Transport`] is the only place the client touches the network. The
//! browser implementation goes through `gloo-net` with an abort-based timeout;
//! tests plug in `core::mock::MockTransport`.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use gloo_net::http::{Method as GlooMethod, RequestBuilder};
use gloo_timers::callback::Timeout;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use web_sys::{AbortController, Blob, BlobPropertyBag, FormData};

use crate::config::FETCH_TIMEOUT_MS;
use crate::core::error::FetchError;

/// Object-safe boxed future returned by [`Transport::send`].
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

// =============================================================================
// Request / Response
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// A file picked for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    Empty,
    /// Serialized JSON document.
    Json(String),
    /// `multipart/form-data`; every file goes under the same field name.
    Multipart { field: String, files: Vec<UploadFile> },
}

/// An API request relative to the configured base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path plus query string, starting with `/`.
    pub path: String,
    pub bearer: Option<String>,
    pub body: Body,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            bearer: None,
            body: Body::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn bearer(mut self, token: Option<&str>) -> Self {
        self.bearer = token.map(str::to_owned);
        self
    }

    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        let body = serde_json::to_string(value).map_err(|_| FetchError::RequestCreationFailed)?;
        self.body = Body::Json(body);
        Ok(self)
    }

    pub fn multipart(mut self, field: &str, files: Vec<UploadFile>) -> Self {
        self.body = Body::Multipart {
            field: field.to_string(),
            files,
        };
        self
    }
}

/// A fully buffered response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// MIME type without parameters (`text/plain; charset=utf-8` → `text/plain`).
    pub fn mime(&self) -> Option<String> {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|m| m.trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty())
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Sends requests and buffers their responses.
///
/// Any status code is a successful send; only failures to obtain a response
/// are errors.
pub trait Transport {
    fn send(&self, request: HttpRequest) -> TransportFuture<'_, Result<HttpResponse, FetchError>>;
}

/// Fetch API transport rooted at an API base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrowserTransport {
    base_url: String,
}

impl BrowserTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for BrowserTransport {
    fn default() -> Self {
        Self::new(crate::config::api_base_url())
    }
}

impl Transport for BrowserTransport {
    fn send(&self, request: HttpRequest) -> TransportFuture<'_, Result<HttpResponse, FetchError>> {
        Box::pin(fetch(format!("{}{}", self.base_url, request.path), request))
    }
}

fn gloo_method(method: Method) -> GlooMethod {
    match method {
        Method::Get => GlooMethod::GET,
        Method::Post => GlooMethod::POST,
        Method::Put => GlooMethod::PUT,
        Method::Patch => GlooMethod::PATCH,
        Method::Delete => GlooMethod::DELETE,
    }
}

fn form_data(field: &str, files: &[UploadFile]) -> Result<FormData, FetchError> {
    let form = FormData::new().map_err(|_| FetchError::RequestCreationFailed)?;
    for file in files {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(file.bytes.as_slice()));
        let props = BlobPropertyBag::new();
        props.set_type(&file.mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &props)
            .map_err(|_| FetchError::RequestCreationFailed)?;
        form.append_with_blob_and_filename(field, &blob, &file.name)
            .map_err(|_| FetchError::RequestCreationFailed)?;
    }
    Ok(form)
}

/// Issue one request, aborting it after `FETCH_TIMEOUT_MS`.
async fn fetch(url: String, request: HttpRequest) -> Result<HttpResponse, FetchError> {
    let controller = AbortController::new().map_err(|_| FetchError::RequestCreationFailed)?;
    let signal = controller.signal();

    let mut builder = RequestBuilder::new(&url)
        .method(gloo_method(request.method))
        .abort_signal(Some(&signal));
    if let Some(token) = request.bearer.as_deref() {
        builder = builder.header("Authorization", &format!("Bearer {token}"));
    }

    let prepared = match request.body {
        Body::Empty => builder.build(),
        Body::Json(json) => builder
            .header("Content-Type", "application/json")
            .body(JsValue::from_str(&json)),
        Body::Multipart { field, files } => builder.body(form_data(&field, &files)?),
    }
    .map_err(|_| FetchError::RequestCreationFailed)?;

    let timed_out = Rc::new(Cell::new(false));
    // Dropping the Timeout cancels it, so keep it alive until the body is read.
    let _deadline = {
        let timed_out = Rc::clone(&timed_out);
        Timeout::new(FETCH_TIMEOUT_MS, move || {
            timed_out.set(true);
            controller.abort();
        })
    };

    let response = prepared.send().await.map_err(|e| {
        if timed_out.get() {
            FetchError::Timeout
        } else {
            FetchError::NetworkError(e.to_string())
        }
    })?;

    let status = response.status();
    let content_type = response.headers().get("content-type");
    let body = response.binary().await.map_err(|_| {
        if timed_out.get() {
            FetchError::Timeout
        } else {
            FetchError::ResponseReadFailed
        }
    })?;

    Ok(HttpResponse {
        status,
        content_type,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_strips_parameters() {
        let response = HttpResponse {
            status: 200,
            content_type: Some("Text/Plain; charset=utf-8".into()),
            body: b"hi".to_vec(),
        };
        assert_eq!(response.mime().as_deref(), Some("text/plain"));
        assert_eq!(response.text(), "hi");
    }

    #[test]
    fn test_request_builders() {
        let req = HttpRequest::get("/docs/recent").bearer(Some("abc"));
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.bearer.as_deref(), Some("abc"));
        assert_eq!(req.body, Body::Empty);

        let req = HttpRequest::new(Method::Patch, "/docs/documents/1")
            .json(&serde_json::json!({ "filename": "a.txt" }))
            .unwrap();
        assert_eq!(req.body, Body::Json(r#"{"filename":"a.txt"}"#.into()));
    }

    #[test]
    fn test_success_range() {
        let mut response = HttpResponse {
            status: 201,
            content_type: None,
            body: Vec::new(),
        };
        assert!(response.is_success());
        response.status = 404;
        assert!(!response.is_success());
    }
}
