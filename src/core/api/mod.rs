//! Typed client for the document, auth, share and search services.
//!
//! Every method builds one [`HttpRequest`], sends it through the configured
//! [`Transport`] and maps the response through [`wire`] schemas. Status
//! handling is uniform: 401/403 become [`ApiError::SessionExpired`], 404
//! becomes [`ApiError::NotFound`], other failures carry the server message.

pub mod wire;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::error::ApiError;
use crate::core::transport::{HttpRequest, HttpResponse, Method, Transport, UploadFile};
use crate::models::{
    DocId, DocumentSummary, Session, ShareDirection, ShareGrant, ShareId, SharePermissions,
    UserId, UserProfile,
};
use wire::{Listing, WireErrorBody, convert_all};

/// Binary payload of a document or thumbnail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentBlob {
    pub bytes: Vec<u8>,
    /// Response MIME type, without parameters.
    pub mime: Option<String>,
}

/// Result of a multipart upload that the server accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    Complete,
    /// At least one file was stored; the rest failed with these messages.
    Partial(Vec<String>),
}

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// Registration form as sent to `/auth/register`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Profile update form as sent to `/auth/update-profile`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
struct RenameBody<'a> {
    filename: &'a str,
}

#[derive(Debug, Serialize)]
struct ShareBody<'a> {
    doc_id: DocId,
    recipient_id: UserId,
    recipient_email: &'a str,
    permissions: SharePermissions,
}

// =============================================================================
// Client
// =============================================================================

/// API client, optionally bound to a bearer token.
#[derive(Clone, Debug)]
pub struct ApiClient<T> {
    transport: T,
    token: Option<String>,
}

impl<T: Transport> ApiClient<T> {
    /// Unauthenticated client (login/register).
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            token: None,
        }
    }

    /// Client that sends `session`'s token with every request.
    pub fn for_session(transport: T, session: &Session) -> Self {
        Self {
            transport,
            token: Some(session.token.clone()),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let request = request.bearer(self.token.as_deref());
        let response = self.transport.send(request).await?;
        if response.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<WireErrorBody>()
            .ok()
            .and_then(WireErrorBody::into_message)
            .unwrap_or_default();
        Err(match response.status {
            401 | 403 => ApiError::SessionExpired,
            404 => ApiError::NotFound,
            status => ApiError::Http { status, message },
        })
    }

    async fn send_json<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        let response = self.send(request).await?;
        response
            .json::<R>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_blob(&self, request: HttpRequest) -> Result<ContentBlob, ApiError> {
        let response = self.send(request).await?;
        let mime = response.mime();
        Ok(ContentBlob {
            bytes: response.body,
            mime,
        })
    }

    async fn documents(&self, path: &str) -> Result<Vec<DocumentSummary>, ApiError> {
        let listing: Listing<wire::WireDocument> = self.send_json(HttpRequest::get(path)).await?;
        convert_all(listing.into_items()).map_err(ApiError::Decode)
    }

    async fn shares(
        &self,
        path: &str,
        direction: ShareDirection,
    ) -> Result<Vec<ShareGrant>, ApiError> {
        let listing: Listing<wire::WireShare> = self.send_json(HttpRequest::get(path)).await?;
        wire::active_grants(listing.into_items(), direction).map_err(ApiError::Decode)
    }

    fn json_request<B: Serialize>(
        method: Method,
        path: impl Into<String>,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(method, path).json(body)?)
    }

    // -------------------------------------------------------------------------
    // Auth
    // -------------------------------------------------------------------------

    /// `POST /auth/login` → session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let request =
            Self::json_request(Method::Post, "/auth/login", &LoginBody { email, password })?;
        let login: wire::WireLogin = self.send_json(request).await?;
        if login.token.is_empty() {
            return Err(ApiError::Decode("empty token".into()));
        }
        Ok(Session {
            user: UserProfile::try_from(login.user).map_err(ApiError::Decode)?,
            token: login.token,
        })
    }

    /// `POST /auth/register`.
    pub async fn register(&self, form: &Registration) -> Result<(), ApiError> {
        let request = Self::json_request(Method::Post, "/auth/register", form)?;
        self.send(request).await.map(|_| ())
    }

    /// `PUT /auth/update-profile` → refreshed profile.
    pub async fn update_profile(&self, form: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let request = Self::json_request(Method::Put, "/auth/update-profile", form)?;
        let updated: wire::WireProfileUpdate = self.send_json(request).await?;
        UserProfile::try_from(updated.user).map_err(ApiError::Decode)
    }

    /// `GET /auth/users/lookup?email=` → recipient id.
    pub async fn lookup_user(&self, email: &str) -> Result<UserId, ApiError> {
        let path = format!("/auth/users/lookup?email={}", urlencoding::encode(email));
        let found: wire::WireLookup = self.send_json(HttpRequest::get(path)).await?;
        found.user_id.value().map(UserId).map_err(ApiError::Decode)
    }

    // -------------------------------------------------------------------------
    // Documents
    // -------------------------------------------------------------------------

    /// `GET /docs/recent`.
    pub async fn list_recent(&self) -> Result<Vec<DocumentSummary>, ApiError> {
        self.documents("/docs/recent").await
    }

    /// `GET /docs/documents`.
    pub async fn list_documents(&self) -> Result<Vec<DocumentSummary>, ApiError> {
        self.documents("/docs/documents").await
    }

    /// `GET /docs/file/{id}`.
    pub async fn fetch_content(&self, id: DocId) -> Result<ContentBlob, ApiError> {
        self.send_blob(HttpRequest::get(format!("/docs/file/{id}")))
            .await
    }

    /// `GET /docs/file/{id}/thumbnail`.
    pub async fn fetch_thumbnail(&self, id: DocId) -> Result<ContentBlob, ApiError> {
        self.send_blob(HttpRequest::get(format!("/docs/file/{id}/thumbnail")))
            .await
    }

    /// `PATCH /docs/documents/{id}` with the new filename.
    pub async fn rename_document(&self, id: DocId, filename: &str) -> Result<(), ApiError> {
        let request = Self::json_request(
            Method::Patch,
            format!("/docs/documents/{id}"),
            &RenameBody { filename },
        )?;
        self.send(request).await.map(|_| ())
    }

    /// `DELETE /docs/documents/{id}`.
    pub async fn delete_document(&self, id: DocId) -> Result<(), ApiError> {
        self.send(HttpRequest::new(Method::Delete, format!("/docs/documents/{id}")))
            .await
            .map(|_| ())
    }

    /// `POST /docs/upload`, multipart field `files[]`.
    pub async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadOutcome, ApiError> {
        let request = HttpRequest::new(Method::Post, "/docs/upload").multipart("files[]", files);
        let response = self.send(request).await?;
        let body: wire::WireUpload = response.json().unwrap_or_default();
        if body.errors.is_empty() {
            Ok(UploadOutcome::Complete)
        } else {
            Ok(UploadOutcome::Partial(body.errors))
        }
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// `GET /search?q=`.
    pub async fn search(&self, query: &str) -> Result<Vec<DocumentSummary>, ApiError> {
        let path = format!("/search?q={}", urlencoding::encode(query));
        let listing: Listing<wire::WireSearchHit> =
            self.send_json(HttpRequest::get(path)).await?;
        convert_all(listing.into_items()).map_err(ApiError::Decode)
    }

    // -------------------------------------------------------------------------
    // Shares
    // -------------------------------------------------------------------------

    /// `POST /share` for one document.
    pub async fn create_share(
        &self,
        doc_id: DocId,
        recipient_id: UserId,
        recipient_email: &str,
        permissions: SharePermissions,
    ) -> Result<(), ApiError> {
        let body = ShareBody {
            doc_id,
            recipient_id,
            recipient_email,
            permissions,
        };
        let request = Self::json_request(Method::Post, "/share", &body)?;
        self.send(request).await.map(|_| ())
    }

    /// `DELETE /share/{id}`.
    pub async fn revoke_share(&self, id: ShareId) -> Result<(), ApiError> {
        self.send(HttpRequest::new(Method::Delete, format!("/share/{id}")))
            .await
            .map(|_| ())
    }

    /// `GET /share/shared-with-me`, active grants only.
    pub async fn shared_with_me(&self) -> Result<Vec<ShareGrant>, ApiError> {
        self.shares("/share/shared-with-me", ShareDirection::Incoming)
            .await
    }

    /// `GET /share/shared-by-me`. Revoked grants are filtered out here.
    pub async fn shared_by_me(&self) -> Result<Vec<ShareGrant>, ApiError> {
        self.shares("/share/shared-by-me", ShareDirection::Outgoing)
            .await
    }

    /// `GET /share/content/{id}`.
    pub async fn fetch_shared_content(&self, id: ShareId) -> Result<ContentBlob, ApiError> {
        self.send_blob(HttpRequest::get(format!("/share/content/{id}")))
            .await
    }

    /// `GET /share/preview/{id}/thumbnail`.
    pub async fn fetch_shared_thumbnail(&self, id: ShareId) -> Result<ContentBlob, ApiError> {
        self.send_blob(HttpRequest::get(format!("/share/preview/{id}/thumbnail")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FetchError;
    use crate::core::mock::{MockTransport, session, shares_json};

    #[tokio::test]
    async fn test_bearer_attached() {
        let transport = MockTransport::new();
        transport.respond_json("/docs/recent", 200, r#"{"files":[]}"#);
        let api = ApiClient::for_session(transport.clone(), &session());

        let docs = api.list_recent().await.unwrap();
        assert!(docs.is_empty());

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].bearer.as_deref(), Some("secret-token"));
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let transport = MockTransport::new();
        transport.respond_json("/docs/recent", 401, r#"{"error":"Unauthorized"}"#);
        transport.respond_json("/docs/file/1", 404, r#"{"error":"Document not found"}"#);
        transport.respond_json("/docs/documents", 500, r#"{"error":"db down"}"#);
        let api = ApiClient::for_session(transport, &session());

        assert_eq!(api.list_recent().await, Err(ApiError::SessionExpired));
        assert_eq!(api.fetch_content(DocId(1)).await, Err(ApiError::NotFound));
        assert_eq!(
            api.list_documents().await,
            Err(ApiError::Http {
                status: 500,
                message: "db down".into()
            })
        );
    }

    #[tokio::test]
    async fn test_network_error_passthrough() {
        let transport = MockTransport::new();
        transport.fail("/docs/recent", FetchError::Timeout);
        let api = ApiClient::for_session(transport, &session());
        assert_eq!(
            api.list_recent().await,
            Err(ApiError::Network(FetchError::Timeout))
        );
    }

    #[tokio::test]
    async fn test_login_builds_session() {
        let transport = MockTransport::new();
        transport.respond_json(
            "/auth/login",
            200,
            r#"{"token":"tok","user":{"user_id":4,"first_name":"Ada","last_name":"L","email":"ada@example.com"}}"#,
        );
        let api = ApiClient::new(transport.clone());
        let session = api.login("ada@example.com", "pw").await.unwrap();
        assert_eq!(session.token, "tok");
        assert_eq!(session.user.user_id, UserId(4));
        assert_eq!(transport.requests()[0].bearer, None);
    }

    #[tokio::test]
    async fn test_search_query_is_encoded() {
        let transport = MockTransport::new();
        transport.respond_json("/search?q=q%20%26%20a", 200, r#"{"results":[]}"#);
        let api = ApiClient::for_session(transport.clone(), &session());
        api.search("q & a").await.unwrap();
        assert_eq!(transport.requests()[0].path, "/search?q=q%20%26%20a");
    }

    #[tokio::test]
    async fn test_blob_keeps_mime() {
        let transport = MockTransport::new();
        transport.respond_bytes("/docs/file/2", 200, "image/png", vec![1, 2, 3]);
        let api = ApiClient::for_session(transport, &session());
        let blob = api.fetch_content(DocId(2)).await.unwrap();
        assert_eq!(blob.bytes, vec![1, 2, 3]);
        assert_eq!(blob.mime.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_upload_partial() {
        let transport = MockTransport::new();
        transport.respond_json("/docs/upload", 201, r#"{"errors":["b.exe: File type not allowed"]}"#);
        let api = ApiClient::for_session(transport, &session());
        let outcome = api
            .upload(vec![UploadFile {
                name: "a.txt".into(),
                mime: "text/plain".into(),
                bytes: b"a".to_vec(),
            }])
            .await
            .unwrap();
        assert_eq!(
            outcome,
            UploadOutcome::Partial(vec!["b.exe: File type not allowed".into()])
        );
    }

    #[tokio::test]
    async fn test_share_listings_name_the_other_user() {
        let transport = MockTransport::new();
        transport.respond_json(
            "/share/shared-by-me",
            200,
            &shares_json(1, 2, &[(7, 3, "plan.pdf", "active")]),
        );
        transport.respond_json(
            "/share/shared-with-me",
            200,
            &shares_json(5, 1, &[(8, 4, "photo.png", "active")]),
        );
        let api = ApiClient::for_session(transport, &session());

        let by_me = api.shared_by_me().await.unwrap();
        assert_eq!(by_me[0].counterpart.as_deref(), Some("2"));
        let with_me = api.shared_with_me().await.unwrap();
        assert_eq!(with_me[0].counterpart.as_deref(), Some("5"));
        assert!(with_me[0].is_image());
    }

    #[tokio::test]
    async fn test_revoke_then_listing_omits_grant() {
        let transport = MockTransport::new();
        transport.respond_method(Method::Delete, "/share/7", 200, r#"{"message":"Share revoked"}"#);
        transport.respond_json(
            "/share/shared-by-me",
            200,
            &shares_json(1, 2, &[(7, 3, "plan.pdf", "revoked"), (9, 4, "memo.txt", "active")]),
        );
        let api = ApiClient::for_session(transport.clone(), &session());

        api.revoke_share(ShareId(7)).await.unwrap();
        assert_eq!(transport.count(Method::Delete, "/share/7"), 1);

        let listed: Vec<_> = api
            .shared_by_me()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.share_id)
            .collect();
        assert_eq!(listed, vec![ShareId(9)]);
    }

    #[tokio::test]
    async fn test_revoke_unknown_share() {
        let transport = MockTransport::new();
        transport.respond_method(Method::Delete, "/share/7", 404, r#"{"error":"Share not found"}"#);
        let api = ApiClient::for_session(transport, &session());
        assert_eq!(api.revoke_share(ShareId(7)).await, Err(ApiError::NotFound));
    }
}
