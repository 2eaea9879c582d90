//! Response schemas at the API boundary.
//!
//! The services are loose about shapes: listings come wrapped or bare, ids
//! come as numbers or strings, filenames under several keys. Everything is
//! coerced here into the `models` types so call sites never see raw JSON.

use serde::Deserialize;

use crate::models::{
    DocId, DocumentSummary, ShareDirection, ShareGrant, ShareId, UserId, UserProfile,
};

/// An id sent either as a JSON number or as a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Num(i64),
    Str(String),
}

impl WireId {
    pub fn value(&self) -> Result<i64, String> {
        match self {
            Self::Num(n) => Ok(*n),
            Self::Str(s) => s.trim().parse().map_err(|_| format!("invalid id: {s:?}")),
        }
    }
}

/// `{ "<key>": [...] }` or a bare `[...]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Files { files: Vec<T> },
    Shares { shares: Vec<T> },
    Results { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Files { files } => files,
            Self::Shares { shares } => shares,
            Self::Results { results } => results,
            Self::Bare(items) => items,
        }
    }
}

// =============================================================================
// Documents
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WireDocument {
    pub doc_id: WireId,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
}

impl TryFrom<WireDocument> for DocumentSummary {
    type Error = String;

    fn try_from(wire: WireDocument) -> Result<Self, Self::Error> {
        let original_filename = wire
            .original_filename
            .or(wire.filename)
            .ok_or_else(|| "document without filename".to_string())?;
        Ok(Self {
            doc_id: DocId(wire.doc_id.value()?),
            original_filename,
            upload_date: wire.upload_date.unwrap_or_default(),
            file_type: wire
                .file_type
                .unwrap_or_else(|| "application/octet-stream".into()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WireSearchMetadata {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireSearchHit {
    pub doc_id: WireId,
    pub metadata: WireSearchMetadata,
}

impl TryFrom<WireSearchHit> for DocumentSummary {
    type Error = String;

    fn try_from(wire: WireSearchHit) -> Result<Self, Self::Error> {
        let original_filename = wire
            .metadata
            .filename
            .or(wire.metadata.original_filename)
            .ok_or_else(|| "search hit without filename".to_string())?;
        Ok(Self {
            doc_id: DocId(wire.doc_id.value()?),
            original_filename,
            upload_date: wire.metadata.upload_date.unwrap_or_default(),
            file_type: wire
                .metadata
                .file_type
                .unwrap_or_else(|| "application/octet-stream".into()),
        })
    }
}

// =============================================================================
// Shares
// =============================================================================

/// `SharedDocument` record. Both listings carry `owner_id` and
/// `recipient_id`; shared-by-me also returns revoked grants.
#[derive(Debug, Deserialize)]
pub struct WireShare {
    pub share_id: WireId,
    pub doc_id: WireId,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub shared_date: Option<String>,
    #[serde(default)]
    pub owner_id: Option<WireId>,
    #[serde(default)]
    pub recipient_id: Option<WireId>,
    #[serde(default)]
    pub recipient_email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
}

impl WireShare {
    /// Missing status counts as active.
    pub fn is_active(&self) -> bool {
        self.status.as_deref().is_none_or(|s| s == "active")
    }

    pub fn into_grant(self, direction: ShareDirection) -> Result<ShareGrant, String> {
        let filename = self
            .original_filename
            .or(self.filename)
            .or(self.display_name)
            .ok_or_else(|| "share without filename".to_string())?;
        let id_text =
            |id: Option<WireId>| id.and_then(|id| id.value().ok()).map(|id| id.to_string());
        let counterpart = match direction {
            ShareDirection::Outgoing => self.recipient_email.or_else(|| id_text(self.recipient_id)),
            ShareDirection::Incoming => id_text(self.owner_id),
        };

        Ok(ShareGrant {
            share_id: ShareId(self.share_id.value()?),
            doc_id: DocId(self.doc_id.value()?),
            filename,
            shared_date: self.shared_date.unwrap_or_default(),
            counterpart,
            file_type: self.file_type,
        })
    }
}

/// Active grants of a share listing, seen from `direction`.
pub fn active_grants(
    items: Vec<WireShare>,
    direction: ShareDirection,
) -> Result<Vec<ShareGrant>, String> {
    items
        .into_iter()
        .filter(WireShare::is_active)
        .map(|wire| wire.into_grant(direction))
        .collect()
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WireUser {
    pub user_id: WireId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl TryFrom<WireUser> for UserProfile {
    type Error = String;

    fn try_from(wire: WireUser) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId(wire.user_id.value()?),
            first_name: wire.first_name,
            last_name: wire.last_name,
            email: wire.email,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WireLogin {
    pub token: String,
    pub user: WireUser,
}

#[derive(Debug, Deserialize)]
pub struct WireProfileUpdate {
    pub user: WireUser,
}

#[derive(Debug, Deserialize)]
pub struct WireLookup {
    pub user_id: WireId,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireUpload {
    #[serde(default)]
    pub errors: Vec<String>,
}

/// `{ "error": ... }` or `{ "message": ... }`.
#[derive(Debug, Default, Deserialize)]
pub struct WireErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl WireErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}

/// Convert every item, failing on the first malformed one.
pub fn convert_all<W, T>(items: Vec<W>) -> Result<Vec<T>, String>
where
    T: TryFrom<W, Error = String>,
{
    items.into_iter().map(T::try_from).collect()
}
