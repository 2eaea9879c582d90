use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DocId, FileKind};

/// Server-assigned share identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShareId(pub i64);

impl fmt::Display for ShareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of a grant the current user is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareDirection {
    /// Shared with me; the counterpart is the owner.
    Incoming,
    /// Shared by me; the counterpart is the recipient.
    Outgoing,
}

/// One-directional grant from an owner to a recipient.
///
/// `counterpart` is the other user as seen from the listing's
/// [`ShareDirection`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareGrant {
    pub share_id: ShareId,
    pub doc_id: DocId,
    pub filename: String,
    pub shared_date: String,
    pub counterpart: Option<String>,
    pub file_type: Option<String>,
}

impl ShareGrant {
    /// Whether the shared document is an image (thumbnail candidate).
    ///
    /// Share listings usually carry no MIME type, so the filename decides.
    pub fn is_image(&self) -> bool {
        match self.file_type.as_deref() {
            Some(mime) => mime.starts_with("image/"),
            None => FileKind::from_filename(&self.filename) == FileKind::Image,
        }
    }
}

/// Permissions attached to a new grant.
///
/// Viewing is always granted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePermissions {
    pub can_view: bool,
    pub can_download: bool,
    pub can_reshare: bool,
}

impl Default for SharePermissions {
    fn default() -> Self {
        Self {
            can_view: true,
            can_download: false,
            can_reshare: false,
        }
    }
}
