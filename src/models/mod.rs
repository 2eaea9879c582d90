//! Data models and types for the application.
//!
//! Contains domain types for:
//! - [`DocumentSummary`], [`DocId`], [`FileKind`] - Document listings
//! - [`ShareGrant`], [`ShareDirection`], [`SharePermissions`] - Sharing between users
//! - [`Session`], [`UserProfile`] - The logged-in user
//! - [`AppRoute`] - Hash-based navigation

mod document;
mod route;
mod session;
mod share;

pub use document::{DocId, DocumentSummary, FileKind, extension_of};
pub use route::AppRoute;
pub use session::{Session, UserId, UserProfile};
pub use share::{ShareDirection, ShareGrant, ShareId, SharePermissions};
