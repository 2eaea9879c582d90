//! UI components built with Leptos.
//!
//! - [`router`] - Application routing (main entry point)
//! - [`layout`] - Navigation bar, banner and landing page
//! - [`auth`] - Login, registration and settings forms
//! - [`dashboard`] - Recent files, search and share lists
//! - [`files`] - File browser with bulk actions
//! - [`upload`] - Multi-file upload form
//! - [`preview`] / [`share`] - Modal dialogs
//! - [`icons`] - Centralized icon definitions (change theme here)

pub mod auth;
pub mod dashboard;
pub mod files;
pub mod icons;
pub mod layout;
pub mod preview;
pub mod router;
pub mod share;
pub mod thumbs;
pub mod upload;

pub use router::AppRouter;
