//! Utility modules for DOM access and display formatting.
//!
//! Provides:
//! - [`dom`] - window, localStorage, confirm dialog, hash navigation
//! - [`format_date`] - server timestamps to `YYYY-MM-DD`
//! - [`markdown_to_html`] - Markdown rendering with XSS sanitization
//! - [`normalize_filename`], [`dedupe_by`] - duplicate filename detection

pub mod dom;
pub mod format;
mod markdown;
mod normalize;

pub use format::{format_date, parse_timestamp};
pub use markdown::markdown_to_html;
pub use normalize::{dedupe_by, normalize_filename};
