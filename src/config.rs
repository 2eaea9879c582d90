//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the application.
//! The API base URL can be overridden at build time through the
//! `DOCSTORE_API_BASE` environment variable.

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name displayed in the navigation bar.
pub const APP_NAME: &str = "DocStorage";

// =============================================================================
// Network Configuration
// =============================================================================

/// Default API gateway when no build-time override is present.
const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";

/// Base URL of the document/auth/share API gateway.
pub fn api_base_url() -> &'static str {
    option_env!("DOCSTORE_API_BASE").unwrap_or(DEFAULT_API_BASE)
}

/// Fetch request timeout in milliseconds.
pub const FETCH_TIMEOUT_MS: u32 = 10_000;

// =============================================================================
// Session Storage
// =============================================================================

/// localStorage key for the bearer token.
pub const TOKEN_KEY: &str = "token";

/// localStorage key for the serialized user profile.
pub const USER_KEY: &str = "user";

// =============================================================================
// Timing
// =============================================================================

/// Delay between the last keystroke and the search request.
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Lifetime of transient banners (errors, upload results).
pub const BANNER_TIMEOUT_MS: u32 = 3_000;

/// Delay before a successful share dialog closes itself.
pub const SHARE_SUCCESS_DISMISS_MS: u32 = 2_000;

// =============================================================================
// Dashboard Layout
// =============================================================================

/// Number of tiles in the recent files grid (documents plus upload placeholders).
pub const RECENT_TILE_COUNT: usize = 6;

// =============================================================================
// Preview Allow-lists
// =============================================================================

/// Preview allow-lists keyed by extension (lowercase, no dot).
pub mod preview {
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"];
    pub const PDF_EXTENSIONS: &[&str] = &["pdf"];
    pub const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "csv", "json", "log", "xml"];
    /// Text extensions rendered as Markdown instead of plain text.
    pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];
}

// =============================================================================
// Password Policy
// =============================================================================

pub mod password {
    /// Minimum password length.
    pub const MIN_LENGTH: usize = 8;
    /// Characters accepted as the required special character.
    pub const SPECIAL_CHARS: &str = r#"[!@#$%^&*(),.?":{}|<>]"#;
}

// =============================================================================
// UI Configuration
// =============================================================================

/// Icon theme selection.
///
/// Available themes:
/// - `Bootstrap` - Familiar, slightly bolder (default)
/// - `Lucide` - Minimal, thin strokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum IconTheme {
    #[default]
    Bootstrap,
    Lucide,
}

/// Current icon theme used throughout the application.
pub const ICON_THEME: IconTheme = IconTheme::Bootstrap;
