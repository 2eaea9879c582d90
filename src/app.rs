//! Root application module.
//!
//! Contains the main App component and the [`AppContext`] every view reads
//! its session, API client and banner from.

use std::sync::atomic::{AtomicU64, Ordering};

use gloo_timers::future::TimeoutFuture;
use leptos::logging::log;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::components::AppRouter;
use crate::config::BANNER_TIMEOUT_MS;
use crate::core::api::ApiClient;
use crate::core::session::{LocalStore, SessionStore};
use crate::core::transport::BrowserTransport;
use crate::core::upload::UploadFlash;
use crate::models::{AppRoute, Session};

// ============================================================================
// Banner
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Success,
}

/// Transient message at the top of the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    id: u64,
    pub kind: BannerKind,
    pub message: String,
}

static NEXT_BANNER: AtomicU64 = AtomicU64::new(1);

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// The session signal is the single source of truth for authentication; it
/// is written only through [`AppContext::sign_in`], [`AppContext::update_user`]
/// and [`AppContext::invalidate_session`], which keep storage in step.
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Logged-in session, `None` when signed out.
    pub session: RwSignal<Option<Session>>,

    /// Current page banner.
    pub banner: RwSignal<Option<Banner>>,

    /// Result of the last upload, shown once on the dashboard.
    pub upload_flash: RwSignal<Option<UploadFlash>>,
}

impl AppContext {
    /// Restore the stored session, if it is well formed.
    pub fn new() -> Self {
        let session = match Self::store().load() {
            Ok(session) => Some(session),
            Err(e) => {
                log!("[app] starting signed out: {}", e);
                None
            }
        };
        Self {
            session: RwSignal::new(session),
            banner: RwSignal::new(None),
            upload_flash: RwSignal::new(None),
        }
    }

    pub fn store() -> SessionStore<LocalStore> {
        SessionStore::new(LocalStore)
    }

    /// Unauthenticated client for login and registration.
    pub fn public_api() -> ApiClient<BrowserTransport> {
        ApiClient::new(BrowserTransport::default())
    }

    /// Client bound to the current token.
    pub fn api(&self) -> Option<ApiClient<BrowserTransport>> {
        self.session
            .with_untracked(|s| s.as_ref().map(|s| ApiClient::for_session(BrowserTransport::default(), s)))
    }

    pub fn sign_in(&self, session: Session) {
        self.session.set(Some(session));
    }

    pub fn update_user(&self, user: crate::models::UserProfile) {
        self.session.update(|s| {
            if let Some(s) = s {
                s.user = user;
            }
        });
    }

    /// Clear the stored session and go to the login page.
    pub fn invalidate_session(&self) {
        Self::store().clear();
        self.session.set(None);
        AppRoute::Login.push();
    }

    /// Show `message` for a few seconds.
    pub fn show_banner(&self, kind: BannerKind, message: impl Into<String>) {
        let id = NEXT_BANNER.fetch_add(1, Ordering::Relaxed);
        self.banner.set(Some(Banner {
            id,
            kind,
            message: message.into(),
        }));

        let banner = self.banner;
        spawn_local(async move {
            TimeoutFuture::new(BANNER_TIMEOUT_MS).await;
            if banner.try_with_untracked(|b| b.as_ref().map(|b| b.id)) == Some(Some(id)) {
                banner.set(None);
            }
        });
    }

    pub fn show_error(&self, message: impl Into<String>) {
        self.show_banner(BannerKind::Error, message);
    }

    pub fn dismiss_banner(&self) {
        self.banner.set(None);
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Root application component with error boundary.
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div style="
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    justify-content: center;
                    height: 100vh;
                    padding: 2rem;
                    background: #f5f7fb;
                    color: #1f2a44;
                    font-family: system-ui, sans-serif;
                ">
                    <div style="max-width: 600px; text-align: center;">
                        <h1 style="color: #c0392b; margin-bottom: 1rem;">
                            "Something went wrong"
                        </h1>
                        <p style="color: #5c6b80; margin-bottom: 2rem;">
                            "An unexpected error occurred. Please try reloading the page."
                        </p>
                        <details style="
                            text-align: left;
                            background: #ffffff;
                            padding: 1rem;
                            border-radius: 4px;
                            margin-bottom: 1rem;
                        ">
                            <summary style="cursor: pointer; color: #5c6b80;">
                                "Error details"
                            </summary>
                            <ul style="margin: 1rem 0 0 0; padding-left: 1.5rem; color: #c0392b;">
                                {move || errors.get()
                                    .into_iter()
                                    .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                                    .collect::<Vec<_>>()
                                }
                            </ul>
                        </details>
                        <button
                            on:click=move |_| {
                                if let Some(window) = web_sys::window() {
                                    let _ = window.location().reload();
                                }
                            }
                            style="
                                background: #1f2a44;
                                color: white;
                                border: none;
                                padding: 0.75rem 2rem;
                                border-radius: 4px;
                                cursor: pointer;
                            "
                        >
                            "Reload Page"
                        </button>
                    </div>
                </div>
            }
        >
            <AppRouter />
        </ErrorBoundary>
    }
}
