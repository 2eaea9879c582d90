//! Application router component.
//!
//! Hash routing over native `hashchange` events. The URL hash is the source
//! of truth; protected pages render only with a session, and the auth pages
//! bounce signed-in users to the dashboard.

use leptos::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::Closure;

use crate::app::AppContext;
use crate::components::auth::{LoginPage, RegisterPage, SettingsPage};
use crate::components::dashboard::DashboardPage;
use crate::components::files::FilesPage;
use crate::components::layout::{BannerView, Landing, NavBar};
use crate::components::upload::UploadPage;
use crate::models::AppRoute;

/// Main application router.
///
/// - `#/` → landing
/// - `#/login`, `#/register` → auth forms
/// - `#/dashboard`, `#/files`, `#/upload`, `#/settings` → session required
#[component]
pub fn AppRouter() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let route = RwSignal::new(AppRoute::current());

    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        let closure = Closure::wrap(Box::new(move || {
            route.set(AppRoute::current());
        }) as Box<dyn Fn()>);

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
        }

        // Keep the closure alive for the lifetime of the app
        closure.forget();
    }

    // Session guard: structural check only, the API rejects stale tokens.
    Effect::new(move |_| {
        let signed_in = ctx.session.with(Option::is_some);
        match route.get() {
            r if r.is_protected() && !signed_in => AppRoute::Login.push(),
            AppRoute::Login | AppRoute::Register if signed_in => AppRoute::Dashboard.push(),
            _ => {}
        }
    });

    let page = Memo::new(move |_| {
        let r = route.get();
        let signed_in = ctx.session.with(Option::is_some);
        if r.is_protected() && !signed_in {
            AppRoute::Login
        } else {
            r
        }
    });

    view! {
        <NavBar route=page />
        <BannerView />
        <main>
            {move || match page.get() {
                AppRoute::Home => view! { <Landing /> }.into_any(),
                AppRoute::Login => view! { <LoginPage /> }.into_any(),
                AppRoute::Register => view! { <RegisterPage /> }.into_any(),
                AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
                AppRoute::Files => view! { <FilesPage /> }.into_any(),
                AppRoute::Upload => view! { <UploadPage /> }.into_any(),
                AppRoute::Settings => view! { <SettingsPage /> }.into_any(),
            }}
        </main>
    }
}
