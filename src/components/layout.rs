//! Page chrome: navigation bar, banner and the landing page.

use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::{AppContext, BannerKind};
use crate::components::icons as ic;
use crate::config::APP_NAME;
use crate::core::auth;
use crate::models::AppRoute;

stylance::import_crate_style!(css, "src/components/layout.module.css");

#[component]
pub fn NavBar(route: Memo<AppRoute>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let link = move |target: AppRoute, label: &'static str, icon: icondata::Icon| {
        view! {
            <a
                href=target.to_hash()
                class=move || if route.get() == target { css::linkActive } else { css::link }
            >
                <Icon icon=icon />
                <span>{label}</span>
            </a>
        }
    };

    let logout = move |_| {
        auth::logout(&AppContext::store());
        ctx.session.set(None);
        AppRoute::Login.push();
    };

    view! {
        <nav class=css::nav>
            <a href=AppRoute::Home.to_hash() class=css::brand>{APP_NAME}</a>
            <Show
                when=move || ctx.session.with(Option::is_some)
                fallback=move || view! {
                    <div class=css::links>
                        {link(AppRoute::Login, "Log in", ic::USER)}
                        {link(AppRoute::Register, "Register", ic::PLUS)}
                    </div>
                }
            >
                <div class=css::links>
                    {link(AppRoute::Dashboard, "Dashboard", ic::HOME)}
                    {link(AppRoute::Files, "Files", ic::FOLDER)}
                    {link(AppRoute::Upload, "Upload", ic::UPLOAD)}
                    {link(AppRoute::Settings, "Settings", ic::SETTINGS)}
                    <button class=css::link on:click=logout>
                        <Icon icon=ic::LOGOUT />
                        <span>"Log out"</span>
                    </button>
                </div>
            </Show>
        </nav>
    }
}

/// Auto-expiring banner from [`AppContext::show_banner`].
#[component]
pub fn BannerView() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    move || {
        ctx.banner.get().map(|banner| {
            let class = match banner.kind {
                BannerKind::Error => css::bannerError,
                BannerKind::Success => css::bannerSuccess,
            };
            view! {
                <div class=class role="status">
                    <span>{banner.message}</span>
                    <button
                        class=css::bannerClose
                        aria-label="Dismiss"
                        on:click=move |_| ctx.dismiss_banner()
                    >
                        <Icon icon=ic::CLOSE />
                    </button>
                </div>
            }
        })
    }
}

#[component]
pub fn Landing() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let signed_in = move || ctx.session.with(Option::is_some);

    view! {
        <section class=css::landing>
            <h1>{APP_NAME}</h1>
            <p>"Store your documents, preview them in the browser and share them with other users."</p>
            <div class=css::landingActions>
                <Show
                    when=signed_in
                    fallback=|| view! {
                        <a class=css::primary href=AppRoute::Login.to_hash()>"Log in"</a>
                        <a class=css::secondary href=AppRoute::Register.to_hash()>"Create an account"</a>
                    }
                >
                    <a class=css::primary href=AppRoute::Dashboard.to_hash()>"Go to dashboard"</a>
                </Show>
            </div>
        </section>
    }
}
