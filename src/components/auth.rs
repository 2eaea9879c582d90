//! Login, registration and profile settings forms.

use leptos::{ev, prelude::*};
use wasm_bindgen_futures::spawn_local;

use crate::app::{AppContext, BannerKind};
use crate::core::api::{ProfileUpdate, Registration};
use crate::core::auth;
use crate::models::AppRoute;

stylance::import_crate_style!(css, "src/components/auth.module.css");

/// Labeled text input bound to `value`.
#[component]
fn Field(
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")] kind: &'static str,
    #[prop(default = true)] required: bool,
) -> impl IntoView {
    view! {
        <label class=css::field>
            <span>{label}</span>
            <input
                type=kind
                required=required
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </label>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        error.set(None);
        busy.set(true);
        let (email, password) = (email.get_untracked(), password.get_untracked());
        spawn_local(async move {
            let api = AppContext::public_api();
            match auth::login(&api, &AppContext::store(), &email, &password).await {
                Ok(session) => {
                    ctx.sign_in(session);
                    AppRoute::Dashboard.push();
                }
                Err(e) => error.set(Some(e.user_message())),
            }
            busy.set(false);
        });
    };

    view! {
        <section class=css::card>
            <h1>"Log in"</h1>
            <form class=css::form on:submit=on_submit>
                {move || error.get().map(|e| view! { <p class=css::error>{e}</p> })}
                <Field label="Email" value=email kind="email" />
                <Field label="Password" value=password kind="password" />
                <button class=css::submit type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Logging in..." } else { "Log in" }}
                </button>
            </form>
            <p class=css::alt>
                "No account yet? " <a href=AppRoute::Register.to_hash()>"Register"</a>
            </p>
        </section>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let first_name = RwSignal::new(String::new());
    let last_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirmation = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        error.set(None);
        busy.set(true);
        let form = Registration {
            first_name: first_name.get_untracked(),
            last_name: last_name.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            password_confirmation: confirmation.get_untracked(),
        };
        spawn_local(async move {
            let api = AppContext::public_api();
            match auth::register(&api, &AppContext::store(), &form).await {
                Ok(session) => {
                    ctx.sign_in(session);
                    AppRoute::Dashboard.push();
                }
                Err(e) => error.set(Some(e.user_message())),
            }
            busy.set(false);
        });
    };

    view! {
        <section class=css::card>
            <h1>"Create an account"</h1>
            <form class=css::form on:submit=on_submit>
                {move || error.get().map(|e| view! { <p class=css::error>{e}</p> })}
                <Field label="First name" value=first_name />
                <Field label="Last name" value=last_name />
                <Field label="Email" value=email kind="email" />
                <Field label="Password" value=password kind="password" />
                <Field label="Confirm password" value=confirmation kind="password" />
                <p class=css::hint>
                    "At least 8 characters with upper and lower case letters, a number and a special character."
                </p>
                <button class=css::submit type="submit" disabled=move || busy.get()>
                    "Register"
                </button>
            </form>
            <p class=css::alt>
                "Already registered? " <a href=AppRoute::Login.to_hash()>"Log in"</a>
            </p>
        </section>
    }
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let user = ctx.session.with_untracked(|s| s.as_ref().map(|s| s.user.clone()));

    let first_name = RwSignal::new(user.as_ref().map(|u| u.first_name.clone()).unwrap_or_default());
    let last_name = RwSignal::new(user.as_ref().map(|u| u.last_name.clone()).unwrap_or_default());
    let email = RwSignal::new(user.map(|u| u.email).unwrap_or_default());
    let old_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let Some(api) = ctx.api() else {
            ctx.invalidate_session();
            return;
        };
        error.set(None);
        busy.set(true);
        let form = ProfileUpdate {
            first_name: first_name.get_untracked(),
            last_name: last_name.get_untracked(),
            email: email.get_untracked(),
            old_password: old_password.get_untracked(),
            new_password: new_password.get_untracked(),
            confirm_password: confirm_password.get_untracked(),
        };
        spawn_local(async move {
            match auth::update_profile(&api, &AppContext::store(), &form).await {
                Ok(user) => {
                    ctx.update_user(user);
                    old_password.set(String::new());
                    new_password.set(String::new());
                    confirm_password.set(String::new());
                    ctx.show_banner(BannerKind::Success, "Profile updated");
                }
                Err(e) if e.is_session_expired() => ctx.invalidate_session(),
                Err(e) => error.set(Some(e.user_message())),
            }
            busy.set(false);
        });
    };

    view! {
        <section class=css::card>
            <h1>"Settings"</h1>
            <form class=css::form on:submit=on_submit>
                {move || error.get().map(|e| view! { <p class=css::error>{e}</p> })}
                <h2>"Profile"</h2>
                <Field label="First name" value=first_name />
                <Field label="Last name" value=last_name />
                <Field label="Email" value=email kind="email" />
                <Field label="Current password" value=old_password kind="password" />
                <h2>"Change password (optional)"</h2>
                <Field label="New password" value=new_password kind="password" required=false />
                <Field label="Confirm new password" value=confirm_password kind="password" required=false />
                <button class=css::submit type="submit" disabled=move || busy.get()>
                    "Save changes"
                </button>
            </form>
        </section>
    }
}
