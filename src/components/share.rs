//! Share dialog for one or more documents.

use gloo_timers::future::TimeoutFuture;
use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::SHARE_SUCCESS_DISMISS_MS;
use crate::core::share::{ShareEvent, ShareFailure, SharePhase, ShareRequest, run_share};
use crate::models::{DocumentSummary, SharePermissions};

stylance::import_crate_style!(css, "src/components/dialog.module.css");

#[component]
pub fn ShareDialog(
    /// Documents to share.
    docs: Vec<DocumentSummary>,
    on_close: Callback<()>,
    /// Fired once at least one grant was created.
    on_shared: Callback<()>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let phase = RwSignal::new(SharePhase::Idle);
    let email = RwSignal::new(String::new());
    let can_download = RwSignal::new(false);
    let can_reshare = RwSignal::new(false);

    let doc_ids: Vec<_> = docs.iter().map(|d| d.doc_id).collect();
    let file_list = (docs.len() > 1).then(|| {
        let items = docs
            .iter()
            .map(|d| view! { <li>{d.original_filename.clone()}</li> })
            .collect_view();
        view! { <ul class=css::files>{items}</ul> }
    });
    let title = match docs.as_slice() {
        [single] => format!("Share {}", single.original_filename),
        many => format!("Share {} files", many.len()),
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if phase.with_untracked(SharePhase::is_busy) {
            return;
        }
        let Some(api) = ctx.api() else {
            ctx.invalidate_session();
            return;
        };
        let request = ShareRequest {
            doc_ids: doc_ids.clone(),
            recipient_email: email.get_untracked(),
            permissions: SharePermissions {
                can_view: true,
                can_download: can_download.get_untracked(),
                can_reshare: can_reshare.get_untracked(),
            },
        };
        spawn_local(async move {
            let report = run_share(&api, &request, |p| {
                phase.try_set(p.clone());
            })
            .await;

            if report
                .outcome
                .as_ref()
                .is_some_and(|o| !o.succeeded.is_empty())
            {
                on_shared.run(());
            }

            match report.phase {
                SharePhase::Failed(ShareFailure::SessionExpired) => ctx.invalidate_session(),
                SharePhase::Success => {
                    TimeoutFuture::new(SHARE_SUCCESS_DISMISS_MS).await;
                    // Closed by hand meanwhile.
                    if phase.try_get_untracked() == Some(SharePhase::Success) {
                        phase.set(SharePhase::Success.on(ShareEvent::Dismiss));
                        on_close.run(());
                    }
                }
                _ => {}
            }
        });
    };

    let dismiss = move |_: ev::MouseEvent| phase.update(|p| *p = std::mem::take(p).on(ShareEvent::Dismiss));

    view! {
        <div class=css::backdrop on:click=move |_| on_close.run(())>
            <div
                class=format!("{} {}", css::dialog, css::narrow)
                role="dialog"
                on:click=|ev| ev.stop_propagation()
            >
                <header class=css::header>
                    <h2 class=css::title>{title}</h2>
                    <button class=css::close aria-label="Close" on:click=move |_| on_close.run(())>
                        <Icon icon=ic::CLOSE />
                    </button>
                </header>
                <form class=format!("{} {}", css::body, css::form) on:submit=on_submit>
                    {file_list}
                    <label class=css::field>
                        <span>"Recipient email"</span>
                        <input
                            type="email"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                            disabled=move || phase.with(SharePhase::is_busy)
                        />
                    </label>
                    <fieldset class=css::permissions>
                        <label>
                            <input type="checkbox" checked disabled />
                            " View"
                        </label>
                        <label>
                            <input
                                type="checkbox"
                                prop:checked=move || can_download.get()
                                on:change=move |ev| can_download.set(event_target_checked(&ev))
                            />
                            " Download"
                        </label>
                        <label>
                            <input
                                type="checkbox"
                                prop:checked=move || can_reshare.get()
                                on:change=move |ev| can_reshare.set(event_target_checked(&ev))
                            />
                            " Reshare"
                        </label>
                    </fieldset>
                    {move || match phase.get() {
                        SharePhase::Idle => ().into_any(),
                        SharePhase::Validating => {
                            view! { <p class=css::status>"Looking up recipient..."</p> }.into_any()
                        }
                        SharePhase::Submitting => {
                            view! { <p class=css::status>"Sharing..."</p> }.into_any()
                        }
                        SharePhase::Success => {
                            view! { <p class=css::success><Icon icon=ic::CHECK />" Shared successfully"</p> }.into_any()
                        }
                        SharePhase::Failed(reason) => view! {
                            <p class=css::error>
                                {reason.to_string()} " "
                                <button type="button" class=css::secondary on:click=dismiss>
                                    "Dismiss"
                                </button>
                            </p>
                        }
                        .into_any(),
                    }}
                    <div class=css::actions>
                        <button type="button" class=css::secondary on:click=move |_| on_close.run(())>
                            "Cancel"
                        </button>
                        <button
                            type="submit"
                            class=css::primary
                            disabled=move || phase.with(|p| p.is_busy() || *p == SharePhase::Success)
                        >
                            <Icon icon=ic::SHARE />
                            " Share"
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
