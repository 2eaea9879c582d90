//! Preview dialog.
//!
//! [`PreviewState`] owns the view's single [`PreviewSlot`]; opening another
//! document or closing the dialog releases the previous object URL.

use leptos::logging::log;
use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::core::blob::BrowserBlobUrls;
use crate::core::error::{ApiError, PreviewError};
use crate::core::preview::{
    BrowserPrompter, BrowserSaver, ContentSource, OpenIntent, Opened, PreviewBody, PreviewSlot,
    open_document,
};

stylance::import_crate_style!(css, "src/components/dialog.module.css");
stylance::import_crate_style!(md_css, "src/components/markdown.module.css");

/// Renderable snapshot of the active preview.
#[derive(Clone, Debug, PartialEq)]
enum Shown {
    Image { filename: String, url: String },
    Pdf { filename: String, url: String },
    Text { filename: String, text: String },
    Markdown { filename: String, html: String },
}

#[derive(Clone, Copy)]
pub struct PreviewState {
    slot: RwSignal<PreviewSlot<BrowserBlobUrls>>,
    /// Filename of a load in progress.
    pending: RwSignal<Option<String>>,
}

impl PreviewState {
    pub fn new() -> Self {
        let state = Self {
            slot: RwSignal::new(PreviewSlot::default()),
            pending: RwSignal::new(None),
        };
        let slot = state.slot;
        on_cleanup(move || {
            slot.try_update_untracked(PreviewSlot::close);
        });
        state
    }

    /// Preview `filename`, or offer to download it if it is not previewable.
    pub fn open(self, ctx: AppContext, source: ContentSource, filename: String) {
        let Some(api) = ctx.api() else {
            ctx.invalidate_session();
            return;
        };

        let ticket = match OpenIntent::for_filename(&filename) {
            OpenIntent::Preview(_) => {
                self.pending.set(Some(filename.clone()));
                self.slot.try_update(PreviewSlot::begin)
            }
            OpenIntent::ConfirmDownload => None,
        };

        let Self { slot, pending } = self;
        spawn_local(async move {
            let opened = open_document(
                &api,
                &BrowserBlobUrls,
                &BrowserPrompter,
                &BrowserSaver,
                source,
                &filename,
            )
            .await;

            let current = ticket.is_some_and(|t| {
                slot.try_with_untracked(|s| s.is_current(t)) == Some(true)
            });
            if current {
                pending.try_set(None);
            }

            match opened {
                Ok(Opened::Preview(preview)) => {
                    if let Some(ticket) = ticket {
                        slot.try_update(|s| s.complete(ticket, preview));
                    }
                }
                Ok(Opened::Downloaded | Opened::Declined) => {}
                Err(e) if e.is_session_expired() => ctx.invalidate_session(),
                Err(PreviewError::Api(ApiError::NotFound)) => {
                    log!("[preview] {} no longer exists", filename);
                }
                Err(e) => {
                    if current || ticket.is_none() {
                        ctx.show_error(format!("Could not open {filename}: {e}"));
                    }
                }
            }
        });
    }

    pub fn close(self) {
        self.pending.set(None);
        self.slot.update(PreviewSlot::close);
    }

    fn shown(self) -> Option<Shown> {
        self.slot.with(|slot| {
            slot.active().map(|p| {
                let filename = p.filename.clone();
                match &p.body {
                    PreviewBody::Image(h) => Shown::Image {
                        filename,
                        url: h.url().to_string(),
                    },
                    PreviewBody::Pdf(h) => Shown::Pdf {
                        filename,
                        url: h.url().to_string(),
                    },
                    PreviewBody::Text(text) => Shown::Text {
                        filename,
                        text: text.clone(),
                    },
                    PreviewBody::Markdown(html) => Shown::Markdown {
                        filename,
                        html: html.clone(),
                    },
                }
            })
        })
    }
}

impl Default for PreviewState {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn PreviewDialog(state: PreviewState) -> impl IntoView {
    let shown = Memo::new(move |_| state.shown());
    let open = move || shown.with(Option::is_some) || state.pending.with(Option::is_some);

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Escape" {
            state.close();
        }
    };

    view! {
        <Show when=open>
            <div class=css::backdrop on:click=move |_| state.close()>
                <div
                    class=css::dialog
                    role="dialog"
                    tabindex="-1"
                    on:click=|ev| ev.stop_propagation()
                    on:keydown=on_keydown
                >
                    <header class=css::header>
                        <h2 class=css::title>
                            {move || match shown.get() {
                                Some(
                                    Shown::Image { filename, .. }
                                    | Shown::Pdf { filename, .. }
                                    | Shown::Text { filename, .. }
                                    | Shown::Markdown { filename, .. },
                                ) => filename,
                                None => state.pending.get().unwrap_or_default(),
                            }}
                        </h2>
                        <button class=css::close aria-label="Close" on:click=move |_| state.close()>
                            <Icon icon=ic::CLOSE />
                        </button>
                    </header>
                    <div class=css::body>
                        {move || match shown.get() {
                            None => view! { <p class=css::loading>"Loading preview..."</p> }.into_any(),
                            Some(Shown::Image { filename, url }) => view! {
                                <img class=css::image src=url alt=filename />
                            }.into_any(),
                            Some(Shown::Pdf { filename, url }) => view! {
                                <iframe class=css::pdf src=url title=filename></iframe>
                            }.into_any(),
                            Some(Shown::Text { text, .. }) => view! {
                                <pre class=css::text>{text}</pre>
                            }.into_any(),
                            Some(Shown::Markdown { html, .. }) => view! {
                                <div class=md_css::markdown inner_html=html></div>
                            }.into_any(),
                        }}
                    </div>
                </div>
            </div>
        </Show>
    }
}
