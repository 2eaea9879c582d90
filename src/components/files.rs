//! File browser: every owned document with bulk actions and inline rename.

use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::{AppContext, BannerKind};
use crate::components::icons as ic;
use crate::components::preview::{PreviewDialog, PreviewState};
use crate::components::share::ShareDialog;
use crate::components::thumbs::{DocThumb, sync_thumbnails, thumb_cache};
use crate::core::batch::BatchOutcome;
use crate::core::blob::BrowserBlobUrls;
use crate::core::files::{
    Selection, apply_rename, delete_selected, download_selected, rename_document,
};
use crate::core::listing::load_files;
use crate::core::preview::{BrowserPrompter, BrowserSaver, ContentSource};
use crate::models::{AppRoute, DocId, DocumentSummary};
use crate::utils::format_date;

stylance::import_crate_style!(css, "src/components/listing.module.css");

#[component]
pub fn FilesPage() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let docs = RwSignal::new(None::<Vec<DocumentSummary>>);
    let selection = RwSignal::new(Selection::default());
    let editing = RwSignal::new(None::<DocId>);
    let draft = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let share_target = RwSignal::new(None::<Vec<DocumentSummary>>);
    let preview = PreviewState::new();
    let thumbs = thumb_cache::<DocId>();

    let refresh = move || {
        let Some(api) = ctx.api() else {
            ctx.invalidate_session();
            return;
        };
        spawn_local(async move {
            match load_files(&api).await {
                Ok(loaded) => {
                    docs.try_set(Some(loaded));
                }
                Err(e) if e.is_session_expired() => ctx.invalidate_session(),
                Err(e) => {
                    ctx.show_error(format!("Could not load files: {}", e.user_message()));
                    docs.try_set(Some(Vec::new()));
                }
            }
        });
    };
    refresh();

    Effect::new(move |_| {
        let Some(api) = ctx.api() else {
            return;
        };
        let images: Vec<DocId> = docs.with(|d| {
            d.iter()
                .flatten()
                .filter(|d| d.is_image())
                .map(|d| d.doc_id)
                .collect()
        });
        sync_thumbnails(thumbs, images, move |id| {
            let api = api.clone();
            async move { api.fetch_thumbnail(id).await }
        });
    });

    let listed = move || docs.get().unwrap_or_default();

    // Batch results: success banner only when every item went through.
    let report = move |outcome: BatchOutcome, verb: &'static str| {
        if outcome.session_expired() {
            ctx.invalidate_session();
        } else if outcome.is_complete() {
            let noun = if outcome.total() == 1 { "file" } else { "files" };
            ctx.show_banner(
                BannerKind::Success,
                format!("{verb} {} {noun}", outcome.total()),
            );
        } else {
            ctx.show_error(format!("{verb}: {}", outcome.summary()));
        }
    };

    let on_delete = move |_| {
        let Some(api) = ctx.api() else {
            ctx.invalidate_session();
            return;
        };
        let mut chosen = selection.get_untracked();
        busy.set(true);
        spawn_local(async move {
            let outcome = delete_selected(&api, &BrowserPrompter, &mut chosen).await;
            busy.try_set(false);
            if let Some(outcome) = outcome {
                selection.try_set(chosen);
                report(outcome, "Deleted");
                refresh();
            }
        });
    };

    let on_download = move |_| {
        let Some(api) = ctx.api() else {
            ctx.invalidate_session();
            return;
        };
        let (listed, chosen) = (listed(), selection.get_untracked());
        busy.set(true);
        spawn_local(async move {
            let outcome =
                download_selected(&api, &BrowserBlobUrls, &BrowserSaver, &listed, &chosen).await;
            busy.try_set(false);
            report(outcome, "Downloaded");
        });
    };

    let on_share = move |_| {
        let chosen = selection.get_untracked();
        let targets: Vec<_> = listed()
            .into_iter()
            .filter(|d| chosen.contains(d.doc_id))
            .collect();
        if !targets.is_empty() {
            share_target.set(Some(targets));
        }
    };

    let start_rename = move |doc: &DocumentSummary| {
        draft.set(doc.original_filename.clone());
        editing.set(Some(doc.doc_id));
    };

    let commit_rename = move |id: DocId| {
        if editing.get_untracked() != Some(id) {
            return;
        }
        editing.set(None);
        let current = docs.with_untracked(|d| {
            d.iter()
                .flatten()
                .find(|d| d.doc_id == id)
                .map(|d| d.original_filename.clone())
        });
        let raw = draft.get_untracked();
        if current.as_deref() == Some(raw.trim()) {
            return;
        }
        let Some(api) = ctx.api() else {
            ctx.invalidate_session();
            return;
        };
        spawn_local(async move {
            match rename_document(&api, id, &raw).await {
                Ok(name) => {
                    docs.try_update(|d| {
                        if let Some(d) = d {
                            apply_rename(d, id, &name);
                        }
                    });
                }
                Err(e) if e.is_session_expired() => ctx.invalidate_session(),
                Err(e) => ctx.show_error(format!("Rename failed: {}", e.user_message())),
            }
        });
    };

    let no_selection = move || busy.get() || selection.with(Selection::is_empty);

    let row = move |doc: DocumentSummary| {
        let id = doc.doc_id;
        let key = doc.is_image().then_some(id);
        let filename = doc.original_filename.clone();
        let renamed = doc.clone();
        let source = ContentSource::Owned(id);
        let shared = doc.clone();

        let name_cell = move || {
            if editing.get() == Some(id) {
                view! {
                    <input
                        class=css::renameInput
                        prop:value=move || draft.get()
                        on:input=move |ev| draft.set(event_target_value(&ev))
                        on:keydown=move |ev: ev::KeyboardEvent| match ev.key().as_str() {
                            "Enter" => commit_rename(id),
                            "Escape" => editing.set(None),
                            _ => {}
                        }
                        on:blur=move |_| commit_rename(id)
                        autofocus
                    />
                }
                .into_any()
            } else {
                let label = filename.clone();
                let filename = filename.clone();
                view! {
                    <button
                        class=css::rowName
                        on:click=move |_| preview.open(ctx, source, filename.clone())
                    >
                        {label}
                    </button>
                }
                .into_any()
            }
        };

        view! {
            <li class=move || if selection.with(|s| s.contains(id)) { css::rowSelected } else { css::row }>
                <input
                    type="checkbox"
                    prop:checked=move || selection.with(|s| s.contains(id))
                    on:change=move |_| selection.update(|s| s.toggle(id))
                />
                <span class=css::rowThumb>
                    <DocThumb cache=thumbs key=key filename=doc.original_filename.clone() />
                </span>
                {name_cell}
                <span class=css::rowMeta>{format_date(&doc.upload_date)}</span>
                <span class=css::rowActions>
                    <button class=css::iconButton title="Rename" on:click=move |_| start_rename(&renamed)>
                        <Icon icon=ic::EDIT />
                    </button>
                    <button
                        class=css::iconButton
                        title="Share"
                        on:click=move |_| share_target.set(Some(vec![shared.clone()]))
                    >
                        <Icon icon=ic::SHARE />
                    </button>
                </span>
            </li>
        }
    };

    view! {
        <div class=css::page>
            <header class=css::pageHeader>
                <h1>"My files"</h1>
                <div class=css::toolbar>
                    <span>
                        {move || match selection.with(Selection::len) {
                            0 => String::new(),
                            n => format!("{n} selected"),
                        }}
                    </span>
                    <button disabled=no_selection on:click=on_download>
                        <Icon icon=ic::DOWNLOAD />
                        "Download"
                    </button>
                    <button disabled=no_selection on:click=on_share>
                        <Icon icon=ic::SHARE />
                        "Share"
                    </button>
                    <button disabled=no_selection on:click=on_delete>
                        <Icon icon=ic::TRASH />
                        "Delete"
                    </button>
                </div>
            </header>

            {move || match docs.get() {
                None => view! { <p class=css::empty>"Loading..."</p> }.into_any(),
                Some(list) if list.is_empty() => view! {
                    <p class=css::empty>
                        "No files yet. " <a href=AppRoute::Upload.to_hash()>"Upload one"</a>
                    </p>
                }
                .into_any(),
                Some(list) => view! {
                    <ul class=css::list>
                        <li class=format!("{} {}", css::row, css::rowHeader)>
                            <input
                                type="checkbox"
                                aria-label="Select all"
                                prop:checked=move || {
                                    docs.with(|d| {
                                        let d = d.as_deref().unwrap_or_default();
                                        selection.with(|s| s.all_selected(d))
                                    })
                                }
                                on:change=move |_| {
                                    docs.with_untracked(|d| {
                                        let d = d.as_deref().unwrap_or_default();
                                        selection.update(|s| s.toggle_all(d));
                                    })
                                }
                            />
                            <span class=css::rowThumb></span>
                            <span class=css::rowName>"Name"</span>
                            <span class=css::rowMeta>"Uploaded"</span>
                            <span class=css::rowActions></span>
                        </li>
                        {list.into_iter().map(row).collect_view()}
                    </ul>
                }
                .into_any(),
            }}

            <PreviewDialog state=preview />
            {move || share_target.get().map(|docs| view! {
                <ShareDialog
                    docs=docs
                    on_close=Callback::new(move |_| share_target.set(None))
                    on_shared=Callback::new(move |_| selection.set(Selection::default()))
                />
            })}
        </div>
    }
}
