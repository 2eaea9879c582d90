//! Dashboard: recent files grid, search and both share lists.

use leptos::prelude::*;
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::{AppContext, BannerKind};
use crate::components::icons as ic;
use crate::components::preview::{PreviewDialog, PreviewState};
use crate::components::share::ShareDialog;
use crate::components::thumbs::{DocThumb, ThumbCache, sync_thumbnails, thumb_cache};
use crate::config::RECENT_TILE_COUNT;
use crate::core::debounce::TimerSleeper;
use crate::core::error::ApiError;
use crate::core::listing::{DashboardData, Section, Tile, load_dashboard, recent_tiles};
use crate::core::preview::ContentSource;
use crate::core::search::{SearchController, SearchUpdate};
use crate::core::upload::UploadFlash;
use crate::models::{AppRoute, DocId, DocumentSummary, ShareGrant, ShareId};
use crate::utils::format_date;

stylance::import_crate_style!(css, "src/components/listing.module.css");

#[component]
pub fn DashboardPage() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let data = RwSignal::new(None::<DashboardData>);
    let results = RwSignal::new(None::<Vec<DocumentSummary>>);
    let share_target = RwSignal::new(None::<Vec<DocumentSummary>>);
    let preview = PreviewState::new();
    let recent_thumbs = thumb_cache::<DocId>();
    let shared_thumbs = thumb_cache::<ShareId>();

    let refresh = move || {
        let Some(api) = ctx.api() else {
            ctx.invalidate_session();
            return;
        };
        spawn_local(async move {
            let loaded = load_dashboard(&api).await;
            if loaded.session_expired() {
                ctx.invalidate_session();
                return;
            }
            data.try_set(Some(loaded));
        });
    };
    refresh();

    if let Some(flash) = ctx.upload_flash.try_update(Option::take).flatten() {
        let kind = match flash {
            UploadFlash::Complete => BannerKind::Success,
            UploadFlash::Partial => BannerKind::Error,
        };
        ctx.show_banner(kind, flash.message());
    }

    // Thumbnails follow whatever the grid and the shared list display.
    Effect::new(move |_| {
        let Some(api) = ctx.api() else {
            return;
        };
        let grid: Vec<DocId> = match results.get() {
            Some(docs) => image_ids(&docs),
            None => data.with(|d| {
                d.as_ref()
                    .map(|d| image_ids(&d.recent.items[..d.recent.items.len().min(RECENT_TILE_COUNT)]))
                    .unwrap_or_default()
            }),
        };
        let shared: Vec<ShareId> = data.with(|d| {
            d.as_ref()
                .map(|d| {
                    d.shared_with_me
                        .items
                        .iter()
                        .filter(|g| g.is_image())
                        .map(|g| g.share_id)
                        .collect()
                })
                .unwrap_or_default()
        });

        let owned_api = api.clone();
        sync_thumbnails(recent_thumbs, grid, move |id| {
            let api = owned_api.clone();
            async move { api.fetch_thumbnail(id).await }
        });
        sync_thumbnails(shared_thumbs, shared, move |id| {
            let api = api.clone();
            async move { api.fetch_shared_thumbnail(id).await }
        });
    });

    let open = move |source: ContentSource, filename: String| preview.open(ctx, source, filename);

    let revoke = move |grant: ShareGrant| {
        let Some(api) = ctx.api() else {
            ctx.invalidate_session();
            return;
        };
        spawn_local(async move {
            match api.revoke_share(grant.share_id).await {
                Ok(()) => {
                    ctx.show_banner(
                        BannerKind::Success,
                        format!("Stopped sharing {}", grant.filename),
                    );
                    refresh();
                }
                Err(e) if e.is_session_expired() => ctx.invalidate_session(),
                Err(e) => ctx.show_error(e.user_message()),
            }
        });
    };

    let grid = move || {
        let searching = results.with(Option::is_some);
        let docs = results
            .get()
            .or_else(|| data.with(|d| d.as_ref().map(|d| d.recent.items.clone())))
            .unwrap_or_default();

        if searching {
            if docs.is_empty() {
                return view! { <p class=css::empty>"No documents match your search."</p> }.into_any();
            }
            return view! {
                <div class=css::grid>
                    {docs.into_iter().map(|doc| view! {
                        <DocTile doc=doc cache=recent_thumbs open=open share=share_target />
                    }).collect_view()}
                </div>
            }
            .into_any();
        }

        let tiles = recent_tiles(&docs)
            .into_iter()
            .map(|tile| match tile {
                Tile::Document(doc) => view! {
                    <DocTile doc=doc.clone() cache=recent_thumbs open=open share=share_target />
                }
                .into_any(),
                Tile::Upload => view! {
                    <a class=css::uploadTile href=AppRoute::Upload.to_hash()>
                        <Icon icon=ic::PLUS />
                        <span>"Upload"</span>
                    </a>
                }
                .into_any(),
            })
            .collect_view();
        view! { <div class=css::grid>{tiles}</div> }.into_any()
    };

    let section_error = move |pick: fn(&DashboardData) -> Option<ApiError>| {
        move || {
            data.with(|d| d.as_ref().and_then(pick)).map(|e| {
                view! { <p class=css::sectionError>{e.user_message()}</p> }
            })
        }
    };

    view! {
        <div class=css::page>
            <header class=css::pageHeader>
                <h1>
                    {move || ctx.session.with(|s| {
                        s.as_ref().map(|s| format!("Welcome, {}", s.display_name()))
                    })}
                </h1>
            </header>
            <SearchBar results=results />

            <section class=css::section>
                <h2 class=css::sectionTitle>
                    {move || if results.with(Option::is_some) { "Search results" } else { "Recent files" }}
                </h2>
                {section_error(|d| d.recent.error.clone())}
                <Show
                    when=move || data.with(Option::is_some) || results.with(Option::is_some)
                    fallback=|| view! { <p class=css::empty>"Loading..."</p> }
                >
                    {grid}
                </Show>
            </section>

            <section class=css::section>
                <h2 class=css::sectionTitle>"Shared with me"</h2>
                {section_error(|d| d.shared_with_me.error.clone())}
                {move || {
                    let grants = items(data, |d| &d.shared_with_me);
                    if grants.is_empty() {
                        return view! { <p class=css::empty>"Nothing has been shared with you yet."</p> }.into_any();
                    }
                    view! {
                        <ul class=css::list>
                            {grants.into_iter().map(|grant| {
                                let filename = grant.filename.clone();
                                let source = ContentSource::Shared(grant.share_id);
                                let key = grant.is_image().then_some(grant.share_id);
                                view! {
                                    <li class=css::row>
                                        <span class=css::rowThumb>
                                            <DocThumb cache=shared_thumbs key=key filename=grant.filename.clone() />
                                        </span>
                                        <button
                                            class=css::rowName
                                            on:click=move |_| open(source, filename.clone())
                                        >
                                            {grant.filename.clone()}
                                        </button>
                                        <span class=css::rowMeta>
                                            {grant.counterpart.clone().unwrap_or_default()}
                                        </span>
                                        <span class=css::rowMeta>{format_date(&grant.shared_date)}</span>
                                    </li>
                                }
                            }).collect_view()}
                        </ul>
                    }
                    .into_any()
                }}
            </section>

            <section class=css::section>
                <h2 class=css::sectionTitle>"Shared by me"</h2>
                {section_error(|d| d.shared_by_me.error.clone())}
                {move || {
                    let grants = items(data, |d| &d.shared_by_me);
                    if grants.is_empty() {
                        return view! { <p class=css::empty>"You have not shared any files."</p> }.into_any();
                    }
                    view! {
                        <ul class=css::list>
                            {grants.into_iter().map(|grant| {
                                let filename = grant.filename.clone();
                                let source = ContentSource::Owned(grant.doc_id);
                                let revoked = grant.clone();
                                view! {
                                    <li class=css::row>
                                        <span class=css::rowThumb>
                                            <Icon icon=ic::for_file(&grant.filename) />
                                        </span>
                                        <button
                                            class=css::rowName
                                            on:click=move |_| open(source, filename.clone())
                                        >
                                            {grant.filename.clone()}
                                        </button>
                                        <span class=css::rowMeta>
                                            {grant.counterpart.clone().unwrap_or_default()}
                                        </span>
                                        <span class=css::rowMeta>{format_date(&grant.shared_date)}</span>
                                        <span class=css::rowActions>
                                            <button
                                                class=css::iconButton
                                                title="Stop sharing"
                                                on:click=move |_| revoke(revoked.clone())
                                            >
                                                <Icon icon=ic::TRASH />
                                            </button>
                                        </span>
                                    </li>
                                }
                            }).collect_view()}
                        </ul>
                    }
                    .into_any()
                }}
            </section>

            <PreviewDialog state=preview />
            {move || share_target.get().map(|docs| view! {
                <ShareDialog
                    docs=docs
                    on_close=Callback::new(move |_| share_target.set(None))
                    on_shared=Callback::new(move |_| refresh())
                />
            })}
        </div>
    }
}

fn image_ids(docs: &[DocumentSummary]) -> Vec<DocId> {
    docs.iter().filter(|d| d.is_image()).map(|d| d.doc_id).collect()
}

fn items<T: Clone>(
    data: RwSignal<Option<DashboardData>>,
    pick: fn(&DashboardData) -> &Section<T>,
) -> Vec<T> {
    data.with(|d| d.as_ref().map(|d| pick(d).items.clone()).unwrap_or_default())
}

/// One document tile in the recent grid or search results.
#[component]
fn DocTile<F>(
    doc: DocumentSummary,
    cache: ThumbCache<DocId>,
    open: F,
    share: RwSignal<Option<Vec<DocumentSummary>>>,
) -> impl IntoView
where
    F: Fn(ContentSource, String) + Copy + 'static,
{
    let key = doc.is_image().then_some(doc.doc_id);
    let source = ContentSource::Owned(doc.doc_id);
    let filename = doc.original_filename.clone();
    let shared = doc.clone();

    view! {
        <div class=css::tile>
            <button class=css::tileThumb on:click=move |_| open(source, filename.clone())>
                <DocThumb cache=cache key=key filename=doc.original_filename.clone() />
            </button>
            <div class=css::tileName title=doc.original_filename.clone()>
                {doc.original_filename.clone()}
            </div>
            <div class=css::tileMeta>
                <span>{format_date(&doc.upload_date)}</span>
                <button
                    class=css::iconButton
                    title="Share"
                    on:click=move |_| share.set(Some(vec![shared.clone()]))
                >
                    <Icon icon=ic::SHARE />
                </button>
            </div>
        </div>
    }
}

/// Debounced search box. Blank input restores the recent grid.
#[component]
fn SearchBar(results: RwSignal<Option<Vec<DocumentSummary>>>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let controller = StoredValue::new(SearchController::new(TimerSleeper));
    let query = RwSignal::new(String::new());

    on_cleanup(move || {
        controller.try_with_value(SearchController::teardown);
    });

    let on_input = move |raw: String| {
        query.set(raw.clone());
        let Some(api) = ctx.api() else {
            ctx.invalidate_session();
            return;
        };
        let Some(search) = controller.try_get_value() else {
            return;
        };
        spawn_local(async move {
            match search.input(&api, &raw).await {
                SearchUpdate::Cleared => {
                    results.try_set(None);
                }
                SearchUpdate::Results { docs, .. } => {
                    results.try_set(Some(docs));
                }
                SearchUpdate::Superseded => {}
                SearchUpdate::Failed { error, .. } if error.is_session_expired() => {
                    ctx.invalidate_session();
                }
                SearchUpdate::Failed { error, .. } => {
                    ctx.show_error(format!("Search failed: {}", error.user_message()));
                }
            }
        });
    };

    view! {
        <label class=css::search>
            <Icon icon=ic::SEARCH />
            <input
                type="search"
                placeholder="Search documents"
                prop:value=move || query.get()
                on:input=move |ev| on_input(event_target_value(&ev))
            />
        </label>
    }
}
