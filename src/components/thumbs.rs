//! Thumbnail tiles backed by a [`ThumbnailCache`] signal.

use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;

use leptos::prelude::*;
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::components::icons as ic;
use crate::core::api::ContentBlob;
use crate::core::blob::BrowserBlobUrls;
use crate::core::error::ApiError;
use crate::core::thumbnails::{Thumbnail, ThumbnailCache, fetch_each};

stylance::import_crate_style!(css, "src/components/thumbs.module.css");

pub type ThumbCache<K> = RwSignal<ThumbnailCache<K, BrowserBlobUrls>>;

pub fn thumb_cache<K>() -> ThumbCache<K>
where
    K: Copy + Eq + Hash + Debug + Send + Sync + 'static,
{
    let cache = RwSignal::new(ThumbnailCache::new(BrowserBlobUrls));
    on_cleanup(move || {
        cache.try_update_untracked(ThumbnailCache::release_all);
    });
    cache
}

/// Reconcile `cache` with the displayed image keys and fetch what is missing.
///
/// Each thumbnail is stored as soon as its fetch lands. Results landing
/// after the view is gone are dropped unconverted.
pub fn sync_thumbnails<K, F, Fut>(cache: ThumbCache<K>, displayed: Vec<K>, fetch: F)
where
    K: Copy + Eq + Hash + Debug + Send + Sync + 'static,
    F: Fn(K) -> Fut + 'static,
    Fut: Future<Output = Result<ContentBlob, ApiError>> + 'static,
{
    let requests = cache
        .try_update(|c| c.sync(displayed))
        .unwrap_or_default();
    if requests.is_empty() {
        return;
    }
    spawn_local(fetch_each(requests, fetch, move |request, result| {
        cache.try_update(|c| c.accept(request, result));
    }));
}

/// Thumbnail image, or the file-type icon while loading or on failure.
#[component]
pub fn DocThumb<K>(cache: ThumbCache<K>, key: Option<K>, filename: String) -> impl IntoView
where
    K: Copy + Eq + Hash + Debug + Send + Sync + 'static,
{
    let icon = ic::for_file(&filename);
    let state = move || match key {
        Some(key) => cache.with(|c| c.state(&key)),
        None => Thumbnail::Fallback,
    };

    move || match state() {
        Thumbnail::Ready(url) => view! {
            <img class=css::thumb src=url alt=filename.clone() />
        }
        .into_any(),
        Thumbnail::Loading => view! {
            <span class=css::loading><Icon icon=icon /></span>
        }
        .into_any(),
        Thumbnail::Fallback => view! {
            <span class=css::icon><Icon icon=icon /></span>
        }
        .into_any(),
    }
}
