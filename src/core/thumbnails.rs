//! Thumbnail materialization for displayed image documents.
//!
//! [`ThumbnailCache::sync`] reconciles the cache with what is on screen and
//! hands back the fetches still needed; [`ThumbnailCache::accept`] stores a
//! finished fetch only if it is still the newest one for its key. Failures
//! degrade to the fallback icon and never leave the cache.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::hash::Hash;

use futures::stream::{FuturesUnordered, StreamExt};
use leptos::logging::{log, warn};

use crate::core::api::ContentBlob;
use crate::core::blob::{BlobHandle, BlobUrls, HandleMap};
use crate::core::error::ApiError;

/// Rendering state of one thumbnail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Thumbnail {
    Loading,
    Ready(String),
    /// Render the type icon instead.
    Fallback,
}

/// A thumbnail fetch to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThumbRequest<K> {
    pub key: K,
    ticket: u64,
}

#[derive(Debug)]
pub struct ThumbnailCache<K, B: BlobUrls> {
    urls: B,
    handles: HandleMap<K, B>,
    failed: HashSet<K>,
    pending: HashMap<K, u64>,
    next_ticket: u64,
}

impl<K, B> ThumbnailCache<K, B>
where
    K: Copy + Eq + Hash + std::fmt::Debug,
    B: BlobUrls,
{
    pub fn new(urls: B) -> Self {
        Self {
            urls,
            handles: HandleMap::new(),
            failed: HashSet::new(),
            pending: HashMap::new(),
            next_ticket: 0,
        }
    }

    /// Make the cache track exactly `displayed`.
    ///
    /// Handles for keys no longer displayed are revoked; keys without a
    /// handle, a recorded failure or a pending fetch are returned.
    pub fn sync(&mut self, displayed: impl IntoIterator<Item = K>) -> Vec<ThumbRequest<K>> {
        let displayed: Vec<K> = displayed.into_iter().collect();
        let keep: HashSet<K> = displayed.iter().copied().collect();

        self.handles.retain(|k| keep.contains(k));
        self.failed.retain(|k| keep.contains(k));
        self.pending.retain(|k, _| keep.contains(k));

        let mut requests = Vec::new();
        for key in displayed {
            if self.handles.contains(&key)
                || self.failed.contains(&key)
                || self.pending.contains_key(&key)
            {
                continue;
            }
            self.next_ticket += 1;
            self.pending.insert(key, self.next_ticket);
            requests.push(ThumbRequest {
                key,
                ticket: self.next_ticket,
            });
        }
        requests
    }

    /// Store the result of `request`. Stale or orphaned results are dropped.
    pub fn accept(&mut self, request: ThumbRequest<K>, result: Result<ContentBlob, ApiError>) {
        if self.pending.get(&request.key) != Some(&request.ticket) {
            return;
        }
        self.pending.remove(&request.key);

        let blob = match result {
            Ok(blob) => blob,
            Err(ApiError::NotFound) => {
                log!("[thumbnails] no thumbnail for {:?}", request.key);
                self.failed.insert(request.key);
                return;
            }
            Err(e) => {
                warn!("[thumbnails] {:?} failed: {}", request.key, e);
                self.failed.insert(request.key);
                return;
            }
        };

        match BlobHandle::create(&self.urls, &blob.bytes, blob.mime.as_deref()) {
            Ok(handle) => self.handles.insert(request.key, handle),
            Err(e) => {
                warn!("[thumbnails] {:?}: {}", request.key, e);
                self.failed.insert(request.key);
            }
        }
    }

    pub fn state(&self, key: &K) -> Thumbnail {
        if let Some(url) = self.handles.url(key) {
            Thumbnail::Ready(url.to_string())
        } else if self.failed.contains(key) {
            Thumbnail::Fallback
        } else {
            Thumbnail::Loading
        }
    }

    /// Revoke everything; pending fetches will be dropped on arrival.
    pub fn release_all(&mut self) {
        self.handles.clear();
        self.failed.clear();
        self.pending.clear();
    }

    pub fn live_count(&self) -> usize {
        self.handles.len()
    }
}

/// Run every fetch concurrently, handing each result to `accept` as soon
/// as it lands.
pub async fn fetch_each<K, F, Fut, A>(requests: Vec<ThumbRequest<K>>, fetch: F, mut accept: A)
where
    K: Copy,
    F: Fn(K) -> Fut,
    Fut: Future<Output = Result<ContentBlob, ApiError>>,
    A: FnMut(ThumbRequest<K>, Result<ContentBlob, ApiError>),
{
    let mut in_flight: FuturesUnordered<_> = requests
        .into_iter()
        .map(|request| {
            let fetched = fetch(request.key);
            async move { (request, fetched.await) }
        })
        .collect();
    while let Some((request, result)) = in_flight.next().await {
        accept(request, result);
    }
}
