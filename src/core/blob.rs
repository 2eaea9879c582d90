//! Object URL lifecycle.
//!
//! Fetched bytes are shown through `blob:` URLs. A [`BlobHandle`] owns one
//! such URL and revokes it when dropped, so release happens exactly once on
//! every path: replacement, removal, dialog close or view teardown.

use std::collections::HashMap;
use std::hash::Hash;

use web_sys::{Blob, BlobPropertyBag, Url};

use crate::core::error::BlobError;

/// Creates and revokes object URLs.
pub trait BlobUrls: Clone {
    fn create(&self, bytes: &[u8], mime: Option<&str>) -> Result<String, BlobError>;
    fn revoke(&self, url: &str);
}

/// `URL.createObjectURL` / `URL.revokeObjectURL`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserBlobUrls;

impl BlobUrls for BrowserBlobUrls {
    fn create(&self, bytes: &[u8], mime: Option<&str>) -> Result<String, BlobError> {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        let props = BlobPropertyBag::new();
        if let Some(mime) = mime {
            props.set_type(mime);
        }
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &props)
            .map_err(|_| BlobError::BlobCreationFailed)?;
        Url::create_object_url_with_blob(&blob).map_err(|_| BlobError::UrlCreationFailed)
    }

    fn revoke(&self, url: &str) {
        let _ = Url::revoke_object_url(url);
    }
}

/// An object URL that is revoked on drop.
#[derive(Debug)]
pub struct BlobHandle<B: BlobUrls> {
    url: String,
    urls: B,
}

impl<B: BlobUrls> BlobHandle<B> {
    pub fn create(urls: &B, bytes: &[u8], mime: Option<&str>) -> Result<Self, BlobError> {
        let url = urls.create(bytes, mime)?;
        Ok(Self {
            url,
            urls: urls.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl<B: BlobUrls> Drop for BlobHandle<B> {
    fn drop(&mut self) {
        self.urls.revoke(&self.url);
    }
}

/// At most one live handle per key.
#[derive(Debug)]
pub struct HandleMap<K, B: BlobUrls> {
    handles: HashMap<K, BlobHandle<B>>,
}

impl<K, B: BlobUrls> Default for HandleMap<K, B> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, B: BlobUrls> HandleMap<K, B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `handle` under `key`, revoking whatever it replaces.
    pub fn insert(&mut self, key: K, handle: BlobHandle<B>) {
        self.handles.insert(key, handle);
    }

    pub fn url(&self, key: &K) -> Option<&str> {
        self.handles.get(key).map(BlobHandle::url)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.handles.contains_key(key)
    }

    pub fn remove(&mut self, key: &K) {
        self.handles.remove(key);
    }

    /// Revoke every handle whose key fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.handles.retain(|k, _| keep(k));
    }

    pub fn clear(&mut self) {
        self.handles.clear();
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock::RecordingBlobUrls;

    #[test]
    fn test_handle_revoked_on_drop() {
        let urls = RecordingBlobUrls::default();
        let handle = BlobHandle::create(&urls, b"abc", Some("image/png")).unwrap();
        let url = handle.url().to_string();
        assert_eq!(urls.live(), vec![url.clone()]);

        drop(handle);
        assert!(urls.live().is_empty());
        assert_eq!(urls.revoked(), vec![url]);
    }

    #[test]
    fn test_insert_replaces_and_revokes_old() {
        let urls = RecordingBlobUrls::default();
        let mut map = HandleMap::new();
        map.insert(1, BlobHandle::create(&urls, b"a", None).unwrap());
        let first = map.url(&1).unwrap().to_string();
        map.insert(1, BlobHandle::create(&urls, b"b", None).unwrap());

        assert_eq!(map.len(), 1);
        assert_eq!(urls.revoked(), vec![first]);
        assert_eq!(urls.live().len(), 1);
    }

    #[test]
    fn test_remove_twice_revokes_once() {
        let urls = RecordingBlobUrls::default();
        let mut map = HandleMap::new();
        map.insert(7, BlobHandle::create(&urls, b"a", None).unwrap());
        map.remove(&7);
        map.remove(&7);
        assert_eq!(urls.revoked().len(), 1);
    }

    #[test]
    fn test_retain_and_drop_release_everything() {
        let urls = RecordingBlobUrls::default();
        {
            let mut map = HandleMap::new();
            for id in 0..4 {
                map.insert(id, BlobHandle::create(&urls, b"x", None).unwrap());
            }
            map.retain(|id| id % 2 == 0);
            assert_eq!(urls.revoked().len(), 2);
        }
        assert!(urls.live().is_empty());
        assert_eq!(urls.revoked().len(), 4);
    }

    #[test]
    fn test_create_failure() {
        let urls = RecordingBlobUrls::default();
        urls.fail_next();
        assert_eq!(
            BlobHandle::create(&urls, b"a", None).map(|h| h.url().to_string()),
            Err(BlobError::UrlCreationFailed)
        );
        assert!(urls.live().is_empty());
    }
}
