//! Client core: everything below the Leptos views.
//!
//! This module provides:
//! - [`api::ApiClient`] over a pluggable [`transport::Transport`]
//! - [`session::SessionStore`] as the single owner of the stored session
//! - [`blob::BlobHandle`] and [`blob::HandleMap`] for object URL lifetimes
//! - Debounced [`search`], dashboard [`listing`], [`thumbnails`], [`preview`]
//! - [`share`] flow, [`files`] batch operations, [`upload`] and [`auth`]

pub mod api;
pub mod auth;
pub mod batch;
pub mod blob;
pub mod debounce;
pub mod error;
pub mod files;
pub mod listing;
pub mod preview;
pub mod search;
pub mod session;
pub mod share;
pub mod thumbnails;
pub mod transport;
pub mod upload;
pub mod validation;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
