//! Browser client for a document storage and sharing service.
//!
//! - [`core`] - API client, session store and view logic, free of DOM types
//!   behind the [`core::transport::Transport`] and [`core::blob::BlobUrls`] seams
//! - [`components`] - Leptos views
//! - [`models`] - Domain types shared by both

pub mod app;
pub mod components;
pub mod config;
pub mod core;
pub mod models;
pub mod utils;
