//! Article extractor library.
//!
//! Provides the `/extract` endpoint, which fetches a page and returns its
//! main content as HTML, along with the key verification, configuration and
//! logging it depends on.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
