//! REST backend for a technology-accessibility review platform.
//!
//! Users register and verify via one-time passcode, browse and search a
//! catalog of assistive technologies, and post ratings and reviews. The
//! search subsystem combines text matching over the catalog with
//! review-derived signals behind a redis result cache and an append-only
//! query log.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod notifications;
pub mod search;
pub mod state;
