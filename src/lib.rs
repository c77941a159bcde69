//! pricewatch — periodic e-commerce catalog crawler
//!
//! Walks a paginated product listing on a schedule or on demand,
//! deduplicates the extracted records against a SQLite store, and exposes
//! the catalog through a small HTTP API with WebSocket change
//! notifications.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
