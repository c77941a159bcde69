//! HTTP API layer
//!
//! CRUD endpoints over the product store, on-demand crawl triggers, and
//! a WebSocket endpoint streaming change notifications to observers.

pub mod routes;
pub mod ws;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tokio::sync::broadcast;

use crate::application::{CrawlScheduler, CrawlService};
use crate::domain::{ProductEvent, ProductStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    pub crawl: Arc<CrawlService>,
    pub scheduler: Arc<CrawlScheduler>,
    pub events: broadcast::Sender<ProductEvent>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/products",
            get(routes::list_products).post(routes::create_product),
        )
        .route(
            "/products/{id}",
            put(routes::update_product).delete(routes::delete_product),
        )
        .route("/parse", post(routes::trigger_parse))
        .route("/set_url", post(routes::set_url))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
}
