use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::AppState;
use crate::domain::{CandidateProduct, Product, ProductEvent, ProductPatch, StoreError};
use crate::infrastructure::crawling::CrawlReport;

#[derive(Debug)]
pub enum ApiError {
    NotFound(&'static str),
    Conflict(String),
    CrawlInProgress,
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(message) => Self::Conflict(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(what) => (StatusCode::NOT_FOUND, what.to_string()),
            Self::Conflict(message) => {
                (StatusCode::CONFLICT, format!("duplicate product: {message}"))
            }
            Self::CrawlInProgress => (
                StatusCode::CONFLICT,
                "a crawl run is already in progress".to_string(),
            ),
            Self::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let products = state.store.find_all().await?;
    Ok(Json(ProductsResponse { products }))
}

#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub category: String,
    pub name: String,
    pub price: String,
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<CreateProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let candidate = CandidateProduct::new(body.category, body.name, body.price);
    let product = state.store.insert(&candidate).await?;
    let _ = state.events.send(ProductEvent::Added {
        product: product.clone(),
    });
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .store
        .update(id, &patch)
        .await?
        .ok_or(ApiError::NotFound("product not found"))?;
    let _ = state.events.send(ProductEvent::Updated {
        product: product.clone(),
    });
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.store.delete(id).await? {
        return Err(ApiError::NotFound("product not found"));
    }
    let _ = state.events.send(ProductEvent::Deleted { id });
    Ok(Json(json!({ "message": "product deleted" })))
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub message: String,
    pub report: CrawlReport,
}

/// On-demand crawl against an explicit URL. Refuses to overlap an
/// in-flight run instead of racing it.
pub async fn trigger_parse(
    State(state): State<AppState>,
    Json(request): Json<ParseRequest>,
) -> Result<Json<ParseResponse>, ApiError> {
    let report = state
        .crawl
        .try_run(&request.url)
        .await
        .ok_or(ApiError::CrawlInProgress)?;
    Ok(Json(ParseResponse {
        message: "products parsed and saved".to_string(),
        report,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SetUrlRequest {
    pub url: String,
}

pub async fn set_url(
    State(state): State<AppState>,
    Json(request): Json<SetUrlRequest>,
) -> Json<serde_json::Value> {
    state.scheduler.set_target_url(request.url.clone()).await;
    Json(json!({
        "message": format!("scheduled crawl URL updated to {}", request.url)
    }))
}
