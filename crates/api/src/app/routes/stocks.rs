use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use ghframes_core::StockItemId;
use ghframes_inventory::{NewStockItem, StockItemPatch};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_stocks).post(create_stock))
        .route("/:id", get(get_stock).put(update_stock).delete(delete_stock))
        .route("/:id/adjust", post(adjust_stock))
}

pub async fn list_stocks(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.stocks.list_stocks().await {
        Ok(items) => {
            let body: Vec<_> = items.into_iter().map(dto::stock_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewStockItem>,
) -> axum::response::Response {
    match services.stocks.insert_stock(body).await {
        Ok(item) => (StatusCode::CREATED, Json(dto::stock_to_json(item))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: StockItemId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.stocks.get_stock(id).await {
        Ok(Some(item)) => (StatusCode::OK, Json(dto::stock_to_json(item))).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("stock item {id}"),
        ),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<StockItemPatch>,
) -> axum::response::Response {
    let id: StockItemId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.stocks.update_stock(id, body).await {
        Ok(item) => (StatusCode::OK, Json(dto::stock_to_json(item))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: StockItemId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.stocks.remove_stock(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::AdjustStockRequest>,
) -> axum::response::Response {
    let id: StockItemId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.stocks.adjust_quantity(id, body.delta).await {
        Ok(item) => (StatusCode::OK, Json(dto::stock_to_json(item))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
