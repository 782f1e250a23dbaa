use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use ghframes_core::PurchaseId;
use ghframes_purchasing::{NewPurchase, PurchasePatch};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_purchases).post(create_purchase))
        .route(
            "/:id",
            get(get_purchase).put(update_purchase).delete(delete_purchase),
        )
}

pub async fn list_purchases(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.purchases.list_purchases().await {
        Ok(records) => {
            let body: Vec<_> = records.into_iter().map(dto::purchase_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_purchase(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewPurchase>,
) -> axum::response::Response {
    match services.purchases.insert_purchase(body).await {
        Ok(record) => (StatusCode::CREATED, Json(dto::purchase_to_json(record))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_purchase(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PurchaseId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.purchases.get_purchase(id).await {
        Ok(Some(record)) => (StatusCode::OK, Json(dto::purchase_to_json(record))).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("purchase {id}"),
        ),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_purchase(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<PurchasePatch>,
) -> axum::response::Response {
    let id: PurchaseId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.purchases.update_purchase(id, body).await {
        Ok(record) => (StatusCode::OK, Json(dto::purchase_to_json(record))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_purchase(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: PurchaseId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.purchases.remove_purchase(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
