use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use ghframes_billing::InvoiceDraft;
use ghframes_core::InvoiceId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_bills).post(create_bill))
        .route("/:id", get(get_bill).put(update_bill).delete(delete_bill))
}

pub async fn list_bills(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.billing.list_invoices().await {
        Ok(invoices) => {
            let body: Vec<_> = invoices.into_iter().map(dto::invoice_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<InvoiceDraft>,
) -> axum::response::Response {
    match services.billing.create_invoice(body).await {
        Ok(invoice) => (StatusCode::CREATED, Json(dto::invoice_to_json(invoice))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: InvoiceId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.billing.get_invoice(id).await {
        Ok(invoice) => (StatusCode::OK, Json(dto::invoice_to_json(invoice))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<InvoiceDraft>,
) -> axum::response::Response {
    let id: InvoiceId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.billing.update_invoice(id, body).await {
        Ok(invoice) => (StatusCode::OK, Json(dto::invoice_to_json(invoice))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: InvoiceId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.billing.delete_invoice(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
