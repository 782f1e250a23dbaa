use axum::Router;

pub mod bills;
pub mod purchases;
pub mod stocks;
pub mod system;

/// Router for all `/api` endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/stocks", stocks::router())
        .nest("/bills", bills::router())
        .nest("/purchases", purchases::router())
}
