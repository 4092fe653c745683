pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use rest::{
    baby_recommendation_handler, baby_reminders_handler, classify_handler, health_handler,
    list_sizes_handler, price_summary_handler, product_prices_handler, recommend_handler,
    usage_projection_handler,
};
use state::AppState;

/// Builds the API router with every route bound to `app_state`.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/reminders/classify", post(classify_handler))
        .route("/babies/{baby_id}/reminders", get(baby_reminders_handler))
        .route(
            "/babies/{baby_id}/size-recommendation",
            get(baby_recommendation_handler),
        )
        .route("/sizes", get(list_sizes_handler))
        .route("/sizes/recommend", post(recommend_handler))
        .route("/usage/projection", post(usage_projection_handler))
        .route("/prices/summary", post(price_summary_handler))
        .route("/products/{product_id}/prices", get(product_prices_handler))
        .with_state(app_state)
}
