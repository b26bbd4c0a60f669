pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/generate", post(handlers::handle_generate))
        .route("/ai-providers", get(handlers::handle_list_providers))
        .route("/ats/validate", post(handlers::handle_ats_validate))
        .with_state(state)
}
