pub mod health;
pub mod import;

use axum::{
    Router,
    routing::{get, post},
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Accession register import
        .route("/import/accession", post(import::import_accession))
        .with_state(state)
}
