pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::drafts::handlers as drafts;
use crate::letters::handlers as letters;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Dashboard
        .route("/api/v1/letters", get(letters::handle_dashboard))
        .route(
            "/api/v1/letters/:id",
            get(letters::handle_view).delete(letters::handle_delete),
        )
        .route("/api/v1/letters/:id/edit", post(letters::handle_edit))
        // Cover letter form
        .route("/api/v1/drafts", post(drafts::handle_open))
        .route(
            "/api/v1/drafts/:id",
            get(drafts::handle_get)
                .patch(drafts::handle_update)
                .delete(drafts::handle_close),
        )
        .route("/api/v1/drafts/:id/generate", post(drafts::handle_generate))
        .route("/api/v1/drafts/:id/save", post(drafts::handle_save))
        .with_state(state)
}
