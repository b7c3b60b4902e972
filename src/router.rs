use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::openapi::api_doc;
use crate::state::AppState;

/// Router の構築
pub fn create_router(state: AppState) -> Router {
    let docs = SwaggerUi::new("/swagger").url("/openapi.json", api_doc(&state.config));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .merge(docs)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
