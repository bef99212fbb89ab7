//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`. The body limit is raised above axum's
//! default because a selection payload carries base64 images up to 5 MiB
//! each.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Generous cap for one selection payload (several base64-inflated images).
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Build the API router.
///
/// Endpoint handlers use `State<ApiContext>`; CORS is permissive because
/// the UI is served separately during development.
pub fn api_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/selection/files", post(endpoints::selection::add_files))
        .route(
            "/selection",
            get(endpoints::selection::list).delete(endpoints::selection::clear),
        )
        .route(
            "/extractions",
            post(endpoints::extractions::start).get(endpoints::extractions::snapshot),
        )
        .route("/extractions/:id/export", get(endpoints::export::download))
        .route("/previews/:id", get(endpoints::previews::fetch))
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
}
