//! Route definitions for the `/gallery` resource.

use axum::routing::{get, post};
use axum::Router;
use vitrine_core::upload::ResourceKind;

use super::upload_body_limit;
use crate::handlers::gallery;
use crate::state::AppState;

/// Routes mounted at `/gallery`. All require auth.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(gallery::list).post(gallery::create))
        .route("/add", post(gallery::create))
        .route("/photos", get(gallery::list_photos))
        .route("/videos", get(gallery::list_videos))
        .route(
            "/{id}",
            get(gallery::get_by_id)
                .put(gallery::update)
                .delete(gallery::delete),
        )
        .layer(upload_body_limit(ResourceKind::Gallery))
}
