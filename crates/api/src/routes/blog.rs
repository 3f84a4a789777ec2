//! Route definitions for the `/blogs` resource.

use axum::routing::{get, post};
use axum::Router;
use vitrine_core::upload::ResourceKind;

use super::upload_body_limit;
use crate::handlers::blog;
use crate::state::AppState;

/// Routes mounted at `/blogs`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::list).post(blog::create))
        .route("/add", post(blog::create))
        .route(
            "/{id}",
            get(blog::get_by_id).put(blog::update).delete(blog::delete),
        )
        .layer(upload_body_limit(ResourceKind::Blog))
}
