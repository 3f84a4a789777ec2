//! Route definitions for the `/sliders` resource.

use axum::routing::{get, patch};
use axum::Router;
use vitrine_core::upload::ResourceKind;

use super::upload_body_limit;
use crate::handlers::slider;
use crate::state::AppState;

/// Routes mounted at `/sliders`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(slider::list).post(slider::create))
        .route(
            "/{id}",
            get(slider::get_by_id)
                .put(slider::update)
                .delete(slider::delete),
        )
        .route("/{id}/toggle", patch(slider::toggle))
        .layer(upload_body_limit(ResourceKind::Slider))
}
