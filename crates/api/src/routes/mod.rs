pub mod auth;
pub mod blog;
pub mod gallery;
pub mod health;
pub mod slider;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use vitrine_core::upload::ResourceKind;

use crate::multipart::MULTIPART_OVERHEAD;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/register                    POST (public)
/// /auth/login                       POST (public)
/// /auth/logout                      POST
/// /auth/me                          GET
///
/// /sliders                          GET (public), POST
/// /sliders/{id}                     GET (public), PUT, DELETE
/// /sliders/{id}/toggle              PATCH
///
/// /gallery                          GET, POST
/// /gallery/add                      POST
/// /gallery/photos                   GET
/// /gallery/videos                   GET
/// /gallery/{id}                     GET, PUT, DELETE
///
/// /blogs                            GET (public), POST
/// /blogs/add                        POST
/// /blogs/{id}                       GET (public), PUT, DELETE
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/sliders", slider::router())
        .nest("/gallery", gallery::router())
        .nest("/blogs", blog::router())
}

/// Body limit for routes accepting uploads of `kind`.
pub(crate) fn upload_body_limit(kind: ResourceKind) -> DefaultBodyLimit {
    let max = usize::try_from(kind.policy().max_bytes).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(max.saturating_add(MULTIPART_OVERHEAD))
}
