//! Access guard extractor for mutating and private handlers.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;
use vitrine_core::error::CoreError;
use vitrine_core::types::DbId;
use vitrine_db::models::admin::Admin;
use vitrine_db::repositories::AdminRepo;

use crate::auth::cookie::AUTH_COOKIE;
use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated admin resolved from the request's token.
///
/// The token is read from the `token` cookie first, then from an
/// `Authorization: Bearer` header. The admin it names must still exist.
///
/// ```ignore
/// async fn my_handler(admin: AuthAdmin) -> AppResult<Json<()>> {
///     tracing::info!(admin_id = admin.id(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthAdmin(pub Admin);

impl AuthAdmin {
    pub fn id(&self) -> DbId {
        self.0.id
    }
}

impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Not authorized, no token".into(),
            ))
        })?;

        let claims = verify_token(&token, &state.config.jwt)?;

        let admin = AdminRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Admin not found".into()))
            })?;

        Ok(AuthAdmin(admin))
    }
}

/// Pull the raw token out of the request headers. The cookie wins over the
/// bearer header when both are present.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if headers.contains_key(COOKIE) {
        let jar = CookieJar::from_headers(headers);
        if let Some(cookie) = jar.get(AUTH_COOKIE) {
            if !cookie.value().is_empty() {
                return Some(cookie.value().to_string());
            }
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
