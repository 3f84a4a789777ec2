//! Handlers for the `/auth` resource (register, login, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};
use vitrine_core::error::CoreError;
use vitrine_core::types::DbId;
use vitrine_db::models::admin::AdminResponse;

use crate::auth::cookie::{auth_cookie, clear_auth_cookie};
use crate::auth::credentials::{register_admin, verify_credentials};
use crate::auth::jwt::issue_token;
use crate::auth::password::MIN_PASSWORD_LENGTH;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthAdmin;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "Username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 8 characters long"))]
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Identity plus the bearer form of the token also set in the cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> AppResult<(StatusCode, Json<DataResponse<AdminResponse>>)> {
    let (username, email) = (input.username.trim(), input.email.trim());
    if username.is_empty() || email.is_empty() || input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Please provide all fields".into(),
        )));
    }
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(first_message(&e))))?;

    let admin = register_admin(&state.pool, username, email, &input.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            "Admin registered successfully",
            AdminResponse::from(&admin),
        )),
    ))
}

/// POST /api/auth/login
///
/// Verifies the password, then returns the token in the body and as the
/// `token` cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(input), _): WithRejection<Json<LoginRequest>, AppError>,
) -> AppResult<(CookieJar, Json<DataResponse<LoginResponse>>)> {
    let username = input.username.trim();
    if username.is_empty() || input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Please provide username and password".into(),
        )));
    }

    let admin = verify_credentials(&state.pool, username, &input.password).await?;

    let jwt = &state.config.jwt;
    let token = issue_token(admin.id, jwt.token_ttl(), jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(admin_id = admin.id, "Admin logged in");

    let jar = jar.add(auth_cookie(token.clone(), jwt));
    Ok((
        jar,
        Json(DataResponse::with_message(
            "Login successful",
            LoginResponse {
                id: admin.id,
                username: admin.username,
                email: admin.email,
                token,
            },
        )),
    ))
}

/// POST /api/auth/logout
///
/// Tokens are stateless, so logging out only clears the cookie.
pub async fn logout(
    State(state): State<AppState>,
    admin: AuthAdmin,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    tracing::info!(admin_id = admin.id(), "Admin logged out");
    let jar = jar.add(clear_auth_cookie(&state.config.jwt));
    (jar, Json(MessageResponse::new("Logged out successfully")))
}

/// GET /api/auth/me
pub async fn me(admin: AuthAdmin) -> Json<DataResponse<AdminResponse>> {
    Json(DataResponse::new(AdminResponse::from(&admin.0)))
}

/// First human-readable message out of a validation failure.
fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input".to_string())
}
