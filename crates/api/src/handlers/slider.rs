//! Handlers for the `/sliders` resource.
//!
//! Listing and lookup are public; everything else requires [`AuthAdmin`].
//! Every write that touches the image goes through the state's
//! [`Reconciler`](vitrine_core::reconcile::Reconciler).

use std::path::PathBuf;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use vitrine_core::error::CoreError;
use vitrine_core::types::DbId;
use vitrine_core::upload::ResourceKind;
use vitrine_db::models::slider::{CreateSlider, Slider, UpdateSlider};
use vitrine_db::repositories::SliderRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthAdmin;
use crate::multipart::{accept, store, UploadForm};
use crate::response::{DataResponse, ListResponse, MessageResponse};
use crate::state::AppState;

/// Multipart part holding the slider image.
pub const IMAGE_FIELD: &str = "image";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Slider",
        id,
    })
}

/// GET /api/sliders
///
/// Active sliders only, by `order` then newest first.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ListResponse<Slider>>> {
    let sliders = SliderRepo::list_active(&state.pool).await?;
    Ok(Json(ListResponse::new(sliders)))
}

/// GET /api/sliders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
) -> AppResult<Json<DataResponse<Slider>>> {
    let slider = SliderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(slider)))
}

/// POST /api/sliders
///
/// Multipart: `image` (required), `name` (required), `order`, `is_active`.
pub async fn create(
    State(state): State<AppState>,
    admin: AuthAdmin,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> AppResult<(StatusCode, Json<DataResponse<Slider>>)> {
    let policy = ResourceKind::Slider.policy();
    let mut form = UploadForm::read(multipart, IMAGE_FIELD, policy.max_bytes).await?;

    let file = form.take_file().ok_or_else(|| {
        AppError::Core(CoreError::Validation("Please upload an image".into()))
    })?;
    let name = form.required("name", "Name is required")?;
    let sort_order = form.parse::<i32>("order")?.unwrap_or(0);
    let is_active = form.flag("is_active")?.unwrap_or(true);

    let accepted = accept(ResourceKind::Slider, &file)?;
    let stored = store(&state, &accepted, &file).await?;

    let input = CreateSlider {
        name,
        image: stored.url.clone(),
        image_path: stored.path_string(),
        sort_order,
        is_active,
    };
    let slider = state
        .reconciler()
        .create(&stored, SliderRepo::create(&state.pool, &input))
        .await?;

    tracing::info!(slider_id = slider.id, admin_id = admin.id(), file = %stored.file_name, "Slider created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message("Slider created successfully", slider)),
    ))
}

/// PUT /api/sliders/{id}
///
/// Multipart: any of `name`, `order`, `is_active`, and an optional
/// replacement `image`. The previous image is removed only after the record
/// points at the new one.
pub async fn update(
    State(state): State<AppState>,
    admin: AuthAdmin,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> AppResult<Json<DataResponse<Slider>>> {
    let policy = ResourceKind::Slider.policy();
    let mut form = UploadForm::read(multipart, IMAGE_FIELD, policy.max_bytes).await?;

    let mut input = UpdateSlider {
        name: form.text("name").map(str::to_string),
        sort_order: form.parse::<i32>("order")?,
        is_active: form.flag("is_active")?,
        ..Default::default()
    };

    let existing = SliderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let slider = match form.take_file() {
        None => SliderRepo::update(&state.pool, id, &input).await?,
        Some(file) => {
            let accepted = accept(ResourceKind::Slider, &file)?;
            let stored = store(&state, &accepted, &file).await?;
            input.image = Some(stored.url.clone());
            input.image_path = Some(stored.path_string());

            let previous = PathBuf::from(&existing.image_path);
            state
                .reconciler()
                .replace(&previous, &stored, SliderRepo::update(&state.pool, id, &input))
                .await?
        }
    }
    .ok_or_else(|| not_found(id))?;

    tracing::info!(slider_id = id, admin_id = admin.id(), "Slider updated");

    Ok(Json(DataResponse::with_message(
        "Slider updated successfully",
        slider,
    )))
}

/// DELETE /api/sliders/{id}
pub async fn delete(
    State(state): State<AppState>,
    admin: AuthAdmin,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    state
        .reconciler()
        .delete(SliderRepo::delete(&state.pool, id), |s: &Slider| {
            vec![PathBuf::from(&s.image_path)]
        })
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(slider_id = id, admin_id = admin.id(), "Slider deleted");

    Ok(Json(MessageResponse::new("Slider deleted successfully")))
}

/// PATCH /api/sliders/{id}/toggle
///
/// Flips `is_active`; the image is not touched.
pub async fn toggle(
    State(state): State<AppState>,
    admin: AuthAdmin,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
) -> AppResult<Json<DataResponse<Slider>>> {
    let slider = SliderRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(slider_id = id, admin_id = admin.id(), is_active = slider.is_active, "Slider toggled");

    let message = if slider.is_active {
        "Slider activated successfully"
    } else {
        "Slider deactivated successfully"
    };
    Ok(Json(DataResponse::with_message(message, slider)))
}
