//! Handlers for the `/gallery` resource. Every route requires [`AuthAdmin`].
//!
//! A gallery item's `type` always agrees with the category of the file it
//! points at; both create and update check this before anything is written.

use std::path::PathBuf;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use vitrine_core::error::CoreError;
use vitrine_core::file_store::StoredFile;
use vitrine_core::types::DbId;
use vitrine_core::upload::{AcceptedUpload, MediaCategory, ResourceKind};
use vitrine_db::models::gallery::{
    CreateGalleryItem, GalleryFile, GalleryItem, UpdateGalleryItem,
};
use vitrine_db::repositories::GalleryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthAdmin;
use crate::multipart::{accept, store, UploadForm};
use crate::query::GalleryListParams;
use crate::response::{DataResponse, MessageResponse, PageResponse};
use crate::state::AppState;

/// Multipart part holding the photo or video.
pub const FILE_FIELD: &str = "file";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Media", id })
}

fn category_mismatch(declared: MediaCategory, actual: MediaCategory) -> AppError {
    AppError::Core(CoreError::UnsupportedMediaType(format!(
        "Type '{}' does not match the uploaded {} file",
        declared.as_str(),
        actual.as_str()
    )))
}

fn gallery_file(accepted: &AcceptedUpload, stored: &StoredFile) -> GalleryFile {
    let (width, height) = accepted
        .dimensions
        .map(|(w, h)| (i32::try_from(w).ok(), i32::try_from(h).ok()))
        .unwrap_or((None, None));

    GalleryFile {
        file_name: stored.file_name.clone(),
        file_path: stored.path_string(),
        file_url: stored.url.clone(),
        file_size: stored.size_bytes,
        mime_type: stored.mime_type.clone(),
        width,
        height,
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

async fn page_of(
    state: &AppState,
    category: Option<MediaCategory>,
    params: &GalleryListParams,
) -> AppResult<Json<PageResponse<GalleryItem>>> {
    let page = params.page_request();
    let (items, total) = GalleryRepo::list(
        &state.pool,
        category.map(MediaCategory::as_str),
        params.search(),
        &page,
    )
    .await?;

    Ok(Json(PageResponse::new(items, page.summarize(total))))
}

/// GET /api/gallery?type=&page=&limit=&search=
///
/// Active items, newest first.
pub async fn list(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    WithRejection(Query(params), _): WithRejection<Query<GalleryListParams>, AppError>,
) -> AppResult<Json<PageResponse<GalleryItem>>> {
    page_of(&state, params.category(), &params).await
}

/// GET /api/gallery/photos
pub async fn list_photos(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    WithRejection(Query(params), _): WithRejection<Query<GalleryListParams>, AppError>,
) -> AppResult<Json<PageResponse<GalleryItem>>> {
    page_of(&state, Some(MediaCategory::Photo), &params).await
}

/// GET /api/gallery/videos
pub async fn list_videos(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    WithRejection(Query(params), _): WithRejection<Query<GalleryListParams>, AppError>,
) -> AppResult<Json<PageResponse<GalleryItem>>> {
    page_of(&state, Some(MediaCategory::Video), &params).await
}

/// GET /api/gallery/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
) -> AppResult<Json<DataResponse<GalleryItem>>> {
    let item = GalleryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(item)))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/gallery
///
/// Multipart: `file` (required), `type` (required, `photo` or `video`),
/// `name` (defaults to the original file name), `duration` (seconds).
pub async fn create(
    State(state): State<AppState>,
    admin: AuthAdmin,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> AppResult<(StatusCode, Json<DataResponse<GalleryItem>>)> {
    let policy = ResourceKind::Gallery.policy();
    let mut form = UploadForm::read(multipart, FILE_FIELD, policy.max_bytes).await?;

    let file = form
        .take_file()
        .ok_or_else(|| AppError::Core(CoreError::Validation("No file uploaded".into())))?;
    let declared = MediaCategory::parse(form.text("type").unwrap_or_default())?;
    let duration = form.parse::<f64>("duration")?;

    let accepted = accept(ResourceKind::Gallery, &file)?;
    if accepted.category != declared {
        return Err(category_mismatch(declared, accepted.category));
    }

    let name = form
        .text("name")
        .map(str::to_string)
        .unwrap_or_else(|| accepted.original_name.clone());

    let stored = store(&state, &accepted, &file).await?;

    let input = CreateGalleryItem {
        media_type: declared.as_str().to_string(),
        name,
        file: gallery_file(&accepted, &stored),
        duration,
        uploaded_by: admin.id(),
    };
    let item = state
        .reconciler()
        .create(&stored, GalleryRepo::create(&state.pool, &input))
        .await?;

    tracing::info!(
        gallery_id = item.id,
        admin_id = admin.id(),
        media_type = %item.media_type,
        file = %stored.file_name,
        "Gallery item created",
    );

    let message = match declared {
        MediaCategory::Photo => "Photo uploaded successfully",
        MediaCategory::Video => "Video uploaded successfully",
    };
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(message, item)),
    ))
}

/// PUT /api/gallery/{id}
///
/// Multipart: any of `name`, `type`, `is_active`, `duration`, and an optional
/// replacement `file`.
pub async fn update(
    State(state): State<AppState>,
    admin: AuthAdmin,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> AppResult<Json<DataResponse<GalleryItem>>> {
    let policy = ResourceKind::Gallery.policy();
    let mut form = UploadForm::read(multipart, FILE_FIELD, policy.max_bytes).await?;

    let declared = form.text("type").map(MediaCategory::parse).transpose()?;
    let mut input = UpdateGalleryItem {
        media_type: declared.map(|c| c.as_str().to_string()),
        name: form.text("name").map(str::to_string),
        is_active: form.flag("is_active")?,
        duration: form.parse::<f64>("duration")?,
        file: None,
    };

    let existing = GalleryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let item = match form.take_file() {
        None => {
            if let Some(declared) = declared {
                let current = existing.category()?;
                if declared != current {
                    return Err(category_mismatch(declared, current));
                }
            }
            GalleryRepo::update(&state.pool, id, &input).await?
        }
        Some(file) => {
            let accepted = accept(ResourceKind::Gallery, &file)?;
            if let Some(declared) = declared {
                if declared != accepted.category {
                    return Err(category_mismatch(declared, accepted.category));
                }
            }

            let stored = store(&state, &accepted, &file).await?;
            input.media_type = Some(accepted.category.as_str().to_string());
            input.file = Some(gallery_file(&accepted, &stored));

            let previous = PathBuf::from(&existing.file_path);
            state
                .reconciler()
                .replace(&previous, &stored, GalleryRepo::update(&state.pool, id, &input))
                .await?
        }
    }
    .ok_or_else(|| not_found(id))?;

    tracing::info!(gallery_id = id, admin_id = admin.id(), "Gallery item updated");

    Ok(Json(DataResponse::with_message(
        "Media updated successfully",
        item,
    )))
}

/// DELETE /api/gallery/{id}
///
/// Removes the record, then its file and thumbnail.
pub async fn delete(
    State(state): State<AppState>,
    admin: AuthAdmin,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    state
        .reconciler()
        .delete(GalleryRepo::delete(&state.pool, id), |item: &GalleryItem| {
            std::iter::once(item.file_path.as_str())
                .chain(item.thumbnail.as_deref())
                .map(PathBuf::from)
                .collect()
        })
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(gallery_id = id, admin_id = admin.id(), "Gallery item deleted");

    Ok(Json(MessageResponse::new("Media deleted successfully")))
}
