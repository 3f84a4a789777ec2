//! Handlers for the `/blogs` resource.
//!
//! Reads are public; writes require [`AuthAdmin`]. A post always owns exactly
//! one image, so create insists on one and update may only swap it.

use std::path::PathBuf;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use vitrine_core::error::CoreError;
use vitrine_core::file_store::StoredFile;
use vitrine_core::types::DbId;
use vitrine_core::upload::ResourceKind;
use vitrine_db::models::blog::{Blog, BlogImageFile, BlogResponse, CreateBlog, UpdateBlog};
use vitrine_db::repositories::BlogRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthAdmin;
use crate::multipart::{accept, store, UploadForm};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Multipart part holding the cover image.
pub const IMAGE_FIELD: &str = "image";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Blog", id })
}

fn image_file(stored: &StoredFile) -> BlogImageFile {
    BlogImageFile {
        file_name: stored.file_name.clone(),
        file_path: stored.path_string(),
        url: stored.url.clone(),
        file_size: stored.size_bytes,
        mime_type: stored.mime_type.clone(),
    }
}

/// GET /api/blogs
///
/// Newest first.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<BlogResponse>>>> {
    let blogs = BlogRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(
        blogs.into_iter().map(BlogResponse::from).collect(),
    )))
}

/// GET /api/blogs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
) -> AppResult<Json<DataResponse<BlogResponse>>> {
    let blog = BlogRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(blog.into())))
}

/// POST /api/blogs
///
/// Multipart: `image`, `title` and `description`, all required.
pub async fn create(
    State(state): State<AppState>,
    admin: AuthAdmin,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> AppResult<(StatusCode, Json<DataResponse<BlogResponse>>)> {
    let policy = ResourceKind::Blog.policy();
    let mut form = UploadForm::read(multipart, IMAGE_FIELD, policy.max_bytes).await?;

    let file = form
        .take_file()
        .ok_or_else(|| AppError::Core(CoreError::Validation("Image is required".into())))?;
    let title = form.required("title", "Title is required")?;
    let description = form.required("description", "Description is required")?;

    let accepted = accept(ResourceKind::Blog, &file)?;
    let stored = store(&state, &accepted, &file).await?;

    let input = CreateBlog {
        title,
        description,
        image: image_file(&stored),
        uploaded_by: admin.id(),
    };
    let blog = state
        .reconciler()
        .create(&stored, BlogRepo::create(&state.pool, &input))
        .await?;

    tracing::info!(blog_id = blog.id, admin_id = admin.id(), file = %stored.file_name, "Blog created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message("Blog added successfully", blog.into())),
    ))
}

/// PUT /api/blogs/{id}
///
/// Multipart: any of `title`, `description`, and a replacement `image`.
pub async fn update(
    State(state): State<AppState>,
    admin: AuthAdmin,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> AppResult<Json<DataResponse<BlogResponse>>> {
    let policy = ResourceKind::Blog.policy();
    let mut form = UploadForm::read(multipart, IMAGE_FIELD, policy.max_bytes).await?;

    let mut input = UpdateBlog {
        title: form.text("title").map(str::to_string),
        description: form.text("description").map(str::to_string),
        image: None,
    };

    let existing = BlogRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let blog = match form.take_file() {
        None => BlogRepo::update(&state.pool, id, &input).await?,
        Some(file) => {
            let accepted = accept(ResourceKind::Blog, &file)?;
            let stored = store(&state, &accepted, &file).await?;
            input.image = Some(image_file(&stored));

            let previous = PathBuf::from(&existing.image_file_path);
            state
                .reconciler()
                .replace(&previous, &stored, BlogRepo::update(&state.pool, id, &input))
                .await?
        }
    }
    .ok_or_else(|| not_found(id))?;

    tracing::info!(blog_id = id, admin_id = admin.id(), "Blog updated");

    Ok(Json(DataResponse::with_message(
        "Blog updated successfully",
        blog.into(),
    )))
}

/// DELETE /api/blogs/{id}
pub async fn delete(
    State(state): State<AppState>,
    admin: AuthAdmin,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    state
        .reconciler()
        .delete(BlogRepo::delete(&state.pool, id), |b: &Blog| {
            vec![PathBuf::from(&b.image_file_path)]
        })
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(blog_id = id, admin_id = admin.id(), "Blog deleted");

    Ok(Json(MessageResponse::new("Blog deleted successfully")))
}
