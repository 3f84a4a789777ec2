//! Gallery item (photo or video) model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use vitrine_core::error::CoreError;
use vitrine_core::types::{DbId, Timestamp};
use vitrine_core::upload::MediaCategory;

/// Row from the `gallery_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GalleryItem {
    pub id: DbId,
    /// `photo` or `video`; always agrees with the category of `mime_type`.
    #[serde(rename = "type")]
    pub media_type: String,
    pub name: String,
    pub file_name: String,
    #[serde(skip_serializing)]
    pub file_path: String,
    pub file_url: String,
    pub file_size: i64,
    pub mime_type: String,
    /// Disk path of a preview image. Nothing uploads one yet; delete still
    /// removes it when present.
    #[serde(skip_serializing)]
    pub thumbnail: Option<String>,
    /// Video length in seconds.
    pub duration: Option<f64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub is_active: bool,
    pub uploaded_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GalleryItem {
    pub fn category(&self) -> Result<MediaCategory, CoreError> {
        MediaCategory::parse(&self.media_type)
    }
}

#[derive(Debug)]
pub struct CreateGalleryItem {
    pub media_type: String,
    pub name: String,
    pub file: GalleryFile,
    pub duration: Option<f64>,
    pub uploaded_by: DbId,
}

/// File columns of a gallery item, written on create and on replacement.
#[derive(Debug, Clone)]
pub struct GalleryFile {
    pub file_name: String,
    pub file_path: String,
    pub file_url: String,
    pub file_size: i64,
    pub mime_type: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

/// Patch for a gallery item. When `file` is set, the dimensions are replaced
/// along with it (cleared for videos).
#[derive(Debug, Default)]
pub struct UpdateGalleryItem {
    pub media_type: Option<String>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub duration: Option<f64>,
    pub file: Option<GalleryFile>,
}
