//! Homepage slider model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use vitrine_core::types::{DbId, Timestamp};

/// Row from the `sliders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Slider {
    pub id: DbId,
    pub name: String,
    /// Public URL of the slider image.
    pub image: String,
    /// On-disk location of the image; internal only.
    #[serde(skip_serializing)]
    pub image_path: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateSlider {
    pub name: String,
    pub image: String,
    pub image_path: String,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Patch for a slider. `image` and `image_path` are set together when the
/// image file is replaced.
#[derive(Debug, Default)]
pub struct UpdateSlider {
    pub name: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    pub image: Option<String>,
    pub image_path: Option<String>,
}
