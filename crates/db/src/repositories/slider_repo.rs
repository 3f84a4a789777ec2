//! Repository for the `sliders` table.

use sqlx::PgPool;
use vitrine_core::types::DbId;

use crate::models::slider::{CreateSlider, Slider, UpdateSlider};

const COLUMNS: &str =
    "id, name, image, image_path, sort_order, is_active, created_at, updated_at";

pub struct SliderRepo;

impl SliderRepo {
    pub async fn create(pool: &PgPool, input: &CreateSlider) -> Result<Slider, sqlx::Error> {
        let query = format!(
            "INSERT INTO sliders (name, image, image_path, sort_order, is_active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slider>(&query)
            .bind(&input.name)
            .bind(&input.image)
            .bind(&input.image_path)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Slider>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sliders WHERE id = $1");
        sqlx::query_as::<_, Slider>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Active sliders in display order (ascending `sort_order`, newest first
    /// within the same order).
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Slider>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sliders
             WHERE is_active = TRUE
             ORDER BY sort_order ASC, created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Slider>(&query).fetch_all(pool).await
    }

    /// Update a slider. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSlider,
    ) -> Result<Option<Slider>, sqlx::Error> {
        let query = format!(
            "UPDATE sliders SET
                name = COALESCE($2, name),
                sort_order = COALESCE($3, sort_order),
                is_active = COALESCE($4, is_active),
                image = COALESCE($5, image),
                image_path = COALESCE($6, image_path)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slider>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.sort_order)
            .bind(input.is_active)
            .bind(&input.image)
            .bind(&input.image_path)
            .fetch_optional(pool)
            .await
    }

    /// Flip `is_active` in a single statement, leaving the image untouched.
    pub async fn toggle_active(pool: &PgPool, id: DbId) -> Result<Option<Slider>, sqlx::Error> {
        let query = format!(
            "UPDATE sliders SET is_active = NOT is_active
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slider>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a slider, returning the removed row so its image can be cleaned up.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Slider>, sqlx::Error> {
        let query = format!("DELETE FROM sliders WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Slider>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
