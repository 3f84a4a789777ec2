//! Repository for the `gallery_items` table.

use sqlx::PgPool;
use vitrine_core::pagination::PageRequest;
use vitrine_core::types::DbId;

use crate::models::gallery::{CreateGalleryItem, GalleryItem, UpdateGalleryItem};

const COLUMNS: &str = "id, media_type, name, file_name, file_path, file_url, file_size, \
                       mime_type, thumbnail, duration, width, height, is_active, uploaded_by, \
                       created_at, updated_at";

/// Shared filter for listing and counting: active items, optional type,
/// optional case-insensitive name match.
const LIST_FILTER: &str = "is_active = TRUE
    AND ($1::TEXT IS NULL OR media_type = $1)
    AND ($2::TEXT IS NULL OR name ILIKE $2 ESCAPE '\\')";

pub struct GalleryRepo;

impl GalleryRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateGalleryItem,
    ) -> Result<GalleryItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO gallery_items
                (media_type, name, file_name, file_path, file_url, file_size, mime_type,
                 duration, width, height, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GalleryItem>(&query)
            .bind(&input.media_type)
            .bind(&input.name)
            .bind(&input.file.file_name)
            .bind(&input.file.file_path)
            .bind(&input.file.file_url)
            .bind(input.file.file_size)
            .bind(&input.file.mime_type)
            .bind(input.duration)
            .bind(input.file.width)
            .bind(input.file.height)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<GalleryItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gallery_items WHERE id = $1");
        sqlx::query_as::<_, GalleryItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of active items, newest first, plus the total matching count.
    pub async fn list(
        pool: &PgPool,
        media_type: Option<&str>,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<(Vec<GalleryItem>, i64), sqlx::Error> {
        let pattern = search.map(|s| format!("%{}%", escape_like(s)));

        let query = format!(
            "SELECT {COLUMNS} FROM gallery_items
             WHERE {LIST_FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, GalleryItem>(&query)
            .bind(media_type)
            .bind(pattern.as_deref())
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM gallery_items WHERE {LIST_FILTER}");
        let total = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(media_type)
            .bind(pattern.as_deref())
            .fetch_one(pool)
            .await?;

        Ok((items, total))
    }

    /// Update a gallery item. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGalleryItem,
    ) -> Result<Option<GalleryItem>, sqlx::Error> {
        let query = format!(
            "UPDATE gallery_items SET
                media_type = COALESCE($2, media_type),
                name = COALESCE($3, name),
                is_active = COALESCE($4, is_active),
                duration = CASE WHEN $2::TEXT = 'photo' THEN NULL ELSE COALESCE($5, duration) END,
                file_name = COALESCE($6, file_name),
                file_path = COALESCE($7, file_path),
                file_url = COALESCE($8, file_url),
                file_size = COALESCE($9, file_size),
                mime_type = COALESCE($10, mime_type),
                width = CASE WHEN $6::TEXT IS NULL THEN width ELSE $11 END,
                height = CASE WHEN $6::TEXT IS NULL THEN height ELSE $12 END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let file = input.file.as_ref();
        sqlx::query_as::<_, GalleryItem>(&query)
            .bind(id)
            .bind(&input.media_type)
            .bind(&input.name)
            .bind(input.is_active)
            .bind(input.duration)
            .bind(file.map(|f| f.file_name.as_str()))
            .bind(file.map(|f| f.file_path.as_str()))
            .bind(file.map(|f| f.file_url.as_str()))
            .bind(file.map(|f| f.file_size))
            .bind(file.map(|f| f.mime_type.as_str()))
            .bind(file.and_then(|f| f.width))
            .bind(file.and_then(|f| f.height))
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<GalleryItem>, sqlx::Error> {
        let query = format!("DELETE FROM gallery_items WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, GalleryItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

/// Escape `LIKE` wildcards so user input only matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
