//! Repository for the `blogs` table.

use sqlx::PgPool;
use vitrine_core::types::DbId;

use crate::models::blog::{Blog, CreateBlog, UpdateBlog};

const COLUMNS: &str = "id, title, description, image_file_name, image_file_path, image_url, \
                       image_file_size, image_mime_type, uploaded_by, created_at, updated_at";

pub struct BlogRepo;

impl BlogRepo {
    pub async fn create(pool: &PgPool, input: &CreateBlog) -> Result<Blog, sqlx::Error> {
        let query = format!(
            "INSERT INTO blogs
                (title, description, image_file_name, image_file_path, image_url,
                 image_file_size, image_mime_type, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Blog>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.image.file_name)
            .bind(&input.image.file_path)
            .bind(&input.image.url)
            .bind(input.image.file_size)
            .bind(&input.image.mime_type)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Blog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blogs WHERE id = $1");
        sqlx::query_as::<_, Blog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All posts, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Blog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blogs ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Blog>(&query).fetch_all(pool).await
    }

    /// Update a post. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBlog,
    ) -> Result<Option<Blog>, sqlx::Error> {
        let query = format!(
            "UPDATE blogs SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                image_file_name = COALESCE($4, image_file_name),
                image_file_path = COALESCE($5, image_file_path),
                image_url = COALESCE($6, image_url),
                image_file_size = COALESCE($7, image_file_size),
                image_mime_type = COALESCE($8, image_mime_type)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let image = input.image.as_ref();
        sqlx::query_as::<_, Blog>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(image.map(|i| i.file_name.as_str()))
            .bind(image.map(|i| i.file_path.as_str()))
            .bind(image.map(|i| i.url.as_str()))
            .bind(image.map(|i| i.file_size))
            .bind(image.map(|i| i.mime_type.as_str()))
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Blog>, sqlx::Error> {
        let query = format!("DELETE FROM blogs WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Blog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
