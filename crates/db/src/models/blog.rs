//! Blog post model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use vitrine_core::types::{DbId, Timestamp};

/// Row from the `blogs` table. Every post owns exactly one image.
#[derive(Debug, Clone, FromRow)]
pub struct Blog {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub image_file_name: String,
    pub image_file_path: String,
    pub image_url: String,
    pub image_file_size: i64,
    pub image_mime_type: String,
    pub uploaded_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// API shape of a blog post with its image nested.
#[derive(Debug, Clone, Serialize)]
pub struct BlogResponse {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub image: BlogImage,
    pub uploaded_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogImage {
    pub file_name: String,
    pub url: String,
    pub file_size: i64,
    pub mime_type: String,
}

impl From<Blog> for BlogResponse {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            description: blog.description,
            image: BlogImage {
                file_name: blog.image_file_name,
                url: blog.image_url,
                file_size: blog.image_file_size,
                mime_type: blog.image_mime_type,
            },
            uploaded_by: blog.uploaded_by,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

/// Image columns of a blog post.
#[derive(Debug, Clone)]
pub struct BlogImageFile {
    pub file_name: String,
    pub file_path: String,
    pub url: String,
    pub file_size: i64,
    pub mime_type: String,
}

#[derive(Debug)]
pub struct CreateBlog {
    pub title: String,
    pub description: String,
    pub image: BlogImageFile,
    pub uploaded_by: DbId,
}

#[derive(Debug, Default)]
pub struct UpdateBlog {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<BlogImageFile>,
}
