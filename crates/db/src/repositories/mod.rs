//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod admin_repo;
pub mod blog_repo;
pub mod gallery_repo;
pub mod slider_repo;

pub use admin_repo::AdminRepo;
pub use blog_repo::BlogRepo;
pub use gallery_repo::GalleryRepo;
pub use slider_repo::SliderRepo;
