pub mod auth;
pub mod blog;
pub mod gallery;
pub mod slider;
