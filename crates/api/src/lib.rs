//! HTTP surface of the vitrine admin backend.
//!
//! Sliders, gallery items and blog posts each own one uploaded file. Handlers
//! validate the upload, write it, and hand the record write to the
//! [`Reconciler`](vitrine_core::reconcile::Reconciler) so file and record
//! stay consistent.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod multipart;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
