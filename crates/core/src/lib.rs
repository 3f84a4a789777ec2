//! Domain building blocks shared by the database and HTTP layers.
//!
//! - [`upload`] -- per-resource upload policies, validation, generated names.
//! - [`file_store`] -- the partitioned on-disk upload root.
//! - [`reconcile`] -- keeps a stored file and its record consistent.
//! - [`pagination`] -- page/limit arithmetic for list endpoints.

pub mod error;
pub mod file_store;
pub mod pagination;
pub mod reconcile;
pub mod types;
pub mod upload;
