//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signed access tokens bound to an admin id and expiry.
//! - [`cookie`] -- the HTTP-only cookie carrying the access token.
//! - [`credentials`] -- admin registration and credential checks.

pub mod cookie;
pub mod credentials;
pub mod jwt;
pub mod password;
