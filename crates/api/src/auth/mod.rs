//! Authentication primitives.
//!
//! - [`password`] -- Argon2id credential hashing and verification.
//! - [`jwt`] -- session token issuance and verification.
//! - [`service`] -- login, token check/refresh, password change, bearer resolution.

pub mod jwt;
pub mod password;
pub mod service;

pub use service::{AuthError, AuthFailure, AuthService};
