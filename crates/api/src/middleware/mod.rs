//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller from a provider-issued Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires `profiles.role = 'admin'`.

pub mod auth;
pub mod rbac;
