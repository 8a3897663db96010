//! Well-known values of the `profiles.role` column.
//!
//! These must match the check constraint in `20261016000001_create_profiles.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
