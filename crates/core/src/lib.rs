//! Domain building blocks shared by the database and API crates.
//!
//! Nothing in here talks to Postgres or HTTP.

pub mod error;
pub mod pagination;
pub mod retry;
pub mod roles;
pub mod slug;
pub mod types;
pub mod validation;
