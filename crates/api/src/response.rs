//! Shared response envelope types for API handlers.
//!
//! Single records use `{ "data": ... }`; lists serialize
//! [`archsite_db::list_query::Page`] directly as `{ "data", "pagination" }`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

