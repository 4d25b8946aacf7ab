//! Shared response envelope types for API handlers.
//!
//! List and detail responses use a `{ "data": ... }` envelope. Use
//! [`DataResponse`] rather than ad-hoc `json!` so the shape is checked at
//! compile time.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A page of results plus the total row count.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
