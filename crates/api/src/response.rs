//! Shared response envelope for API handlers.
//!
//! Resource endpoints (handler settings, option lists) answer with
//! `{ "data": ... }`. The decision endpoints keep their flat wire shape
//! because the form client reads them directly.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
