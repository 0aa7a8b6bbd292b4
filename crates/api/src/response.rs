//! Shared response envelope types for API handlers.

use serde::Serialize;

/// `{ "data": T }` envelope used by collection endpoints.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
