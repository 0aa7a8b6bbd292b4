use axum::Json;
use pagesmith_core::templates::{TemplateInfo, TEMPLATES};

use crate::response::DataResponse;

/// GET /api/v1/templates
pub async fn list() -> Json<DataResponse<&'static [TemplateInfo]>> {
    Json(DataResponse { data: TEMPLATES })
}
