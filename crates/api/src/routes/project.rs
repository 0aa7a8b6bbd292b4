use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{project, sections};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// GET    /{id}/sections    -> sections::get
/// PUT    /{id}/sections    -> sections::replace
/// PATCH  /{id}/sections    -> sections::patch
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(project::create))
        .route("/{id}", get(project::get_by_id))
        .route(
            "/{id}/sections",
            get(sections::get)
                .put(sections::replace)
                .patch(sections::patch),
        )
}
