use axum::routing::post;
use axum::Router;

use crate::handlers::rewrite;
use crate::state::AppState;

/// `POST /rewrite`.
pub fn router() -> Router<AppState> {
    Router::new().route("/rewrite", post(rewrite::rewrite))
}
