use axum::routing::get;
use axum::Router;

use crate::handlers::page;
use crate::state::AppState;

/// Routes mounted at `/pages`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{slug}", get(page::get_by_slug))
}
