pub mod health;
pub mod page;
pub mod project;
pub mod rewrite;
pub mod template;

use axum::middleware::from_fn;
use axum::Router;

use crate::middleware::security_headers::deny_framing;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /projects                          create
/// /projects/{id}                     get
/// /projects/{id}/sections            get, replace (PUT), patch (PATCH)
/// /rewrite                           rewrite (POST)
/// /templates                         list
///
/// /pages/{slug}                      display read (framable, cacheable)
/// ```
pub fn api_routes() -> Router<AppState> {
    let editing = Router::new()
        .nest("/projects", project::router())
        .merge(rewrite::router())
        .nest("/templates", template::router())
        .layer(from_fn(deny_framing));

    Router::new()
        .merge(editing)
        .nest("/pages", page::router())
}
