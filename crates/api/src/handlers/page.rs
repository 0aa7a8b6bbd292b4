//! Display read path used by the page renderer.
//!
//! Unlike the admin read, this path hides anything that is not ready to be
//! shown: pending or failed projects, projects without a page, and expired
//! demo projects all come back as `NotFound`.

use axum::extract::{Path, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use pagesmith_core::error::CoreError;
use pagesmith_core::project::BrandStyle;
use pagesmith_core::sections::SectionsDocument;
use pagesmith_core::visibility::{is_displayable, robots_directive};
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

pub const CACHE_PUBLIC: &str = "public, max-age=3600";
pub const CACHE_NONE: &str = "no-store";

static X_ROBOTS_TAG: HeaderName = HeaderName::from_static("x-robots-tag");

/// What the renderer needs to draw a page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPage {
    pub client_name: String,
    pub template_key: String,
    pub brand_style: Option<BrandStyle>,
    pub sections: SectionsDocument,
    pub is_demo: bool,
    pub robots: &'static str,
}

/// GET /api/v1/pages/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let not_found = || CoreError::NotFound {
        entity: "Page",
        id: slug.clone(),
    };

    let project = state
        .store
        .find_project_by_slug(&slug)
        .await?
        .ok_or_else(not_found)?;
    let page = state.store.find_page(project.id).await?;
    if !is_displayable(&project, page.is_some(), Utc::now()) {
        tracing::debug!(slug = %slug, status = %project.status, "Page not displayable");
        return Err(not_found().into());
    }
    let Some(page) = page else {
        return Err(not_found().into());
    };
    let brand_style = state.store.find_brand_style(project.id).await?;

    let robots = robots_directive(state.pipeline.demo_mode, project.expires_at);
    let cache = if state.config.cache_pages {
        CACHE_PUBLIC
    } else {
        CACHE_NONE
    };

    let body = DisplayPage {
        client_name: project.client_name,
        template_key: project.template_key,
        brand_style,
        sections: page.sections,
        is_demo: state.pipeline.demo_mode || project.expires_at.is_some(),
        robots,
    };

    Ok((
        [
            (CACHE_CONTROL, HeaderValue::from_static(cache)),
            (X_ROBOTS_TAG.clone(), HeaderValue::from_static(robots)),
        ],
        Json(body),
    )
        .into_response())
}
