//! Route handlers, one module per application.

pub mod news;
pub mod notes;
pub mod users;

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::error::{AppError, AppResult};

/// Renders a page as `200 OK` HTML.
pub(crate) fn render_page<T: Template>(page: &T) -> AppResult<Response> {
    Ok(Html(page.render()?).into_response())
}

/// Parses a numeric path segment. Anything else does not name a resource.
pub(crate) fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(AppError::NotFound)
}
