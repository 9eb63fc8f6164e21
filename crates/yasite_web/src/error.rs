//! HTTP error type.
//!
//! Every handler returns `AppResult`; service errors convert into `AppError`
//! and the response mapping lives in one place. Ownership failures are
//! reported as 404 so other users' records stay invisible.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use log::{error, warn};
use thiserror::Error;
use url::form_urlencoded::byte_serialize;
use yasite_core::{
    AccountServiceError, FormErrors, NewsServiceError, NoteServiceError, RepoError,
};

use crate::config::LOGIN_URL;

const NOT_FOUND_PAGE: &str = "<!DOCTYPE html><html><head><title>Not Found</title></head>\
<body><h1>Not Found</h1><p>The requested resource was not found on this server.</p></body></html>";
const SERVER_ERROR_PAGE: &str = "<!DOCTYPE html><html><head><title>Server Error</title></head>\
<body><h1>Server Error (500)</h1></body></html>";

#[derive(Debug, Error)]
pub enum AppError {
    /// Anonymous request for a page that needs a session.
    #[error("authentication required for `{next}`")]
    AuthRedirect { next: String },

    #[error("not found")]
    NotFound,

    /// Form errors that no handler turned into a re-rendered page.
    #[error("unhandled form errors: {0}")]
    Validation(FormErrors),

    #[error("storage error: {0}")]
    Repo(#[from] RepoError),

    #[error("credential error: {0}")]
    Credentials(String),

    #[error("template render error: {0}")]
    Template(#[from] askama::Error),

    #[error("database connection lock poisoned")]
    LockPoisoned,

    #[error("blocking task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::AuthRedirect { next } => found(&login_redirect_url(&next)),
            Self::NotFound => (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response(),
            Self::Validation(errors) => {
                warn!("event=http_error module=web status=rejected kind=validation fields={errors}");
                (StatusCode::BAD_REQUEST, errors.to_string()).into_response()
            }
            other => {
                error!("event=http_error module=web status=error error={other}");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(SERVER_ERROR_PAGE)).into_response()
            }
        }
    }
}

impl From<NoteServiceError> for AppError {
    fn from(value: NoteServiceError) -> Self {
        match value {
            NoteServiceError::Form(errors) => Self::Validation(errors),
            NoteServiceError::NoteNotFound(_) => Self::NotFound,
            NoteServiceError::Repo(err) => Self::Repo(err),
        }
    }
}

impl From<NewsServiceError> for AppError {
    fn from(value: NewsServiceError) -> Self {
        match value {
            NewsServiceError::Form(errors) => Self::Validation(errors),
            NewsServiceError::NewsNotFound(_) | NewsServiceError::CommentNotFound(_) => {
                Self::NotFound
            }
            NewsServiceError::Repo(err) => Self::Repo(err),
        }
    }
}

impl From<AccountServiceError> for AppError {
    fn from(value: AccountServiceError) -> Self {
        match value {
            AccountServiceError::Form(errors) => Self::Validation(errors),
            AccountServiceError::Credentials(message) => Self::Credentials(message),
            AccountServiceError::Repo(err) => Self::Repo(err),
        }
    }
}

/// `302 Found` to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Login page URL carrying `next` (path separators kept readable).
pub fn login_redirect_url(next: &str) -> String {
    let encoded: String = byte_serialize(next.as_bytes()).collect();
    format!("{LOGIN_URL}?next={}", encoded.replace("%2F", "/"))
}

#[cfg(test)]
mod tests {
    use super::{found, login_redirect_url, AppError};
    use axum::{
        http::{header, StatusCode},
        response::IntoResponse,
    };
    use yasite_core::{FormErrors, NewsServiceError, NoteServiceError};

    #[test]
    fn login_redirect_keeps_slashes_and_encodes_query() {
        assert_eq!(login_redirect_url("/notes/add/"), "/auth/login/?next=/notes/add/");
        assert_eq!(
            login_redirect_url("/notes/list/?a=1&b=2"),
            "/auth/login/?next=/notes/list/%3Fa%3D1%26b%3D2"
        );
    }

    #[test]
    fn auth_redirect_is_302_to_login() {
        let response = AppError::AuthRedirect {
            next: "/notes/list/".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/auth/login/?next=/notes/list/"
        );
    }

    #[test]
    fn ownership_failures_become_404() {
        let note: AppError = NoteServiceError::NoteNotFound("slug".to_string()).into();
        let comment: AppError = NewsServiceError::CommentNotFound(7).into();
        assert_eq!(note.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(comment.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn stray_form_errors_are_bad_request() {
        let err: AppError = NoteServiceError::Form(FormErrors::single("slug", "taken")).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn found_sets_location() {
        let response = found("/notes/done/");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/notes/done/");
    }
}
