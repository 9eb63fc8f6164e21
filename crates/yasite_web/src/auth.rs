//! Session resolution and authentication extractors.
//!
//! `session_middleware` turns the `sessionid` cookie into a `User` stored in
//! request extensions. Handlers then pick the extractor matching the page:
//! `WebAuthUser` redirects anonymous requests to the login page,
//! `OptionalAuthUser` lets them through.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use log::{debug, warn};
use yasite_core::{AccountService, SqliteAccountRepository, User};

use crate::config::SESSION_COOKIE;
use crate::error::AppError;
use crate::AppState;

/// Signed-in user required; anonymous requests get `302` to login.
#[derive(Debug, Clone)]
pub struct WebAuthUser(pub User);

impl std::ops::Deref for WebAuthUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for WebAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(WebAuthUser)
            .ok_or_else(|| AppError::AuthRedirect {
                next: parts
                    .uri
                    .path_and_query()
                    .map(|value| value.as_str().to_string())
                    .unwrap_or_else(|| parts.uri.path().to_string()),
            })
    }
}

/// Signed-in user if any, for public pages.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(parts.extensions.get::<User>().cloned()))
    }
}

/// Resolves the session cookie. Unknown or expired tokens leave the request
/// anonymous; a storage failure fails closed the same way.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string()) {
        match resolve_session(&state, &token) {
            Ok(Some(user)) => {
                request.extensions_mut().insert(user);
            }
            Ok(None) => {
                debug!("event=session_resolve module=web status=rejected reason=unknown_or_expired");
            }
            Err(err) => {
                warn!("event=session_resolve module=web status=error error={err}");
            }
        }
    }
    next.run(request).await
}

fn resolve_session(state: &AppState, token: &str) -> Result<Option<User>, AppError> {
    state.with_db(|conn| {
        let accounts = AccountService::new(SqliteAccountRepository::try_new(conn)?);
        Ok(accounts.current_user(token)?)
    })
}
