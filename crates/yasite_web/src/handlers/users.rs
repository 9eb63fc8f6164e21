//! Signup, login and logout.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use rusqlite::Connection;
use serde::Deserialize;
use yasite_core::{
    authenticate, hash_password, AccountService, AccountServiceError, FormErrors, LoginForm,
    SessionGrant, SignupForm, SqliteAccountRepository,
};

use crate::auth::OptionalAuthUser;
use crate::config::{LOGIN_URL, SESSION_COOKIE};
use crate::error::{found, AppError, AppResult};
use crate::handlers::render_page;
use crate::templates::{LoginTemplate, LogoutTemplate, SignupTemplate};
use crate::AppState;

/// Default landing page after login.
const HOME_URL: &str = "/";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login/", get(login_page).post(login))
        .route("/auth/logout/", get(logout).post(logout))
        .route("/auth/signup/", get(signup_page).post(signup))
}

#[derive(Debug, Default, Deserialize)]
struct NextQuery {
    #[serde(default)]
    next: Option<String>,
}

/// Login submission including the hidden `next` field.
#[derive(Debug, Default, Deserialize)]
struct LoginSubmission {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    next: Option<String>,
}

fn account_service<'conn>(
    state: &AppState,
    conn: &'conn Connection,
) -> AppResult<AccountService<SqliteAccountRepository<'conn>>> {
    Ok(AccountService::new(SqliteAccountRepository::try_new(conn)?)
        .with_session_ttl(state.config.session_ttl))
}

/// Keeps only local redirect targets.
pub(crate) fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(target)
            if target.starts_with('/') && !target.starts_with("//") && !target.contains('\\') =>
        {
            target
        }
        _ => HOME_URL,
    }
}

async fn login_page(
    OptionalAuthUser(user): OptionalAuthUser,
    Query(query): Query<NextQuery>,
) -> AppResult<Response> {
    render_page(&LoginTemplate {
        user,
        form: LoginForm::default(),
        errors: FormErrors::new(),
        next: safe_next(query.next.as_deref()).to_string(),
    })
}

async fn login(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
    jar: CookieJar,
    Query(query): Query<NextQuery>,
    Form(submission): Form<LoginSubmission>,
) -> AppResult<Response> {
    let next = safe_next(submission.next.as_deref().or(query.next.as_deref())).to_string();
    let form = LoginForm {
        username: submission.username,
        password: submission.password,
    };

    let outcome = open_session(&state, &form).await?;

    match outcome {
        Ok(grant) => {
            let cookie = Cookie::build((SESSION_COOKIE, grant.token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(state.config.secure_cookies);
            Ok((jar.add(cookie), found(&next)).into_response())
        }
        Err(errors) => render_page(&LoginTemplate {
            user,
            form: LoginForm {
                username: form.username,
                password: String::new(),
            },
            errors,
            next,
        }),
    }
}

/// Checks a login form and opens a session, or returns the form errors.
///
/// Password verification runs on the blocking pool while the connection
/// lock is free.
async fn open_session(
    state: &AppState,
    form: &LoginForm,
) -> AppResult<Result<SessionGrant, FormErrors>> {
    if let Err(errors) = form.validate() {
        return Ok(Err(errors));
    }
    let stored = state.with_db(|conn| {
        Ok(account_service(state, conn)?.lookup_credentials(&form.username)?)
    })?;
    let password = form.password.clone();
    match tokio::task::spawn_blocking(move || authenticate(&password, stored)).await? {
        Ok(user) => {
            let grant =
                state.with_db(|conn| Ok(account_service(state, conn)?.open_session(user)?))?;
            Ok(Ok(grant))
        }
        Err(AccountServiceError::Form(errors)) => Ok(Err(errors)),
        Err(err) => Err(err.into()),
    }
}

async fn logout(State(state): State<AppState>, jar: CookieJar) -> AppResult<Response> {
    if let Some(token) = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string()) {
        state.with_db(|conn| Ok(account_service(&state, conn)?.logout(&token)?))?;
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    let page = render_page(&LogoutTemplate { user: None })?;
    Ok((jar, page).into_response())
}

async fn signup_page(OptionalAuthUser(user): OptionalAuthUser) -> AppResult<Response> {
    render_page(&SignupTemplate {
        user,
        form: SignupForm::default(),
        errors: FormErrors::new(),
    })
}

async fn signup(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    let outcome = match form.validate() {
        Ok(()) => {
            let password = form.password1.clone();
            // Hash before taking the connection lock.
            let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
                .await?
                .map_err(AppError::Credentials)?;
            state.with_db(|conn| {
                match account_service(&state, conn)?.register(form.username.trim(), &password_hash) {
                    Ok(_) => Ok(None),
                    Err(AccountServiceError::Form(errors)) => Ok(Some(errors)),
                    Err(err) => Err(err.into()),
                }
            })?
        }
        Err(errors) => Some(errors),
    };
    match outcome {
        None => Ok(found(LOGIN_URL)),
        Some(errors) => render_page(&SignupTemplate {
            user,
            form: SignupForm {
                username: form.username,
                ..SignupForm::default()
            },
            errors,
        }),
    }
}
