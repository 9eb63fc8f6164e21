//! Account use-case service: signup, login, session lookup, logout.
//!
//! # Invariants
//! - Raw session tokens leave this service only inside `SessionGrant`.
//! - Unknown username and wrong password produce the same form error.
//! - A session resolves to a user only before its `expires_at`.

use crate::model::form::FormErrors;
use crate::model::user::{invalid_login, LoginForm, SignupForm, User};
use crate::repo::user_repo::{AccountRepository, StoredCredentials};
use crate::repo::{now_epoch_ms, RepoError};
use crate::service::password::{hash_password, new_session_token, token_digest, verify_password};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Default session lifetime: two weeks.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(14 * 24 * 60 * 60);

#[derive(Debug)]
pub enum AccountServiceError {
    Form(FormErrors),
    /// Password hashing backend failure or malformed stored hash.
    Credentials(String),
    Repo(RepoError),
}

impl Display for AccountServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Form(errors) => write!(f, "invalid account form: {errors}"),
            Self::Credentials(message) => write!(f, "credential error: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Form(errors) => Some(errors),
            Self::Repo(err) => Some(err),
            Self::Credentials(_) => None,
        }
    }
}

impl From<RepoError> for AccountServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub user: User,
    /// Opaque token to hand to the client (cookie value).
    pub token: String,
    /// Expiry in epoch milliseconds.
    pub expires_at: i64,
}

pub struct AccountService<R: AccountRepository> {
    repo: R,
    session_ttl: Duration,
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub fn with_session_ttl(mut self, session_ttl: Duration) -> Self {
        self.session_ttl = session_ttl;
        self
    }

    /// Registers a new account.
    ///
    /// # Errors
    /// - `Form` for invalid fields or a taken username.
    pub fn signup(&self, form: &SignupForm) -> Result<User, AccountServiceError> {
        form.validate().map_err(AccountServiceError::Form)?;
        let password_hash =
            hash_password(&form.password1).map_err(AccountServiceError::Credentials)?;
        self.register(form.username.trim(), &password_hash)
    }

    /// Stores an account whose password is already hashed.
    ///
    /// Hashing is slow, so async callers run `hash_password` off the
    /// connection lock and hand the result here.
    pub fn register(&self, username: &str, password_hash: &str) -> Result<User, AccountServiceError> {
        match self.repo.create_user(username, password_hash) {
            Ok(user) => {
                info!(
                    "event=user_create module=account_service status=ok user_id={}",
                    user.id
                );
                Ok(user)
            }
            Err(RepoError::Duplicate { .. }) => Err(AccountServiceError::Form(FormErrors::single(
                "username",
                "A user with that username already exists.",
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Verifies credentials and opens a session.
    pub fn login(&self, form: &LoginForm) -> Result<SessionGrant, AccountServiceError> {
        form.validate().map_err(AccountServiceError::Form)?;
        let stored = self.lookup_credentials(&form.username)?;
        let user = authenticate(&form.password, stored)?;
        self.open_session(user)
    }

    /// Loads the stored hash for `username` (trimmed).
    pub fn lookup_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, AccountServiceError> {
        Ok(self.repo.find_credentials(username.trim())?)
    }

    /// Issues a fresh session for an authenticated user.
    pub fn open_session(&self, user: User) -> Result<SessionGrant, AccountServiceError> {
        let token = new_session_token();
        let ttl_ms = i64::try_from(self.session_ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = now_epoch_ms().saturating_add(ttl_ms);
        self.repo
            .create_session(&token_digest(&token), user.id, expires_at)?;
        info!("event=login module=account_service status=ok user_id={}", user.id);

        Ok(SessionGrant {
            user,
            token,
            expires_at,
        })
    }

    /// Resolves a client token to its user, if the session is still live.
    pub fn current_user(&self, token: &str) -> Result<Option<User>, AccountServiceError> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self
            .repo
            .find_session_user(&token_digest(token), now_epoch_ms())?)
    }

    /// Ends a session. Unknown tokens are ignored.
    pub fn logout(&self, token: &str) -> Result<(), AccountServiceError> {
        if self.repo.delete_session(&token_digest(token))? {
            info!("event=logout module=account_service status=ok");
        }
        Ok(())
    }

    /// Drops expired sessions. Returns how many were removed.
    pub fn purge_expired_sessions(&self) -> Result<usize, AccountServiceError> {
        let removed = self.repo.purge_expired_sessions(now_epoch_ms())?;
        if removed > 0 {
            info!("event=session_purge module=account_service status=ok removed={removed}");
        }
        Ok(removed)
    }
}

/// Checks `password` against looked-up credentials without touching storage.
///
/// Unknown user and wrong password both yield the generic login form error.
pub fn authenticate(
    password: &str,
    stored: Option<StoredCredentials>,
) -> Result<User, AccountServiceError> {
    let Some(stored) = stored else {
        info!("event=login module=account_service status=rejected reason=credentials");
        return Err(AccountServiceError::Form(invalid_login()));
    };
    let matches =
        verify_password(password, &stored.password_hash).map_err(AccountServiceError::Credentials)?;
    if !matches {
        info!("event=login module=account_service status=rejected reason=credentials");
        return Err(AccountServiceError::Form(invalid_login()));
    }
    Ok(stored.user)
}
