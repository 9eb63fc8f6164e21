//! HTTP surface for the yasite news and notes applications.
//!
//! Handlers are thin: they pick the caller from the session, run one core
//! service call under the connection lock and map the outcome onto a page,
//! a redirect or an error status.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod templates;

use std::sync::{Arc, Mutex};

use axum::{middleware, Router};
use rusqlite::Connection;

pub use config::{WebConfig, LOGIN_URL, SESSION_COOKIE};
pub use error::{AppError, AppResult};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    pub config: WebConfig,
}

impl AppState {
    /// Wraps an opened, migrated connection.
    pub fn new(conn: Connection, config: WebConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            config,
        }
    }

    /// Runs `work` with exclusive access to the connection.
    ///
    /// The guard never outlives `work`, so callers cannot hold it across an
    /// `.await`.
    pub fn with_db<T>(
        &self,
        work: impl FnOnce(&Connection) -> AppResult<T>,
    ) -> AppResult<T> {
        let conn = self.db.lock().map_err(|_| AppError::LockPoisoned)?;
        work(&conn)
    }
}

/// Builds the full router: news, accounts and notes behind the session layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::news::router())
        .merge(handlers::users::router())
        .merge(handlers::notes::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::session_middleware,
        ))
        .with_state(state)
}
