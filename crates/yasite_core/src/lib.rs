//! Core domain logic for the yasite notes and news applications.
//! This crate is the single source of truth for ownership, uniqueness and
//! moderation rules; the web layer only maps them onto HTTP.

pub mod db;
pub mod logging;
pub mod model;
pub mod moderation;
pub mod repo;
pub mod service;

pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget,
};
pub use model::form::FormErrors;
pub use model::news::{
    parse_news_date, Comment, CommentForm, CommentId, NewNews, News, NewsDetail, NewsId,
};
pub use model::note::{Note, NoteDraft, NoteForm, NoteId};
pub use model::user::{LoginForm, SignupForm, User, UserId};
pub use moderation::word_filter::{BAD_WORDS, WARNING};
pub use repo::news_repo::{NewsRepository, SqliteNewsRepository};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::user_repo::{AccountRepository, SqliteAccountRepository, StoredCredentials};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::{
    authenticate, AccountService, AccountServiceError, SessionGrant,
};
pub use service::news_service::{NewsService, NewsServiceError};
pub use service::note_service::{NoteService, NoteServiceError};
pub use service::password::hash_password;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
