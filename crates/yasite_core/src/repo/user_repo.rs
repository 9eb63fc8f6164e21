//! Account and session persistence.
//!
//! # Invariants
//! - Usernames are unique (`users.username UNIQUE`).
//! - Sessions are stored by token digest only; raw tokens never reach SQL.
//! - Expired sessions never resolve to a user.

use crate::model::user::{User, UserId};
use crate::repo::{ensure_tables, map_unique, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Stored credential row, used only by the account service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Repository interface for users and their sessions.
pub trait AccountRepository {
    /// Inserts a user; `Duplicate` when the username is taken.
    fn create_user(&self, username: &str, password_hash: &str) -> RepoResult<User>;
    fn find_credentials(&self, username: &str) -> RepoResult<Option<StoredCredentials>>;
    fn create_session(&self, token_hash: &str, user_id: UserId, expires_at: i64)
        -> RepoResult<()>;
    /// Resolves a live (not expired at `now`) session to its user.
    fn find_session_user(&self, token_hash: &str, now: i64) -> RepoResult<Option<User>>;
    /// Removes one session. Returns whether a row was removed.
    fn delete_session(&self, token_hash: &str) -> RepoResult<bool>;
    /// Removes sessions expired at `now`. Returns the removed count.
    fn purge_expired_sessions(&self, now: i64) -> RepoResult<usize>;
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users", "sessions"])?;
        Ok(Self { conn })
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn create_user(&self, username: &str, password_hash: &str) -> RepoResult<User> {
        self.conn
            .execute(
                "INSERT INTO users (username, password_hash) VALUES (?1, ?2);",
                params![username, password_hash],
            )
            .map_err(|err| map_unique(err, "user", "username"))?;

        Ok(User {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
        })
    }

    fn find_credentials(&self, username: &str) -> RepoResult<Option<StoredCredentials>> {
        let found = self
            .conn
            .query_row(
                "SELECT id, username, password_hash FROM users WHERE username = ?1;",
                [username],
                |row| {
                    Ok(StoredCredentials {
                        user: User {
                            id: row.get("id")?,
                            username: row.get("username")?,
                        },
                        password_hash: row.get("password_hash")?,
                    })
                },
            )
            .optional()?;
        Ok(found)
    }

    fn create_session(
        &self,
        token_hash: &str,
        user_id: UserId,
        expires_at: i64,
    ) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES (?1, ?2, ?3);",
                params![token_hash, user_id, expires_at],
            )
            .map_err(|err| map_unique(err, "session", "token_hash"))?;
        Ok(())
    }

    fn find_session_user(&self, token_hash: &str, now: i64) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT u.id, u.username
                 FROM sessions s
                 INNER JOIN users u ON u.id = s.user_id
                 WHERE s.token_hash = ?1
                   AND s.expires_at > ?2;",
                params![token_hash, now],
                |row| {
                    Ok(User {
                        id: row.get("id")?,
                        username: row.get("username")?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    fn delete_session(&self, token_hash: &str) -> RepoResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM sessions WHERE token_hash = ?1;", [token_hash])?;
        Ok(removed > 0)
    }

    fn purge_expired_sessions(&self, now: i64) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM sessions WHERE expires_at <= ?1;", [now])?;
        Ok(removed)
    }
}

