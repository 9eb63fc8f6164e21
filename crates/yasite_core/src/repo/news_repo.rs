//! News and comment persistence.
//!
//! # Invariants
//! - Home listing is `date DESC, id DESC`, capped by the caller's limit.
//! - Comments of one news item are returned `created_at ASC, id ASC`.
//! - Comment updates touch `text` only; `news_id`/`author_id` are immutable.

use crate::model::news::{Comment, CommentId, NewNews, News, NewsId};
use crate::model::user::UserId;
use crate::repo::{ensure_tables, now_epoch_ms, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const COMMENT_SELECT_SQL: &str = "SELECT
    c.id,
    c.news_id,
    c.author_id,
    u.username AS author_username,
    c.text,
    c.created_at
FROM comments c
INNER JOIN users u ON u.id = c.author_id";

/// Repository interface for news and comments.
pub trait NewsRepository {
    fn create_news(&self, news: &NewNews) -> RepoResult<News>;
    fn get_news(&self, news_id: NewsId) -> RepoResult<Option<News>>;
    /// Latest news first, at most `limit` rows.
    fn list_latest_news(&self, limit: u32) -> RepoResult<Vec<News>>;
    fn create_comment(&self, news_id: NewsId, author_id: UserId, text: &str)
        -> RepoResult<Comment>;
    fn get_comment(&self, comment_id: CommentId) -> RepoResult<Option<Comment>>;
    /// Comments of one news item in creation order.
    fn list_comments(&self, news_id: NewsId) -> RepoResult<Vec<Comment>>;
    fn update_comment_text(&self, comment_id: CommentId, text: &str) -> RepoResult<Comment>;
    fn delete_comment(&self, comment_id: CommentId) -> RepoResult<()>;
    fn count_comments(&self) -> RepoResult<u64>;
}

/// SQLite-backed news repository.
pub struct SqliteNewsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNewsRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users", "news", "comments"])?;
        Ok(Self { conn })
    }
}

impl NewsRepository for SqliteNewsRepository<'_> {
    fn create_news(&self, news: &NewNews) -> RepoResult<News> {
        self.conn.execute(
            "INSERT INTO news (title, text, date) VALUES (?1, ?2, COALESCE(?3, date('now')));",
            params![news.title, news.text, news.date],
        )?;
        let news_id = self.conn.last_insert_rowid();
        self.get_news(news_id)?
            .ok_or_else(|| RepoError::InvalidData(format!("news {news_id} missing after insert")))
    }

    fn get_news(&self, news_id: NewsId) -> RepoResult<Option<News>> {
        let news = self
            .conn
            .query_row(
                "SELECT id, title, text, date FROM news WHERE id = ?1;",
                [news_id],
                map_news,
            )
            .optional()?;
        Ok(news)
    }

    fn list_latest_news(&self, limit: u32) -> RepoResult<Vec<News>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, text, date
             FROM news
             ORDER BY date DESC, id DESC
             LIMIT ?1;",
        )?;
        let news = stmt
            .query_map([i64::from(limit)], map_news)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(news)
    }

    fn create_comment(
        &self,
        news_id: NewsId,
        author_id: UserId,
        text: &str,
    ) -> RepoResult<Comment> {
        self.conn.execute(
            "INSERT INTO comments (news_id, author_id, text, created_at) VALUES (?1, ?2, ?3, ?4);",
            params![news_id, author_id, text, now_epoch_ms()],
        )?;
        let comment_id = self.conn.last_insert_rowid();
        self.get_comment(comment_id)?
            .ok_or_else(|| comment_not_found(comment_id))
    }

    fn get_comment(&self, comment_id: CommentId) -> RepoResult<Option<Comment>> {
        let sql = format!("{COMMENT_SELECT_SQL} WHERE c.id = ?1;");
        let comment = self
            .conn
            .query_row(&sql, [comment_id], map_comment)
            .optional()?;
        Ok(comment)
    }

    fn list_comments(&self, news_id: NewsId) -> RepoResult<Vec<Comment>> {
        let sql = format!("{COMMENT_SELECT_SQL} WHERE c.news_id = ?1 ORDER BY c.created_at ASC, c.id ASC;");
        let mut stmt = self.conn.prepare(&sql)?;
        let comments = stmt
            .query_map([news_id], map_comment)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    fn update_comment_text(&self, comment_id: CommentId, text: &str) -> RepoResult<Comment> {
        let changed = self.conn.execute(
            "UPDATE comments SET text = ?2 WHERE id = ?1;",
            params![comment_id, text],
        )?;
        if changed == 0 {
            return Err(comment_not_found(comment_id));
        }
        self.get_comment(comment_id)?
            .ok_or_else(|| comment_not_found(comment_id))
    }

    fn delete_comment(&self, comment_id: CommentId) -> RepoResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM comments WHERE id = ?1;", [comment_id])?;
        if removed == 0 {
            return Err(comment_not_found(comment_id));
        }
        Ok(())
    }

    fn count_comments(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM comments;", [], |row| row.get(0))?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }
}

fn map_news(row: &Row<'_>) -> rusqlite::Result<News> {
    Ok(News {
        id: row.get("id")?,
        title: row.get("title")?,
        text: row.get("text")?,
        date: row.get("date")?,
    })
}

fn map_comment(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        news_id: row.get("news_id")?,
        author_id: row.get("author_id")?,
        author_username: row.get("author_username")?,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
    })
}

fn comment_not_found(comment_id: CommentId) -> RepoError {
    RepoError::NotFound {
        entity: "comment",
        key: comment_id.to_string(),
    }
}
