//! News articles and reader comments.
//!
//! # Invariants
//! - News rows are created out-of-band; the web surface only reads them.
//! - A comment belongs to exactly one news item and one author.
//! - Comments of one news item are listed by `created_at ASC, id ASC`.

use crate::model::form::{require, FormErrors};
use crate::model::user::UserId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type NewsId = i64;
pub type CommentId = i64;

/// Number of news items on the home page.
pub const NEWS_COUNT_ON_HOME_PAGE: u32 = 10;

/// Textual form of a publication date, as accepted on input and stored.
pub const NEWS_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    pub id: NewsId,
    pub title: String,
    pub text: String,
    pub date: NaiveDate,
}

/// Out-of-band publication request (CLI, fixtures).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNews {
    pub title: String,
    pub text: String,
    /// `None` means today.
    pub date: Option<NaiveDate>,
}

/// Parses a `YYYY-MM-DD` publication date, rejecting impossible calendar days.
pub fn parse_news_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), NEWS_DATE_FORMAT)
        .map_err(|err| format!("invalid date `{raw}` (expected YYYY-MM-DD): {err}"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    #[serde(rename = "news")]
    pub news_id: NewsId,
    #[serde(rename = "author")]
    pub author_id: UserId,
    /// Display name joined from `users`.
    pub author_username: String,
    pub text: String,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

/// Comment create/edit submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    /// Checks that the text is present. Content moderation runs separately.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        require(&mut errors, "text", &self.text);
        errors.into_result()
    }
}

/// A news item with its comments in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsDetail {
    pub news: News,
    pub comments: Vec<Comment>,
}
