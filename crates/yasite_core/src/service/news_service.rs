//! News and comment use-case service.
//!
//! # Responsibility
//! - Public reads: home listing and news detail with comments.
//! - Authenticated comment creation bound to the caller and the news item.
//! - Author-only comment edit/delete.
//!
//! # Invariants
//! - The comment author always comes from the caller, never from input.
//! - Text containing a banned word is never stored (create or edit).
//! - Non-authors get `CommentNotFound`, same as for a missing comment.

use crate::model::form::FormErrors;
use crate::model::news::{
    Comment, CommentForm, CommentId, NewNews, News, NewsDetail, NewsId, NEWS_COUNT_ON_HOME_PAGE,
};
use crate::model::user::UserId;
use crate::moderation::word_filter;
use crate::repo::news_repo::NewsRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::access::owned_by;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum NewsServiceError {
    /// Submitted comment failed validation or moderation.
    Form(FormErrors),
    NewsNotFound(NewsId),
    /// Missing, or not owned by the caller.
    CommentNotFound(CommentId),
    Repo(RepoError),
}

impl Display for NewsServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Form(errors) => write!(f, "invalid comment form: {errors}"),
            Self::NewsNotFound(id) => write!(f, "news not found: {id}"),
            Self::CommentNotFound(id) => write!(f, "comment not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NewsServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Form(errors) => Some(errors),
            Self::Repo(err) => Some(err),
            Self::NewsNotFound(_) | Self::CommentNotFound(_) => None,
        }
    }
}

impl From<RepoError> for NewsServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, key } => match (entity, key.parse::<i64>()) {
                ("comment", Ok(id)) => Self::CommentNotFound(id),
                ("news", Ok(id)) => Self::NewsNotFound(id),
                _ => Self::Repo(RepoError::NotFound { entity, key }),
            },
            other => Self::Repo(other),
        }
    }
}

/// News service facade over a repository implementation.
pub struct NewsService<R: NewsRepository> {
    repo: R,
}

impl<R: NewsRepository> NewsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Latest news for the home page, newest first.
    pub fn home(&self) -> RepoResult<Vec<News>> {
        self.repo.list_latest_news(NEWS_COUNT_ON_HOME_PAGE)
    }

    /// One news item with its comments in creation order.
    pub fn detail(&self, news_id: NewsId) -> Result<NewsDetail, NewsServiceError> {
        let news = self.require_news(news_id)?;
        let comments = self.repo.list_comments(news_id)?;
        Ok(NewsDetail { news, comments })
    }

    /// Publishes a news item. Not reachable from the web surface.
    pub fn publish(&self, news: &NewNews) -> RepoResult<News> {
        let created = self.repo.create_news(news)?;
        info!(
            "event=news_publish module=news_service status=ok news_id={}",
            created.id
        );
        Ok(created)
    }

    /// Adds a comment by `author_id` under `news_id`.
    ///
    /// # Errors
    /// - `NewsNotFound` when the news item does not exist.
    /// - `Form` for blank text or a banned word (`text` field, fixed warning).
    pub fn create_comment(
        &self,
        author_id: UserId,
        news_id: NewsId,
        form: &CommentForm,
    ) -> Result<Comment, NewsServiceError> {
        self.require_news(news_id)?;
        check_comment(form)?;
        let comment = self.repo.create_comment(news_id, author_id, &form.text)?;
        info!(
            "event=comment_create module=news_service status=ok comment_id={} news_id={news_id} author_id={author_id}",
            comment.id
        );
        Ok(comment)
    }

    /// Loads a comment for its author (edit/delete pages).
    pub fn get_own_comment(
        &self,
        author_id: UserId,
        comment_id: CommentId,
    ) -> Result<Comment, NewsServiceError> {
        owned_by(self.repo.get_comment(comment_id)?, author_id)
            .ok_or(NewsServiceError::CommentNotFound(comment_id))
    }

    /// Replaces the text of the caller's comment.
    pub fn update_comment(
        &self,
        author_id: UserId,
        comment_id: CommentId,
        form: &CommentForm,
    ) -> Result<Comment, NewsServiceError> {
        self.get_own_comment(author_id, comment_id)?;
        check_comment(form)?;
        let comment = self.repo.update_comment_text(comment_id, &form.text)?;
        info!(
            "event=comment_update module=news_service status=ok comment_id={comment_id} author_id={author_id}"
        );
        Ok(comment)
    }

    /// Deletes the caller's comment and returns the news item it belonged to.
    pub fn delete_comment(
        &self,
        author_id: UserId,
        comment_id: CommentId,
    ) -> Result<NewsId, NewsServiceError> {
        let comment = self.get_own_comment(author_id, comment_id)?;
        self.repo.delete_comment(comment_id)?;
        info!(
            "event=comment_delete module=news_service status=ok comment_id={comment_id} news_id={} author_id={author_id}",
            comment.news_id
        );
        Ok(comment.news_id)
    }

    /// Total number of stored comments (all news).
    pub fn count_comments(&self) -> RepoResult<u64> {
        self.repo.count_comments()
    }

    fn require_news(&self, news_id: NewsId) -> Result<News, NewsServiceError> {
        self.repo
            .get_news(news_id)?
            .ok_or(NewsServiceError::NewsNotFound(news_id))
    }
}

fn check_comment(form: &CommentForm) -> Result<(), NewsServiceError> {
    form.validate()
        .and_then(|()| word_filter::check_text("text", &form.text))
        .map_err(|errors| {
            debug!("event=comment_validate module=news_service status=rejected");
            NewsServiceError::Form(errors)
        })
}

#[cfg(test)]
mod tests {
    use super::NewsServiceError;
    use crate::repo::RepoError;

    #[test]
    fn missing_rows_map_to_not_found_variants() {
        let comment = NewsServiceError::from(RepoError::NotFound {
            entity: "comment",
            key: "7".to_string(),
        });
        let news = NewsServiceError::from(RepoError::NotFound {
            entity: "news",
            key: "3".to_string(),
        });
        let odd_key = NewsServiceError::from(RepoError::NotFound {
            entity: "comment",
            key: "seven".to_string(),
        });

        assert!(matches!(comment, NewsServiceError::CommentNotFound(7)));
        assert!(matches!(news, NewsServiceError::NewsNotFound(3)));
        assert!(matches!(odd_key, NewsServiceError::Repo(RepoError::NotFound { .. })));
    }
}
