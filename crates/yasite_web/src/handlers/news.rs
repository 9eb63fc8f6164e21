//! News pages and comment create/edit/delete.

use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Form, Router,
};
use rusqlite::Connection;
use yasite_core::{
    CommentForm, FormErrors, NewsId, NewsService, NewsServiceError, SqliteNewsRepository,
};

use crate::auth::{OptionalAuthUser, WebAuthUser};
use crate::error::{found, AppResult};
use crate::handlers::{parse_id, render_page};
use crate::templates::{
    CommentDeleteTemplate, CommentEditTemplate, NewsDetailTemplate, NewsHomeTemplate,
};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/news/{id}/", get(detail).post(create_comment))
        .route(
            "/edit_comment/{id}/",
            get(edit_comment_page).post(edit_comment),
        )
        .route(
            "/delete_comment/{id}/",
            get(delete_comment_page)
                .post(delete_comment)
                .delete(delete_comment),
        )
}

fn news_service(conn: &Connection) -> AppResult<NewsService<SqliteNewsRepository<'_>>> {
    Ok(NewsService::new(SqliteNewsRepository::try_new(conn)?))
}

/// Where comment actions land: the comment block of the news page.
fn comments_url(news_id: NewsId) -> String {
    format!("/news/{news_id}/#comments")
}

async fn home(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
) -> AppResult<Response> {
    let news = state.with_db(|conn| Ok(news_service(conn)?.home()?))?;
    render_page(&NewsHomeTemplate { user, news })
}

async fn detail(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let news_id = parse_id(&id)?;
    let detail = state.with_db(|conn| Ok(news_service(conn)?.detail(news_id)?))?;
    render_page(&NewsDetailTemplate {
        user,
        detail,
        form: CommentForm::default(),
        errors: FormErrors::new(),
    })
}

async fn create_comment(
    State(state): State<AppState>,
    WebAuthUser(user): WebAuthUser,
    Path(id): Path<String>,
    Form(form): Form<CommentForm>,
) -> AppResult<Response> {
    let news_id = parse_id(&id)?;
    state.with_db(|conn| {
        let news = news_service(conn)?;
        match news.create_comment(user.id, news_id, &form) {
            Ok(_) => Ok(found(&comments_url(news_id))),
            Err(NewsServiceError::Form(errors)) => render_page(&NewsDetailTemplate {
                detail: news.detail(news_id)?,
                user: Some(user),
                form,
                errors,
            }),
            Err(err) => Err(err.into()),
        }
    })
}

async fn edit_comment_page(
    State(state): State<AppState>,
    WebAuthUser(user): WebAuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let comment_id = parse_id(&id)?;
    let comment =
        state.with_db(|conn| Ok(news_service(conn)?.get_own_comment(user.id, comment_id)?))?;
    render_page(&CommentEditTemplate {
        form: CommentForm {
            text: comment.text.clone(),
        },
        user: Some(user),
        comment,
        errors: FormErrors::new(),
    })
}

async fn edit_comment(
    State(state): State<AppState>,
    WebAuthUser(user): WebAuthUser,
    Path(id): Path<String>,
    Form(form): Form<CommentForm>,
) -> AppResult<Response> {
    let comment_id = parse_id(&id)?;
    state.with_db(|conn| {
        let news = news_service(conn)?;
        match news.update_comment(user.id, comment_id, &form) {
            Ok(comment) => Ok(found(&comments_url(comment.news_id))),
            Err(NewsServiceError::Form(errors)) => {
                render_page(&CommentEditTemplate {
                    comment: news.get_own_comment(user.id, comment_id)?,
                    user: Some(user),
                    form,
                    errors,
                })
            }
            Err(err) => Err(err.into()),
        }
    })
}

async fn delete_comment_page(
    State(state): State<AppState>,
    WebAuthUser(user): WebAuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let comment_id = parse_id(&id)?;
    let comment =
        state.with_db(|conn| Ok(news_service(conn)?.get_own_comment(user.id, comment_id)?))?;
    render_page(&CommentDeleteTemplate {
        user: Some(user),
        comment,
    })
}

async fn delete_comment(
    State(state): State<AppState>,
    WebAuthUser(user): WebAuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let comment_id = parse_id(&id)?;
    let news_id =
        state.with_db(|conn| Ok(news_service(conn)?.delete_comment(user.id, comment_id)?))?;
    Ok(found(&comments_url(news_id)))
}
