#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use rusqlite::Connection;
use tower::ServiceExt;
use url::form_urlencoded;
use yasite_core::db::open_db_in_memory;
use yasite_core::service::password::{new_session_token, token_digest};
use yasite_core::{
    AccountRepository, Comment, NewNews, News, NewsRepository, Note, NoteDraft,
    NoteRepository, SqliteAccountRepository, SqliteNewsRepository, SqliteNoteRepository, User,
};
use yasite_web::{build_router, AppState, WebConfig, SESSION_COOKIE};

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

/// A signed-in client: the user plus the `Cookie` header value to send.
pub struct Client {
    pub user: User,
    pub cookie: String,
}

pub fn app() -> TestApp {
    let conn = open_db_in_memory().unwrap();
    let state = AppState::new(conn, WebConfig::default());
    TestApp {
        router: build_router(state.clone()),
        state,
    }
}

impl TestApp {
    fn db<T>(&self, work: impl FnOnce(&Connection) -> T) -> T {
        self.state.with_db(|conn| Ok(work(conn))).unwrap()
    }

    /// Creates a user with an open session, bypassing password hashing.
    pub fn client(&self, username: &str) -> Client {
        self.db(|conn| {
            let accounts = SqliteAccountRepository::try_new(conn).unwrap();
            let user = accounts.create_user(username, "unused-hash").unwrap();
            let token = new_session_token();
            accounts
                .create_session(&token_digest(&token), user.id, i64::MAX)
                .unwrap();
            Client {
                user,
                cookie: format!("{SESSION_COOKIE}={token}"),
            }
        })
    }

    pub fn news(&self, title: &str) -> News {
        self.db(|conn| {
            SqliteNewsRepository::try_new(conn)
                .unwrap()
                .create_news(&NewNews {
                    title: title.to_string(),
                    text: "Просто текст.".to_string(),
                    date: None,
                })
                .unwrap()
        })
    }

    pub fn comment(&self, news: &News, author: &User, text: &str) -> Comment {
        self.db(|conn| {
            SqliteNewsRepository::try_new(conn)
                .unwrap()
                .create_comment(news.id, author.id, text)
                .unwrap()
        })
    }

    pub fn get_comment(&self, id: i64) -> Option<Comment> {
        self.db(|conn| SqliteNewsRepository::try_new(conn).unwrap().get_comment(id).unwrap())
    }

    pub fn note(&self, author: &User, title: &str, slug: &str) -> Note {
        self.db(|conn| {
            SqliteNoteRepository::try_new(conn)
                .unwrap()
                .create_note(
                    author.id,
                    &NoteDraft {
                        title: title.to_string(),
                        text: "Текст заметки".to_string(),
                        slug: slug.to_string(),
                    },
                )
                .unwrap()
        })
    }

    pub fn get_note(&self, id: i64) -> Option<Note> {
        self.db(|conn| SqliteNoteRepository::try_new(conn).unwrap().get_note(id).unwrap())
    }

    pub fn count(&self, table: &str) -> i64 {
        self.db(|conn| {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))
                .unwrap()
        })
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, path: &str, client: Option<&Client>) -> Response {
        self.send(request(Method::GET, path, client, Body::empty())).await
    }

    pub async fn delete(&self, path: &str, client: Option<&Client>) -> Response {
        self.send(request(Method::DELETE, path, client, Body::empty())).await
    }

    pub async fn post(&self, path: &str, client: Option<&Client>, fields: &[(&str, &str)]) -> Response {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let mut request = request(Method::POST, path, client, Body::from(body));
        request.headers_mut().insert(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded".parse().unwrap(),
        );
        self.send(request).await
    }
}

fn request(method: Method, path: &str, client: Option<&Client>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(client) = client {
        builder = builder.header(header::COOKIE, client.cookie.as_str());
    }
    builder.body(body).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

pub fn assert_redirect(response: &Response, expected: &str) {
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(response), expected);
}
