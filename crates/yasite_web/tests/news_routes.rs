mod common;

use axum::http::StatusCode;
use common::{app, assert_redirect, body_text};
use yasite_core::{BAD_WORDS, WARNING};

const COMMENT_TEXT: &str = "Текст комментария";
const NEW_COMMENT_TEXT: &str = "Обновлённый комментарий";

#[tokio::test]
async fn public_pages_are_available_to_anonymous_users() {
    let app = app();
    let news = app.news("Заголовок");

    for path in [
        "/".to_string(),
        format!("/news/{}/", news.id),
        "/auth/login/".to_string(),
        "/auth/logout/".to_string(),
        "/auth/signup/".to_string(),
    ] {
        let response = app.get(&path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn missing_or_malformed_news_is_404() {
    let app = app();

    assert_eq!(app.get("/news/999/", None).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/news/abc/", None).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn anonymous_comment_is_not_stored() {
    let app = app();
    let news = app.news("Заголовок");
    let path = format!("/news/{}/", news.id);

    let response = app.post(&path, None, &[("text", COMMENT_TEXT)]).await;

    assert_redirect(&response, &format!("/auth/login/?next={path}"));
    assert_eq!(app.count("comments"), 0);
}

#[tokio::test]
async fn signed_in_user_can_comment() {
    let app = app();
    let author = app.client("author");
    let news = app.news("Заголовок");

    let response = app
        .post(&format!("/news/{}/", news.id), Some(&author), &[("text", COMMENT_TEXT)])
        .await;

    assert_redirect(&response, &format!("/news/{}/#comments", news.id));
    assert_eq!(app.count("comments"), 1);
    let comment = app.get_comment(1).unwrap();
    assert_eq!(comment.text, COMMENT_TEXT);
    assert_eq!(comment.news_id, news.id);
    assert_eq!(comment.author_id, author.user.id);
}

#[tokio::test]
async fn comment_on_missing_news_is_404() {
    let app = app();
    let author = app.client("author");

    let response = app.post("/news/404/", Some(&author), &[("text", COMMENT_TEXT)]).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.count("comments"), 0);
}

#[tokio::test]
async fn banned_words_rerender_the_form_with_warning() {
    let app = app();
    let author = app.client("author");
    let news = app.news("Заголовок");

    for bad_word in BAD_WORDS {
        let text = format!("Какой-то текст, {bad_word}, ещё текст");
        let response = app
            .post(&format!("/news/{}/", news.id), Some(&author), &[("text", text.as_str())])
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains("<form"));
        assert!(page.contains(WARNING));
    }
    assert_eq!(app.count("comments"), 0);
}

#[tokio::test]
async fn blank_comment_is_a_field_error() {
    let app = app();
    let author = app.client("author");
    let news = app.news("Заголовок");

    let response = app
        .post(&format!("/news/{}/", news.id), Some(&author), &[("text", "   ")])
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.count("comments"), 0);
}

#[tokio::test]
async fn detail_shows_comments_oldest_first_with_owner_links() {
    let app = app();
    let author = app.client("author");
    let reader = app.client("reader");
    let news = app.news("Заголовок");
    let first = app.comment(&news, &author.user, "Первый");
    app.comment(&news, &reader.user, "Второй");

    let page = body_text(app.get(&format!("/news/{}/", news.id), Some(&author)).await).await;

    let first_at = page.find("Первый").unwrap();
    let second_at = page.find("Второй").unwrap();
    assert!(first_at < second_at);
    assert!(page.contains(&format!("edit_comment/{}/", first.id)));
    assert_eq!(page.matches("edit_comment/").count(), 1);
}

#[tokio::test]
async fn home_lists_at_most_ten_news() {
    let app = app();
    for index in 0..11 {
        app.news(&format!("Новость {index}"));
    }

    let page = body_text(app.get("/", None).await).await;

    assert_eq!(page.matches("<article>").count(), 10);
}

#[tokio::test]
async fn comment_edit_and_delete_pages_are_author_only() {
    let app = app();
    let author = app.client("author");
    let reader = app.client("reader");
    let news = app.news("Заголовок");
    let comment = app.comment(&news, &author.user, COMMENT_TEXT);

    for path in [
        format!("/edit_comment/{}/", comment.id),
        format!("/delete_comment/{}/", comment.id),
    ] {
        assert_eq!(app.get(&path, Some(&author)).await.status(), StatusCode::OK);
        assert_eq!(app.get(&path, Some(&reader)).await.status(), StatusCode::NOT_FOUND);
        assert_redirect(
            &app.get(&path, None).await,
            &format!("/auth/login/?next={path}"),
        );
    }
}

#[tokio::test]
async fn author_can_edit_comment() {
    let app = app();
    let author = app.client("author");
    let news = app.news("Заголовок");
    let comment = app.comment(&news, &author.user, COMMENT_TEXT);

    let response = app
        .post(
            &format!("/edit_comment/{}/", comment.id),
            Some(&author),
            &[("text", NEW_COMMENT_TEXT)],
        )
        .await;

    assert_redirect(&response, &format!("/news/{}/#comments", news.id));
    assert_eq!(app.get_comment(comment.id).unwrap().text, NEW_COMMENT_TEXT);
}

#[tokio::test]
async fn reader_cannot_edit_foreign_comment() {
    let app = app();
    let author = app.client("author");
    let reader = app.client("reader");
    let news = app.news("Заголовок");
    let comment = app.comment(&news, &author.user, COMMENT_TEXT);

    let response = app
        .post(
            &format!("/edit_comment/{}/", comment.id),
            Some(&reader),
            &[("text", NEW_COMMENT_TEXT)],
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get_comment(comment.id).unwrap().text, COMMENT_TEXT);
}

#[tokio::test]
async fn author_can_delete_comment() {
    let app = app();
    let author = app.client("author");
    let news = app.news("Заголовок");
    let comment = app.comment(&news, &author.user, COMMENT_TEXT);

    let response = app
        .delete(&format!("/delete_comment/{}/", comment.id), Some(&author))
        .await;

    assert_redirect(&response, &format!("/news/{}/#comments", news.id));
    assert_eq!(app.count("comments"), 0);
}

#[tokio::test]
async fn reader_cannot_delete_foreign_comment() {
    let app = app();
    let author = app.client("author");
    let reader = app.client("reader");
    let news = app.news("Заголовок");
    let comment = app.comment(&news, &author.user, COMMENT_TEXT);

    let response = app
        .delete(&format!("/delete_comment/{}/", comment.id), Some(&reader))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .post(&format!("/delete_comment/{}/", comment.id), Some(&reader), &[])
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(app.count("comments"), 1);
}
