mod common;

use axum::http::StatusCode;
use common::{app, assert_redirect, body_text};

const SUCCESS_URL: &str = "/notes/done/";

#[tokio::test]
async fn notes_home_is_public() {
    let app = app();

    assert_eq!(app.get("/notes/", None).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn anonymous_users_are_sent_to_login() {
    let app = app();
    let author = app.client("author");
    let note = app.note(&author.user, "Заголовок", "note-slug");

    for path in [
        "/notes/list/".to_string(),
        "/notes/add/".to_string(),
        "/notes/done/".to_string(),
        format!("/notes/note/{}/", note.slug),
        format!("/notes/edit/{}/", note.slug),
        format!("/notes/delete/{}/", note.slug),
    ] {
        let response = app.get(&path, None).await;
        assert_redirect(&response, &format!("/auth/login/?next={path}"));
    }
}

#[tokio::test]
async fn signed_in_pages_are_available() {
    let app = app();
    let reader = app.client("reader");

    for path in ["/notes/list/", "/notes/add/", "/notes/done/"] {
        assert_eq!(app.get(path, Some(&reader)).await.status(), StatusCode::OK, "{path}");
    }
    let page = body_text(app.get("/notes/add/", Some(&reader)).await).await;
    assert!(page.contains("<form"));
}

#[tokio::test]
async fn note_pages_are_visible_to_author_only() {
    let app = app();
    let author = app.client("author");
    let reader = app.client("reader");
    let note = app.note(&author.user, "Заголовок", "note-slug");

    for path in [
        format!("/notes/note/{}/", note.slug),
        format!("/notes/edit/{}/", note.slug),
        format!("/notes/delete/{}/", note.slug),
    ] {
        assert_eq!(app.get(&path, Some(&author)).await.status(), StatusCode::OK, "{path}");
        assert_eq!(
            app.get(&path, Some(&reader)).await.status(),
            StatusCode::NOT_FOUND,
            "{path}"
        );
    }
}

#[tokio::test]
async fn list_contains_only_own_notes_in_id_order() {
    let app = app();
    let author = app.client("author");
    let other = app.client("other");
    app.note(&author.user, "Первая", "first");
    app.note(&other.user, "Чужая", "foreign");
    app.note(&author.user, "Вторая", "second");

    let page = body_text(app.get("/notes/list/", Some(&author)).await).await;

    assert!(!page.contains("/notes/note/foreign/"));
    let first_at = page.find("/notes/note/first/").unwrap();
    let second_at = page.find("/notes/note/second/").unwrap();
    assert!(first_at < second_at);
}

#[tokio::test]
async fn author_creates_note() {
    let app = app();
    let author = app.client("author");

    let response = app
        .post(
            "/notes/add/",
            Some(&author),
            &[("title", "T"), ("text", "X"), ("slug", "s")],
        )
        .await;

    assert_redirect(&response, SUCCESS_URL);
    assert_eq!(app.count("notes"), 1);
    let note = app.get_note(1).unwrap();
    assert_eq!(note.title, "T");
    assert_eq!(note.text, "X");
    assert_eq!(note.slug, "s");
    assert_eq!(note.author_id, author.user.id);
}

#[tokio::test]
async fn anonymous_create_is_not_stored() {
    let app = app();

    let response = app
        .post("/notes/add/", None, &[("title", "T"), ("text", "X"), ("slug", "s")])
        .await;

    assert_redirect(&response, "/auth/login/?next=/notes/add/");
    assert_eq!(app.count("notes"), 0);
}

#[tokio::test]
async fn duplicate_slug_rerenders_form_without_writing() {
    let app = app();
    let author = app.client("author");
    app.note(&author.user, "Заголовок", "note-slug");

    let response = app
        .post(
            "/notes/add/",
            Some(&author),
            &[("title", "Новый"), ("text", "Текст"), ("slug", "note-slug")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("<form"));
    assert!(page.contains("такой slug уже существует"));
    assert_eq!(app.count("notes"), 1);
}

#[tokio::test]
async fn blank_slug_is_derived_from_title() {
    let app = app();
    let author = app.client("author");

    let response = app
        .post(
            "/notes/add/",
            Some(&author),
            &[("title", "Тестовая запись"), ("text", "Текст"), ("slug", "")],
        )
        .await;

    assert_redirect(&response, SUCCESS_URL);
    assert_eq!(app.get_note(1).unwrap().slug, "testovaya-zapis");
}

#[tokio::test]
async fn author_edits_note() {
    let app = app();
    let author = app.client("author");
    let note = app.note(&author.user, "Заголовок", "note-slug");

    let response = app
        .post(
            &format!("/notes/edit/{}/", note.slug),
            Some(&author),
            &[("title", "Новый заголовок"), ("text", "Новый текст"), ("slug", "new-slug")],
        )
        .await;

    assert_redirect(&response, SUCCESS_URL);
    let updated = app.get_note(note.id).unwrap();
    assert_eq!(updated.title, "Новый заголовок");
    assert_eq!(updated.text, "Новый текст");
    assert_eq!(updated.slug, "new-slug");
    assert_eq!(updated.author_id, author.user.id);
}

#[tokio::test]
async fn reader_cannot_edit_foreign_note() {
    let app = app();
    let author = app.client("author");
    let reader = app.client("reader");
    let note = app.note(&author.user, "Заголовок", "note-slug");

    let response = app
        .post(
            &format!("/notes/edit/{}/", note.slug),
            Some(&reader),
            &[("title", "Чужой"), ("text", "Чужой"), ("slug", "hijacked")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get_note(note.id).unwrap(), note);
}

#[tokio::test]
async fn author_deletes_note() {
    let app = app();
    let author = app.client("author");
    let note = app.note(&author.user, "Заголовок", "note-slug");

    let response = app
        .post(&format!("/notes/delete/{}/", note.slug), Some(&author), &[])
        .await;

    assert_redirect(&response, SUCCESS_URL);
    assert_eq!(app.count("notes"), 0);
}

#[tokio::test]
async fn reader_cannot_delete_foreign_note() {
    let app = app();
    let author = app.client("author");
    let reader = app.client("reader");
    let note = app.note(&author.user, "Заголовок", "note-slug");

    let response = app
        .delete(&format!("/notes/delete/{}/", note.slug), Some(&reader))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.count("notes"), 1);
}
