use rusqlite::Connection;
use yasite_core::db::open_db_in_memory;
use yasite_core::{
    parse_news_date, AccountRepository, CommentForm, NewNews, News, NewsService, NewsServiceError,
    SqliteAccountRepository, SqliteNewsRepository, User, BAD_WORDS, WARNING,
};

const COMMENT_TEXT: &str = "Текст комментария";

fn user(conn: &Connection, username: &str) -> User {
    SqliteAccountRepository::try_new(conn)
        .unwrap()
        .create_user(username, "unused-hash")
        .unwrap()
}

fn service(conn: &Connection) -> NewsService<SqliteNewsRepository<'_>> {
    NewsService::new(SqliteNewsRepository::try_new(conn).unwrap())
}

fn publish(news: &NewsService<SqliteNewsRepository<'_>>, title: &str, date: &str) -> News {
    news.publish(&NewNews {
        title: title.to_string(),
        text: "Просто текст.".to_string(),
        date: Some(parse_news_date(date).unwrap()),
    })
    .unwrap()
}

fn form(text: &str) -> CommentForm {
    CommentForm {
        text: text.to_string(),
    }
}

#[test]
fn clean_comment_is_bound_to_caller_and_news() {
    let conn = open_db_in_memory().unwrap();
    let author = user(&conn, "author");
    let news = service(&conn);
    let item = publish(&news, "Заголовок", "2024-01-01");

    let comment = news.create_comment(author.id, item.id, &form(COMMENT_TEXT)).unwrap();

    assert_eq!(news.count_comments().unwrap(), 1);
    assert_eq!(comment.text, COMMENT_TEXT);
    assert_eq!(comment.news_id, item.id);
    assert_eq!(comment.author_id, author.id);
    assert_eq!(comment.author_username, "author");
}

#[test]
fn banned_words_are_rejected_with_warning() {
    let conn = open_db_in_memory().unwrap();
    let author = user(&conn, "author");
    let news = service(&conn);
    let item = publish(&news, "Заголовок", "2024-01-01");

    for bad_word in BAD_WORDS {
        let text = format!("Какой-то текст, {bad_word}, ещё текст");
        match news.create_comment(author.id, item.id, &form(&text)).unwrap_err() {
            NewsServiceError::Form(errors) => assert_eq!(errors.field("text"), [WARNING]),
            other => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(news.count_comments().unwrap(), 0);
}

#[test]
fn comment_on_missing_news_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let author = user(&conn, "author");
    let news = service(&conn);

    let err = news.create_comment(author.id, 404, &form(COMMENT_TEXT)).unwrap_err();
    assert!(matches!(err, NewsServiceError::NewsNotFound(404)));
    assert_eq!(news.count_comments().unwrap(), 0);
}

#[test]
fn author_deletes_own_comment_and_learns_its_news() {
    let conn = open_db_in_memory().unwrap();
    let author = user(&conn, "author");
    let news = service(&conn);
    let item = publish(&news, "Заголовок", "2024-01-01");
    let comment = news.create_comment(author.id, item.id, &form(COMMENT_TEXT)).unwrap();

    let news_id = news.delete_comment(author.id, comment.id).unwrap();

    assert_eq!(news_id, item.id);
    assert_eq!(news.count_comments().unwrap(), 0);
}

#[test]
fn non_author_cannot_edit_or_delete() {
    let conn = open_db_in_memory().unwrap();
    let author = user(&conn, "author");
    let reader = user(&conn, "reader");
    let news = service(&conn);
    let item = publish(&news, "Заголовок", "2024-01-01");
    let comment = news.create_comment(author.id, item.id, &form(COMMENT_TEXT)).unwrap();

    let edit = news.update_comment(reader.id, comment.id, &form("Другой текст"));
    assert!(matches!(edit, Err(NewsServiceError::CommentNotFound(id)) if id == comment.id));
    let delete = news.delete_comment(reader.id, comment.id);
    assert!(matches!(delete, Err(NewsServiceError::CommentNotFound(_))));

    let reloaded = news.get_own_comment(author.id, comment.id).unwrap();
    assert_eq!(reloaded.text, COMMENT_TEXT);
    assert_eq!(news.count_comments().unwrap(), 1);
}

#[test]
fn edit_applies_the_word_filter_too() {
    let conn = open_db_in_memory().unwrap();
    let author = user(&conn, "author");
    let news = service(&conn);
    let item = publish(&news, "Заголовок", "2024-01-01");
    let comment = news.create_comment(author.id, item.id, &form(COMMENT_TEXT)).unwrap();

    let err = news
        .update_comment(author.id, comment.id, &form("ты редиска"))
        .unwrap_err();
    assert!(matches!(err, NewsServiceError::Form(_)));

    let updated = news
        .update_comment(author.id, comment.id, &form("Обновлённый текст"))
        .unwrap();
    assert_eq!(updated.text, "Обновлённый текст");
}

#[test]
fn detail_lists_comments_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let author = user(&conn, "author");
    let news = service(&conn);
    let item = publish(&news, "Заголовок", "2024-01-01");
    for index in 0..3 {
        news.create_comment(author.id, item.id, &form(&format!("Текст {index}")))
            .unwrap();
    }

    let detail = news.detail(item.id).unwrap();
    let texts: Vec<&str> = detail.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["Текст 0", "Текст 1", "Текст 2"]);
    assert!(matches!(news.detail(999), Err(NewsServiceError::NewsNotFound(999))));
}

#[test]
fn home_shows_latest_ten_news_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let news = service(&conn);
    for day in 1..=12 {
        publish(&news, &format!("Новость {day}"), &format!("2024-01-{day:02}"));
    }

    let home = news.home().unwrap();
    assert_eq!(home.len(), 10);
    assert_eq!(home[0].date.to_string(), "2024-01-12");
    let dates: Vec<_> = home.iter().map(|item| item.date).collect();
    let mut sorted = dates.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
}

#[test]
fn deleting_news_cascades_to_comments() {
    let conn = open_db_in_memory().unwrap();
    let author = user(&conn, "author");
    let news = service(&conn);
    let item = publish(&news, "Заголовок", "2024-01-01");
    news.create_comment(author.id, item.id, &form(COMMENT_TEXT)).unwrap();

    conn.execute("DELETE FROM news WHERE id = ?1;", [item.id]).unwrap();

    assert_eq!(news.count_comments().unwrap(), 0);
}
