//! Page templates. Every page carries the signed-in `user` for the header.

use askama::Template;
use yasite_core::{
    Comment, CommentForm, FormErrors, LoginForm, News, NewsDetail, Note, NoteForm, SignupForm,
    User,
};

#[derive(Template)]
#[template(path = "news/home.html")]
pub struct NewsHomeTemplate {
    pub user: Option<User>,
    pub news: Vec<News>,
}

#[derive(Template)]
#[template(path = "news/detail.html")]
pub struct NewsDetailTemplate {
    pub user: Option<User>,
    pub detail: NewsDetail,
    pub form: CommentForm,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "news/comment_edit.html")]
pub struct CommentEditTemplate {
    pub user: Option<User>,
    pub comment: Comment,
    pub form: CommentForm,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "news/comment_delete.html")]
pub struct CommentDeleteTemplate {
    pub user: Option<User>,
    pub comment: Comment,
}

#[derive(Template)]
#[template(path = "notes/home.html")]
pub struct NotesHomeTemplate {
    pub user: Option<User>,
}

#[derive(Template)]
#[template(path = "notes/list.html")]
pub struct NotesListTemplate {
    pub user: Option<User>,
    pub notes: Vec<Note>,
}

/// Add and edit share one form; `editing` holds the current slug on edit.
#[derive(Template)]
#[template(path = "notes/form.html")]
pub struct NoteFormTemplate {
    pub user: Option<User>,
    pub form: NoteForm,
    pub errors: FormErrors,
    pub editing: Option<String>,
}

#[derive(Template)]
#[template(path = "notes/detail.html")]
pub struct NoteDetailTemplate {
    pub user: Option<User>,
    pub note: Note,
}

#[derive(Template)]
#[template(path = "notes/delete.html")]
pub struct NoteDeleteTemplate {
    pub user: Option<User>,
    pub note: Note,
}

#[derive(Template)]
#[template(path = "notes/success.html")]
pub struct NoteSuccessTemplate {
    pub user: Option<User>,
}

#[derive(Template)]
#[template(path = "users/login.html")]
pub struct LoginTemplate {
    pub user: Option<User>,
    pub form: LoginForm,
    pub errors: FormErrors,
    pub next: String,
}

#[derive(Template)]
#[template(path = "users/logout.html")]
pub struct LogoutTemplate {
    pub user: Option<User>,
}

#[derive(Template)]
#[template(path = "users/signup.html")]
pub struct SignupTemplate {
    pub user: Option<User>,
    pub form: SignupForm,
    pub errors: FormErrors,
}
