//! Personal notes: every page except the landing page needs a session,
//! and single-note pages only resolve for the note's author.

use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Form, Router,
};
use rusqlite::Connection;
use yasite_core::{
    FormErrors, NoteForm, NoteService, NoteServiceError, SqliteNoteRepository,
};

use crate::auth::{OptionalAuthUser, WebAuthUser};
use crate::error::{found, AppResult};
use crate::handlers::render_page;
use crate::templates::{
    NoteDeleteTemplate, NoteDetailTemplate, NoteFormTemplate, NoteSuccessTemplate,
    NotesHomeTemplate, NotesListTemplate,
};
use crate::AppState;

/// Landing page after a successful add, edit or delete.
pub const SUCCESS_URL: &str = "/notes/done/";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notes/", get(home))
        .route("/notes/list/", get(list))
        .route("/notes/add/", get(add_page).post(add))
        .route("/notes/done/", get(success))
        .route("/notes/note/{slug}/", get(detail))
        .route("/notes/edit/{slug}/", get(edit_page).post(edit))
        .route(
            "/notes/delete/{slug}/",
            get(delete_page).post(delete).delete(delete),
        )
}

fn note_service(conn: &Connection) -> AppResult<NoteService<SqliteNoteRepository<'_>>> {
    Ok(NoteService::new(SqliteNoteRepository::try_new(conn)?))
}

async fn home(OptionalAuthUser(user): OptionalAuthUser) -> AppResult<Response> {
    render_page(&NotesHomeTemplate { user })
}

async fn list(State(state): State<AppState>, WebAuthUser(user): WebAuthUser) -> AppResult<Response> {
    let notes = state.with_db(|conn| Ok(note_service(conn)?.list_notes(user.id)?))?;
    render_page(&NotesListTemplate {
        user: Some(user),
        notes,
    })
}

async fn success(WebAuthUser(user): WebAuthUser) -> AppResult<Response> {
    render_page(&NoteSuccessTemplate { user: Some(user) })
}

async fn add_page(WebAuthUser(user): WebAuthUser) -> AppResult<Response> {
    render_page(&NoteFormTemplate {
        user: Some(user),
        form: NoteForm::default(),
        errors: FormErrors::new(),
        editing: None,
    })
}

async fn add(
    State(state): State<AppState>,
    WebAuthUser(user): WebAuthUser,
    Form(form): Form<NoteForm>,
) -> AppResult<Response> {
    let outcome = state.with_db(|conn| match note_service(conn)?.create_note(user.id, &form) {
        Ok(_) => Ok(None),
        Err(NoteServiceError::Form(errors)) => Ok(Some(errors)),
        Err(err) => Err(err.into()),
    })?;
    match outcome {
        None => Ok(found(SUCCESS_URL)),
        Some(errors) => render_page(&NoteFormTemplate {
            user: Some(user),
            form,
            errors,
            editing: None,
        }),
    }
}

async fn detail(
    State(state): State<AppState>,
    WebAuthUser(user): WebAuthUser,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let note = state.with_db(|conn| Ok(note_service(conn)?.get_note(user.id, &slug)?))?;
    render_page(&NoteDetailTemplate {
        user: Some(user),
        note,
    })
}

async fn edit_page(
    State(state): State<AppState>,
    WebAuthUser(user): WebAuthUser,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let note = state.with_db(|conn| Ok(note_service(conn)?.get_note(user.id, &slug)?))?;
    render_page(&NoteFormTemplate {
        user: Some(user),
        form: NoteForm::from_note(&note),
        errors: FormErrors::new(),
        editing: Some(note.slug),
    })
}

async fn edit(
    State(state): State<AppState>,
    WebAuthUser(user): WebAuthUser,
    Path(slug): Path<String>,
    Form(form): Form<NoteForm>,
) -> AppResult<Response> {
    let outcome =
        state.with_db(|conn| match note_service(conn)?.update_note(user.id, &slug, &form) {
            Ok(_) => Ok(None),
            Err(NoteServiceError::Form(errors)) => Ok(Some(errors)),
            Err(err) => Err(err.into()),
        })?;
    match outcome {
        None => Ok(found(SUCCESS_URL)),
        Some(errors) => render_page(&NoteFormTemplate {
            user: Some(user),
            form,
            errors,
            editing: Some(slug),
        }),
    }
}

async fn delete_page(
    State(state): State<AppState>,
    WebAuthUser(user): WebAuthUser,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let note = state.with_db(|conn| Ok(note_service(conn)?.get_note(user.id, &slug)?))?;
    render_page(&NoteDeleteTemplate {
        user: Some(user),
        note,
    })
}

async fn delete(
    State(state): State<AppState>,
    WebAuthUser(user): WebAuthUser,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    state.with_db(|conn| Ok(note_service(conn)?.delete_note(user.id, &slug)?))?;
    Ok(found(SUCCESS_URL))
}
