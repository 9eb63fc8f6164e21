//! Note use-case service.
//!
//! # Responsibility
//! - Author-scoped list/detail/create/edit/delete for personal notes.
//! - Resolve and enforce slug uniqueness before writes.
//!
//! # Invariants
//! - Every read or write is scoped to the calling author; other authors'
//!   notes behave as missing (`NoteNotFound`).
//! - A rejected create/edit leaves the note table unchanged.
//! - Lists are ordered by id ascending.

use crate::model::form::FormErrors;
use crate::model::note::{slug_taken_message, Note, NoteDraft, NoteForm, NoteId};
use crate::model::user::UserId;
use crate::repo::note_repo::NoteRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::access::owned_by;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Submitted form failed validation; nothing was written.
    Form(FormErrors),
    /// No note with this slug is visible to the caller.
    NoteNotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Form(errors) => write!(f, "invalid note form: {errors}"),
            Self::NoteNotFound(slug) => write!(f, "note not found: {slug}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Form(errors) => Some(errors),
            Self::Repo(err) => Some(err),
            Self::NoteNotFound(_) => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { key, .. } => Self::NoteNotFound(key),
            other => Self::Repo(other),
        }
    }
}

/// Note service facade over a repository implementation.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists the caller's notes, oldest first.
    pub fn list_notes(&self, author_id: UserId) -> Result<Vec<Note>, NoteServiceError> {
        Ok(self.repo.list_notes_by_author(author_id)?)
    }

    /// Loads one of the caller's notes by slug.
    pub fn get_note(&self, author_id: UserId, slug: &str) -> Result<Note, NoteServiceError> {
        owned_by(self.repo.get_note_by_slug(slug)?, author_id)
            .ok_or_else(|| NoteServiceError::NoteNotFound(slug.to_string()))
    }

    /// Creates a note owned by `author_id`.
    ///
    /// # Errors
    /// - `Form` when a field is invalid or the slug is already used by any note.
    pub fn create_note(&self, author_id: UserId, form: &NoteForm) -> Result<Note, NoteServiceError> {
        let draft = self.validate_unique(form, None)?;
        let note = self
            .repo
            .create_note(author_id, &draft)
            .map_err(|err| slug_conflict_or(err, &draft))?;
        info!(
            "event=note_create module=note_service status=ok note_id={} author_id={author_id}",
            note.id
        );
        Ok(note)
    }

    /// Replaces title/text/slug of one of the caller's notes.
    pub fn update_note(
        &self,
        author_id: UserId,
        slug: &str,
        form: &NoteForm,
    ) -> Result<Note, NoteServiceError> {
        let current = self.get_note(author_id, slug)?;
        let draft = self.validate_unique(form, Some(current.id))?;
        let note = self
            .repo
            .update_note(current.id, &draft)
            .map_err(|err| slug_conflict_or(err, &draft))?;
        info!(
            "event=note_update module=note_service status=ok note_id={} author_id={author_id}",
            note.id
        );
        Ok(note)
    }

    /// Deletes one of the caller's notes.
    pub fn delete_note(&self, author_id: UserId, slug: &str) -> Result<(), NoteServiceError> {
        let note = self.get_note(author_id, slug)?;
        self.repo.delete_note(note.id)?;
        info!(
            "event=note_delete module=note_service status=ok note_id={} author_id={author_id}",
            note.id
        );
        Ok(())
    }

    /// Total number of stored notes (all authors).
    pub fn count_notes(&self) -> RepoResult<u64> {
        self.repo.count_notes()
    }

    fn validate_unique(
        &self,
        form: &NoteForm,
        editing: Option<NoteId>,
    ) -> Result<NoteDraft, NoteServiceError> {
        let draft = form.validate().map_err(|errors| {
            debug!("event=note_validate module=note_service status=rejected reason=form");
            NoteServiceError::Form(errors)
        })?;
        if self.repo.slug_exists(&draft.slug, editing)? {
            debug!("event=note_validate module=note_service status=rejected reason=slug_taken");
            return Err(slug_taken(&draft));
        }
        Ok(draft)
    }
}

fn slug_taken(draft: &NoteDraft) -> NoteServiceError {
    NoteServiceError::Form(FormErrors::single("slug", slug_taken_message(&draft.slug)))
}

fn slug_conflict_or(err: RepoError, draft: &NoteDraft) -> NoteServiceError {
    match err {
        RepoError::Duplicate { field: "slug", .. } => slug_taken(draft),
        other => other.into(),
    }
}
