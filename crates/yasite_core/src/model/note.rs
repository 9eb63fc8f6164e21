//! Personal note model.
//!
//! # Invariants
//! - `slug` is unique across all notes (enforced by storage and the service).
//! - `author_id` is set once at creation and never rewritten.

use crate::model::form::{limit_chars, require, FormErrors};
use crate::model::slug::{is_valid_slug, slugify, SLUG_MAX_CHARS};
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

/// Primary key of a `notes` row. Ascending ids give creation order.
pub type NoteId = i64;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;

/// Suffix appended to the slug in the duplicate-slug error message.
pub const SLUG_TAKEN_SUFFIX: &str = " - такой slug уже существует, придумайте уникальное значение!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub text: String,
    pub slug: String,
    #[serde(rename = "author")]
    pub author_id: UserId,
}

/// Add/edit form submission. Never carries an author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: String,
}

/// A validated form with its effective slug resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub slug: String,
}

impl NoteForm {
    /// Builds a form pre-filled from an existing note (edit page).
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: note.slug.clone(),
        }
    }

    /// Validates field shape and resolves the slug.
    ///
    /// A blank slug is derived from the title. Uniqueness is checked later by
    /// the service because it needs storage.
    pub fn validate(&self) -> Result<NoteDraft, FormErrors> {
        let mut errors = FormErrors::new();
        let title = self.title.trim();
        if require(&mut errors, "title", title) {
            limit_chars(&mut errors, "title", title, TITLE_MAX_CHARS);
        }
        let text = self.text.trim();
        require(&mut errors, "text", text);

        let submitted_slug = self.slug.trim();
        let slug = if submitted_slug.is_empty() {
            slugify(title)
        } else {
            submitted_slug.to_string()
        };
        if submitted_slug.is_empty() {
            if slug.is_empty() && !title.is_empty() {
                errors.add("slug", "Could not derive a slug from the title; enter one.");
            }
        } else if slug.chars().count() > SLUG_MAX_CHARS {
            limit_chars(&mut errors, "slug", &slug, SLUG_MAX_CHARS);
        } else if !is_valid_slug(&slug) {
            errors.add(
                "slug",
                "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
            );
        }

        errors.into_result()?;
        Ok(NoteDraft {
            title: title.to_string(),
            text: text.to_string(),
            slug,
        })
    }
}

/// Duplicate-slug message for `slug`.
pub fn slug_taken_message(slug: &str) -> String {
    format!("{slug}{SLUG_TAKEN_SUFFIX}")
}
