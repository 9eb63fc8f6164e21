//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist notes and answer slug/author scoped lookups.
//!
//! # Invariants
//! - Author lists are ordered by `id ASC`.
//! - `notes.slug` is UNIQUE; inserts/updates that collide return
//!   `RepoError::Duplicate { field: "slug" }` and change nothing.
//! - Updates never touch `author_id`.

use crate::model::note::{Note, NoteDraft, NoteId};
use crate::model::user::UserId;
use crate::repo::{ensure_tables, map_unique, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const NOTE_SELECT_SQL: &str = "SELECT id, title, text, slug, author_id FROM notes";

/// Repository interface for note persistence.
pub trait NoteRepository {
    /// Inserts a note owned by `author_id` and returns the stored row.
    fn create_note(&self, author_id: UserId, draft: &NoteDraft) -> RepoResult<Note>;
    /// Replaces title/text/slug of one note.
    fn update_note(&self, note_id: NoteId, draft: &NoteDraft) -> RepoResult<Note>;
    fn get_note(&self, note_id: NoteId) -> RepoResult<Option<Note>>;
    fn get_note_by_slug(&self, slug: &str) -> RepoResult<Option<Note>>;
    /// Returns whether any note other than `exclude` uses `slug`.
    fn slug_exists(&self, slug: &str, exclude: Option<NoteId>) -> RepoResult<bool>;
    /// Lists notes owned by `author_id`, ordered by id ascending.
    fn list_notes_by_author(&self, author_id: UserId) -> RepoResult<Vec<Note>>;
    fn delete_note(&self, note_id: NoteId) -> RepoResult<()>;
    fn count_notes(&self) -> RepoResult<u64>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users", "notes"])?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, author_id: UserId, draft: &NoteDraft) -> RepoResult<Note> {
        self.conn
            .execute(
                "INSERT INTO notes (title, text, slug, author_id) VALUES (?1, ?2, ?3, ?4);",
                params![draft.title, draft.text, draft.slug, author_id],
            )
            .map_err(|err| map_unique(err, "note", "slug"))?;

        Ok(Note {
            id: self.conn.last_insert_rowid(),
            title: draft.title.clone(),
            text: draft.text.clone(),
            slug: draft.slug.clone(),
            author_id,
        })
    }

    fn update_note(&self, note_id: NoteId, draft: &NoteDraft) -> RepoResult<Note> {
        let changed = self
            .conn
            .execute(
                "UPDATE notes SET title = ?2, text = ?3, slug = ?4 WHERE id = ?1;",
                params![note_id, draft.title, draft.text, draft.slug],
            )
            .map_err(|err| map_unique(err, "note", "slug"))?;
        if changed == 0 {
            return Err(not_found(note_id));
        }

        self.get_note(note_id)?.ok_or_else(|| not_found(note_id))
    }

    fn get_note(&self, note_id: NoteId) -> RepoResult<Option<Note>> {
        let sql = format!("{NOTE_SELECT_SQL} WHERE id = ?1;");
        let note = self.conn.query_row(&sql, [note_id], map_note).optional()?;
        Ok(note)
    }

    fn get_note_by_slug(&self, slug: &str) -> RepoResult<Option<Note>> {
        let sql = format!("{NOTE_SELECT_SQL} WHERE slug = ?1;");
        let note = self.conn.query_row(&sql, [slug], map_note).optional()?;
        Ok(note)
    }

    fn slug_exists(&self, slug: &str, exclude: Option<NoteId>) -> RepoResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM notes WHERE slug = ?1 AND (?2 IS NULL OR id <> ?2)
            );",
            params![slug, exclude],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn list_notes_by_author(&self, author_id: UserId) -> RepoResult<Vec<Note>> {
        let sql = format!("{NOTE_SELECT_SQL} WHERE author_id = ?1 ORDER BY id ASC;");
        let mut stmt = self.conn.prepare(&sql)?;
        let notes = stmt
            .query_map([author_id], map_note)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    fn delete_note(&self, note_id: NoteId) -> RepoResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [note_id])?;
        if removed == 0 {
            return Err(not_found(note_id));
        }
        Ok(())
    }

    fn count_notes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }
}

fn map_note(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        text: row.get("text")?,
        slug: row.get("slug")?,
        author_id: row.get("author_id")?,
    })
}

fn not_found(note_id: NoteId) -> RepoError {
    RepoError::NotFound {
        entity: "note",
        key: note_id.to_string(),
    }
}
