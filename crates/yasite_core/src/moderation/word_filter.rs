//! Banned-substring filter for comments.
//!
//! # Invariants
//! - Matching is case-sensitive substring containment, not whole-word
//!   matching: a banned token anywhere in the text rejects it.
//! - The list is fixed at compile time.

use crate::model::form::FormErrors;

/// Words that may not appear anywhere in a comment.
pub const BAD_WORDS: &[&str] = &["редиска", "негодяй"];

/// Field error shown when a comment contains a banned word.
pub const WARNING: &str = "Не ругайтесь!";

/// Returns the first banned word contained in `text`, if any.
pub fn find_banned_word(text: &str) -> Option<&'static str> {
    BAD_WORDS.iter().copied().find(|word| text.contains(word))
}

/// Rejects `text` with a `field` error carrying `WARNING` when it contains a
/// banned word.
pub fn check_text(field: &'static str, text: &str) -> Result<(), FormErrors> {
    match find_banned_word(text) {
        Some(_) => Err(FormErrors::single(field, WARNING)),
        None => Ok(()),
    }
}
