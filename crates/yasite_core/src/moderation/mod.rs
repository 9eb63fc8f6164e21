//! Content moderation for reader-submitted text.
//!
//! # Responsibility
//! - Hold the fixed banned-word list and the warning shown to the author.
//! - Answer "may this text be published" without touching storage.

pub mod word_filter;
