//! Domain model for accounts, notes and news.
//!
//! # Responsibility
//! - Define the records shared by repositories, services and the web layer.
//! - Own field-level validation of user-submitted drafts.
//!
//! # Invariants
//! - Every note and comment carries exactly one author, fixed at creation.
//! - Drafts never carry an author; ownership comes from the caller identity.

pub mod form;
pub mod news;
pub mod note;
pub mod slug;
pub mod user;
