//! Use-case services.
//!
//! # Responsibility
//! - Turn caller identity + form input into repository calls.
//! - Apply ownership, uniqueness and moderation rules before any write.
//!
//! # Invariants
//! - Non-owners get the same `NotFound` a missing row produces.
//! - A rejected submission leaves storage unchanged.

pub mod access;
pub mod account_service;
pub mod news_service;
pub mod note_service;
pub mod password;
