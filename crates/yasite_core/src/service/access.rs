//! Owner-only access to notes and comments.
//!
//! One rule for every owned entity: a row that exists but belongs to someone
//! else is reported exactly like a row that does not exist. Callers never see
//! a "forbidden" outcome, so other users' entities cannot be probed.

use crate::model::news::Comment;
use crate::model::note::Note;
use crate::model::user::UserId;

/// An entity with a single, immutable owner.
pub trait Owned {
    fn owner_id(&self) -> UserId;
}

impl Owned for Note {
    fn owner_id(&self) -> UserId {
        self.author_id
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> UserId {
        self.author_id
    }
}

/// Keeps `entity` only when `requester` owns it.
pub fn owned_by<T: Owned>(entity: Option<T>, requester: UserId) -> Option<T> {
    entity.filter(|value| value.owner_id() == requester)
}
