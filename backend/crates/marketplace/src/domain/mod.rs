//! Domain layer: entities, state transitions, repository traits.

pub mod blog;
pub mod book;
pub mod mentor;
pub mod pyq;
pub mod query;
pub mod repository;

use kernel::id::UserId;

/// Restricted public projection of a user, used when expanding
/// owner/author/uploader/renter references. The password hash is never
/// part of this projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPublic {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub college: String,
    pub year: String,
    pub phone: String,
}
