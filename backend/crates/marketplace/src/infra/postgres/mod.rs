//! PostgreSQL Repository Implementation
//!
//! One repository struct backs all four content domains. Relation
//! expansion is done with explicit joins against `users`; the password
//! hash lives in `auth_credentials` and can never appear in a
//! projection built here.

mod blogs;
mod books;
mod mentors;
mod pyqs;

use sqlx::PgPool;
use uuid::Uuid;

use kernel::id::UserId;

use crate::domain::UserPublic;

/// PostgreSQL-backed marketplace repository
#[derive(Clone)]
pub struct PgMarketRepository {
    pool: PgPool,
}

impl PgMarketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Builds the `%...%` pattern for an ILIKE filter with the user input
/// escaped so it matches literally.
pub(crate) fn contains_pattern(input: &str) -> String {
    format!("%{}%", crate::domain::query::escape_like(input))
}

/// Joined user columns, shared by every expanding query. Queries alias
/// their join columns to `{prefix}_name` etc.
pub(crate) fn user_public(
    user_id: Uuid,
    name: String,
    email: String,
    college: String,
    year: String,
    phone: String,
) -> UserPublic {
    UserPublic {
        user_id: UserId::from_uuid(user_id),
        name,
        email,
        college,
        year,
        phone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("algebra"), "%algebra%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
    }
}
