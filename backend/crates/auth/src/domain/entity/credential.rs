//! Password credential entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::{ClearTextPassword, HashedPassword};

use crate::error::AuthError;

/// Stored password hash for a user. Kept separate from the profile so
/// the hash never rides along with ordinary user reads.
#[derive(Debug, Clone)]
pub struct Credential {
    pub user_id: UserId,
    pub password_hash: HashedPassword,
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(user_id: UserId, password_hash: HashedPassword) -> Self {
        Self {
            user_id,
            password_hash,
            updated_at: Utc::now(),
        }
    }

    /// Verify a cleartext password against the stored hash.
    pub fn verify(
        &self,
        password: &ClearTextPassword,
        pepper: Option<&[u8]>,
    ) -> Result<(), AuthError> {
        if self.password_hash.verify(password, pepper) {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}
