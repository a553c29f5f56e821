//! Repository traits for auth persistence.
//!
//! Implementations live in `infra`. The traits use `trait_variant` to
//! generate `Send` bounds for multi-threaded runtimes.

use kernel::id::UserId;

use crate::domain::entity::credential::Credential;
use crate::domain::entity::session::ApiSession;
use crate::domain::entity::user::User;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// User profile persistence
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find a user by id
    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Find a user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check whether an email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Persist profile changes
    async fn update(&self, user: &User) -> AuthResult<()>;
}

/// Password credential persistence
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Insert a credential for a new user
    async fn create(&self, credential: &Credential) -> AuthResult<()>;

    /// Load the credential for a user
    async fn find_by_user_id(&self, user_id: UserId) -> AuthResult<Option<Credential>>;
}

/// Bearer session persistence
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Insert a new session
    async fn create(&self, session: &ApiSession) -> AuthResult<()>;

    /// Look up a session by token digest
    async fn find_by_token_hash(&self, token_hash: &[u8]) -> AuthResult<Option<ApiSession>>;

    /// Delete all expired sessions, returning how many were removed
    async fn delete_expired(&self) -> AuthResult<u64>;
}
