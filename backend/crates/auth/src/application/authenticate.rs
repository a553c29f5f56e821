//! Authenticate Use Case
//!
//! Resolves a bearer token into the acting user. Called by the
//! middleware on every protected request.

use std::sync::Arc;

use kernel::actor::Actor;
use platform::token::token_digest;

use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Authenticate output: the resolved actor plus the full user row
/// (handlers that only need identity use the actor).
pub struct AuthenticateOutput {
    pub actor: Actor,
    pub user: User,
}

/// Authenticate use case
pub struct AuthenticateUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
}

impl<U, S> AuthenticateUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>) -> Self {
        Self {
            user_repo,
            session_repo,
        }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<AuthenticateOutput> {
        let digest = token_digest(token);

        let session = self
            .session_repo
            .find_by_token_hash(&digest)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            return Err(AuthError::SessionInvalid);
        }

        let user = self
            .user_repo
            .find_by_id(session.user_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        let actor = Actor {
            user_id: user.user_id,
            role: user.role,
        };

        Ok(AuthenticateOutput { actor, user })
    }
}
