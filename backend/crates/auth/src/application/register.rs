//! Register Use Case
//!
//! Creates a new account and issues a bearer token so the client is
//! signed in immediately after registering.

use std::sync::Arc;

use kernel::role::UserRole;
use platform::password::ClearTextPassword;
use platform::token::{generate_token, token_digest};

use crate::application::config::AuthConfig;
use crate::domain::entity::credential::Credential;
use crate::domain::entity::session::ApiSession;
use crate::domain::entity::user::User;
use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
    pub college: Option<String>,
    pub year: Option<String>,
    pub phone: Option<String>,
}

/// Register output
pub struct RegisterOutput {
    pub user: User,
    pub token: String,
}

/// Register use case
pub struct RegisterUseCase<U, C, S>
where
    U: UserRepository,
    C: CredentialRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, C, S> RegisterUseCase<U, C, S>
where
    U: UserRepository,
    C: CredentialRepository,
    S: SessionRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        credential_repo: Arc<C>,
        session_repo: Arc<S>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            credential_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let email = Email::new(input.email)?;

        // Duplicate registrations answer 400, not 409
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password = ClearTextPassword::new(input.password)?;
        let password_hash = password.hash(self.config.pepper())?;

        let role = input.role.unwrap_or_default();
        let user = User::new(input.name, email, role)?.with_contact(
            input.college,
            input.year,
            input.phone,
        );
        let credential = Credential::new(user.user_id, password_hash);

        let token = generate_token();
        let session = ApiSession::new(
            user.user_id,
            token_digest(&token).to_vec(),
            self.config.session_ttl,
        );

        self.user_repo.create(&user).await?;
        self.credential_repo.create(&credential).await?;
        self.session_repo.create(&session).await?;

        tracing::info!(
            user_id = %user.user_id,
            email = %user.email,
            "User registered"
        );

        Ok(RegisterOutput { user, token })
    }
}
