//! HTTP Handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use std::sync::Arc;

use kernel::actor::Actor;
use kernel::role::UserRole;

use crate::application::config::AuthConfig;
use crate::application::login::{LoginInput, LoginUseCase};
use crate::application::profile::{GetProfileUseCase, UpdateProfileInput, UpdateProfileUseCase};
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, UpdateProfileRequest,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    // An unrecognized role is a validation failure, not a silent default
    let role = match req.role.as_deref() {
        None | Some("") => None,
        Some(code) => Some(
            UserRole::try_from_code(code)
                .ok_or_else(|| AuthError::Validation(format!("Unknown role: {}", code)))?,
        ),
    };

    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(RegisterInput {
            name: req.name,
            email: req.email,
            password: req.password,
            role,
            college: req.college,
            year: req.year,
            phone: req.phone,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::from_user(&output.user, output.token)),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(AuthResponse::from_user(&output.user, output.token)))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /api/auth/me
pub async fn get_me<R>(
    State(state): State<AuthAppState<R>>,
    Extension(actor): Extension<Actor>,
) -> AuthResult<Json<ProfileResponse>>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = GetProfileUseCase::new(state.repo.clone());
    let user = use_case.execute(actor.user_id).await?;

    Ok(Json(ProfileResponse::from(&user)))
}

/// PUT /api/auth/profile
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<Json<ProfileResponse>>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = UpdateProfileUseCase::new(state.repo.clone());

    let user = use_case
        .execute(
            actor.user_id,
            UpdateProfileInput {
                name: req.name,
                email: req.email,
                college: req.college,
                year: req.year,
                phone: req.phone,
            },
        )
        .await?;

    Ok(Json(ProfileResponse::from(&user)))
}
