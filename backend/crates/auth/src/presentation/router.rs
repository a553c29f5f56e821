//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_auth};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let repo = Arc::new(repo);

    let state = AuthAppState {
        repo: repo.clone(),
        config: Arc::new(config),
    };

    let mw_state = AuthMiddlewareState::new(repo);

    let protected = Router::new()
        .route(
            "/me",
            get(handlers::get_me::<R>).put(handlers::update_profile::<R>),
        )
        // Legacy alias for the profile update
        .route("/profile", put(handlers::update_profile::<R>))
        .route_layer(middleware::from_fn_with_state(mw_state, require_auth::<R>))
        .with_state(state.clone());

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .with_state(state)
        .merge(protected)
}
