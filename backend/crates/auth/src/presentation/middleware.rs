//! Auth Middleware
//!
//! Resolves `Authorization: Bearer <token>` into a [`kernel::actor::Actor`]
//! stored in request extensions. Protected routes reject with 401 when the
//! header is absent or the token does not resolve.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::authenticate::AuthenticateUseCase;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

impl<R> AuthMiddlewareState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn extract_bearer_token(req: &Request<Body>) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Middleware that requires a valid bearer token
pub async fn require_auth<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let token = match extract_bearer_token(&req) {
        Some(token) => token.to_string(),
        None => return Err(AuthError::MissingToken.into_response()),
    };

    let use_case = AuthenticateUseCase::new(state.repo.clone(), state.repo.clone());

    let output = match use_case.execute(&token).await {
        Ok(output) => output,
        Err(e) => return Err(e.into_response()),
    };

    req.extensions_mut().insert(output.actor);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_auth(value: &str) -> Request<Body> {
        Request::builder()
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        let req = request_with_auth("Bearer abc123");
        assert_eq!(extract_bearer_token(&req), Some("abc123"));
    }

    #[test]
    fn test_extract_rejects_other_schemes() {
        let req = request_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(extract_bearer_token(&req), None);

        let req = request_with_auth("Bearer ");
        assert_eq!(extract_bearer_token(&req), None);

        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(extract_bearer_token(&req), None);
    }
}
