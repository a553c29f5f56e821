//! Application Configuration
//!
//! Configuration for the Auth application layer.

use chrono::Duration;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Bearer session lifetime (30 days, matching the token expiry
    /// the frontend was built around)
    pub session_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::days(30),
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Load from environment. `AUTH_PEPPER` is optional;
    /// `AUTH_SESSION_TTL_DAYS` overrides the default lifetime.
    pub fn from_env() -> Self {
        let session_ttl = std::env::var("AUTH_SESSION_TTL_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .map(Duration::days)
            .unwrap_or_else(|| Duration::days(30));

        let password_pepper = std::env::var("AUTH_PEPPER")
            .ok()
            .filter(|v| !v.is_empty())
            .map(|v| v.into_bytes());

        Self {
            session_ttl,
            password_pepper,
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
