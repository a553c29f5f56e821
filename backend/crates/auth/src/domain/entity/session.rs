//! API session entity

use chrono::{DateTime, Duration, Utc};
use kernel::id::{SessionId, UserId};

/// Server-side record behind a bearer token. Only the SHA-256 digest of
/// the token is stored; the cleartext is handed to the client once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSession {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub token_hash: Vec<u8>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ApiSession {
    pub fn new(user_id: UserId, token_hash: Vec<u8>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            session_id: SessionId::new(),
            user_id,
            token_hash,
            expires_at: now + ttl,
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_not_expired() {
        let session = ApiSession::new(UserId::new(), vec![0u8; 32], Duration::days(30));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_session_from_token_digest() {
        let digest = platform::token::token_digest("some-bearer-token");
        let session = ApiSession::new(UserId::new(), digest.to_vec(), Duration::days(30));
        assert_eq!(session.token_hash.len(), 32);
        assert_eq!(session.token_hash, digest.to_vec());
    }

    #[test]
    fn test_expired_session() {
        let mut session = ApiSession::new(UserId::new(), vec![0u8; 32], Duration::days(30));
        session.expires_at = Utc::now() - Duration::seconds(1);
        assert!(session.is_expired());
    }
}
