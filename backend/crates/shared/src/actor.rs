//! Actor - capability token for authenticated requests
//!
//! The authentication middleware resolves a bearer credential into an
//! [`Actor`] and injects it into request context. Every content domain
//! authorizes mutations with the same predicate: owner or admin.

use crate::id::UserId;
use crate::role::UserRole;

/// The authenticated principal of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// The ownership guard.
    ///
    /// True iff the actor is an admin or owns the resource. Callers must
    /// check existence first: absent resource is Not Found, present but
    /// unauthorized is an authorization failure.
    #[inline]
    pub fn can_mutate(&self, owner: UserId) -> bool {
        self.role.is_admin() || self.user_id == owner
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Id;

    #[test]
    fn test_owner_can_mutate() {
        let owner: UserId = Id::new();
        let actor = Actor::new(owner, UserRole::Student);
        assert!(actor.can_mutate(owner));
    }

    #[test]
    fn test_non_owner_cannot_mutate() {
        let actor = Actor::new(Id::new(), UserRole::Student);
        assert!(!actor.can_mutate(Id::new()));

        let mentor = Actor::new(Id::new(), UserRole::Mentor);
        assert!(!mentor.can_mutate(Id::new()));
    }

    #[test]
    fn test_admin_can_mutate_anything() {
        let actor = Actor::new(Id::new(), UserRole::Admin);
        assert!(actor.can_mutate(Id::new()));
    }
}
