//! User entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use kernel::role::UserRole;

use crate::domain::value_object::email::Email;
use crate::error::AuthError;

/// A registered account on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub email: Email,
    pub college: String,
    pub year: String,
    pub phone: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id and default role.
    pub fn new(name: impl Into<String>, email: Email, role: UserRole) -> Result<Self, AuthError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(AuthError::Validation("Name cannot be empty".into()));
        }

        let now = Utc::now();
        Ok(Self {
            user_id: UserId::new(),
            name,
            email,
            college: String::new(),
            year: String::new(),
            phone: String::new(),
            role,
            created_at: now,
            updated_at: now,
        })
    }

    /// Attach optional contact details supplied at registration.
    pub fn with_contact(
        mut self,
        college: Option<String>,
        year: Option<String>,
        phone: Option<String>,
    ) -> Self {
        if let Some(college) = college {
            self.college = college.trim().to_string();
        }
        if let Some(year) = year {
            self.year = year.trim().to_string();
        }
        if let Some(phone) = phone {
            self.phone = phone.trim().to_string();
        }
        self
    }

    /// Apply a profile update. `None` fields are left unchanged.
    pub fn apply_profile_update(&mut self, update: ProfileUpdate) -> Result<(), AuthError> {
        if let Some(name) = update.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AuthError::Validation("Name cannot be empty".into()));
            }
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(college) = update.college {
            self.college = college.trim().to_string();
        }
        if let Some(year) = update.year {
            self.year = year.trim().to_string();
        }
        if let Some(phone) = update.phone {
            self.phone = phone.trim().to_string();
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Partial profile change. Role and password are never updatable here.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub college: Option<String>,
    pub year: Option<String>,
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> Email {
        Email::new("student@campus.edu").unwrap()
    }

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("Asha", email(), UserRole::Student).unwrap();
        assert_eq!(user.name, "Asha");
        assert_eq!(user.role, UserRole::Student);
        assert!(user.college.is_empty());
        assert!(user.year.is_empty());
        assert!(user.phone.is_empty());
    }

    #[test]
    fn test_contact_details_at_registration() {
        let user = User::new("Asha", email(), UserRole::Student)
            .unwrap()
            .with_contact(Some(" IIT Delhi ".into()), None, Some("9876543210".into()));
        assert_eq!(user.college, "IIT Delhi");
        assert!(user.year.is_empty());
        assert_eq!(user.phone, "9876543210");
    }

    #[test]
    fn test_new_user_rejects_blank_name() {
        assert!(User::new("   ", email(), UserRole::Student).is_err());
    }

    #[test]
    fn test_profile_update_partial() {
        let mut user = User::new("Asha", email(), UserRole::Student).unwrap();
        user.apply_profile_update(ProfileUpdate {
            college: Some("IIT Delhi".into()),
            year: Some("3".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(user.name, "Asha");
        assert_eq!(user.college, "IIT Delhi");
        assert_eq!(user.year, "3");
    }

    #[test]
    fn test_profile_update_rejects_blank_name() {
        let mut user = User::new("Asha", email(), UserRole::Student).unwrap();
        let result = user.apply_profile_update(ProfileUpdate {
            name: Some("  ".into()),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
