use serde::{Deserialize, Serialize};
use std::fmt;

/// Role attached to every user account.
///
/// Stored as a small integer; the string codes are the API representation.
/// Unknown codes are rejected at the boundary via [`UserRole::try_from_code`],
/// never coerced by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum UserRole {
    #[default]
    Student = 0,
    Mentor = 1,
    Admin = 2,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Student => "student",
            Mentor => "mentor",
            Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// For database values, which are write-validated.
    #[inline]
    pub fn from_id(id: i16) -> Self {
        use UserRole::*;
        match id {
            0 => Student,
            1 => Mentor,
            2 => Admin,
            _ => unreachable!("Invalid UserRole id: {}", id),
        }
    }

    /// For API input; unknown codes are rejected.
    #[inline]
    pub fn try_from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "student" => Some(Student),
            "mentor" => Some(Mentor),
            "admin" => Some(Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_id() {
        assert_eq!(UserRole::from_id(0), UserRole::Student);
        assert_eq!(UserRole::from_id(1), UserRole::Mentor);
        assert_eq!(UserRole::from_id(2), UserRole::Admin);
    }

    #[test]
    fn test_user_role_try_from_code() {
        assert_eq!(UserRole::try_from_code("student"), Some(UserRole::Student));
        assert_eq!(UserRole::try_from_code("mentor"), Some(UserRole::Mentor));
        assert_eq!(UserRole::try_from_code("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::try_from_code("superuser"), None);
        assert_eq!(UserRole::try_from_code(""), None);
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Student.to_string(), "student");
        assert_eq!(UserRole::Mentor.to_string(), "mentor");
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_is_admin() {
        assert!(!UserRole::Student.is_admin());
        assert!(!UserRole::Mentor.is_admin());
        assert!(UserRole::Admin.is_admin());
    }
}
