use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    SchoolAdmin,
    Teacher,
    Staff,
    Parent,
    Student,
}

impl UserRole {
    /// Roles with administrative authority over a school's records.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::SchoolAdmin)
    }

    /// Roles allowed to decide requests (approve/reject) within a school.
    pub fn is_staff(&self) -> bool {
        matches!(
            self,
            Self::SuperAdmin | Self::SchoolAdmin | Self::Teacher | Self::Staff
        )
    }
}

/// Public identity view. The password hash never leaves the service layer;
/// queries producing this struct must not select it.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub school_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Internal row used only by the login path.
#[derive(Debug, FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub is_active: bool,
}

#[derive(Debug)]
pub struct NewUser {
    pub school_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_roles() {
        assert!(UserRole::SchoolAdmin.is_staff());
        assert!(UserRole::Teacher.is_staff());
        assert!(UserRole::Staff.is_staff());
        assert!(!UserRole::Parent.is_staff());
        assert!(!UserRole::Student.is_staff());
    }

    #[test]
    fn test_admin_roles() {
        assert!(UserRole::SuperAdmin.is_admin());
        assert!(UserRole::SchoolAdmin.is_admin());
        assert!(!UserRole::Teacher.is_admin());
        assert!(!UserRole::Parent.is_admin());
    }
}
