use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Class {
    pub id: Uuid,
    pub school_id: Uuid,
    pub name: String,
    pub section: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClassDto {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub section: String,
}

/// A student's class reference as stored: either already populated with the
/// canonical class id, or only the denormalized name/section strings.
///
/// Which form a record carries depends on how it was admitted, so both are
/// first-class here and the distinction is settled once, at resolution time,
/// instead of being re-checked at every call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassRef {
    Resolved(Uuid),
    Named { name: String, section: String },
}

impl ClassRef {
    pub fn from_parts(class_id: Option<Uuid>, name: &str, section: &str) -> Self {
        match class_id {
            Some(id) => Self::Resolved(id),
            None => Self::Named {
                name: name.to_string(),
                section: section.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_prefers_populated_id() {
        let id = Uuid::new_v4();
        assert_eq!(
            ClassRef::from_parts(Some(id), "10", "A"),
            ClassRef::Resolved(id)
        );
    }

    #[test]
    fn test_from_parts_falls_back_to_strings() {
        assert_eq!(
            ClassRef::from_parts(None, "10", "A"),
            ClassRef::Named {
                name: "10".to_string(),
                section: "A".to_string()
            }
        );
    }
}
