use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::errors::AppError;

/// Workflow status shared by book requests, hostel outpasses and leave
/// requests. `pending` is the only state that permits a transition; the
/// other three are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Classifies a conditional transition that updated zero rows: the record is
/// either already in a terminal state (a conflict) or absent from the
/// caller's scope (not found — deliberately the same answer as "belongs to
/// someone else").
pub fn blocked_transition(current: Option<RequestStatus>, entity: &str) -> AppError {
    match current {
        Some(status) => {
            AppError::conflict(format!("{} is already {}", entity, status.as_str()))
        }
        None => AppError::not_found(format!("{} not found", entity)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pending_is_open() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_blocked_transition_on_terminal_state_is_conflict() {
        let err = blocked_transition(Some(RequestStatus::Approved), "Leave request");
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_blocked_transition_on_missing_record_is_not_found() {
        let err = blocked_transition(None, "Leave request");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_serde_names_match_db_values() {
        for (status, expected) in [
            (RequestStatus::Pending, "\"pending\""),
            (RequestStatus::Approved, "\"approved\""),
            (RequestStatus::Rejected, "\"rejected\""),
            (RequestStatus::Cancelled, "\"cancelled\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), expected);
        }
    }
}
