use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Employee lifecycle status. Stored as the variant name in the `status`
/// column.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum EmployeeStatus {
    Active,
    Resting,
    Absent,
    Dismissed,
    Suspended,
}

impl EmployeeStatus {
    /// Allowed status transitions. Same-state transitions are rejected;
    /// Suspended employees must be reinstated or dismissed, and a Dismissed
    /// employee can only come back as Active (re-hire).
    pub fn can_transition_to(self, next: EmployeeStatus) -> bool {
        use EmployeeStatus::*;

        if self == next {
            return false;
        }

        match self {
            Active | Resting | Absent => true,
            Suspended => matches!(next, Active | Dismissed),
            Dismissed => matches!(next, Active),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "first_name": "Aicha",
        "last_name": "Diallo",
        "hire_date": "2024-03-01",
        "exit_date": null,
        "daily_rate": 50.0,
        "status": "Active"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Aicha")]
    pub first_name: String,

    #[schema(example = "Diallo")]
    pub last_name: String,

    #[schema(example = "2024-03-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,

    #[schema(example = json!(null), value_type = Option<String>, format = "date")]
    pub exit_date: Option<NaiveDate>,

    #[schema(example = 50.0)]
    pub daily_rate: f64,

    #[schema(example = "Active")]
    pub status: String,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::EmployeeStatus::*;

    #[test]
    fn same_state_is_not_a_transition() {
        for s in [Active, Resting, Absent, Dismissed, Suspended] {
            assert!(!s.can_transition_to(s));
        }
    }

    #[test]
    fn active_can_move_anywhere_else() {
        for next in [Resting, Absent, Dismissed, Suspended] {
            assert!(Active.can_transition_to(next));
        }
    }

    #[test]
    fn suspended_is_reinstated_or_dismissed_only() {
        assert!(Suspended.can_transition_to(Active));
        assert!(Suspended.can_transition_to(Dismissed));
        assert!(!Suspended.can_transition_to(Resting));
        assert!(!Suspended.can_transition_to(Absent));
    }

    #[test]
    fn dismissed_only_comes_back_as_active() {
        assert!(Dismissed.can_transition_to(Active));
        assert!(!Dismissed.can_transition_to(Resting));
        assert!(!Dismissed.can_transition_to(Absent));
        assert!(!Dismissed.can_transition_to(Suspended));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for s in [Active, Resting, Absent, Dismissed, Suspended] {
            assert_eq!(s.to_string().parse(), Ok(s));
        }
        assert!("Fired".parse::<super::EmployeeStatus>().is_err());
    }
}
