use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Approval workflow of a salary advance. Only Approved and Paid advances
/// count against amounts owed.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum AdvanceStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl AdvanceStatus {
    /// True for the states that reduce the amount still owed to the employee.
    pub fn counts_against_owed(self) -> bool {
        matches!(self, AdvanceStatus::Approved | AdvanceStatus::Paid)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "employee_id": 1,
        "amount": 40.0,
        "date": "2026-08-20",
        "description": "School fees",
        "status": "Pending"
    })
)]
pub struct SalaryAdvance {
    #[schema(example = 7)]
    pub id: u64,

    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = 40.0)]
    pub amount: f64,

    #[schema(example = "2026-08-20", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "School fees", nullable = true)]
    pub description: Option<String>,

    #[schema(example = "Pending")]
    pub status: String,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}
