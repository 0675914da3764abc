use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// What an employee did on one calendar day.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum DayStatus {
    Present,
    Absent,
    Rest,
}

/// One row per (employee, date). Writes are upserts on that composite key.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 42,
        "employee_id": 1,
        "date": "2026-08-24",
        "day_status": "Present",
        "shift": "Evening",
        "amount": 65.0,
        "paid": false,
        "paid_at": null
    })
)]
pub struct AttendanceRecord {
    #[schema(example = 42)]
    pub id: u64,

    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = "2026-08-24", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "Present")]
    pub day_status: String,

    #[schema(example = "Evening", nullable = true)]
    pub shift: Option<String>,

    /// Realized amount for the day, distinct from the flat daily rate.
    #[schema(example = 65.0)]
    pub amount: f64,

    pub paid: bool,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub paid_at: Option<DateTime<Utc>>,
}
