use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Append-only audit trail of employee status transitions.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct StatusHistory {
    pub id: u64,
    pub employee_id: u64,

    #[schema(example = "Active", nullable = true)]
    pub old_status: Option<String>,

    #[schema(example = "Suspended")]
    pub new_status: String,

    #[schema(example = "Repeated no-shows", nullable = true)]
    pub reason: Option<String>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}
