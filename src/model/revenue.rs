use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row per calendar day holding the day's total revenue.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 3,
        "date": "2026-08-24",
        "amount": 1250.0
    })
)]
pub struct Revenue {
    #[schema(example = 3)]
    pub id: u64,

    #[schema(example = "2026-08-24", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = 1250.0)]
    pub amount: f64,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}
