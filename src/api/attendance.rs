use crate::{
    auth::auth::AuthUser,
    model::{
        advance::SalaryAdvance,
        attendance::{AttendanceRecord, DayStatus},
        employee::Employee,
    },
    stats::{aggregate::aggregate, period::week_start},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SaveAttendance {
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = "2026-08-24", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "Present")]
    pub day_status: DayStatus,
    #[schema(example = "Evening", nullable = true)]
    pub shift: Option<String>,
    #[schema(example = 65.0)]
    pub amount: Option<f64>,
}

#[derive(Deserialize, ToSchema)]
pub struct WeeklyQuery {
    #[schema(example = "2026-08-24", format = "date", value_type = Option<String>)]
    pub week_start: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct MarkPaid {
    #[schema(example = "2026-08-24", format = "date", value_type = String)]
    pub week_start: NaiveDate,
    #[schema(example = json!([1, 2]))]
    pub employee_ids: Vec<u64>,
}

/// Attendance row joined with the employee's name for activity feeds.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct RecentAttendance {
    pub id: u64,
    pub employee_id: u64,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub day_status: String,
    pub shift: Option<String>,
    pub amount: f64,
    pub paid: bool,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub paid_at: Option<DateTime<Utc>>,
    pub first_name: String,
    pub last_name: String,
}

/// Per-employee week bundle for the weekly attendance board.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyEntry {
    pub employee: Employee,
    pub records: Vec<AttendanceRecord>,
    pub advances: Vec<SalaryAdvance>,
    pub weekly_stats: crate::stats::aggregate::WeeklyStats,
}

/// Save one day's attendance. Upserts on (employee_id, date): saving the
/// same day twice overwrites the first write.
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = SaveAttendance,
    responses(
        (status = 200, description = "Attendance saved", body = Object, example = json!({
            "success": true,
            "data": {"employee_id": 1, "date": "2026-08-24", "day_status": "Present"}
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn save_attendance(
    pool: web::Data<MySqlPool>,
    payload: web::Json<SaveAttendance>,
) -> actix_web::Result<impl Responder> {
    let amount = payload.amount.unwrap_or(0.0);

    sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, day_status, shift, amount)
        VALUES (?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            day_status = VALUES(day_status),
            shift = VALUES(shift),
            amount = VALUES(amount)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.date)
    .bind(payload.day_status.to_string())
    .bind(&payload.shift)
    .bind(amount)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = payload.employee_id, "Failed to save attendance");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let record = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT * FROM attendance WHERE employee_id = ? AND date = ?",
    )
    .bind(payload.employee_id)
    .bind(payload.date)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = payload.employee_id, "Failed to fetch saved attendance");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": record
    })))
}

/// Last 10 attendance rows with employee names
#[utoipa::path(
    get,
    path = "/api/v1/attendance/recent",
    responses(
        (status = 200, description = "Recent attendance", body = [RecentAttendance]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn recent_attendance(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let records = sqlx::query_as::<_, RecentAttendance>(
        r#"
        SELECT a.id, a.employee_id, a.date, a.day_status, a.shift, a.amount,
               a.paid, a.paid_at, e.first_name, e.last_name
        FROM attendance a
        JOIN employees e ON e.id = a.employee_id
        ORDER BY a.date DESC, a.id DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch recent attendance");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(records))
}

/// Weekly board: every active employee with their rows, advances and totals
#[utoipa::path(
    get,
    path = "/api/v1/attendance/weekly",
    params(
        ("week_start" = Option<String>, Query, description = "Monday of the requested week, defaults to the current week")
    ),
    responses(
        (status = 200, description = "Weekly attendance data"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn weekly_attendance(
    pool: web::Data<MySqlPool>,
    query: web::Query<WeeklyQuery>,
) -> actix_web::Result<impl Responder> {
    // A mid-week date snaps back to its Monday.
    let week_from = week_start(query.week_start.unwrap_or_else(|| Utc::now().date_naive()));
    let week_to = week_from + Duration::days(6);

    let employees = sqlx::query_as::<_, Employee>(
        "SELECT * FROM employees WHERE status = 'Active' ORDER BY first_name",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch active employees");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let records = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT * FROM attendance WHERE date BETWEEN ? AND ? ORDER BY date",
    )
    .bind(week_from)
    .bind(week_to)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch weekly attendance");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let advances = sqlx::query_as::<_, SalaryAdvance>(
        "SELECT * FROM salary_advances WHERE date BETWEEN ? AND ? ORDER BY date",
    )
    .bind(week_from)
    .bind(week_to)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch weekly advances");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let weekly_data: Vec<WeeklyEntry> = employees
        .into_iter()
        .map(|employee| {
            let employee_records: Vec<AttendanceRecord> = records
                .iter()
                .filter(|r| r.employee_id == employee.id)
                .cloned()
                .collect();
            let employee_advances: Vec<SalaryAdvance> = advances
                .iter()
                .filter(|a| a.employee_id == employee.id)
                .cloned()
                .collect();

            let weekly_stats = aggregate(&employee_records, employee.daily_rate, &employee_advances);

            WeeklyEntry {
                employee,
                records: employee_records,
                advances: employee_advances,
                weekly_stats,
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "weekStart": week_from,
        "weekEnd": week_to,
        "weeklyData": weekly_data
    })))
}

/// Mark one week as paid for a set of employees. One bulk update: every row
/// in [week_start, week_end] for those employees gets paid=true and a
/// payment timestamp; everything else is untouched.
#[utoipa::path(
    post,
    path = "/api/v1/attendance/mark-paid",
    request_body = MarkPaid,
    responses(
        (status = 200, description = "Week marked as paid", body = Object, example = json!({
            "success": true,
            "message": "Week marked as paid"
        })),
        (status = 400, description = "Missing or invalid parameters"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn mark_paid(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<MarkPaid>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    if payload.employee_ids.is_empty() {
        return Ok(
            HttpResponse::BadRequest().json(json!({"error": "Missing or invalid parameters"}))
        );
    }

    let week_from = week_start(payload.week_start);
    let week_to = week_from + Duration::days(6);

    let placeholders = vec!["?"; payload.employee_ids.len()].join(", ");
    let sql = format!(
        r#"
        UPDATE attendance
        SET paid = TRUE, paid_at = NOW()
        WHERE employee_id IN ({placeholders})
        AND date BETWEEN ? AND ?
        "#
    );

    let mut update = sqlx::query(&sql);
    for id in &payload.employee_ids {
        update = update.bind(id);
    }
    update = update.bind(week_from).bind(week_to);

    update.execute(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to mark week as paid");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Week marked as paid"
    })))
}
