use crate::{
    auth::auth::AuthUser,
    model::{
        advance::SalaryAdvance,
        attendance::AttendanceRecord,
        employee::{Employee, EmployeeStatus},
        status_history::StatusHistory,
    },
    stats::{
        aggregate::{aggregate, attendance_stats, weekly_breakdown},
        period::{Period, start_of, week_start},
    },
    utils::patch::{build_patch, execute_patch},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

/// Columns a PUT /employees/{id} may touch. Status changes go through the
/// dedicated transition endpoint so they always leave a history row.
const EMPLOYEE_COLUMNS: &[&str] = &[
    "first_name",
    "last_name",
    "hire_date",
    "exit_date",
    "daily_rate",
];

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Aicha")]
    pub first_name: String,
    #[schema(example = "Diallo")]
    pub last_name: String,
    #[schema(example = "2024-03-01", format = "date", value_type = String)]
    pub hire_date: NaiveDate,
    #[schema(example = 50.0)]
    pub daily_rate: f64,
    #[schema(example = "Active")]
    pub status: EmployeeStatus,
}

#[derive(Deserialize, ToSchema)]
pub struct ChangeStatus {
    #[schema(example = "Suspended")]
    pub status: EmployeeStatus,
    #[schema(example = "Repeated no-shows", nullable = true)]
    pub reason: Option<String>,
    #[schema(example = "2026-08-25", format = "date", value_type = Option<String>)]
    pub exit_date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateAdvance {
    #[schema(example = 40.0)]
    pub amount: f64,
    #[schema(example = "2026-08-20", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "School fees", nullable = true)]
    pub description: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct AttendancePeriodQuery {
    #[schema(example = "month")]
    pub period: Option<String>,
}

async fn fetch_employee(pool: &MySqlPool, id: u64) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

async fn insert_history(
    pool: &MySqlPool,
    employee_id: u64,
    old_status: Option<&str>,
    new_status: &str,
    reason: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO status_history (employee_id, old_status, new_status, reason)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(old_status)
    .bind(new_status)
    .bind(reason)
    .execute(pool)
    .await?;
    Ok(())
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Object, example = json!({
            "success": true,
            "data": {"id": 1, "first_name": "Aicha", "status": "Active"}
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let status = payload.status.to_string();

    let result = sqlx::query(
        r#"
        INSERT INTO employees (first_name, last_name, hire_date, daily_rate, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(payload.hire_date)
    .bind(payload.daily_rate)
    .bind(&status)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let employee_id = result.last_insert_id();

    insert_history(pool.get_ref(), employee_id, None, &status, "Employee created")
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to record creation history");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let employee = fetch_employee(pool.get_ref(), employee_id)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch created employee");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "data": employee
    })))
}

/// List employees, newest first
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses(
        (status = 200, description = "All employees", body = [Employee]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let employees =
        sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY created_at DESC")
            .fetch_all(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch employees");
                ErrorInternalServerError("Internal Server Error")
            })?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let employee = fetch_employee(pool.get_ref(), employee_id).await.map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({"error": "Employee not found"}))),
    }
}

/// Partial update of an employee
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Employee updated"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let employee_id = path.into_inner();

    let patch = build_patch("employees", EMPLOYEE_COLUMNS, &body, "id", employee_id)?;

    let affected = execute_patch(pool.get_ref(), patch).await.map_err(|e| {
        error!(error = %e, employee_id, "Failed to update employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({"error": "Employee not found"})));
    }

    let employee = fetch_employee(pool.get_ref(), employee_id).await.map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch updated employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": employee
    })))
}

/// Hard delete. Normal retirement is a status change, not a delete.
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let employee_id = path.into_inner();

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({"error": "Employee not found"})));
            }

            Ok(HttpResponse::Ok().json(json!({"success": true})))
        }
        Err(e) => {
            error!(error = %e, employee_id, "Failed to delete employee");
            Ok(HttpResponse::InternalServerError().json(json!({"error": "Internal Server Error"})))
        }
    }
}

/// Validated status transition. Appends a history row; dismissal sets the
/// exit date, reinstatement clears it.
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}/status",
    params(("id" = u64, Path, description = "Employee ID")),
    request_body = ChangeStatus,
    responses(
        (status = 200, description = "Status changed", body = Object, example = json!({
            "success": true,
            "data": {"id": 1, "status": "Suspended"}
        })),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn change_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ChangeStatus>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let employee_id = path.into_inner();

    let employee = fetch_employee(pool.get_ref(), employee_id).await.map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let employee = match employee {
        Some(e) => e,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({"error": "Employee not found"})));
        }
    };

    let current = match employee.status.parse::<EmployeeStatus>() {
        Ok(s) => s,
        Err(_) => {
            error!(employee_id, status = %employee.status, "Unknown stored status");
            return Err(ErrorInternalServerError("Internal Server Error"));
        }
    };
    let next = payload.status;

    if !current.can_transition_to(next) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": format!("Transition {current} -> {next} is not allowed")
        })));
    }

    let exit_date: Option<NaiveDate> = if next == EmployeeStatus::Dismissed {
        Some(payload.exit_date.unwrap_or_else(|| Utc::now().date_naive()))
    } else {
        // Leaving Dismissed (or any non-dismissal change) carries no exit date.
        None
    };

    sqlx::query("UPDATE employees SET status = ?, exit_date = ? WHERE id = ?")
        .bind(next.to_string())
        .bind(exit_date)
        .bind(employee_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to change status");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let reason = payload.reason.as_deref().unwrap_or("Status change");
    insert_history(
        pool.get_ref(),
        employee_id,
        Some(&employee.status),
        &next.to_string(),
        reason,
    )
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to record status history");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let updated = fetch_employee(pool.get_ref(), employee_id).await.map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch updated employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": updated
    })))
}

/// Status audit trail, newest first
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}/history",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Status history", body = [StatusHistory]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn status_history(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let history = sqlx::query_as::<_, StatusHistory>(
        r#"
        SELECT * FROM status_history
        WHERE employee_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(employee_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch status history");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(history))
}

/// Attendance stats for one employee over week/month/year
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}/attendance",
    params(
        ("id" = u64, Path, description = "Employee ID"),
        ("period" = Option<String>, Query, description = "week | month | year (default month)")
    ),
    responses(
        (status = 200, description = "Attendance stats with weekly breakdown"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn employee_attendance(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<AttendancePeriodQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let period = Period::from_param(query.period.as_deref(), Period::Month);
    let start_date = start_of(period, Utc::now().date_naive());

    let employee = fetch_employee(pool.get_ref(), employee_id).await.map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let employee = match employee {
        Some(e) => e,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({"error": "Employee not found"})));
        }
    };

    let records = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT * FROM attendance
        WHERE employee_id = ? AND date >= ?
        ORDER BY date
        "#,
    )
    .bind(employee_id)
    .bind(start_date)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch attendance");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let stats = attendance_stats(&records, employee.daily_rate);
    let weekly = weekly_breakdown(&records, employee.daily_rate);

    Ok(HttpResponse::Ok().json(json!({
        "employee": employee,
        "period": period.to_string(),
        "startDate": start_date,
        "stats": stats,
        "weeklyStats": weekly,
        "records": records
    })))
}

/// Current-week bundle for one employee: rows, advances, weekly totals
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}/current-week",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Current week data"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn current_week(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let week_from = week_start(Utc::now().date_naive());
    let week_to = week_from + Duration::days(6);

    let employee = fetch_employee(pool.get_ref(), employee_id).await.map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let employee = match employee {
        Some(e) => e,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({"error": "Employee not found"})));
        }
    };

    let records = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT * FROM attendance
        WHERE employee_id = ? AND date BETWEEN ? AND ?
        ORDER BY date
        "#,
    )
    .bind(employee_id)
    .bind(week_from)
    .bind(week_to)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch week attendance");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let advances = sqlx::query_as::<_, SalaryAdvance>(
        r#"
        SELECT * FROM salary_advances
        WHERE employee_id = ? AND date BETWEEN ? AND ?
        ORDER BY date
        "#,
    )
    .bind(employee_id)
    .bind(week_from)
    .bind(week_to)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch week advances");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let weekly_stats = aggregate(&records, employee.daily_rate, &advances);

    Ok(HttpResponse::Ok().json(json!({
        "weekStart": week_from,
        "weekEnd": week_to,
        "employee": employee,
        "records": records,
        "advances": advances,
        "weeklyStats": weekly_stats
    })))
}

/// Request a salary advance (starts Pending)
#[utoipa::path(
    post,
    path = "/api/v1/employees/{id}/advances",
    params(("id" = u64, Path, description = "Employee ID")),
    request_body = CreateAdvance,
    responses(
        (status = 201, description = "Advance recorded"),
        (status = 400, description = "Invalid amount"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Advance"
)]
pub async fn create_advance(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<CreateAdvance>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    if payload.amount <= 0.0 {
        return Ok(
            HttpResponse::BadRequest().json(json!({"error": "Amount must be positive"}))
        );
    }

    sqlx::query(
        r#"
        INSERT INTO salary_advances (employee_id, amount, date, description, status)
        VALUES (?, ?, ?, ?, 'Pending')
        "#,
    )
    .bind(employee_id)
    .bind(payload.amount)
    .bind(payload.date)
    .bind(&payload.description)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to record salary advance");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({"success": true})))
}

/// List one employee's advances, newest first
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}/advances",
    params(("id" = u64, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Salary advances", body = [SalaryAdvance]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Advance"
)]
pub async fn list_advances(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let advances = sqlx::query_as::<_, SalaryAdvance>(
        r#"
        SELECT * FROM salary_advances
        WHERE employee_id = ?
        ORDER BY date DESC
        "#,
    )
    .bind(employee_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch salary advances");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(advances))
}
