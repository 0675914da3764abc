use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;
use sqlx::MySqlPool;
use std::collections::BTreeMap;
use tracing::error;

/// Headline counters for the dashboard landing page
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    responses(
        (status = 200, description = "Dashboard counters", body = Object, example = json!({
            "totalEmployees": 12,
            "activeEmployees": 9,
            "todayRevenue": 1250.0,
            "weekRevenue": 7800.0
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn stats(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let today = Utc::now().date_naive();
    let week_ago = today - Duration::days(7);

    let total_employees = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to count employees");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let active_employees =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE status = 'Active'")
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to count active employees");
                ErrorInternalServerError("Internal Server Error")
            })?;

    let today_revenue =
        sqlx::query_scalar::<_, f64>("SELECT amount FROM revenues WHERE date = ?")
            .bind(today)
            .fetch_optional(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch today's revenue");
                ErrorInternalServerError("Internal Server Error")
            })?
            .unwrap_or(0.0);

    // Rolling 7 days, not calendar week.
    let week_revenue = sqlx::query_scalar::<_, Option<f64>>(
        "SELECT SUM(amount) FROM revenues WHERE date > ? AND date <= ?",
    )
    .bind(week_ago)
    .bind(today)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to sum week revenue");
        ErrorInternalServerError("Internal Server Error")
    })?
    .unwrap_or(0.0);

    Ok(HttpResponse::Ok().json(json!({
        "totalEmployees": total_employees,
        "activeEmployees": active_employees,
        "todayRevenue": today_revenue,
        "weekRevenue": week_revenue
    })))
}

/// Revenue vs. payments for the last 7 days, one point per day
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/chart-data",
    responses(
        (status = 200, description = "Chart points", body = Object, example = json!([
            {"date": "2026-08-24", "revenue": 1250.0, "payments": 310.0}
        ])),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn chart_data(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let today = Utc::now().date_naive();
    let from = today - Duration::days(6);

    let revenues = sqlx::query_as::<_, (NaiveDate, f64)>(
        "SELECT date, amount FROM revenues WHERE date BETWEEN ? AND ?",
    )
    .bind(from)
    .bind(today)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch chart revenues");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let payments = sqlx::query_as::<_, (NaiveDate, Option<f64>)>(
        "SELECT date, SUM(amount) FROM attendance WHERE date BETWEEN ? AND ? GROUP BY date",
    )
    .bind(from)
    .bind(today)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch chart payments");
        ErrorInternalServerError("Internal Server Error")
    })?;

    // Every day appears even with no rows.
    let mut days: BTreeMap<NaiveDate, (f64, f64)> = (0..7)
        .map(|i| (from + Duration::days(i), (0.0, 0.0)))
        .collect();

    for (date, amount) in revenues {
        if let Some(entry) = days.get_mut(&date) {
            entry.0 = amount;
        }
    }
    for (date, amount) in payments {
        if let Some(entry) = days.get_mut(&date) {
            entry.1 = amount.unwrap_or(0.0);
        }
    }

    let chart: Vec<_> = days
        .into_iter()
        .map(|(date, (revenue, payments))| {
            json!({
                "date": date,
                "revenue": revenue,
                "payments": payments
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(chart))
}
