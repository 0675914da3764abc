use crate::stats::{
    aggregate::round2,
    period::{PaidRow, Period, bucket_label, bucket_payments, enumerate_buckets, end_of, start_of, week_start},
    ranking::{EmployeeScore, LEADERBOARD_SIZE, rank, summarize},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct WeekQuery {
    #[schema(example = "2026-08-24", format = "date", value_type = Option<String>)]
    pub week_start: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct MonthQuery {
    #[schema(example = 8)]
    pub month: Option<u32>,
    #[schema(example = 2026)]
    pub year: Option<i32>,
}

#[derive(Deserialize, ToSchema)]
pub struct SalaryPaymentsQuery {
    #[schema(example = "month")]
    pub period: Option<String>,
    #[schema(example = "2026-08-01", format = "date", value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2026-08-31", format = "date", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct EmployeePaymentsQuery {
    #[schema(example = "week")]
    pub period: Option<String>,
    #[schema(example = 1)]
    pub employee_id: Option<u64>,
}

#[derive(sqlx::FromRow)]
struct ScoreRow {
    employee_id: u64,
    first_name: String,
    last_name: String,
    amount: f64,
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    employee_id: u64,
    first_name: String,
    last_name: String,
    date: NaiveDate,
    amount: f64,
}

/// Folds Present-day rows into per-employee scores, keeping first-seen order
/// so the later stable sort is deterministic.
fn fold_scores(rows: Vec<ScoreRow>) -> Vec<EmployeeScore> {
    let mut index: HashMap<u64, usize> = HashMap::new();
    let mut scores: Vec<EmployeeScore> = Vec::new();

    for row in rows {
        match index.get(&row.employee_id) {
            Some(&i) => {
                scores[i].present_days += 1;
                scores[i].total_amount += row.amount;
            }
            None => {
                index.insert(row.employee_id, scores.len());
                scores.push(EmployeeScore {
                    employee_id: row.employee_id,
                    first_name: row.first_name,
                    last_name: row.last_name,
                    present_days: 1,
                    total_amount: row.amount,
                });
            }
        }
    }

    scores
}

async fn fetch_scores(
    pool: &MySqlPool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<EmployeeScore>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ScoreRow>(
        r#"
        SELECT a.employee_id, e.first_name, e.last_name, a.amount
        FROM attendance a
        JOIN employees e ON e.id = a.employee_id
        WHERE a.date BETWEEN ? AND ?
        AND a.day_status = 'Present'
        AND e.status = 'Active'
        ORDER BY a.date, a.id
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(rank(fold_scores(rows)))
}

/// Employee of the week with a top-5 leaderboard
#[utoipa::path(
    get,
    path = "/api/v1/statistics/employee-of-week",
    params(
        ("week_start" = Option<String>, Query, description = "Monday of the requested week, defaults to the current week")
    ),
    responses(
        (status = 200, description = "Weekly ranking"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn employee_of_week(
    pool: web::Data<MySqlPool>,
    query: web::Query<WeekQuery>,
) -> actix_web::Result<impl Responder> {
    let week_from = week_start(query.week_start.unwrap_or_else(|| Utc::now().date_naive()));
    let week_to = week_from + Duration::days(6);

    let ranked = fetch_scores(pool.get_ref(), week_from, week_to)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to rank week attendance");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let summary = summarize(&ranked);

    Ok(HttpResponse::Ok().json(json!({
        "weekStart": week_from,
        "weekEnd": week_to,
        "weekName": format!(
            "Week of {} to {}",
            week_from.format("%d/%m/%Y"),
            week_to.format("%d/%m/%Y")
        ),
        "employeeOfTheWeek": ranked.first(),
        "topEmployees": &ranked[..ranked.len().min(LEADERBOARD_SIZE)],
        "weeklyStats": summary
    })))
}

/// Employee of the month with a top-5 leaderboard
#[utoipa::path(
    get,
    path = "/api/v1/statistics/employee-of-month",
    params(
        ("month" = Option<u32>, Query, description = "1-12, defaults to the current month"),
        ("year" = Option<i32>, Query, description = "Defaults to the current year")
    ),
    responses(
        (status = 200, description = "Monthly ranking"),
        (status = 400, description = "Invalid month"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn employee_of_month(
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<impl Responder> {
    let today = Utc::now().date_naive();
    let month = query.month.unwrap_or(today.month());
    let year = query.year.unwrap_or(today.year());

    let month_from = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => {
            return Ok(HttpResponse::BadRequest().json(json!({"error": "Invalid month or year"})));
        }
    };
    let month_to = end_of(Period::Month, month_from);

    let ranked = fetch_scores(pool.get_ref(), month_from, month_to)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to rank month attendance");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let summary = summarize(&ranked);

    Ok(HttpResponse::Ok().json(json!({
        "month": month,
        "year": year,
        "monthName": month_from.format("%B %Y").to_string(),
        "employeeOfTheMonth": ranked.first(),
        "topEmployees": &ranked[..ranked.len().min(LEADERBOARD_SIZE)],
        "monthlyStats": summary
    })))
}

/// Paid salary totals bucketed per week/month/quarter/year
#[utoipa::path(
    get,
    path = "/api/v1/statistics/salary-payments",
    params(
        ("period" = Option<String>, Query, description = "week | month | quarter | year (default month)"),
        ("start_date" = Option<String>, Query, description = "Range start, defaults to the current period"),
        ("end_date" = Option<String>, Query, description = "Range end, defaults to the current period")
    ),
    responses(
        (status = 200, description = "Bucketed payment totals"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn salary_payments(
    pool: web::Data<MySqlPool>,
    query: web::Query<SalaryPaymentsQuery>,
) -> actix_web::Result<impl Responder> {
    let period = Period::from_param(query.period.as_deref(), Period::Month);
    let today = Utc::now().date_naive();

    let (from, to) = match (query.start_date, query.end_date) {
        (Some(from), Some(to)) => (from, to),
        _ => (start_of(period, today), end_of(period, today)),
    };

    if from > to {
        return Ok(
            HttpResponse::BadRequest().json(json!({"error": "start_date is after end_date"}))
        );
    }

    let rows = sqlx::query_as::<_, (NaiveDate, u64, f64, f64)>(
        r#"
        SELECT a.date, a.employee_id, a.amount, e.daily_rate
        FROM attendance a
        JOIN employees e ON e.id = a.employee_id
        WHERE a.paid = TRUE AND a.date BETWEEN ? AND ?
        ORDER BY a.date
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch paid attendance");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let paid_rows: Vec<PaidRow> = rows
        .into_iter()
        .map(|(date, employee_id, amount, daily_rate)| PaidRow {
            date,
            employee_id,
            amount,
            daily_rate,
        })
        .collect();

    let buckets = bucket_payments(period, from, to, &paid_rows);

    let total_salary: f64 = buckets.iter().map(|b| b.total_salary).sum();
    let total_amount: f64 = buckets.iter().map(|b| b.total_amount).sum();
    let total_employees = paid_rows
        .iter()
        .map(|r| r.employee_id)
        .collect::<BTreeSet<_>>()
        .len();
    let average_salary_per_period = if buckets.is_empty() {
        0.0
    } else {
        round2(total_salary / buckets.len() as f64)
    };

    Ok(HttpResponse::Ok().json(json!({
        "period": period.to_string(),
        "startDate": from,
        "endDate": to,
        "data": buckets,
        "globalStats": {
            "totalSalary": total_salary,
            "totalAmount": total_amount,
            "totalEmployees": total_employees,
            "averageSalaryPerPeriod": average_salary_per_period
        }
    })))
}

/// Revenue vs. employee payments per bucket since the start of the period
#[utoipa::path(
    get,
    path = "/api/v1/statistics/revenue-analysis",
    params(
        ("period" = Option<String>, Query, description = "week | month | quarter | year (default week)")
    ),
    responses(
        (status = 200, description = "Chart points"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn revenue_analysis(
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeePaymentsQuery>,
) -> actix_web::Result<impl Responder> {
    let period = Period::from_param(query.period.as_deref(), Period::Week);
    let today = Utc::now().date_naive();
    let from = start_of(period, today);

    // Short periods chart per day, long ones per month.
    let step = period.chart_step();

    let revenues = sqlx::query_as::<_, (NaiveDate, f64)>(
        "SELECT date, amount FROM revenues WHERE date >= ? ORDER BY date",
    )
    .bind(from)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch revenues");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let payments = sqlx::query_as::<_, (NaiveDate, f64)>(
        "SELECT date, amount FROM attendance WHERE date >= ?",
    )
    .bind(from)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch attendance payments");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let mut buckets: BTreeMap<NaiveDate, (f64, f64)> = enumerate_buckets(step, from, today)
        .into_iter()
        .map(|start| (start, (0.0, 0.0)))
        .collect();

    for (date, amount) in revenues {
        if let Some(entry) = buckets.get_mut(&start_of(step, date)) {
            entry.0 += amount;
        }
    }
    for (date, amount) in payments {
        if let Some(entry) = buckets.get_mut(&start_of(step, date)) {
            entry.1 += amount;
        }
    }

    let chart: Vec<_> = buckets
        .into_iter()
        .map(|(start, (revenue, payments))| {
            json!({
                "period": bucket_label(step, start),
                "revenue": revenue,
                "payments": payments
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(chart))
}

async fn fetch_payment_rows(
    pool: &MySqlPool,
    from: NaiveDate,
    employee_id: Option<u64>,
) -> Result<Vec<PaymentRow>, sqlx::Error> {
    let mut sql = String::from(
        r#"
        SELECT a.employee_id, e.first_name, e.last_name, a.date, a.amount
        FROM attendance a
        JOIN employees e ON e.id = a.employee_id
        WHERE a.date >= ?
        "#,
    );
    if employee_id.is_some() {
        sql.push_str(" AND a.employee_id = ?");
    }
    sql.push_str(" ORDER BY a.date, a.id");

    let mut query = sqlx::query_as::<_, PaymentRow>(&sql).bind(from);
    if let Some(id) = employee_id {
        query = query.bind(id);
    }

    query.fetch_all(pool).await
}

/// Top-10 employees by realized amount for the period
#[utoipa::path(
    get,
    path = "/api/v1/statistics/employee-payments",
    params(
        ("period" = Option<String>, Query, description = "week | month | quarter | year (default week)"),
        ("employee_id" = Option<u64>, Query, description = "Restrict to one employee")
    ),
    responses(
        (status = 200, description = "Chart points"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn employee_payments(
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeePaymentsQuery>,
) -> actix_web::Result<impl Responder> {
    let period = Period::from_param(query.period.as_deref(), Period::Week);
    let from = start_of(period, Utc::now().date_naive());

    let rows = fetch_payment_rows(pool.get_ref(), from, query.employee_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch employee payments");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let mut index: HashMap<u64, usize> = HashMap::new();
    let mut totals: Vec<(String, f64)> = Vec::new();

    for row in rows {
        match index.get(&row.employee_id) {
            Some(&i) => totals[i].1 += row.amount,
            None => {
                index.insert(row.employee_id, totals.len());
                totals.push((format!("{} {}", row.first_name, row.last_name), row.amount));
            }
        }
    }

    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    totals.truncate(10);

    let chart: Vec<_> = totals
        .into_iter()
        .map(|(name, amount)| json!({"name": name, "amount": amount}))
        .collect();

    Ok(HttpResponse::Ok().json(chart))
}

/// Per-employee payment table: total, worked days, per-day average
#[utoipa::path(
    get,
    path = "/api/v1/statistics/employee-payments-table",
    params(
        ("period" = Option<String>, Query, description = "week | month | quarter | year (default week)"),
        ("employee_id" = Option<u64>, Query, description = "Restrict to one employee")
    ),
    responses(
        (status = 200, description = "Table rows with a grand total"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn employee_payments_table(
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeePaymentsQuery>,
) -> actix_web::Result<impl Responder> {
    let period = Period::from_param(query.period.as_deref(), Period::Week);
    let from = start_of(period, Utc::now().date_naive());

    let rows = fetch_payment_rows(pool.get_ref(), from, query.employee_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch employee payments table");
            ErrorInternalServerError("Internal Server Error")
        })?;

    struct Entry {
        name: String,
        total: f64,
        days: BTreeSet<NaiveDate>,
    }

    let mut index: HashMap<u64, usize> = HashMap::new();
    let mut entries: Vec<Entry> = Vec::new();

    for row in rows {
        match index.get(&row.employee_id) {
            Some(&i) => {
                entries[i].total += row.amount;
                entries[i].days.insert(row.date);
            }
            None => {
                index.insert(row.employee_id, entries.len());
                entries.push(Entry {
                    name: format!("{} {}", row.first_name, row.last_name),
                    total: row.amount,
                    days: BTreeSet::from([row.date]),
                });
            }
        }
    }

    entries.sort_by(|a, b| b.total.total_cmp(&a.total));

    let total_paid: f64 = entries.iter().map(|e| e.total).sum();
    let data: Vec<_> = entries
        .into_iter()
        .map(|e| {
            let days = e.days.len();
            json!({
                "name": e.name,
                "total": e.total,
                "days": days,
                "average": if days > 0 { round2(e.total / days as f64) } else { 0.0 }
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "data": data,
        "total": total_paid
    })))
}
