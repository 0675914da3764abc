use crate::{
    auth::auth::AuthUser,
    model::revenue::Revenue,
    utils::patch::{build_patch, execute_patch},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

const REVENUE_COLUMNS: &[&str] = &["date", "amount"];

#[derive(Deserialize, ToSchema)]
pub struct CreateRevenue {
    #[schema(example = "2026-08-24", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = 1250.0)]
    pub amount: f64,
}

/// Record one day's revenue. The date is unique: the second write for a day
/// is rejected, editing goes through PUT.
#[utoipa::path(
    post,
    path = "/api/v1/revenues",
    request_body = CreateRevenue,
    responses(
        (status = 201, description = "Revenue recorded", body = Object, example = json!({
            "success": true,
            "data": {"id": 3, "date": "2026-08-24", "amount": 1250.0}
        })),
        (status = 400, description = "Invalid amount or duplicate date"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Revenue"
)]
pub async fn create_revenue(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateRevenue>,
) -> actix_web::Result<impl Responder> {
    if payload.amount < 0.0 {
        return Ok(
            HttpResponse::BadRequest().json(json!({"error": "Amount must not be negative"}))
        );
    }

    let result = sqlx::query("INSERT INTO revenues (date, amount) VALUES (?, ?)")
        .bind(payload.date)
        .bind(payload.amount)
        .execute(pool.get_ref())
        .await;

    let result = match result {
        Ok(r) => r,
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                // Unique key on date
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "error": "Revenue already recorded for this date"
                    })));
                }
            }

            error!(error = %e, "Failed to record revenue");
            return Err(ErrorInternalServerError("Internal Server Error"));
        }
    };

    let revenue = sqlx::query_as::<_, Revenue>("SELECT * FROM revenues WHERE id = ?")
        .bind(result.last_insert_id())
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch created revenue");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "data": revenue
    })))
}

/// Partial update of a revenue row
#[utoipa::path(
    put,
    path = "/api/v1/revenues/{id}",
    params(("id" = u64, Path, description = "Revenue ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Revenue updated"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Revenue not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Revenue"
)]
pub async fn update_revenue(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let revenue_id = path.into_inner();

    let patch = build_patch("revenues", REVENUE_COLUMNS, &body, "id", revenue_id)?;

    let affected = execute_patch(pool.get_ref(), patch).await.map_err(|e| {
        error!(error = %e, revenue_id, "Failed to update revenue");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({"error": "Revenue not found"})));
    }

    let revenue = sqlx::query_as::<_, Revenue>("SELECT * FROM revenues WHERE id = ?")
        .bind(revenue_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, revenue_id, "Failed to fetch updated revenue");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": revenue
    })))
}

/// Delete a revenue row
#[utoipa::path(
    delete,
    path = "/api/v1/revenues/{id}",
    params(("id" = u64, Path, description = "Revenue ID")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Revenue not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Revenue"
)]
pub async fn delete_revenue(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let revenue_id = path.into_inner();

    let result = sqlx::query("DELETE FROM revenues WHERE id = ?")
        .bind(revenue_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({"error": "Revenue not found"})));
            }

            Ok(HttpResponse::Ok().json(json!({"success": true})))
        }
        Err(e) => {
            error!(error = %e, revenue_id, "Failed to delete revenue");
            Ok(HttpResponse::InternalServerError().json(json!({"error": "Internal Server Error"})))
        }
    }
}

/// Last 5 revenue rows
#[utoipa::path(
    get,
    path = "/api/v1/revenues/recent",
    responses(
        (status = 200, description = "Recent revenues", body = [Revenue]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Revenue"
)]
pub async fn recent_revenues(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let revenues =
        sqlx::query_as::<_, Revenue>("SELECT * FROM revenues ORDER BY date DESC LIMIT 5")
            .fetch_all(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch recent revenues");
                ErrorInternalServerError("Internal Server Error")
            })?;

    Ok(HttpResponse::Ok().json(revenues))
}
