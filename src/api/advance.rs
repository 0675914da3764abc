use crate::auth::auth::AuthUser;
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;

/// Approve a pending advance
#[utoipa::path(
    put,
    path = "/api/v1/advances/{id}/approve",
    params(("id" = u64, Path, description = "Advance ID")),
    responses(
        (status = 200, description = "Advance approved"),
        (status = 400, description = "Advance not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Advance"
)]
pub async fn approve_advance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    set_status(pool.get_ref(), path.into_inner(), "Approved", "Pending").await
}

/// Reject a pending advance
#[utoipa::path(
    put,
    path = "/api/v1/advances/{id}/reject",
    params(("id" = u64, Path, description = "Advance ID")),
    responses(
        (status = 200, description = "Advance rejected"),
        (status = 400, description = "Advance not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Advance"
)]
pub async fn reject_advance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    set_status(pool.get_ref(), path.into_inner(), "Rejected", "Pending").await
}

/// Settle an approved advance
#[utoipa::path(
    put,
    path = "/api/v1/advances/{id}/pay",
    params(("id" = u64, Path, description = "Advance ID")),
    responses(
        (status = 200, description = "Advance paid"),
        (status = 400, description = "Advance not found or not approved"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Advance"
)]
pub async fn pay_advance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    set_status(pool.get_ref(), path.into_inner(), "Paid", "Approved").await
}

/// Single-row workflow step: `from` guards against double processing.
async fn set_status(
    pool: &MySqlPool,
    advance_id: u64,
    to: &str,
    from: &str,
) -> actix_web::Result<HttpResponse> {
    let result = sqlx::query("UPDATE salary_advances SET status = ? WHERE id = ? AND status = ?")
        .bind(to)
        .bind(advance_id)
        .bind(from)
        .execute(pool)
        .await
        .map_err(|e| {
            error!(error = %e, advance_id, "Failed to update advance status");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Advance not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({"success": true})))
}
