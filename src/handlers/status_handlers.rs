use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use crate::auth::RequestContext;
use crate::db::DbPool;
use crate::dto::{validate_color, validate_name, CreateStatusDto, UpdateStatusDto};
use crate::errors::ApiError;
use crate::models::{Role, Status};
use crate::repo;

/// Handler for `GET /statuses`, in display order
#[instrument(skip(pool))]
pub async fn list_statuses_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
) -> Result<Json<Vec<Status>>, ApiError> {
    ctx.require_member(&pool)?;
    let statuses = repo::list_statuses(&pool, &ctx.organization_id).map_err(ApiError::from_repo)?;
    Ok(Json(statuses))
}

/// Handler for `POST /statuses`
#[instrument(skip(pool, payload), fields(name = %payload.name))]
pub async fn create_status_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Json(payload): Json<CreateStatusDto>,
) -> Result<Json<Status>, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;
    validate_name("name", &payload.name).map_err(ApiError::BadRequest)?;
    validate_color(&payload.color).map_err(ApiError::BadRequest)?;

    let status = repo::create_status(
        &pool,
        &ctx.organization_id,
        payload.name,
        payload.color,
        payload.position,
        payload.is_default,
    )
    .map_err(ApiError::from_repo)?;

    Ok(Json(status))
}

/// Handler for `PATCH /statuses/{id}`
#[instrument(skip(pool, payload))]
pub async fn update_status_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusDto>,
) -> Result<Json<Status>, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;

    if let Some(name) = &payload.name {
        validate_name("name", name).map_err(ApiError::BadRequest)?;
    }
    if let Some(color) = &payload.color {
        validate_color(color).map_err(ApiError::BadRequest)?;
    }

    let status = repo::update_status(&pool, &ctx.organization_id, &id, &payload)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(status))
}

/// Handler for `DELETE /statuses/{id}`
///
/// Feedback in the deleted status is left without a status.
#[instrument(skip(pool))]
pub async fn delete_status_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;

    if !repo::delete_status(&pool, &ctx.organization_id, &id).map_err(ApiError::from_repo)? {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
