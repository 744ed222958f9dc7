use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{instrument, info};

use crate::auth::RequestContext;
use crate::db::DbPool;
use crate::dto::{validate_name, CreateChangelogDto, UpdateChangelogDto};
use crate::errors::ApiError;
use crate::models::{ChangelogEntry, Role};
use crate::repo;

/// Handler for listing every changelog entry, drafts included
///
/// This function handles GET requests to `/changelog`. Entries come back
/// newest first. The public surface only shows published entries.
#[instrument(skip(pool))]
pub async fn list_changelog_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
) -> Result<Json<Vec<ChangelogEntry>>, ApiError> {
    ctx.require_member(&pool)?;

    let entries = repo::list_entries(&pool, &ctx.organization_id).map_err(ApiError::from_repo)?;

    Ok(Json(entries))
}

/// Handler for drafting a changelog entry
///
/// This function handles POST requests to `/changelog`. New entries are
/// unpublished until `POST /changelog/{id}/publish`.
#[instrument(skip(pool, payload))]
pub async fn create_changelog_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Json(payload): Json<CreateChangelogDto>,
) -> Result<Json<ChangelogEntry>, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;
    validate_name("title", &payload.title).map_err(ApiError::BadRequest)?;

    let entry = repo::create_entry(&pool, &ctx.organization_id, payload.title, payload.body)
        .map_err(ApiError::from_repo)?;

    info!("Drafted changelog entry {}", entry.get_id());

    Ok(Json(entry))
}

#[instrument(skip(pool))]
pub async fn get_changelog_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<ChangelogEntry>, ApiError> {
    ctx.require_member(&pool)?;

    let entry = repo::get_entry(&pool, &ctx.organization_id, &id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(entry))
}

#[instrument(skip(pool, payload))]
pub async fn update_changelog_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<UpdateChangelogDto>,
) -> Result<Json<ChangelogEntry>, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;
    if let Some(title) = &payload.title {
        validate_name("title", title).map_err(ApiError::BadRequest)?;
    }

    let entry = repo::update_entry(&pool, &ctx.organization_id, &id, &payload)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(entry))
}

/// Handler for `POST /changelog/{id}/publish`
///
/// Publishing an already published entry moves its date to now.
#[instrument(skip(pool))]
pub async fn publish_changelog_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<ChangelogEntry>, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;

    let entry = repo::publish_entry(&pool, &ctx.organization_id, &id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    info!("Published changelog entry {}", id);

    Ok(Json(entry))
}

#[instrument(skip(pool))]
pub async fn unpublish_changelog_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<ChangelogEntry>, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;

    let entry = repo::unpublish_entry(&pool, &ctx.organization_id, &id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(entry))
}

#[instrument(skip(pool))]
pub async fn delete_changelog_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;

    if !repo::delete_entry(&pool, &ctx.organization_id, &id).map_err(ApiError::from_repo)? {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
