use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{instrument, debug, info};

use crate::auth::RequestContext;
use crate::db::DbPool;
use crate::dto::{validate_color, validate_name, CreateTagDto};
use crate::errors::ApiError;
use crate::models::{FeedbackTag, Role, Tag};
use crate::repo;

use super::feedback_handlers::load_visible_feedback;

/// Handler for creating a new tag
///
/// This function handles POST requests to `/tags`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `ctx` - The active organization and caller; the caller must be an admin
/// * `payload` - The request payload containing the tag name and color
///
/// ### Returns
///
/// The newly created tag as JSON
#[instrument(skip(pool, payload), fields(name = %payload.name))]
pub async fn create_tag_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Json(payload): Json<CreateTagDto>,
) -> Result<Json<Tag>, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;
    validate_name("name", &payload.name).map_err(ApiError::BadRequest)?;
    validate_color(&payload.color).map_err(ApiError::BadRequest)?;

    let tag = repo::create_tag(&pool, &ctx.organization_id, payload.name, payload.color)
        .map_err(ApiError::from_repo)?;

    info!("Successfully created tag with id: {}", tag.get_id());

    Ok(Json(tag))
}

/// Handler for listing all tags
///
/// This function handles GET requests to `/tags`.
///
/// ### Returns
///
/// A list of the organization's tags as JSON
#[instrument(skip(pool))]
pub async fn list_tags_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
) -> Result<Json<Vec<Tag>>, ApiError> {
    ctx.require_member(&pool)?;

    let tags = repo::list_tags(&pool, &ctx.organization_id).map_err(ApiError::from_repo)?;

    debug!("Retrieved {} tags", tags.len());

    Ok(Json(tags))
}

/// Handler for getting a tag by id
///
/// This function handles GET requests to `/tags/{id}`.
#[instrument(skip(pool))]
pub async fn get_tag_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Tag>, ApiError> {
    ctx.require_member(&pool)?;

    let tag = repo::get_tag(&pool, &ctx.organization_id, &id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(tag))
}

/// Handler for deleting a tag
///
/// This function handles DELETE requests to `/tags/{id}`.
///
/// ### Returns
///
/// A 204 No Content response if successful
#[instrument(skip(pool))]
pub async fn delete_tag_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;

    if !repo::delete_tag(&pool, &ctx.organization_id, &id).map_err(ApiError::from_repo)? {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for listing the tags on a feedback post
///
/// This function handles GET requests to `/feedback/{feedback_id}/tags`.
#[instrument(skip(pool))]
pub async fn list_tags_for_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(feedback_id): Path<String>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    load_visible_feedback(&pool, &ctx, &feedback_id)?;

    let tags = repo::list_tags_for_feedback(&pool, &ctx.organization_id, &feedback_id)
        .map_err(ApiError::from_repo)?;

    Ok(Json(tags))
}

/// Handler for adding a tag to a feedback post
///
/// This function handles POST requests to `/feedback/{feedback_id}/tags/{tag_id}`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `ctx` - The active organization and caller; the caller must be an admin
/// * `params` - The feedback ID and tag ID extracted from the URL path
///
/// ### Returns
///
/// The new link as JSON
#[instrument(skip(pool), fields(feedback_id = %feedback_id, tag_id = %tag_id))]
pub async fn add_tag_to_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path((feedback_id, tag_id)): Path<(String, String)>,
) -> Result<Json<FeedbackTag>, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;

    let link = repo::add_tag_to_feedback(&pool, &ctx.organization_id, &feedback_id, &tag_id)
        .map_err(ApiError::from_repo)?;

    info!("Successfully added tag {} to feedback {}", tag_id, feedback_id);

    Ok(Json(link))
}

/// Handler for removing a tag from a feedback post
///
/// This function handles DELETE requests to `/feedback/{feedback_id}/tags/{tag_id}`.
///
/// ### Returns
///
/// A 204 No Content response if successful, 404 if the tag was not attached
#[instrument(skip(pool), fields(feedback_id = %feedback_id, tag_id = %tag_id))]
pub async fn remove_tag_from_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path((feedback_id, tag_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;

    let removed = repo::remove_tag_from_feedback(&pool, &ctx.organization_id, &feedback_id, &tag_id)
        .map_err(ApiError::from_repo)?;

    if !removed {
        debug!("Failed to remove tag: not attached");
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests;
