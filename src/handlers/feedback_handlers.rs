use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Query;
use std::sync::Arc;
use tracing::{instrument, debug, info};

use crate::auth::RequestContext;
use crate::db::DbPool;
use crate::dto::{
    validate_name, CreateFeedbackDto, FeedbackPage, FeedbackQueryDto, FeedbackSummary, UpdateFeedbackDto,
};
use crate::errors::ApiError;
use crate::models::{Feedback, Role};
use crate::repo;

/// Loads a post the caller is allowed to see
///
/// Posts on public boards are visible to anyone in the organization's
/// context, including anonymous sessions; other posts need membership.
pub(crate) fn load_visible_feedback(pool: &DbPool, ctx: &RequestContext, feedback_id: &str) -> Result<Feedback, ApiError> {
    let post = repo::get_feedback(pool, &ctx.organization_id, feedback_id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    ctx.require_feedback_access(pool, &post.get_board_id())?;

    Ok(post)
}

/// Handler for creating a new feedback post
///
/// This function handles POST requests to `/feedback`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `ctx` - The active organization and caller; the caller must be a member
/// * `payload` - The board, title and description of the post
///
/// ### Returns
///
/// The newly created post as JSON, placed in the default status
#[instrument(skip(pool, payload), fields(board_id = %payload.board_id))]
pub async fn create_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Json(payload): Json<CreateFeedbackDto>,
) -> Result<Json<Feedback>, ApiError> {
    let member = ctx.require_member(&pool)?;
    validate_name("title", &payload.title).map_err(ApiError::BadRequest)?;

    let post = repo::create_feedback(
        &pool,
        &ctx.organization_id,
        &payload.board_id,
        &member.get_user_id(),
        payload.title,
        payload.description,
    )
    .map_err(ApiError::from_repo)?;

    info!("Successfully created feedback with id: {}", post.get_id());

    Ok(Json(post))
}

/// Handler for listing feedback with optional filtering
///
/// This function handles GET requests to `/feedback`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `ctx` - The active organization and caller; the caller must be a member
/// * `query` - Filters (`board_id`, `status_id`, `author_id`, repeated
///   `tag_ids`), `sort` and pagination from the query string
///
/// ### Returns
///
/// One page of matching posts as JSON
#[instrument(skip(pool), fields(query = %query))]
pub async fn list_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Query(query): Query<FeedbackQueryDto>,
) -> Result<Json<FeedbackPage>, ApiError> {
    ctx.require_member(&pool)?;

    let page = repo::list_feedback(&pool, &ctx.organization_id, &query).map_err(ApiError::from_repo)?;

    debug!("Retrieved {} feedback posts", page.items.len());

    Ok(Json(page))
}

/// Handler for getting a feedback post by id
///
/// This function handles GET requests to `/feedback/{id}`.
#[instrument(skip(pool))]
pub async fn get_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Feedback>, ApiError> {
    let post = load_visible_feedback(&pool, &ctx, &id)?;
    Ok(Json(post))
}

/// Handler for the detail view of a post
///
/// This function handles GET requests to `/feedback/{id}/summary`.
///
/// ### Returns
///
/// The post with its vote count, comment count and tags
#[instrument(skip(pool))]
pub async fn get_feedback_summary_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<FeedbackSummary>, ApiError> {
    load_visible_feedback(&pool, &ctx, &id)?;

    let summary = repo::get_feedback_summary(&pool, &ctx.organization_id, &id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(summary))
}

/// Handler for updating a feedback post
///
/// This function handles PATCH requests to `/feedback/{id}`. Authors may
/// edit the title and description of their own posts; admins may edit any
/// post. Moving a post to another status always requires `admin`.
#[instrument(skip(pool, payload))]
pub async fn update_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<UpdateFeedbackDto>,
) -> Result<Json<Feedback>, ApiError> {
    let post = load_visible_feedback(&pool, &ctx, &id)?;

    if payload.status_id.is_some() {
        ctx.require_role(&pool, Role::Admin)?;
    }
    if (payload.title.is_some() || payload.description.is_some())
        && !ctx.is_author_or(&pool, &post.get_author_id(), Role::Admin)?
    {
        return Err(ApiError::Forbidden("only the author or an admin may edit this post".to_string()));
    }
    if let Some(title) = &payload.title {
        validate_name("title", title).map_err(ApiError::BadRequest)?;
    }

    let updated = repo::update_feedback(&pool, &ctx.organization_id, &id, &payload)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(updated))
}

/// Handler for deleting a feedback post
///
/// This function handles DELETE requests to `/feedback/{id}`. Only the
/// author or an admin may delete a post.
///
/// ### Returns
///
/// A 204 No Content response if successful
#[instrument(skip(pool))]
pub async fn delete_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let post = load_visible_feedback(&pool, &ctx, &id)?;

    if !ctx.is_author_or(&pool, &post.get_author_id(), Role::Admin)? {
        return Err(ApiError::Forbidden("only the author or an admin may delete this post".to_string()));
    }

    if !repo::delete_feedback(&pool, &ctx.organization_id, &id).map_err(ApiError::from_repo)? {
        return Err(ApiError::NotFound);
    }

    info!("Deleted feedback {}", id);

    Ok(StatusCode::NO_CONTENT)
}
