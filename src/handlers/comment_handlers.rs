use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{instrument, info};

use crate::auth::RequestContext;
use crate::db::DbPool;
use crate::dto::{CreateCommentDto, UpdateCommentDto};
use crate::errors::ApiError;
use crate::models::{Comment, Role};
use crate::repo;

use super::feedback_handlers::load_visible_feedback;

const MAX_COMMENT_LEN: usize = 10_000;

fn validate_body(body: &str) -> Result<(), ApiError> {
    if body.trim().is_empty() {
        return Err(ApiError::BadRequest("comment must not be empty".to_string()));
    }
    if body.chars().count() > MAX_COMMENT_LEN {
        return Err(ApiError::BadRequest(format!("comment must be at most {} characters", MAX_COMMENT_LEN)));
    }
    Ok(())
}

/// Loads a comment whose post the caller may see
pub(crate) fn load_visible_comment(pool: &DbPool, ctx: &RequestContext, comment_id: &str) -> Result<Comment, ApiError> {
    let comment = repo::get_comment(pool, &ctx.organization_id, comment_id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    load_visible_feedback(pool, ctx, &comment.get_feedback_id())?;

    Ok(comment)
}

/// Handler for `GET /feedback/{id}/comments`, top-level comments oldest first
#[instrument(skip(pool))]
pub async fn list_comments_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(feedback_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    load_visible_feedback(&pool, &ctx, &feedback_id)?;

    let comments = repo::list_comments(&pool, &ctx.organization_id, &feedback_id).map_err(ApiError::from_repo)?;

    Ok(Json(comments))
}

/// Handler for `POST /feedback/{id}/comments`
///
/// Anonymous sessions may comment on posts of public boards. A `parent_id`
/// turns the comment into a reply; the parent must be on the same post.
#[instrument(skip(pool, payload))]
pub async fn create_comment_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(feedback_id): Path<String>,
    Json(payload): Json<CreateCommentDto>,
) -> Result<Json<Comment>, ApiError> {
    load_visible_feedback(&pool, &ctx, &feedback_id)?;
    validate_body(&payload.body)?;

    let comment = repo::create_comment(
        &pool,
        &ctx.organization_id,
        &feedback_id,
        payload.parent_id.as_deref(),
        &ctx.actor.id(),
        payload.body,
    )
    .map_err(ApiError::from_repo)?;

    info!("Created comment {} on feedback {}", comment.get_id(), feedback_id);

    Ok(Json(comment))
}

/// Handler for `GET /comments/{id}/replies`
#[instrument(skip(pool))]
pub async fn list_replies_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    load_visible_comment(&pool, &ctx, &id)?;

    let replies = repo::list_replies(&pool, &ctx.organization_id, &id).map_err(ApiError::from_repo)?;

    Ok(Json(replies))
}

/// Handler for `PATCH /comments/{id}`; only the author may edit
#[instrument(skip(pool, payload))]
pub async fn update_comment_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCommentDto>,
) -> Result<Json<Comment>, ApiError> {
    let comment = load_visible_comment(&pool, &ctx, &id)?;

    if comment.get_author_id() != ctx.actor.id() {
        return Err(ApiError::Forbidden("only the author may edit this comment".to_string()));
    }
    validate_body(&payload.body)?;

    let updated = repo::update_comment(&pool, &ctx.organization_id, &id, payload.body)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(updated))
}

/// Handler for `DELETE /comments/{id}`; the author or an admin may delete,
/// and replies go with it
#[instrument(skip(pool))]
pub async fn delete_comment_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let comment = load_visible_comment(&pool, &ctx, &id)?;

    if !ctx.is_author_or(&pool, &comment.get_author_id(), Role::Admin)? {
        return Err(ApiError::Forbidden("only the author or an admin may delete this comment".to_string()));
    }

    if !repo::delete_comment(&pool, &ctx.organization_id, &id).map_err(ApiError::from_repo)? {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
