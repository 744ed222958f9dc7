use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{instrument, debug};

use crate::auth::RequestContext;
use crate::db::DbPool;
use crate::dto::VoteSummary;
use crate::errors::ApiError;
use crate::models::{Vote, VoteTarget};
use crate::repo;

use super::comment_handlers::load_visible_comment;
use super::feedback_handlers::load_visible_feedback;

fn summarize(pool: &DbPool, ctx: &RequestContext, target: &VoteTarget) -> Result<VoteSummary, ApiError> {
    let count = repo::count_votes(pool, &ctx.organization_id, target).map_err(ApiError::from_repo)?;
    let has_voted = repo::has_voted(pool, &ctx.organization_id, target, &ctx.actor.id()).map_err(ApiError::from_repo)?;
    Ok(VoteSummary { count, has_voted })
}

fn cast(pool: &DbPool, ctx: &RequestContext, target: &VoteTarget) -> Result<Vote, ApiError> {
    repo::create_vote(pool, &ctx.organization_id, target, &ctx.actor.id()).map_err(|e| match ApiError::from_repo(e) {
        ApiError::Conflict(_) => ApiError::Conflict("already voted".to_string()),
        other => other,
    })
}

fn withdraw(pool: &DbPool, ctx: &RequestContext, target: &VoteTarget) -> Result<StatusCode, ApiError> {
    if !repo::delete_vote(pool, &ctx.organization_id, target, &ctx.actor.id()).map_err(ApiError::from_repo)? {
        debug!("No vote by {} on {}", ctx.actor.id(), target.id());
        return Err(ApiError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for `GET /feedback/{id}/votes`
///
/// Returns the tally and whether the caller has voted.
#[instrument(skip(pool))]
pub async fn get_feedback_votes_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<VoteSummary>, ApiError> {
    load_visible_feedback(&pool, &ctx, &id)?;
    Ok(Json(summarize(&pool, &ctx, &VoteTarget::Feedback(id))?))
}

/// Handler for `POST /feedback/{id}/votes`; voting twice is a 409
#[instrument(skip(pool))]
pub async fn vote_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Vote>, ApiError> {
    load_visible_feedback(&pool, &ctx, &id)?;
    Ok(Json(cast(&pool, &ctx, &VoteTarget::Feedback(id))?))
}

/// Handler for `DELETE /feedback/{id}/votes`
#[instrument(skip(pool))]
pub async fn unvote_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    load_visible_feedback(&pool, &ctx, &id)?;
    withdraw(&pool, &ctx, &VoteTarget::Feedback(id))
}

#[instrument(skip(pool))]
pub async fn get_comment_votes_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<VoteSummary>, ApiError> {
    load_visible_comment(&pool, &ctx, &id)?;
    Ok(Json(summarize(&pool, &ctx, &VoteTarget::Comment(id))?))
}

#[instrument(skip(pool))]
pub async fn vote_comment_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Vote>, ApiError> {
    load_visible_comment(&pool, &ctx, &id)?;
    Ok(Json(cast(&pool, &ctx, &VoteTarget::Comment(id))?))
}

#[instrument(skip(pool))]
pub async fn unvote_comment_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    load_visible_comment(&pool, &ctx, &id)?;
    withdraw(&pool, &ctx, &VoteTarget::Comment(id))
}
