//! Handlers for the public board and the embeddable widget
//!
//! These routes carry the organization in the URL instead of the
//! `x-organization-id` header, and only ever expose public boards and
//! published changelog entries. A board that exists but is private is
//! reported as 404.

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::Query;
use std::sync::Arc;
use tracing::{instrument, info};

use crate::auth::Actor;
use crate::db::DbPool;
use crate::dto::{validate_name, FeedbackPage, FeedbackQueryDto, SubmitFeedbackDto};
use crate::errors::ApiError;
use crate::models::{Board, ChangelogEntry, Feedback, Organization};
use crate::repo;

fn organization_by_slug(pool: &DbPool, org_slug: &str) -> Result<Organization, ApiError> {
    repo::get_organization_by_slug(pool, org_slug)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)
}

fn public_board(pool: &DbPool, organization_id: &str, board_slug: &str) -> Result<Board, ApiError> {
    repo::get_board_by_slug(pool, organization_id, board_slug)
        .map_err(ApiError::from_repo)?
        .filter(|board| board.get_is_public())
        .ok_or(ApiError::NotFound)
}

/// Handler for `GET /public/{org_slug}/boards`
#[instrument(skip(pool))]
pub async fn list_public_boards_handler(
    State(pool): State<Arc<DbPool>>,
    Path(org_slug): Path<String>,
) -> Result<Json<Vec<Board>>, ApiError> {
    let org = organization_by_slug(&pool, &org_slug)?;

    let boards = repo::list_public_boards(&pool, &org.get_id()).map_err(ApiError::from_repo)?;

    Ok(Json(boards))
}

/// Handler for `GET /public/{org_slug}/boards/{board_slug}/feedback`
///
/// Accepts the same filters as `GET /feedback`; the board filter is always
/// the board named in the URL.
#[instrument(skip(pool), fields(query = %query))]
pub async fn list_public_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    Path((org_slug, board_slug)): Path<(String, String)>,
    Query(mut query): Query<FeedbackQueryDto>,
) -> Result<Json<FeedbackPage>, ApiError> {
    let org = organization_by_slug(&pool, &org_slug)?;
    let board = public_board(&pool, &org.get_id(), &board_slug)?;

    query.board_id = Some(board.get_id());
    let page = repo::list_feedback(&pool, &org.get_id(), &query).map_err(ApiError::from_repo)?;

    Ok(Json(page))
}

/// Handler for `POST /public/{org_slug}/boards/{board_slug}/feedback`
///
/// Submissions from the widget. Anonymous sessions may submit; the
/// session id is recorded as the author.
#[instrument(skip(pool, payload))]
pub async fn submit_public_feedback_handler(
    State(pool): State<Arc<DbPool>>,
    actor: Actor,
    Path((org_slug, board_slug)): Path<(String, String)>,
    Json(payload): Json<SubmitFeedbackDto>,
) -> Result<Json<Feedback>, ApiError> {
    let org = organization_by_slug(&pool, &org_slug)?;
    let board = public_board(&pool, &org.get_id(), &board_slug)?;
    validate_name("title", &payload.title).map_err(ApiError::BadRequest)?;

    let post = repo::create_feedback(
        &pool,
        &org.get_id(),
        &board.get_id(),
        &actor.id(),
        payload.title,
        payload.description,
    )
    .map_err(ApiError::from_repo)?;

    info!("Widget submission {} on board {}", post.get_id(), board.get_slug());

    Ok(Json(post))
}

/// Handler for `GET /public/{org_slug}/changelog`, published entries only
#[instrument(skip(pool))]
pub async fn list_public_changelog_handler(
    State(pool): State<Arc<DbPool>>,
    Path(org_slug): Path<String>,
) -> Result<Json<Vec<ChangelogEntry>>, ApiError> {
    let org = organization_by_slug(&pool, &org_slug)?;

    let entries = repo::list_published_entries(&pool, &org.get_id()).map_err(ApiError::from_repo)?;

    Ok(Json(entries))
}
