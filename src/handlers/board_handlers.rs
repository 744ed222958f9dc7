use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{instrument, debug, info};

use crate::auth::RequestContext;
use crate::db::DbPool;
use crate::dto::{validate_name, validate_slug, CreateBoardDto, UpdateBoardDto};
use crate::errors::ApiError;
use crate::models::{Board, Role};
use crate::repo;

/// Handler for creating a new board
///
/// This function handles POST requests to `/boards`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `ctx` - The active organization and caller; the caller must be an admin
/// * `payload` - The request payload containing the board's name, slug,
///   description and visibility
///
/// ### Returns
///
/// The newly created board as JSON
#[instrument(skip(pool, payload), fields(slug = %payload.slug, is_public = %payload.is_public))]
pub async fn create_board_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Json(payload): Json<CreateBoardDto>,
) -> Result<Json<Board>, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;

    validate_name("name", &payload.name).map_err(ApiError::BadRequest)?;
    validate_slug(&payload.slug).map_err(ApiError::BadRequest)?;

    let board = repo::create_board(
        &pool,
        &ctx.organization_id,
        payload.name,
        payload.slug,
        payload.description,
        payload.is_public,
    )
    .map_err(ApiError::from_repo)?;

    info!("Successfully created board with id: {}", board.get_id());

    Ok(Json(board))
}

/// Handler for listing the boards of the active organization
///
/// This function handles GET requests to `/boards`.
///
/// ### Returns
///
/// All boards, public and private, ordered by name
#[instrument(skip(pool))]
pub async fn list_boards_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
) -> Result<Json<Vec<Board>>, ApiError> {
    ctx.require_member(&pool)?;

    let boards = repo::list_boards(&pool, &ctx.organization_id).map_err(ApiError::from_repo)?;

    debug!("Retrieved {} boards", boards.len());

    Ok(Json(boards))
}

/// Handler for getting a board by id
///
/// This function handles GET requests to `/boards/{id}`. Public boards are
/// readable by anonymous visitors; private ones need membership.
#[instrument(skip(pool))]
pub async fn get_board_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Board>, ApiError> {
    let board = repo::get_board(&pool, &ctx.organization_id, &id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    ctx.require_board_access(&pool, &board)?;

    Ok(Json(board))
}

/// Handler for updating a board
///
/// This function handles PATCH requests to `/boards/{id}`. Fields omitted
/// from the payload keep their current value.
#[instrument(skip(pool, payload))]
pub async fn update_board_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBoardDto>,
) -> Result<Json<Board>, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;

    if let Some(name) = &payload.name {
        validate_name("name", name).map_err(ApiError::BadRequest)?;
    }
    if let Some(slug) = &payload.slug {
        validate_slug(slug).map_err(ApiError::BadRequest)?;
    }

    let board = repo::update_board(&pool, &ctx.organization_id, &id, &payload)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(board))
}

/// Handler for deleting a board
///
/// This function handles DELETE requests to `/boards/{id}`. The board's
/// feedback, comments and votes go with it.
///
/// ### Returns
///
/// A 204 No Content response if successful
#[instrument(skip(pool))]
pub async fn delete_board_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;

    if !repo::delete_board(&pool, &ctx.organization_id, &id).map_err(ApiError::from_repo)? {
        return Err(ApiError::NotFound);
    }

    info!("Deleted board {}", id);

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Actor;
    use crate::test_utils::{setup_fixture, Fixture};

    fn owner(fx: &Fixture) -> RequestContext {
        RequestContext { organization_id: fx.org_id(), actor: Actor::User(fx.owner.get_id()) }
    }

    fn payload(slug: &str, is_public: bool) -> CreateBoardDto {
        CreateBoardDto {
            name: "Ideas".to_string(),
            slug: slug.to_string(),
            description: String::new(),
            is_public,
        }
    }

    #[tokio::test]
    async fn test_create_board_handler() {
        let fx = setup_fixture();

        let board = create_board_handler(State(fx.pool.clone()), owner(&fx), Json(payload("ideas", true)))
            .await
            .unwrap()
            .0;

        assert_eq!(board.get_slug(), "ideas");
        assert_eq!(board.get_organization_id(), fx.org_id());
        assert!(board.get_is_public());
    }

    #[tokio::test]
    async fn test_create_board_rejects_invalid_slug() {
        let fx = setup_fixture();

        let result = create_board_handler(State(fx.pool.clone()), owner(&fx), Json(payload("-bad-", false))).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_create_board_duplicate_slug_conflicts() {
        let fx = setup_fixture();
        fx.board("ideas", false);

        let result = create_board_handler(State(fx.pool.clone()), owner(&fx), Json(payload("ideas", false))).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_member_cannot_create_board() {
        let fx = setup_fixture();
        let ada = fx.add_user("ada", Role::Member);
        let ctx = RequestContext { organization_id: fx.org_id(), actor: Actor::User(ada.get_id()) };

        let result = create_board_handler(State(fx.pool.clone()), ctx, Json(payload("ideas", false))).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_anonymous_can_read_only_public_boards() {
        let fx = setup_fixture();
        let public = fx.board("roadmap", true);
        let private = fx.board("internal", false);
        let anonymous = RequestContext { organization_id: fx.org_id(), actor: Actor::Anonymous("a1".to_string()) };

        assert!(get_board_handler(State(fx.pool.clone()), anonymous.clone(), Path(public.get_id())).await.is_ok());
        assert!(get_board_handler(State(fx.pool.clone()), anonymous.clone(), Path(private.get_id())).await.is_err());
        assert!(list_boards_handler(State(fx.pool.clone()), anonymous).await.is_err());
    }

    #[tokio::test]
    async fn test_update_and_delete_board() {
        let fx = setup_fixture();
        let board = fx.board("ideas", false);

        let update = UpdateBoardDto { name: Some("Feature ideas".to_string()), ..Default::default() };
        let updated = update_board_handler(State(fx.pool.clone()), owner(&fx), Path(board.get_id()), Json(update))
            .await
            .unwrap()
            .0;
        assert_eq!(updated.get_name(), "Feature ideas");

        let status = delete_board_handler(State(fx.pool.clone()), owner(&fx), Path(board.get_id())).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let result = delete_board_handler(State(fx.pool.clone()), owner(&fx), Path(board.get_id())).await;
        assert!(matches!(result, Err(ApiError::NotFound)));
    }
}
