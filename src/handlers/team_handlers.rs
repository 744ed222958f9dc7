use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use crate::auth::RequestContext;
use crate::db::DbPool;
use crate::dto::{validate_name, CreateTeamDto};
use crate::errors::ApiError;
use crate::models::{Role, Team, TeamMember, User};
use crate::repo;

#[instrument(skip(pool))]
pub async fn list_teams_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
) -> Result<Json<Vec<Team>>, ApiError> {
    ctx.require_member(&pool)?;
    let teams = repo::list_teams(&pool, &ctx.organization_id).map_err(ApiError::from_repo)?;
    Ok(Json(teams))
}

#[instrument(skip(pool, payload), fields(name = %payload.name))]
pub async fn create_team_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Json(payload): Json<CreateTeamDto>,
) -> Result<Json<Team>, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;
    validate_name("name", &payload.name).map_err(ApiError::BadRequest)?;

    let team = repo::create_team(&pool, &ctx.organization_id, payload.name).map_err(ApiError::from_repo)?;
    Ok(Json(team))
}

#[instrument(skip(pool))]
pub async fn get_team_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Team>, ApiError> {
    ctx.require_member(&pool)?;

    let team = repo::get_team(&pool, &ctx.organization_id, &id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(team))
}

#[instrument(skip(pool))]
pub async fn delete_team_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;

    if !repo::delete_team(&pool, &ctx.organization_id, &id).map_err(ApiError::from_repo)? {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(pool))]
pub async fn list_team_members_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Vec<User>>, ApiError> {
    ctx.require_member(&pool)?;

    repo::get_team(&pool, &ctx.organization_id, &id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    let users = repo::list_team_members(&pool, &ctx.organization_id, &id).map_err(ApiError::from_repo)?;
    Ok(Json(users))
}

#[instrument(skip(pool))]
pub async fn add_team_member_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<TeamMember>, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;

    let team_member = repo::add_user_to_team(&pool, &ctx.organization_id, &id, &user_id)
        .map_err(ApiError::from_repo)?;

    Ok(Json(team_member))
}

#[instrument(skip(pool))]
pub async fn remove_team_member_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    ctx.require_role(&pool, Role::Admin)?;

    if !repo::remove_user_from_team(&pool, &ctx.organization_id, &id, &user_id).map_err(ApiError::from_repo)? {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Actor;
    use crate::test_utils::setup_fixture;

    #[tokio::test]
    async fn test_team_flow() {
        let fx = setup_fixture();
        let ada = fx.add_user("ada", Role::Member);
        let owner = RequestContext { organization_id: fx.org_id(), actor: Actor::User(fx.owner.get_id()) };

        let team = create_team_handler(State(fx.pool.clone()), owner.clone(), Json(CreateTeamDto { name: "Support".to_string() }))
            .await
            .unwrap()
            .0;

        add_team_member_handler(State(fx.pool.clone()), owner.clone(), Path((team.get_id(), ada.get_id())))
            .await
            .unwrap();

        let users = list_team_members_handler(State(fx.pool.clone()), owner.clone(), Path(team.get_id())).await.unwrap().0;
        assert_eq!(users, vec![ada.clone()]);

        let status = remove_team_member_handler(State(fx.pool.clone()), owner.clone(), Path((team.get_id(), ada.get_id())))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        delete_team_handler(State(fx.pool.clone()), owner.clone(), Path(team.get_id())).await.unwrap();
        let result = get_team_handler(State(fx.pool.clone()), owner, Path(team.get_id())).await;
        assert!(matches!(result, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn test_member_cannot_create_team() {
        let fx = setup_fixture();
        let ada = fx.add_user("ada", Role::Member);
        let ctx = RequestContext { organization_id: fx.org_id(), actor: Actor::User(ada.get_id()) };

        let result = create_team_handler(State(fx.pool.clone()), ctx, Json(CreateTeamDto { name: "Support".to_string() })).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_adding_non_member_to_team_is_bad_request() {
        let fx = setup_fixture();
        let owner = RequestContext { organization_id: fx.org_id(), actor: Actor::User(fx.owner.get_id()) };
        let team = repo::create_team(&fx.pool, &fx.org_id(), "Support".to_string()).unwrap();

        let result = add_team_member_handler(State(fx.pool.clone()), owner, Path((team.get_id(), "stranger".to_string()))).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
