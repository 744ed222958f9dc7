use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{instrument, info};

use crate::auth::{Identity, RequestContext};
use crate::db::DbPool;
use crate::dto::{validate_name, CreateUserDto};
use crate::errors::ApiError;
use crate::models::{Organization, User};
use crate::repo;

/// Handler for registering a user
///
/// This function handles POST requests to `/users`. It is called by the
/// authentication gateway when an account is first seen.
#[instrument(skip(pool, payload), fields(email = %payload.email))]
pub async fn create_user_handler(
    State(pool): State<Arc<DbPool>>,
    Json(payload): Json<CreateUserDto>,
) -> Result<Json<User>, ApiError> {
    validate_name("name", &payload.name).map_err(ApiError::BadRequest)?;
    if !payload.email.contains('@') {
        return Err(ApiError::BadRequest(format!("invalid email: {}", payload.email)));
    }

    let user = repo::create_user(&pool, payload.email.trim().to_lowercase(), payload.name)
        .map_err(ApiError::from_repo)?;

    info!("Registered user {}", user.get_id());

    Ok(Json(user))
}

/// Handler for fetching a user by id
#[instrument(skip(pool, _identity))]
pub async fn get_user_handler(
    State(pool): State<Arc<DbPool>>,
    _identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = repo::get_user(&pool, &id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(user))
}

/// Handler for listing the users of the active organization
#[instrument(skip(pool))]
pub async fn list_users_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
) -> Result<Json<Vec<User>>, ApiError> {
    ctx.require_member(&pool)?;

    let users = repo::list_users_for_organization(&pool, &ctx.organization_id)
        .map_err(ApiError::from_repo)?;

    Ok(Json(users))
}

/// Handler for `GET /me/organizations`
#[instrument(skip(pool))]
pub async fn list_my_organizations_handler(
    State(pool): State<Arc<DbPool>>,
    identity: Identity,
) -> Result<Json<Vec<Organization>>, ApiError> {
    let organizations = repo::list_organizations_for_user(&pool, &identity.user_id)
        .map_err(ApiError::from_repo)?;

    Ok(Json(organizations))
}
