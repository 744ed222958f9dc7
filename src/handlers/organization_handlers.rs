use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{instrument, debug, info};

use crate::auth::{Identity, RequestContext};
use crate::db::DbPool;
use crate::dto::{validate_name, validate_slug, AddMemberDto, CreateOrganizationDto, UpdateMemberRoleDto};
use crate::errors::ApiError;
use crate::models::{Member, Organization, Role};
use crate::repo;

/// Handler for creating an organization
///
/// This function handles POST requests to `/organizations`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `identity` - The calling user, who becomes the owner
/// * `payload` - The organization name and slug
///
/// ### Returns
///
/// The newly created organization as JSON
#[instrument(skip(pool, payload), fields(slug = %payload.slug))]
pub async fn create_organization_handler(
    State(pool): State<Arc<DbPool>>,
    identity: Identity,
    Json(payload): Json<CreateOrganizationDto>,
) -> Result<Json<Organization>, ApiError> {
    validate_name("name", &payload.name).map_err(ApiError::BadRequest)?;
    validate_slug(&payload.slug).map_err(ApiError::BadRequest)?;

    repo::get_user(&pool, &identity.user_id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::Unauthorized)?;

    let organization = repo::create_organization(&pool, payload.name, payload.slug, &identity.user_id)
        .map_err(ApiError::from_repo)?;

    info!("Created organization {}", organization.get_id());

    Ok(Json(organization))
}

/// Handler for fetching an organization the caller belongs to
#[instrument(skip(pool))]
pub async fn get_organization_handler(
    State(pool): State<Arc<DbPool>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Organization>, ApiError> {
    repo::get_membership(&pool, &id, &identity.user_id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    let organization = repo::get_organization(&pool, &id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(organization))
}

/// Handler for listing the members of the active organization
#[instrument(skip(pool))]
pub async fn list_members_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
) -> Result<Json<Vec<Member>>, ApiError> {
    ctx.require_member(&pool)?;

    let members = repo::list_members(&pool, &ctx.organization_id).map_err(ApiError::from_repo)?;

    Ok(Json(members))
}

/// Handler for adding a user to the active organization
///
/// Admins may add members and admins; only owners may add owners.
#[instrument(skip(pool, payload), fields(user_id = %payload.user_id, role = %payload.role))]
pub async fn add_member_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Json(payload): Json<AddMemberDto>,
) -> Result<Json<Member>, ApiError> {
    ctx.require_role(&pool, Role::Admin.max(payload.role))?;

    repo::get_user(&pool, &payload.user_id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    let member = repo::add_member(&pool, &ctx.organization_id, &payload.user_id, payload.role)
        .map_err(ApiError::from_repo)?;

    Ok(Json(member))
}

/// Handler for changing a member's role
///
/// Admins may move people between `member` and `admin`. Granting or
/// revoking `owner` requires being an owner. The last owner cannot be
/// demoted.
#[instrument(skip(pool, payload), fields(role = %payload.role))]
pub async fn update_member_role_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateMemberRoleDto>,
) -> Result<Json<Member>, ApiError> {
    let caller = ctx.require_role(&pool, Role::Admin)?;

    let target = repo::get_membership(&pool, &ctx.organization_id, &user_id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    let needed = Role::Admin.max(payload.role).max(target.get_role());
    if !caller.get_role().satisfies(needed) {
        return Err(ApiError::Forbidden(format!("{} role required", needed)));
    }

    let member = repo::update_member_role(&pool, &ctx.organization_id, &user_id, payload.role)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(member))
}

/// Handler for removing a member, or for leaving the organization
///
/// Anyone may remove themselves. Removing someone else requires `admin`,
/// or `owner` when the target is an owner.
#[instrument(skip(pool))]
pub async fn remove_member_handler(
    State(pool): State<Arc<DbPool>>,
    ctx: RequestContext,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let caller = ctx.require_member(&pool)?;

    let target = repo::get_membership(&pool, &ctx.organization_id, &user_id)
        .map_err(ApiError::from_repo)?
        .ok_or(ApiError::NotFound)?;

    if caller.get_user_id() != user_id {
        let needed = Role::Admin.max(target.get_role());
        if !caller.get_role().satisfies(needed) {
            return Err(ApiError::Forbidden(format!("{} role required", needed)));
        }
    }

    let removed = repo::remove_member(&pool, &ctx.organization_id, &user_id).map_err(ApiError::from_repo)?;
    if !removed {
        return Err(ApiError::NotFound);
    }

    debug!("Removed member {}", user_id);

    Ok(StatusCode::NO_CONTENT)
}
