use crate::db::DbPool;
use crate::models::User;
use crate::schema::{members, users};
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Creates a new user
///
/// ### Errors
///
/// Returns an error if the email is already registered (unique violation)
/// or the insert fails
#[instrument(skip(pool), fields(email = %email))]
pub fn create_user(pool: &DbPool, email: String, name: String) -> Result<User> {
    let conn = &mut pool.get()?;

    let new_user = User::new(email, name);

    diesel::insert_into(users::table)
        .values(&new_user)
        .execute(conn)?;

    info!("Created user with id: {}", new_user.get_id());

    Ok(new_user)
}

/// Retrieves a user by id, or `None` if there is no such user
#[instrument(skip(pool))]
pub fn get_user(pool: &DbPool, user_id: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let result = users::table
        .find(user_id)
        .select(User::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Lists every user that is a member of the organization, ordered by name
#[instrument(skip(pool))]
pub fn list_users_for_organization(pool: &DbPool, organization_id: &str) -> Result<Vec<User>> {
    let conn = &mut pool.get()?;

    let result = users::table
        .inner_join(members::table)
        .filter(members::organization_id.eq(organization_id))
        .order(users::name.asc())
        .select(User::as_select())
        .load(conn)?;

    debug!("Found {} users in organization", result.len());

    Ok(result)
}
