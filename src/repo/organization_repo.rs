use crate::db::DbPool;
use crate::models::{Member, Organization, Role};
use crate::schema::{members, organizations};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use anyhow::Result;
use tracing::{instrument, debug, info};

use super::status_repo::insert_default_statuses;
use super::RepoError;

/// Creates an organization owned by the given user
///
/// The organization row, the owner's membership and the default statuses
/// are written in one transaction, so a half-initialized organization is
/// never visible.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `name` - The display name
/// * `slug` - The URL-safe handle, already validated
/// * `owner_user_id` - The user who becomes the first owner
///
/// ### Returns
///
/// A Result containing the newly created Organization if successful
///
/// ### Errors
///
/// Returns an error if:
/// - The slug is already taken (unique violation)
/// - The owner does not exist (foreign key violation)
/// - Any insert fails
#[instrument(skip(pool), fields(slug = %slug))]
pub fn create_organization(pool: &DbPool, name: String, slug: String, owner_user_id: &str) -> Result<Organization> {
    let mut conn = pool.get()?;

    let new_org = Organization::new(name, slug);

    conn.transaction(|conn| {
        diesel::insert_into(organizations::table)
            .values(&new_org)
            .execute(conn)?;

        diesel::insert_into(members::table)
            .values(&Member::new(new_org.get_id(), owner_user_id.to_string(), Role::Owner))
            .execute(conn)?;

        insert_default_statuses(conn, &new_org.get_id())?;

        Ok::<_, anyhow::Error>(())
    })?;

    info!("Created organization with id: {}", new_org.get_id());

    Ok(new_org)
}

/// Retrieves an organization by id
#[instrument(skip(pool))]
pub fn get_organization(pool: &DbPool, organization_id: &str) -> Result<Option<Organization>> {
    let conn = &mut pool.get()?;

    let result = organizations::table
        .find(organization_id)
        .select(Organization::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves an organization by its public slug
#[instrument(skip(pool))]
pub fn get_organization_by_slug(pool: &DbPool, slug: &str) -> Result<Option<Organization>> {
    let conn = &mut pool.get()?;

    let result = organizations::table
        .filter(organizations::slug.eq(slug))
        .select(Organization::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Lists the organizations a user belongs to, ordered by name
#[instrument(skip(pool))]
pub fn list_organizations_for_user(pool: &DbPool, user_id: &str) -> Result<Vec<Organization>> {
    let conn = &mut pool.get()?;

    let result = organizations::table
        .inner_join(members::table)
        .filter(members::user_id.eq(user_id))
        .order(organizations::name.asc())
        .select(Organization::as_select())
        .load(conn)?;

    Ok(result)
}

/// Adds a user to an organization with the given role
///
/// ### Errors
///
/// Returns an error if the user is already a member (unique violation) or
/// the organization or user does not exist (foreign key violation)
#[instrument(skip(pool))]
pub fn add_member(pool: &DbPool, organization_id: &str, user_id: &str, role: Role) -> Result<Member> {
    let conn = &mut pool.get()?;

    let member = Member::new(organization_id.to_string(), user_id.to_string(), role);

    diesel::insert_into(members::table)
        .values(&member)
        .execute(conn)?;

    info!("Added user {} to organization as {}", user_id, role);

    Ok(member)
}

fn find_membership(conn: &mut SqliteConnection, organization_id: &str, user_id: &str) -> QueryResult<Option<Member>> {
    members::table
        .find((organization_id, user_id))
        .select(Member::as_select())
        .first(conn)
        .optional()
}

fn count_owners(conn: &mut SqliteConnection, organization_id: &str) -> QueryResult<i64> {
    members::table
        .filter(members::organization_id.eq(organization_id))
        .filter(members::role.eq(Role::Owner))
        .count()
        .get_result(conn)
}

/// Retrieves a user's membership in an organization, if any
#[instrument(skip(pool))]
pub fn get_membership(pool: &DbPool, organization_id: &str, user_id: &str) -> Result<Option<Member>> {
    let conn = &mut pool.get()?;
    Ok(find_membership(conn, organization_id, user_id)?)
}

/// Lists all memberships of an organization, oldest first
#[instrument(skip(pool))]
pub fn list_members(pool: &DbPool, organization_id: &str) -> Result<Vec<Member>> {
    let conn = &mut pool.get()?;

    let result = members::table
        .filter(members::organization_id.eq(organization_id))
        .order(members::created_at.asc())
        .select(Member::as_select())
        .load(conn)?;

    Ok(result)
}

/// Changes a member's role
///
/// Returns `Ok(None)` if the user is not a member. Demoting the last owner
/// fails with `RepoError::LastOwner`.
#[instrument(skip(pool))]
pub fn update_member_role(pool: &DbPool, organization_id: &str, user_id: &str, role: Role) -> Result<Option<Member>> {
    let mut conn = pool.get()?;

    conn.transaction(|conn| {
        let Some(current) = find_membership(conn, organization_id, user_id)? else {
            return Ok(None);
        };

        if current.get_role() == Role::Owner && role != Role::Owner && count_owners(conn, organization_id)? <= 1 {
            return Err(RepoError::LastOwner.into());
        }

        diesel::update(members::table.find((organization_id, user_id)))
            .set(members::role.eq(role))
            .execute(conn)?;

        debug!("Changed role of {} from {} to {}", user_id, current.get_role(), role);

        Ok(find_membership(conn, organization_id, user_id)?)
    })
}

/// Removes a user from an organization
///
/// Returns whether a membership was removed. Removing the last owner fails
/// with `RepoError::LastOwner`.
#[instrument(skip(pool))]
pub fn remove_member(pool: &DbPool, organization_id: &str, user_id: &str) -> Result<bool> {
    let mut conn = pool.get()?;

    conn.transaction(|conn| {
        let Some(current) = find_membership(conn, organization_id, user_id)? else {
            return Ok(false);
        };

        if current.get_role() == Role::Owner && count_owners(conn, organization_id)? <= 1 {
            return Err(RepoError::LastOwner.into());
        }

        let deleted = diesel::delete(members::table.find((organization_id, user_id)))
            .execute(conn)?;

        info!("Removed user {} from organization", user_id);

        Ok(deleted > 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::{create_user, list_statuses};
    use crate::test_utils::{seed_organization, setup_fixture, setup_test_db};

    #[test]
    fn test_create_organization_makes_creator_owner() {
        let pool = setup_test_db();
        let (org, owner) = seed_organization(&pool, "acme");

        let membership = get_membership(&pool, &org.get_id(), &owner.get_id()).unwrap().unwrap();
        assert_eq!(membership.get_role(), Role::Owner);
    }

    #[test]
    fn test_create_organization_seeds_default_statuses() {
        let pool = setup_test_db();
        let (org, _) = seed_organization(&pool, "acme");

        let statuses = list_statuses(&pool, &org.get_id()).unwrap();

        assert_eq!(statuses.len(), 5);
        assert_eq!(statuses.iter().filter(|s| s.get_is_default()).count(), 1);
        assert_eq!(statuses[0].get_name(), "Open");
    }

    #[test]
    fn test_create_organization_with_missing_owner_rolls_back() {
        let pool = setup_test_db();

        let result = create_organization(&pool, "Acme".to_string(), "acme".to_string(), "nobody");

        assert!(result.is_err());
        assert!(get_organization_by_slug(&pool, "acme").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_slug_is_rejected() {
        let pool = setup_test_db();
        let (_, owner) = seed_organization(&pool, "acme");

        let result = create_organization(&pool, "Acme 2".to_string(), "acme".to_string(), &owner.get_id());
        assert!(result.is_err());
    }

    #[test]
    fn test_get_organization_by_slug() {
        let pool = setup_test_db();
        let (org, _) = seed_organization(&pool, "acme");

        let found = get_organization_by_slug(&pool, "acme").unwrap().unwrap();
        assert_eq!(found.get_id(), org.get_id());
        assert!(get_organization(&pool, "missing").unwrap().is_none());
    }

    #[test]
    fn test_list_organizations_for_user() {
        let pool = setup_test_db();
        let (acme, owner) = seed_organization(&pool, "acme");
        let (globex, _) = seed_organization(&pool, "globex");
        add_member(&pool, &globex.get_id(), &owner.get_id(), Role::Member).unwrap();
        let (_initech, _) = seed_organization(&pool, "initech");

        let orgs = list_organizations_for_user(&pool, &owner.get_id()).unwrap();

        let ids: Vec<String> = orgs.iter().map(|o| o.get_id()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&acme.get_id()));
        assert!(ids.contains(&globex.get_id()));
    }

    #[test]
    fn test_add_member_twice_fails() {
        let fx = setup_fixture();
        let user = fx.add_user("ada", Role::Member);

        let result = add_member(&fx.pool, &fx.org_id(), &user.get_id(), Role::Admin);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_member_role() {
        let fx = setup_fixture();
        let user = fx.add_user("ada", Role::Member);

        let updated = update_member_role(&fx.pool, &fx.org_id(), &user.get_id(), Role::Admin).unwrap().unwrap();
        assert_eq!(updated.get_role(), Role::Admin);

        assert!(update_member_role(&fx.pool, &fx.org_id(), "nobody", Role::Admin).unwrap().is_none());
    }

    #[test]
    fn test_last_owner_cannot_be_demoted_or_removed() {
        let fx = setup_fixture();

        let err = update_member_role(&fx.pool, &fx.org_id(), &fx.owner.get_id(), Role::Admin).unwrap_err();
        assert_eq!(err.downcast_ref::<RepoError>(), Some(&RepoError::LastOwner));

        let err = remove_member(&fx.pool, &fx.org_id(), &fx.owner.get_id()).unwrap_err();
        assert_eq!(err.downcast_ref::<RepoError>(), Some(&RepoError::LastOwner));
    }

    #[test]
    fn test_owner_can_leave_when_another_owner_exists() {
        let fx = setup_fixture();
        fx.add_user("ada", Role::Owner);

        assert!(remove_member(&fx.pool, &fx.org_id(), &fx.owner.get_id()).unwrap());
        assert!(get_membership(&fx.pool, &fx.org_id(), &fx.owner.get_id()).unwrap().is_none());
    }

    #[test]
    fn test_remove_missing_member_returns_false() {
        let fx = setup_fixture();
        let stranger = create_user(&fx.pool, "x@example.com".to_string(), "X".to_string()).unwrap();

        assert!(!remove_member(&fx.pool, &fx.org_id(), &stranger.get_id()).unwrap());
    }
}
