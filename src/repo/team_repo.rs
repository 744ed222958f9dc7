use crate::db::DbPool;
use crate::models::{Team, TeamMember, User};
use crate::schema::{members, team_members, teams, users};
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, info};

use super::RepoError;

/// Creates a team inside an organization
///
/// ### Errors
///
/// Returns an error if the organization already has a team with this name
#[instrument(skip(pool))]
pub fn create_team(pool: &DbPool, organization_id: &str, name: String) -> Result<Team> {
    let conn = &mut pool.get()?;

    let new_team = Team::new(organization_id.to_string(), name);

    diesel::insert_into(teams::table)
        .values(&new_team)
        .execute(conn)?;

    info!("Created team with id: {}", new_team.get_id());

    Ok(new_team)
}

/// Retrieves a team by id within an organization
#[instrument(skip(pool))]
pub fn get_team(pool: &DbPool, organization_id: &str, team_id: &str) -> Result<Option<Team>> {
    let conn = &mut pool.get()?;

    let result = teams::table
        .filter(teams::id.eq(team_id))
        .filter(teams::organization_id.eq(organization_id))
        .select(Team::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Lists an organization's teams, ordered by name
#[instrument(skip(pool))]
pub fn list_teams(pool: &DbPool, organization_id: &str) -> Result<Vec<Team>> {
    let conn = &mut pool.get()?;

    let result = teams::table
        .filter(teams::organization_id.eq(organization_id))
        .order(teams::name.asc())
        .select(Team::as_select())
        .load(conn)?;

    Ok(result)
}

/// Deletes a team and its memberships, returning whether it existed
#[instrument(skip(pool))]
pub fn delete_team(pool: &DbPool, organization_id: &str, team_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(
        teams::table
            .filter(teams::id.eq(team_id))
            .filter(teams::organization_id.eq(organization_id)),
    )
    .execute(conn)?;

    Ok(deleted > 0)
}

/// Adds an organization member to a team
///
/// ### Errors
///
/// Returns an error if:
/// - The team is not in the organization (`RepoError::NotFound`)
/// - The user is not a member of the organization (`RepoError::NotAMember`)
/// - The user is already on the team (unique violation)
#[instrument(skip(pool))]
pub fn add_user_to_team(pool: &DbPool, organization_id: &str, team_id: &str, user_id: &str) -> Result<TeamMember> {
    let mut conn = pool.get()?;

    conn.transaction(|conn| {
        let team_exists: i64 = teams::table
            .filter(teams::id.eq(team_id))
            .filter(teams::organization_id.eq(organization_id))
            .count()
            .get_result(conn)?;
        if team_exists == 0 {
            return Err(RepoError::NotFound("team").into());
        }

        let is_member: i64 = members::table
            .filter(members::organization_id.eq(organization_id))
            .filter(members::user_id.eq(user_id))
            .count()
            .get_result(conn)?;
        if is_member == 0 {
            return Err(RepoError::NotAMember.into());
        }

        let team_member = TeamMember::new(team_id.to_string(), user_id.to_string());
        diesel::insert_into(team_members::table)
            .values(&team_member)
            .execute(conn)?;

        info!("Added user {} to team {}", user_id, team_id);

        Ok(team_member)
    })
}

/// Removes a user from a team, returning whether they were on it
#[instrument(skip(pool))]
pub fn remove_user_from_team(pool: &DbPool, organization_id: &str, team_id: &str, user_id: &str) -> Result<bool> {
    if get_team(pool, organization_id, team_id)?.is_none() {
        return Ok(false);
    }

    let conn = &mut pool.get()?;

    let deleted = diesel::delete(team_members::table.find((team_id, user_id)))
        .execute(conn)?;

    Ok(deleted > 0)
}

/// Lists the users on a team, ordered by name
///
/// A team outside the organization yields an empty list.
#[instrument(skip(pool))]
pub fn list_team_members(pool: &DbPool, organization_id: &str, team_id: &str) -> Result<Vec<User>> {
    let conn = &mut pool.get()?;

    let result = users::table
        .inner_join(team_members::table.inner_join(teams::table))
        .filter(team_members::team_id.eq(team_id))
        .filter(teams::organization_id.eq(organization_id))
        .order(users::name.asc())
        .select(User::as_select())
        .load(conn)?;

    Ok(result)
}
