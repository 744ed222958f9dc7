use crate::db::DbPool;
use crate::dto::UpdateStatusDto;
use crate::models::{Status, DEFAULT_STATUSES};
use crate::repo::RepoError;
use crate::schema::statuses;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Inserts the starter statuses for a freshly created organization
pub(crate) fn insert_default_statuses(conn: &mut SqliteConnection, organization_id: &str) -> QueryResult<()> {
    let rows: Vec<Status> = DEFAULT_STATUSES
        .iter()
        .zip(0..)
        .map(|(&(name, color, is_default), position)| {
            Status::new(organization_id.to_string(), name.to_string(), color.to_string(), position, is_default)
        })
        .collect();

    diesel::insert_into(statuses::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

fn clear_default(conn: &mut SqliteConnection, organization_id: &str) -> QueryResult<usize> {
    diesel::update(
        statuses::table
            .filter(statuses::organization_id.eq(organization_id))
            .filter(statuses::is_default.eq(true)),
    )
    .set(statuses::is_default.eq(false))
    .execute(conn)
}

fn find_status(conn: &mut SqliteConnection, organization_id: &str, status_id: &str) -> QueryResult<Option<Status>> {
    statuses::table
        .filter(statuses::id.eq(status_id))
        .filter(statuses::organization_id.eq(organization_id))
        .select(Status::as_select())
        .first(conn)
        .optional()
}

/// Creates a workflow status
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `organization_id` - The owning organization
/// * `name` - Unique name within the organization
/// * `color` - Display color
/// * `position` - Sort position; placed after the last status when `None`
/// * `is_default` - Whether new feedback starts in this status. Setting it
///   clears the flag on every other status of the organization.
///
/// ### Errors
///
/// Returns an error if the name is taken (unique violation), if there is no
/// position left after the last status (`RepoError::PositionOverflow`), or
/// if an insert fails
#[instrument(skip(pool))]
pub fn create_status(
    pool: &DbPool,
    organization_id: &str,
    name: String,
    color: String,
    position: Option<i32>,
    is_default: bool,
) -> Result<Status> {
    let mut conn = pool.get()?;

    conn.transaction(|conn| {
        let position = match position {
            Some(position) => position,
            None => {
                let last: Option<i32> = statuses::table
                    .filter(statuses::organization_id.eq(organization_id))
                    .select(max(statuses::position))
                    .first(conn)?;
                match last {
                    None => 0,
                    Some(last) => last.checked_add(1).ok_or(RepoError::PositionOverflow)?,
                }
            }
        };

        if is_default {
            clear_default(conn, organization_id)?;
        }

        let new_status = Status::new(organization_id.to_string(), name, color, position, is_default);
        diesel::insert_into(statuses::table)
            .values(&new_status)
            .execute(conn)?;

        info!("Created status with id: {}", new_status.get_id());

        Ok(new_status)
    })
}

/// Retrieves a status by id within an organization
#[instrument(skip(pool))]
pub fn get_status(pool: &DbPool, organization_id: &str, status_id: &str) -> Result<Option<Status>> {
    let conn = &mut pool.get()?;
    Ok(find_status(conn, organization_id, status_id)?)
}

/// Lists an organization's statuses in display order
#[instrument(skip(pool))]
pub fn list_statuses(pool: &DbPool, organization_id: &str) -> Result<Vec<Status>> {
    let conn = &mut pool.get()?;

    let result = statuses::table
        .filter(statuses::organization_id.eq(organization_id))
        .order((statuses::position.asc(), statuses::name.asc()))
        .select(Status::as_select())
        .load(conn)?;

    Ok(result)
}

/// The status new feedback is placed in, if the organization has one
#[instrument(skip(pool))]
pub fn get_default_status(pool: &DbPool, organization_id: &str) -> Result<Option<Status>> {
    let conn = &mut pool.get()?;

    let result = statuses::table
        .filter(statuses::organization_id.eq(organization_id))
        .filter(statuses::is_default.eq(true))
        .select(Status::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

#[derive(AsChangeset)]
#[diesel(table_name = statuses)]
struct StatusChanges<'a> {
    name: Option<&'a str>,
    color: Option<&'a str>,
    position: Option<i32>,
    is_default: Option<bool>,
}

/// Applies a partial update to a status
///
/// Promoting a status to default demotes the previous default. The
/// current default can only lose the flag that way; unsetting it directly
/// fails with `RepoError::DefaultRequired`.
///
/// ### Returns
///
/// The updated status, or `Ok(None)` if it is not in the organization
#[instrument(skip(pool, update))]
pub fn update_status(pool: &DbPool, organization_id: &str, status_id: &str, update: &UpdateStatusDto) -> Result<Option<Status>> {
    let mut conn = pool.get()?;

    conn.transaction(|conn| {
        let Some(current) = find_status(conn, organization_id, status_id)? else {
            return Ok(None);
        };

        if update.is_default == Some(false) && current.get_is_default() {
            return Err(RepoError::DefaultRequired.into());
        }

        if update.is_empty() {
            return Ok(find_status(conn, organization_id, status_id)?);
        }

        if update.is_default == Some(true) {
            clear_default(conn, organization_id)?;
        }

        let changes = StatusChanges {
            name: update.name.as_deref(),
            color: update.color.as_deref(),
            position: update.position,
            is_default: update.is_default,
        };

        diesel::update(statuses::table.find(status_id))
            .set(&changes)
            .execute(conn)?;

        debug!("Updated status {}", status_id);

        Ok(find_status(conn, organization_id, status_id)?)
    })
}

/// Deletes a status, returning whether it existed
///
/// Feedback in the deleted status is left without a status.
#[instrument(skip(pool))]
pub fn delete_status(pool: &DbPool, organization_id: &str, status_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(
        statuses::table
            .filter(statuses::id.eq(status_id))
            .filter(statuses::organization_id.eq(organization_id)),
    )
    .execute(conn)?;

    Ok(deleted > 0)
}
