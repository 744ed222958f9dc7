use crate::db::DbPool;
use crate::dto::UpdateBoardDto;
use crate::models::Board;
use crate::schema::boards;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Creates a new board in an organization
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `organization_id` - The owning organization
/// * `name` - The display name
/// * `slug` - The URL-safe handle, unique within the organization
/// * `description` - Free-form description
/// * `is_public` - Whether the board appears on the public surface
///
/// ### Returns
///
/// A Result containing the newly created Board if successful
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The slug is already used in this organization (unique violation)
/// - The database insert operation fails
#[instrument(skip(pool, description), fields(slug = %slug))]
pub fn create_board(
    pool: &DbPool,
    organization_id: &str,
    name: String,
    slug: String,
    description: String,
    is_public: bool,
) -> Result<Board> {
    let conn = &mut pool.get()?;

    let new_board = Board::new(organization_id.to_string(), name, slug, description, is_public);

    diesel::insert_into(boards::table)
        .values(&new_board)
        .execute(conn)?;

    info!("Created board with id: {}", new_board.get_id());

    Ok(new_board)
}

/// Retrieves a board by id within an organization
///
/// ### Returns
///
/// `Ok(None)` if the board does not exist or belongs to another organization
#[instrument(skip(pool))]
pub fn get_board(pool: &DbPool, organization_id: &str, board_id: &str) -> Result<Option<Board>> {
    let conn = &mut pool.get()?;

    let result = boards::table
        .filter(boards::id.eq(board_id))
        .filter(boards::organization_id.eq(organization_id))
        .select(Board::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves a board by slug within an organization
#[instrument(skip(pool))]
pub fn get_board_by_slug(pool: &DbPool, organization_id: &str, slug: &str) -> Result<Option<Board>> {
    let conn = &mut pool.get()?;

    let result = boards::table
        .filter(boards::slug.eq(slug))
        .filter(boards::organization_id.eq(organization_id))
        .select(Board::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Lists an organization's boards, ordered by name
#[instrument(skip(pool))]
pub fn list_boards(pool: &DbPool, organization_id: &str) -> Result<Vec<Board>> {
    let conn = &mut pool.get()?;

    let result = boards::table
        .filter(boards::organization_id.eq(organization_id))
        .order(boards::name.asc())
        .select(Board::as_select())
        .load(conn)?;

    debug!("Found {} boards", result.len());

    Ok(result)
}

/// Lists only the public boards of an organization, ordered by name
#[instrument(skip(pool))]
pub fn list_public_boards(pool: &DbPool, organization_id: &str) -> Result<Vec<Board>> {
    let conn = &mut pool.get()?;

    let result = boards::table
        .filter(boards::organization_id.eq(organization_id))
        .filter(boards::is_public.eq(true))
        .order(boards::name.asc())
        .select(Board::as_select())
        .load(conn)?;

    Ok(result)
}

#[derive(AsChangeset)]
#[diesel(table_name = boards)]
struct BoardChanges<'a> {
    name: Option<&'a str>,
    slug: Option<&'a str>,
    description: Option<&'a str>,
    is_public: Option<bool>,
    updated_at: NaiveDateTime,
}

/// Applies a partial update to a board
///
/// Fields left as `None` in the update are unchanged.
///
/// ### Returns
///
/// The updated board, or `Ok(None)` if it is not in the organization
#[instrument(skip(pool, update))]
pub fn update_board(pool: &DbPool, organization_id: &str, board_id: &str, update: &UpdateBoardDto) -> Result<Option<Board>> {
    let conn = &mut pool.get()?;

    let changes = BoardChanges {
        name: update.name.as_deref(),
        slug: update.slug.as_deref(),
        description: update.description.as_deref(),
        is_public: update.is_public,
        updated_at: Utc::now().naive_utc(),
    };

    let updated = diesel::update(
        boards::table
            .filter(boards::id.eq(board_id))
            .filter(boards::organization_id.eq(organization_id)),
    )
    .set(&changes)
    .execute(conn)?;

    if updated == 0 {
        return Ok(None);
    }

    let result = boards::table
        .find(board_id)
        .select(Board::as_select())
        .first(conn)?;

    Ok(Some(result))
}

/// Deletes a board together with its feedback, returning whether it existed
#[instrument(skip(pool))]
pub fn delete_board(pool: &DbPool, organization_id: &str, board_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(
        boards::table
            .filter(boards::id.eq(board_id))
            .filter(boards::organization_id.eq(organization_id)),
    )
    .execute(conn)?;

    if deleted > 0 {
        info!("Deleted board {}", board_id);
    }

    Ok(deleted > 0)
}
