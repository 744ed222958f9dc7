use crate::db::DbPool;
use crate::models::{FeedbackTag, Tag};
use crate::schema::{feedback, feedback_tags, tags};
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

use super::RepoError;

/// Creates a new tag in an organization
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `organization_id` - The owning organization
/// * `name` - The name for the new tag, unique within the organization
/// * `color` - Display color
///
/// ### Returns
///
/// A Result containing the newly created Tag if successful
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The name is already used in this organization (unique violation)
/// - The database insert operation fails
#[instrument(skip(pool))]
pub fn create_tag(pool: &DbPool, organization_id: &str, name: String, color: String) -> Result<Tag> {
    let conn = &mut pool.get()?;

    let new_tag = Tag::new(organization_id.to_string(), name, color);

    diesel::insert_into(tags::table)
        .values(&new_tag)
        .execute(conn)?;

    info!("Created tag with id: {}", new_tag.get_id());

    Ok(new_tag)
}

/// Retrieves a tag by id within an organization
///
/// ### Returns
///
/// A Result containing the Tag if found, or `None` if it does not exist or
/// belongs to another organization
#[instrument(skip(pool))]
pub fn get_tag(pool: &DbPool, organization_id: &str, tag_id: &str) -> Result<Option<Tag>> {
    let conn = &mut pool.get()?;

    let result = tags::table
        .filter(tags::id.eq(tag_id))
        .filter(tags::organization_id.eq(organization_id))
        .select(Tag::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Lists all tags of an organization, ordered by name
#[instrument(skip(pool))]
pub fn list_tags(pool: &DbPool, organization_id: &str) -> Result<Vec<Tag>> {
    let conn = &mut pool.get()?;

    let result = tags::table
        .filter(tags::organization_id.eq(organization_id))
        .order(tags::name.asc())
        .select(Tag::as_select())
        .load(conn)?;

    Ok(result)
}

/// Deletes a tag and detaches it from every post
#[instrument(skip(pool))]
pub fn delete_tag(pool: &DbPool, organization_id: &str, tag_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(
        tags::table
            .filter(tags::id.eq(tag_id))
            .filter(tags::organization_id.eq(organization_id)),
    )
    .execute(conn)?;

    Ok(deleted > 0)
}

/// Attaches a tag to a feedback post
///
/// ### Errors
///
/// Returns an error if:
/// - The post or the tag is not in the organization (`RepoError::NotFound`)
/// - The tag is already attached (unique violation)
#[instrument(skip(pool))]
pub fn add_tag_to_feedback(pool: &DbPool, organization_id: &str, feedback_id: &str, tag_id: &str) -> Result<FeedbackTag> {
    let mut conn = pool.get()?;

    conn.transaction(|conn| {
        let feedback_count: i64 = feedback::table
            .filter(feedback::id.eq(feedback_id))
            .filter(feedback::organization_id.eq(organization_id))
            .count()
            .get_result(conn)?;
        if feedback_count == 0 {
            return Err(RepoError::NotFound("feedback").into());
        }

        let tag_count: i64 = tags::table
            .filter(tags::id.eq(tag_id))
            .filter(tags::organization_id.eq(organization_id))
            .count()
            .get_result(conn)?;
        if tag_count == 0 {
            return Err(RepoError::NotFound("tag").into());
        }

        let link = FeedbackTag::new(feedback_id.to_string(), tag_id.to_string());
        diesel::insert_into(feedback_tags::table)
            .values(&link)
            .execute(conn)?;

        debug!("Tagged feedback {} with {}", feedback_id, tag_id);

        Ok(link)
    })
}

/// Detaches a tag from a feedback post, returning whether it was attached
#[instrument(skip(pool))]
pub fn remove_tag_from_feedback(pool: &DbPool, organization_id: &str, feedback_id: &str, tag_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let in_organization = feedback::table
        .filter(feedback::id.eq(feedback_id))
        .filter(feedback::organization_id.eq(organization_id));

    let deleted = diesel::delete(
        feedback_tags::table
            .filter(feedback_tags::feedback_id.eq(feedback_id))
            .filter(feedback_tags::tag_id.eq(tag_id))
            .filter(feedback_tags::feedback_id.eq_any(in_organization.select(feedback::id))),
    )
    .execute(conn)?;

    Ok(deleted > 0)
}

/// Lists the tags attached to a feedback post, ordered by name
#[instrument(skip(pool))]
pub fn list_tags_for_feedback(pool: &DbPool, organization_id: &str, feedback_id: &str) -> Result<Vec<Tag>> {
    let conn = &mut pool.get()?;

    let result = tags::table
        .inner_join(feedback_tags::table)
        .filter(feedback_tags::feedback_id.eq(feedback_id))
        .filter(tags::organization_id.eq(organization_id))
        .order(tags::name.asc())
        .select(Tag::as_select())
        .load(conn)?;

    Ok(result)
}
