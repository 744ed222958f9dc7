use crate::db::DbPool;
use crate::dto::{FeedbackPage, FeedbackQueryDto, FeedbackSort, FeedbackSummary, UpdateFeedbackDto};
use crate::models::Feedback;
use crate::schema::{boards, feedback, feedback_tags, statuses};
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use anyhow::Result;
use std::collections::{HashMap, HashSet};
use tracing::{instrument, debug, info};

use super::RepoError;
use super::comment_repo::count_comments;
use super::tag_repo::list_tags_for_feedback;
use super::vote_repo::{count_votes, feedback_vote_count};
use crate::models::VoteTarget;

/// Creates a new feedback post on a board
///
/// The post starts in the organization's default status, or with no status
/// when the organization has none.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `organization_id` - The owning organization
/// * `board_id` - The board to post on; must belong to the organization
/// * `author_id` - A user id or anonymous session id
/// * `title` - Short summary
/// * `description` - Longer description
///
/// ### Returns
///
/// A Result containing the newly created Feedback if successful
///
/// ### Errors
///
/// Returns an error if:
/// - The board is not in the organization (`RepoError::NotFound`)
/// - The database insert operation fails
#[instrument(skip(pool, description), fields(board_id = %board_id))]
pub fn create_feedback(
    pool: &DbPool,
    organization_id: &str,
    board_id: &str,
    author_id: &str,
    title: String,
    description: String,
) -> Result<Feedback> {
    let mut conn = pool.get()?;

    conn.transaction(|conn| {
        let board_count: i64 = boards::table
            .filter(boards::id.eq(board_id))
            .filter(boards::organization_id.eq(organization_id))
            .count()
            .get_result(conn)?;
        if board_count == 0 {
            return Err(RepoError::NotFound("board").into());
        }

        let status_id: Option<String> = statuses::table
            .filter(statuses::organization_id.eq(organization_id))
            .filter(statuses::is_default.eq(true))
            .select(statuses::id)
            .first(conn)
            .optional()?;

        let new_feedback = Feedback::new(
            organization_id.to_string(),
            board_id.to_string(),
            status_id,
            author_id.to_string(),
            title,
            description,
        );

        diesel::insert_into(feedback::table)
            .values(&new_feedback)
            .execute(conn)?;

        info!("Created feedback with id: {}", new_feedback.get_id());

        Ok(new_feedback)
    })
}

/// Retrieves a feedback post by id within an organization
#[instrument(skip(pool))]
pub fn get_feedback(pool: &DbPool, organization_id: &str, feedback_id: &str) -> Result<Option<Feedback>> {
    let conn = &mut pool.get()?;

    let result = feedback::table
        .filter(feedback::id.eq(feedback_id))
        .filter(feedback::organization_id.eq(organization_id))
        .select(Feedback::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

#[derive(AsChangeset)]
#[diesel(table_name = feedback)]
struct FeedbackChanges<'a> {
    title: Option<&'a str>,
    description: Option<&'a str>,
    status_id: Option<&'a str>,
    updated_at: NaiveDateTime,
}

/// Applies a partial update to a feedback post
///
/// ### Returns
///
/// The updated post, or `Ok(None)` if it is not in the organization
///
/// ### Errors
///
/// Returns `RepoError::NotFound` if the new status is not in the organization
#[instrument(skip(pool, update))]
pub fn update_feedback(pool: &DbPool, organization_id: &str, feedback_id: &str, update: &UpdateFeedbackDto) -> Result<Option<Feedback>> {
    let mut conn = pool.get()?;

    conn.transaction(|conn| {
        if let Some(status_id) = &update.status_id {
            let status_count: i64 = statuses::table
                .filter(statuses::id.eq(status_id))
                .filter(statuses::organization_id.eq(organization_id))
                .count()
                .get_result(conn)?;
            if status_count == 0 {
                return Err(RepoError::NotFound("status").into());
            }
        }

        let changes = FeedbackChanges {
            title: update.title.as_deref(),
            description: update.description.as_deref(),
            status_id: update.status_id.as_deref(),
            updated_at: Utc::now().naive_utc(),
        };

        let updated = diesel::update(
            feedback::table
                .filter(feedback::id.eq(feedback_id))
                .filter(feedback::organization_id.eq(organization_id)),
        )
        .set(&changes)
        .execute(conn)?;

        if updated == 0 {
            return Ok(None);
        }

        let result = feedback::table
            .find(feedback_id)
            .select(Feedback::as_select())
            .first(conn)?;

        Ok(Some(result))
    })
}

/// Deletes a feedback post with its comments, votes and tag links
#[instrument(skip(pool))]
pub fn delete_feedback(pool: &DbPool, organization_id: &str, feedback_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(
        feedback::table
            .filter(feedback::id.eq(feedback_id))
            .filter(feedback::organization_id.eq(organization_id)),
    )
    .execute(conn)?;

    Ok(deleted > 0)
}

/// Ids of posts carrying every one of the given tags
///
/// Duplicate tag ids in the request count once.
fn feedback_ids_with_all_tags(conn: &mut SqliteConnection, tag_ids: &[String]) -> QueryResult<Vec<String>> {
    let wanted: HashSet<&String> = tag_ids.iter().collect();

    let tagged: Vec<String> = feedback_tags::table
        .filter(feedback_tags::tag_id.eq_any(wanted.iter().copied()))
        .select(feedback_tags::feedback_id)
        .load(conn)?;

    let mut tag_counts: HashMap<String, usize> = HashMap::new();
    for feedback_id in tagged {
        *tag_counts.entry(feedback_id).or_insert(0) += 1;
    }

    Ok(tag_counts
        .into_iter()
        .filter(|(_, count)| *count == wanted.len())
        .map(|(feedback_id, _)| feedback_id)
        .collect())
}

fn filtered_feedback<'a>(
    organization_id: &'a str,
    query: &'a FeedbackQueryDto,
    tagged_ids: Option<&'a [String]>,
) -> feedback::BoxedQuery<'a, Sqlite> {
    let mut feedback_query = feedback::table
        .filter(feedback::organization_id.eq(organization_id))
        .into_boxed();

    if let Some(board_id) = &query.board_id {
        feedback_query = feedback_query.filter(feedback::board_id.eq(board_id));
    }

    if let Some(status_id) = &query.status_id {
        feedback_query = feedback_query.filter(feedback::status_id.eq(status_id));
    }

    if let Some(author_id) = &query.author_id {
        feedback_query = feedback_query.filter(feedback::author_id.eq(author_id));
    }

    if let Some(ids) = tagged_ids {
        feedback_query = feedback_query.filter(feedback::id.eq_any(ids));
    }

    feedback_query
}

/// Lists feedback in an organization with filters, sorting and pagination
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `organization_id` - The organization to list
/// * `query` - Filters, sort order and page. Every tag in `tag_ids` must be
///   present on a post for it to match.
///
/// ### Returns
///
/// One page of matching posts together with the total number of matches
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database query fails
#[instrument(skip(pool), fields(query = %query))]
pub fn list_feedback(pool: &DbPool, organization_id: &str, query: &FeedbackQueryDto) -> Result<FeedbackPage> {
    let conn = &mut pool.get()?;

    let pagination = query.pagination().normalize();

    let tagged_ids = if query.tag_ids.is_empty() {
        None
    } else {
        debug!("Filtering by tags: {:?}", query.tag_ids);
        Some(feedback_ids_with_all_tags(conn, &query.tag_ids)?)
    };
    let tagged_ids = tagged_ids.as_deref();

    let total: i64 = filtered_feedback(organization_id, query, tagged_ids)
        .count()
        .get_result(conn)?;

    let filtered = filtered_feedback(organization_id, query, tagged_ids);
    let ordered = match query.sort {
        FeedbackSort::Newest => filtered.order((feedback::created_at.desc(), feedback::id.desc())),
        FeedbackSort::Oldest => filtered.order((feedback::created_at.asc(), feedback::id.asc())),
        FeedbackSort::Top => filtered.order((
            feedback_vote_count().desc(),
            feedback::created_at.desc(),
            feedback::id.desc(),
        )),
    };

    let items: Vec<Feedback> = ordered
        .limit(pagination.limit())
        .offset(pagination.offset())
        .select(Feedback::as_select())
        .load(conn)?;
    let total = total as u64;

    info!("Retrieved {} of {} feedback posts matching filters", items.len(), total);

    Ok(FeedbackPage {
        items,
        page: pagination.page,
        per_page: pagination.per_page,
        total,
    })
}

/// Retrieves a post together with its vote count, comment count and tags
#[instrument(skip(pool))]
pub fn get_feedback_summary(pool: &DbPool, organization_id: &str, feedback_id: &str) -> Result<Option<FeedbackSummary>> {
    let Some(post) = get_feedback(pool, organization_id, feedback_id)? else {
        return Ok(None);
    };

    let vote_count = count_votes(pool, organization_id, &VoteTarget::Feedback(feedback_id.to_string()))?;
    let comment_count = count_comments(pool, organization_id, feedback_id)?;
    let tags = list_tags_for_feedback(pool, organization_id, feedback_id)?;

    Ok(Some(FeedbackSummary {
        feedback: post,
        vote_count,
        comment_count,
        tags,
    }))
}
