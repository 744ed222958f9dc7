use crate::db::DbPool;
use crate::models::{Vote, VoteTarget};
use crate::schema::{comments, feedback, votes};
use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::sqlite::Sqlite;
use anyhow::Result;
use tracing::{instrument, debug, info};

use super::RepoError;

fn votes_on<'a>(organization_id: &'a str, target: &'a VoteTarget) -> votes::BoxedQuery<'a, Sqlite> {
    let query = votes::table
        .filter(votes::organization_id.eq(organization_id))
        .into_boxed();

    match target {
        VoteTarget::Feedback(id) => query.filter(votes::feedback_id.eq(id.as_str())),
        VoteTarget::Comment(id) => query.filter(votes::comment_id.eq(id.as_str())),
    }
}

/// Vote count of the `feedback` row in the enclosing query
///
/// A correlated subselect, usable in `order` and `select` of queries on
/// the feedback table.
pub(crate) fn feedback_vote_count() -> SqlLiteral<BigInt> {
    sql::<BigInt>("(SELECT COUNT(*) FROM votes WHERE votes.feedback_id = feedback.id)")
}

/// Casts a vote on a feedback post or a comment
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `organization_id` - The owning organization
/// * `target` - The post or comment being voted on
/// * `voter_id` - A user id or anonymous session id
///
/// ### Errors
///
/// Returns an error if:
/// - The target is not in the organization (`RepoError::NotFound`)
/// - The voter already voted on this target (unique violation)
#[instrument(skip(pool))]
pub fn create_vote(pool: &DbPool, organization_id: &str, target: &VoteTarget, voter_id: &str) -> Result<Vote> {
    let mut conn = pool.get()?;

    conn.transaction(|conn| {
        let target_count: i64 = match target {
            VoteTarget::Feedback(id) => feedback::table
                .filter(feedback::id.eq(id))
                .filter(feedback::organization_id.eq(organization_id))
                .count()
                .get_result(conn)?,
            VoteTarget::Comment(id) => comments::table
                .filter(comments::id.eq(id))
                .filter(comments::organization_id.eq(organization_id))
                .count()
                .get_result(conn)?,
        };
        if target_count == 0 {
            let kind = match target {
                VoteTarget::Feedback(_) => "feedback",
                VoteTarget::Comment(_) => "comment",
            };
            return Err(RepoError::NotFound(kind).into());
        }

        let vote = Vote::new(organization_id.to_string(), target.clone(), voter_id.to_string());
        diesel::insert_into(votes::table)
            .values(&vote)
            .execute(conn)?;

        info!("Recorded vote {} on {}", vote.get_id(), target.id());

        Ok(vote)
    })
}

/// Withdraws a voter's vote, returning whether there was one
#[instrument(skip(pool))]
pub fn delete_vote(pool: &DbPool, organization_id: &str, target: &VoteTarget, voter_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let vote_id: Option<String> = votes_on(organization_id, target)
        .filter(votes::voter_id.eq(voter_id))
        .select(votes::id)
        .first(conn)
        .optional()?;

    let Some(vote_id) = vote_id else {
        debug!("No vote to withdraw");
        return Ok(false);
    };

    let deleted = diesel::delete(votes::table.find(&vote_id)).execute(conn)?;

    Ok(deleted > 0)
}

/// Counts the votes on a post or comment
#[instrument(skip(pool))]
pub fn count_votes(pool: &DbPool, organization_id: &str, target: &VoteTarget) -> Result<i64> {
    let conn = &mut pool.get()?;

    let count = votes_on(organization_id, target)
        .count()
        .get_result(conn)?;

    Ok(count)
}

/// Whether the voter has a vote on the target
#[instrument(skip(pool))]
pub fn has_voted(pool: &DbPool, organization_id: &str, target: &VoteTarget, voter_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let count: i64 = votes_on(organization_id, target)
        .filter(votes::voter_id.eq(voter_id))
        .count()
        .get_result(conn)?;

    Ok(count > 0)
}
