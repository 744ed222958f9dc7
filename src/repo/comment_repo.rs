use crate::db::DbPool;
use crate::models::Comment;
use crate::schema::{comments, feedback};
use chrono::Utc;
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

use super::RepoError;

/// Posts a comment on a feedback post, or a reply to another comment
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `organization_id` - The owning organization
/// * `feedback_id` - The post being discussed
/// * `parent_id` - The comment being replied to, if any
/// * `author_id` - A user id or anonymous session id
/// * `body` - The comment text
///
/// ### Errors
///
/// Returns an error if:
/// - The post or the parent is not in the organization (`RepoError::NotFound`)
/// - The parent belongs to a different post (`RepoError::ParentMismatch`)
#[instrument(skip(pool, body))]
pub fn create_comment(
    pool: &DbPool,
    organization_id: &str,
    feedback_id: &str,
    parent_id: Option<&str>,
    author_id: &str,
    body: String,
) -> Result<Comment> {
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

        if let Some(parent_id) = parent_id {
            let parent_feedback: Option<String> = comments::table
                .filter(comments::id.eq(parent_id))
                .filter(comments::organization_id.eq(organization_id))
                .select(comments::feedback_id)
                .first(conn)
                .optional()?;

            match parent_feedback {
                None => return Err(RepoError::NotFound("comment").into()),
                Some(parent_feedback) if parent_feedback != feedback_id => {
                    return Err(RepoError::ParentMismatch.into());
                }
                Some(_) => {}
            }
        }

        let new_comment = Comment::new(
            organization_id.to_string(),
            feedback_id.to_string(),
            parent_id.map(str::to_string),
            author_id.to_string(),
            body,
        );

        diesel::insert_into(comments::table)
            .values(&new_comment)
            .execute(conn)?;

        info!("Created comment with id: {}", new_comment.get_id());

        Ok(new_comment)
    })
}

/// Retrieves a comment by id within an organization
#[instrument(skip(pool))]
pub fn get_comment(pool: &DbPool, organization_id: &str, comment_id: &str) -> Result<Option<Comment>> {
    let conn = &mut pool.get()?;

    let result = comments::table
        .filter(comments::id.eq(comment_id))
        .filter(comments::organization_id.eq(organization_id))
        .select(Comment::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Lists the top-level comments of a post, oldest first
#[instrument(skip(pool))]
pub fn list_comments(pool: &DbPool, organization_id: &str, feedback_id: &str) -> Result<Vec<Comment>> {
    let conn = &mut pool.get()?;

    let result = comments::table
        .filter(comments::feedback_id.eq(feedback_id))
        .filter(comments::organization_id.eq(organization_id))
        .filter(comments::parent_id.is_null())
        .order((comments::created_at.asc(), comments::id.asc()))
        .select(Comment::as_select())
        .load(conn)?;

    debug!("Found {} top-level comments", result.len());

    Ok(result)
}

/// Lists the direct replies to a comment, oldest first
#[instrument(skip(pool))]
pub fn list_replies(pool: &DbPool, organization_id: &str, comment_id: &str) -> Result<Vec<Comment>> {
    let conn = &mut pool.get()?;

    let result = comments::table
        .filter(comments::parent_id.eq(comment_id))
        .filter(comments::organization_id.eq(organization_id))
        .order((comments::created_at.asc(), comments::id.asc()))
        .select(Comment::as_select())
        .load(conn)?;

    Ok(result)
}

/// Counts every comment on a post, replies included
#[instrument(skip(pool))]
pub fn count_comments(pool: &DbPool, organization_id: &str, feedback_id: &str) -> Result<i64> {
    let conn = &mut pool.get()?;

    let count = comments::table
        .filter(comments::feedback_id.eq(feedback_id))
        .filter(comments::organization_id.eq(organization_id))
        .count()
        .get_result(conn)?;

    Ok(count)
}

/// Replaces the body of a comment
///
/// Authorship is checked by the caller. Returns `Ok(None)` if the comment is
/// not in the organization.
#[instrument(skip(pool, body))]
pub fn update_comment(pool: &DbPool, organization_id: &str, comment_id: &str, body: String) -> Result<Option<Comment>> {
    let conn = &mut pool.get()?;

    let updated = diesel::update(
        comments::table
            .filter(comments::id.eq(comment_id))
            .filter(comments::organization_id.eq(organization_id)),
    )
    .set((comments::body.eq(body), comments::updated_at.eq(Utc::now().naive_utc())))
    .execute(conn)?;

    if updated == 0 {
        return Ok(None);
    }

    let result = comments::table
        .find(comment_id)
        .select(Comment::as_select())
        .first(conn)?;

    Ok(Some(result))
}

/// Deletes a comment and, through the parent foreign key, all its replies
#[instrument(skip(pool))]
pub fn delete_comment(pool: &DbPool, organization_id: &str, comment_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(
        comments::table
            .filter(comments::id.eq(comment_id))
            .filter(comments::organization_id.eq(organization_id)),
    )
    .execute(conn)?;

    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seed_organization, setup_fixture};

    #[test]
    fn test_create_and_list_comments() {
        let fx = setup_fixture();
        let board = fx.board("ideas", false);
        let post = fx.feedback(&board, "Dark mode");

        let first = create_comment(&fx.pool, &fx.org_id(), &post.get_id(), None, &fx.owner.get_id(), "First".to_string()).unwrap();
        let second = create_comment(&fx.pool, &fx.org_id(), &post.get_id(), None, "anon-1", "Second".to_string()).unwrap();
        create_comment(&fx.pool, &fx.org_id(), &post.get_id(), Some(&first.get_id()), "anon-2", "Reply".to_string()).unwrap();

        let listed = list_comments(&fx.pool, &fx.org_id(), &post.get_id()).unwrap();
        assert_eq!(listed, vec![first, second]);
        assert_eq!(count_comments(&fx.pool, &fx.org_id(), &post.get_id()).unwrap(), 3);
    }

    #[test]
    fn test_list_replies() {
        let fx = setup_fixture();
        let board = fx.board("ideas", false);
        let post = fx.feedback(&board, "Dark mode");
        let parent = create_comment(&fx.pool, &fx.org_id(), &post.get_id(), None, "a", "Parent".to_string()).unwrap();
        let reply = create_comment(&fx.pool, &fx.org_id(), &post.get_id(), Some(&parent.get_id()), "b", "Reply".to_string()).unwrap();

        let replies = list_replies(&fx.pool, &fx.org_id(), &parent.get_id()).unwrap();

        assert_eq!(replies, vec![reply.clone()]);
        assert_eq!(reply.get_parent_id(), Some(parent.get_id()));
    }

    #[test]
    fn test_reply_parent_must_be_on_same_feedback() {
        let fx = setup_fixture();
        let board = fx.board("ideas", false);
        let post_a = fx.feedback(&board, "A");
        let post_b = fx.feedback(&board, "B");
        let on_a = create_comment(&fx.pool, &fx.org_id(), &post_a.get_id(), None, "a", "On A".to_string()).unwrap();

        let err = create_comment(&fx.pool, &fx.org_id(), &post_b.get_id(), Some(&on_a.get_id()), "b", "Wrong".to_string()).unwrap_err();
        assert_eq!(err.downcast_ref::<RepoError>(), Some(&RepoError::ParentMismatch));

        let err = create_comment(&fx.pool, &fx.org_id(), &post_b.get_id(), Some("missing"), "b", "Wrong".to_string()).unwrap_err();
        assert_eq!(err.downcast_ref::<RepoError>(), Some(&RepoError::NotFound("comment")));
    }

    #[test]
    fn test_comment_on_foreign_feedback_fails() {
        let fx = setup_fixture();
        let (other, _) = seed_organization(&fx.pool, "globex");
        let board = fx.board("ideas", false);
        let post = fx.feedback(&board, "Dark mode");

        let err = create_comment(&fx.pool, &other.get_id(), &post.get_id(), None, "a", "Hi".to_string()).unwrap_err();
        assert_eq!(err.downcast_ref::<RepoError>(), Some(&RepoError::NotFound("feedback")));
    }

    #[test]
    fn test_update_comment() {
        let fx = setup_fixture();
        let board = fx.board("ideas", false);
        let post = fx.feedback(&board, "Dark mode");
        let comment = create_comment(&fx.pool, &fx.org_id(), &post.get_id(), None, "a", "Typo".to_string()).unwrap();

        let updated = update_comment(&fx.pool, &fx.org_id(), &comment.get_id(), "Fixed".to_string()).unwrap().unwrap();

        assert_eq!(updated.get_body(), "Fixed");
        assert_eq!(updated.get_created_at(), comment.get_created_at());
        assert!(update_comment(&fx.pool, &fx.org_id(), "missing", "x".to_string()).unwrap().is_none());
    }

    #[test]
    fn test_delete_comment_cascades_replies() {
        let fx = setup_fixture();
        let board = fx.board("ideas", false);
        let post = fx.feedback(&board, "Dark mode");
        let parent = create_comment(&fx.pool, &fx.org_id(), &post.get_id(), None, "a", "Parent".to_string()).unwrap();
        let reply = create_comment(&fx.pool, &fx.org_id(), &post.get_id(), Some(&parent.get_id()), "b", "Reply".to_string()).unwrap();

        assert!(delete_comment(&fx.pool, &fx.org_id(), &parent.get_id()).unwrap());

        assert!(get_comment(&fx.pool, &fx.org_id(), &reply.get_id()).unwrap().is_none());
        assert_eq!(count_comments(&fx.pool, &fx.org_id(), &post.get_id()).unwrap(), 0);
    }

    #[test]
    fn test_comment_is_isolated_by_organization() {
        let fx = setup_fixture();
        let (other, _) = seed_organization(&fx.pool, "globex");
        let board = fx.board("ideas", false);
        let post = fx.feedback(&board, "Dark mode");
        let comment = create_comment(&fx.pool, &fx.org_id(), &post.get_id(), None, "a", "Hi".to_string()).unwrap();

        assert!(get_comment(&fx.pool, &other.get_id(), &comment.get_id()).unwrap().is_none());
        assert!(list_comments(&fx.pool, &other.get_id(), &post.get_id()).unwrap().is_empty());
        assert!(!delete_comment(&fx.pool, &other.get_id(), &comment.get_id()).unwrap());
    }
}
