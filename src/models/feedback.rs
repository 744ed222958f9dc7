use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A feedback post (issue, idea or bug report) submitted to a board
///
/// This struct maps directly to the `feedback` table. The author is either a
/// user id or an anonymous session id, so `author_id` is not a foreign key.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::feedback)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Feedback {
    /// Unique identifier for the post (UUID v4 as string)
    id: String,

    /// The organization this post belongs to
    organization_id: String,

    /// The board this post was submitted to
    board_id: String,

    /// Current workflow status, if any
    status_id: Option<String>,

    /// The user or anonymous session that submitted the post
    author_id: String,

    /// Short summary
    title: String,

    /// Longer body text
    description: String,

    /// When this post was created
    created_at: NaiveDateTime,

    /// When this post was last updated
    updated_at: NaiveDateTime,
}

impl Feedback {
    /// Creates a new feedback post
    ///
    /// ### Arguments
    ///
    /// * `organization_id` - The owning organization
    /// * `board_id` - The board the post is submitted to
    /// * `status_id` - The initial status, usually the organization default
    /// * `author_id` - The submitting user or anonymous session
    /// * `title` - The post title
    /// * `description` - The post body
    ///
    /// ### Returns
    ///
    /// A new `Feedback` with a fresh id and both timestamps set to now
    pub fn new(
        organization_id: String,
        board_id: String,
        status_id: Option<String>,
        author_id: String,
        title: String,
        description: String,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id,
            board_id,
            status_id,
            author_id,
            title,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_organization_id(&self) -> String {
        self.organization_id.clone()
    }

    pub fn get_board_id(&self) -> String {
        self.board_id.clone()
    }

    pub fn get_status_id(&self) -> Option<String> {
        self.status_id.clone()
    }

    pub fn get_author_id(&self) -> String {
        self.author_id.clone()
    }

    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    pub fn get_description(&self) -> String {
        self.description.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}
