use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A comment on a feedback post
///
/// Comments with no `parent_id` are top-level; replies point at the comment
/// they answer, which always belongs to the same feedback post.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::comments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Comment {
    id: String,
    organization_id: String,
    feedback_id: String,
    parent_id: Option<String>,
    author_id: String,
    body: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Comment {
    pub fn new(
        organization_id: String,
        feedback_id: String,
        parent_id: Option<String>,
        author_id: String,
        body: String,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id,
            feedback_id,
            parent_id,
            author_id,
            body,
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

    pub fn get_feedback_id(&self) -> String {
        self.feedback_id.clone()
    }

    pub fn get_parent_id(&self) -> Option<String> {
        self.parent_id.clone()
    }

    pub fn get_author_id(&self) -> String {
        self.author_id.clone()
    }

    pub fn get_body(&self) -> String {
        self.body.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}
