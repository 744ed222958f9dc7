use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a vote is cast on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum VoteTarget {
    Feedback(String),
    Comment(String),
}

impl VoteTarget {
    pub fn id(&self) -> &str {
        match self {
            VoteTarget::Feedback(id) | VoteTarget::Comment(id) => id,
        }
    }
}

/// One upvote by one voter on either a feedback post or a comment
///
/// Exactly one of `feedback_id` / `comment_id` is set; the table enforces
/// this with a CHECK constraint and one vote per voter per target with
/// unique indexes.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::votes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Vote {
    id: String,
    organization_id: String,
    feedback_id: Option<String>,
    comment_id: Option<String>,
    voter_id: String,
    created_at: NaiveDateTime,
}

impl Vote {
    pub fn new(organization_id: String, target: VoteTarget, voter_id: String) -> Self {
        let (feedback_id, comment_id) = match target {
            VoteTarget::Feedback(id) => (Some(id), None),
            VoteTarget::Comment(id) => (None, Some(id)),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            organization_id,
            feedback_id,
            comment_id,
            voter_id,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_organization_id(&self) -> String {
        self.organization_id.clone()
    }

    /// Gets the voted-on target
    pub fn get_target(&self) -> Option<VoteTarget> {
        match (&self.feedback_id, &self.comment_id) {
            (Some(id), None) => Some(VoteTarget::Feedback(id.clone())),
            (None, Some(id)) => Some(VoteTarget::Comment(id.clone())),
            _ => None,
        }
    }

    pub fn get_voter_id(&self) -> String {
        self.voter_id.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
