use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A changelog entry announcing shipped work
///
/// Drafts have no `published_at`; only published entries appear on the
/// public changelog.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::changelog_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChangelogEntry {
    id: String,
    organization_id: String,
    title: String,
    body: String,
    published_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl ChangelogEntry {
    /// Creates a new unpublished entry
    pub fn new(organization_id: String, title: String, body: String) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id,
            title,
            body,
            published_at: None,
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

    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    pub fn get_body(&self) -> String {
        self.body.clone()
    }

    pub fn get_published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
            .map(|ts| DateTime::from_naive_utc_and_offset(ts, Utc))
    }

    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}
