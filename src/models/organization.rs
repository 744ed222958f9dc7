use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tenant: every board, feedback post, tag and status belongs to exactly one
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::organizations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Organization {
    /// Unique identifier for the organization (UUID v4 as string)
    id: String,

    /// Display name
    name: String,

    /// URL-safe handle used by the public board and widget routes
    slug: String,

    /// When this organization was created
    created_at: NaiveDateTime,
}

impl Organization {
    /// Creates a new organization
    ///
    /// ### Arguments
    ///
    /// * `name` - The display name
    /// * `slug` - The URL-safe handle, already validated
    pub fn new(name: String, slug: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            slug,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_slug(&self) -> String {
        self.slug.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
