use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A board groups feedback posts, e.g. "Feature requests" or "Bugs"
///
/// Public boards are readable (and accept submissions) through the
/// `/public/{org_slug}` routes without organization membership.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::boards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Board {
    /// Unique identifier for the board (UUID v4 as string)
    id: String,

    /// The organization this board belongs to
    organization_id: String,

    /// Display name
    name: String,

    /// URL-safe handle, unique within the organization
    slug: String,

    /// Free-form description shown above the board
    description: String,

    /// Whether the board is visible on the public surface
    is_public: bool,

    /// When this board was created
    created_at: NaiveDateTime,

    /// When this board was last updated
    updated_at: NaiveDateTime,
}

impl Board {
    /// Creates a new board
    ///
    /// ### Arguments
    ///
    /// * `organization_id` - The owning organization
    /// * `name` - The display name
    /// * `slug` - The URL-safe handle, already validated
    /// * `description` - The board description
    /// * `is_public` - Whether the board is exposed publicly
    ///
    /// ### Returns
    ///
    /// A new `Board` with a fresh id and both timestamps set to now
    pub fn new(
        organization_id: String,
        name: String,
        slug: String,
        description: String,
        is_public: bool,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id,
            name,
            slug,
            description,
            is_public,
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

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_slug(&self) -> String {
        self.slug.clone()
    }

    pub fn get_description(&self) -> String {
        self.description.clone()
    }

    pub fn get_is_public(&self) -> bool {
        self.is_public
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}
