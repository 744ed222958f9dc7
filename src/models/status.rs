use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A workflow column for feedback, such as "Planned" or "Done"
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::statuses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Status {
    id: String,
    organization_id: String,
    name: String,

    /// Display color as a CSS hex string
    color: String,

    /// Sort key; statuses are listed in ascending position
    position: i32,

    /// New feedback starts in the organization's default status
    is_default: bool,

    created_at: NaiveDateTime,
}

/// Statuses every new organization starts with: (name, color, is_default)
pub const DEFAULT_STATUSES: [(&str, &str, bool); 5] = [
    ("Open", "#6b7280", true),
    ("Planned", "#3b82f6", false),
    ("In Progress", "#f59e0b", false),
    ("Done", "#10b981", false),
    ("Closed", "#ef4444", false),
];

impl Status {
    pub fn new(
        organization_id: String,
        name: String,
        color: String,
        position: i32,
        is_default: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id,
            name,
            color,
            position,
            is_default,
            created_at: Utc::now().naive_utc(),
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

    pub fn get_color(&self) -> String {
        self.color.clone()
    }

    pub fn get_position(&self) -> i32 {
        self.position
    }

    pub fn get_is_default(&self) -> bool {
        self.is_default
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
