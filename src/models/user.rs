use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person who can sign in and belong to organizations
///
/// Credentials and sessions are owned by the external auth service; this row
/// only carries what the feedback data needs to display an author.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    id: String,
    email: String,
    name: String,
    created_at: NaiveDateTime,
}

impl User {
    /// Creates a new user with a fresh UUID v4 id
    pub fn new(email: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_email(&self) -> String {
        self.email.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
