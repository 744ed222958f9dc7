use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::Role;

/// A user's membership in an organization
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::members)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Member {
    organization_id: String,
    user_id: String,
    role: Role,
    created_at: NaiveDateTime,
}

impl Member {
    pub fn new(organization_id: String, user_id: String, role: Role) -> Self {
        Self {
            organization_id,
            user_id,
            role,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_organization_id(&self) -> String {
        self.organization_id.clone()
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    pub fn get_role(&self) -> Role {
        self.role
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
