use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named group of members inside an organization
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::teams)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Team {
    id: String,
    organization_id: String,
    name: String,
    created_at: NaiveDateTime,
}

impl Team {
    pub fn new(organization_id: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id,
            name,
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

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}

/// Association between a team and one of its users
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::team_members)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TeamMember {
    team_id: String,
    user_id: String,
    created_at: NaiveDateTime,
}

impl TeamMember {
    pub fn new(team_id: String, user_id: String) -> Self {
        Self {
            team_id,
            user_id,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_team_id(&self) -> String {
        self.team_id.clone()
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }
}
