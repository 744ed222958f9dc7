use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a tag in an organization
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Tag {
    /// Unique identifier for the tag (UUID v4 as string)
    id: String,

    /// The organization this tag belongs to
    organization_id: String,

    /// The name of the tag, unique within the organization
    name: String,

    /// Display color as a CSS hex string
    color: String,

    /// When this tag was created
    created_at: NaiveDateTime,
}

impl Tag {
    /// Creates a new tag
    ///
    /// ### Arguments
    ///
    /// * `organization_id` - The owning organization
    /// * `name` - The name of the tag
    /// * `color` - The display color
    ///
    /// ### Returns
    ///
    /// A new `Tag` instance with the specified name and color
    pub fn new(organization_id: String, name: String, color: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id,
            name,
            color,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// Gets the tag's ID
    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_organization_id(&self) -> String {
        self.organization_id.clone()
    }

    /// Gets the tag's name
    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_color(&self) -> String {
        self.color.clone()
    }

    /// Gets the tag's creation timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}

/// Represents an association between a feedback post and a tag
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::feedback_tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FeedbackTag {
    feedback_id: String,
    tag_id: String,
    created_at: NaiveDateTime,
}

impl FeedbackTag {
    pub fn new(feedback_id: String, tag_id: String) -> Self {
        Self {
            feedback_id,
            tag_id,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_feedback_id(&self) -> String {
        self.feedback_id.clone()
    }

    pub fn get_tag_id(&self) -> String {
        self.tag_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_new() {
        let tag = Tag::new("org".to_string(), "Important".to_string(), "#ff0000".to_string());

        assert_eq!(tag.get_name(), "Important");
        assert_eq!(tag.get_organization_id(), "org");
        assert!(Uuid::parse_str(&tag.get_id()).is_ok());

        // Ensure created_at is within the last second
        let diff = Utc::now().signed_duration_since(tag.get_created_at());
        assert!(diff.num_seconds() < 1);
    }
}
