use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Feedback, Role, Tag};
use crate::pagination::Pagination;

/// Longest accepted slug
pub const MAX_SLUG_LEN: usize = 64;

/// Longest accepted name or title
pub const MAX_NAME_LEN: usize = 200;

/// Checks that a slug is 1..=64 characters of `[a-z0-9-]`
///
/// Slugs appear in public URLs, so they may not start or end with a dash.
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("slug must not be empty".to_string());
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(format!("slug must be at most {} characters", MAX_SLUG_LEN));
    }
    if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err("slug may only contain lowercase letters, digits and dashes".to_string());
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err("slug must not start or end with a dash".to_string());
    }
    Ok(())
}

/// Checks that a display name or title is non-blank and not too long
pub fn validate_name(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(format!("{} must be at most {} characters", field, MAX_NAME_LEN));
    }
    Ok(())
}

/// Checks that a color is a `#rgb` or `#rrggbb` hex string
pub fn validate_color(color: &str) -> Result<(), String> {
    let hex = color
        .strip_prefix('#')
        .ok_or_else(|| format!("color must start with '#': {}", color))?;
    if !(hex.len() == 3 || hex.len() == 6) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("color must be #rgb or #rrggbb: {}", color));
    }
    Ok(())
}

fn default_color() -> String {
    "#6b7280".to_string()
}

/// Data transfer object for registering a user
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateUserDto {
    pub email: String,
    pub name: String,
}

/// Data transfer object for creating an organization
///
/// The calling user becomes its owner.
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateOrganizationDto {
    pub name: String,
    pub slug: String,
}

/// Data transfer object for adding a user to the active organization
#[derive(Serialize, Deserialize, Debug)]
pub struct AddMemberDto {
    pub user_id: String,

    /// Defaults to `member`
    #[serde(default)]
    pub role: Role,
}

/// Data transfer object for changing a member's role
#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateMemberRoleDto {
    pub role: Role,
}

/// Data transfer object for creating a team
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateTeamDto {
    pub name: String,
}

/// Data transfer object for creating a new board
///
/// This struct is used to deserialize JSON requests for creating boards.
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateBoardDto {
    /// The display name of the board
    pub name: String,

    /// The URL-safe handle of the board
    pub slug: String,

    /// Optional description, empty when omitted
    #[serde(default)]
    pub description: String,

    /// Whether the board is exposed on the public surface
    #[serde(default)]
    pub is_public: bool,
}

/// Data transfer object for updating a board; omitted fields are unchanged
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct UpdateBoardDto {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

/// Data transfer object for creating a status
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateStatusDto {
    pub name: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Sort position; appended after the last status when omitted
    #[serde(default)]
    pub position: Option<i32>,

    #[serde(default)]
    pub is_default: bool,
}

/// Data transfer object for updating a status; omitted fields are unchanged
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct UpdateStatusDto {
    pub name: Option<String>,
    pub color: Option<String>,
    pub position: Option<i32>,
    pub is_default: Option<bool>,
}

impl UpdateStatusDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.position.is_none() && self.is_default.is_none()
    }
}

/// Data transfer object for creating a new feedback post
///
/// This struct is used to deserialize JSON requests for creating feedback.
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateFeedbackDto {
    /// The board to submit to
    pub board_id: String,

    /// Short summary of the request
    pub title: String,

    /// Longer description, empty when omitted
    #[serde(default)]
    pub description: String,
}

/// Data transfer object for widget and public board submissions
///
/// The board comes from the URL, so only the content is in the body.
#[derive(Serialize, Deserialize, Debug)]
pub struct SubmitFeedbackDto {
    pub title: String,

    #[serde(default)]
    pub description: String,
}

/// Data transfer object for updating a feedback post; omitted fields are unchanged
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct UpdateFeedbackDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status_id: Option<String>,
}

/// Ordering of feedback listings
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackSort {
    /// Most recently created first
    #[default]
    Newest,
    /// Oldest first
    Oldest,
    /// Most votes first, ties broken by newest
    Top,
}

impl fmt::Display for FeedbackSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeedbackSort::Newest => "newest",
            FeedbackSort::Oldest => "oldest",
            FeedbackSort::Top => "top",
        };
        f.write_str(s)
    }
}

/// Data transfer object for filtering feedback listings
///
/// Deserialized from the query string; `tag_ids` may be repeated and every
/// listed tag must be present on a post for it to match.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FeedbackQueryDto {
    /// Only posts on this board
    pub board_id: Option<String>,

    /// Only posts in this status
    pub status_id: Option<String>,

    /// Only posts by this author
    pub author_id: Option<String>,

    /// Only posts carrying all of these tags
    pub tag_ids: Vec<String>,

    /// Result ordering
    pub sort: FeedbackSort,

    /// 1-based page index
    pub page: Option<u32>,

    /// Page size, clamped to 1..=100
    pub per_page: Option<u32>,
}

impl FeedbackQueryDto {
    /// The normalized pagination requested by this query
    pub fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

impl fmt::Display for FeedbackQueryDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "board_id: {:?}, status_id: {:?}, author_id: {:?}, tag_ids: {:?}, sort: {}, page: {:?}, per_page: {:?}",
            self.board_id, self.status_id, self.author_id, self.tag_ids, self.sort, self.page, self.per_page
        )
    }
}

/// Builder for `FeedbackQueryDto`, used by the CLI and tests
#[derive(Debug, Default)]
pub struct FeedbackQueryDtoBuilder {
    query: FeedbackQueryDto,
}

impl FeedbackQueryDtoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board_id(mut self, board_id: impl Into<String>) -> Self {
        self.query.board_id = Some(board_id.into());
        self
    }

    pub fn status_id(mut self, status_id: impl Into<String>) -> Self {
        self.query.status_id = Some(status_id.into());
        self
    }

    pub fn author_id(mut self, author_id: impl Into<String>) -> Self {
        self.query.author_id = Some(author_id.into());
        self
    }

    pub fn tag_ids(mut self, tag_ids: Vec<String>) -> Self {
        self.query.tag_ids = tag_ids;
        self
    }

    pub fn sort(mut self, sort: FeedbackSort) -> Self {
        self.query.sort = sort;
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.query.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.query.per_page = Some(per_page);
        self
    }

    pub fn build(self) -> FeedbackQueryDto {
        self.query
    }
}

/// One page of a feedback listing
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FeedbackPage {
    pub items: Vec<Feedback>,
    pub page: u32,
    pub per_page: u32,

    /// Number of posts matching the filters across all pages
    pub total: u64,
}

/// A feedback post with its counters and tags, as shown on a detail view
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FeedbackSummary {
    pub feedback: Feedback,
    pub vote_count: i64,
    pub comment_count: i64,
    pub tags: Vec<Tag>,
}

/// Data transfer object for creating a new tag
///
/// This struct is used to deserialize JSON requests for creating tags.
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateTagDto {
    /// The name of the tag
    pub name: String,

    /// The display color of the tag
    #[serde(default = "default_color")]
    pub color: String,
}

/// Data transfer object for posting a comment or a reply
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateCommentDto {
    pub body: String,

    /// The comment being replied to, if any
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Data transfer object for editing a comment
#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateCommentDto {
    pub body: String,
}

/// Vote tally for a target, from the caller's point of view
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VoteSummary {
    pub count: i64,
    pub has_voted: bool,
}

/// Data transfer object for drafting a changelog entry
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateChangelogDto {
    pub title: String,

    #[serde(default)]
    pub body: String,
}

/// Data transfer object for editing a changelog entry; omitted fields are unchanged
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct UpdateChangelogDto {
    pub title: Option<String>,
    pub body: Option<String>,
}
