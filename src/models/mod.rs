/// Data models module
///
/// This module defines the core data structures used throughout the application.
/// Each model maps to one database table; tenant-scoped models carry the
/// `organization_id` every query filters on.

mod role;
pub use role::Role;

mod user;
pub use user::User;

mod organization;
pub use organization::Organization;

mod member;
pub use member::Member;

mod team;
pub use team::{Team, TeamMember};

mod board;
pub use board::Board;

mod status;
pub use status::{Status, DEFAULT_STATUSES};

mod feedback;
pub use feedback::Feedback;

mod tag;
pub use tag::{FeedbackTag, Tag};

mod comment;
pub use comment::Comment;

mod vote;
pub use vote::{Vote, VoteTarget};

mod changelog;
pub use changelog::ChangelogEntry;
