/// Repository module
///
/// This module provides the data access layer for the application.
/// Each function maps to one query (or a short transaction) against the
/// database. Tenant-scoped functions take the `organization_id` and filter
/// on it, so a row that belongs to another organization behaves exactly
/// like a row that does not exist.

mod user_repo;
mod organization_repo;
mod team_repo;
mod board_repo;
mod status_repo;
mod feedback_repo;
mod tag_repo;
mod comment_repo;
mod vote_repo;
mod changelog_repo;

// Re-export all repository functions
pub use user_repo::*;
pub use organization_repo::*;
pub use team_repo::*;
pub use board_repo::*;
pub use status_repo::*;
pub use feedback_repo::*;
pub use tag_repo::*;
pub use comment_repo::*;
pub use vote_repo::*;
pub use changelog_repo::*;

use thiserror::Error;

/// Domain rule violations detected by the repository layer
///
/// These travel inside `anyhow::Error` and are recovered by the API layer
/// with `downcast_ref`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("an organization must keep at least one owner")]
    LastOwner,
    #[error("user is not a member of this organization")]
    NotAMember,
    #[error("parent comment belongs to a different feedback post")]
    ParentMismatch,
    #[error("no position left after the last status")]
    PositionOverflow,
    #[error("mark another status as default instead")]
    DefaultRequired,
}
