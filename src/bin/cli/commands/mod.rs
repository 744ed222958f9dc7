pub mod board;
pub mod changelog;
pub mod comment;
pub mod feedback;
pub mod member;
pub mod org;
pub mod status;
pub mod tag;
pub mod team;
pub mod user;
pub mod vote;

/// Result type shared by all command executors
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;
