/// Web API Handlers
///
/// This module contains the handlers for the RESTful API endpoints.
/// Each handler extracts the request context, checks that the caller may
/// perform the operation, calls the appropriate repository functions, and
/// returns a properly formatted response.

mod user_handlers;
mod organization_handlers;
mod team_handlers;
mod board_handlers;
mod status_handlers;
mod feedback_handlers;
mod tag_handlers;
mod comment_handlers;
mod vote_handlers;
mod changelog_handlers;
mod public_handlers;

// Re-export all handlers
pub use user_handlers::*;
pub use organization_handlers::*;
pub use team_handlers::*;
pub use board_handlers::*;
pub use status_handlers::*;
pub use feedback_handlers::*;
pub use tag_handlers::*;
pub use comment_handlers::*;
pub use vote_handlers::*;
pub use changelog_handlers::*;
pub use public_handlers::*;
