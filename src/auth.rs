//! Request identity, as forwarded by the authentication gateway
//!
//! Credentials are verified upstream. The gateway forwards the resolved
//! identity in plain headers, and this module turns those headers into
//! typed extractors plus the membership and role checks handlers run
//! before touching tenant data.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;

use crate::db::DbPool;
use crate::errors::ApiError;
use crate::models::{Board, Member, Role};
use crate::repo;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ANONYMOUS_ID_HEADER: &str = "x-anonymous-id";
pub const ORGANIZATION_ID_HEADER: &str = "x-organization-id";

/// Namespace of anonymous session ids once recorded as author or voter
///
/// User ids never carry it, so a session cannot pass for a user whose id
/// it happens to share.
pub const ANONYMOUS_ID_PREFIX: &str = "anon:";

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// The forwarded user id, refusing ids in the anonymous namespace
fn user_id_header(parts: &Parts) -> Result<Option<String>, ApiError> {
    match header_value(parts, USER_ID_HEADER) {
        Some(id) if id.starts_with(ANONYMOUS_ID_PREFIX) => {
            debug!("Rejected user id in the anonymous namespace: {}", id);
            Err(ApiError::Unauthorized)
        }
        other => Ok(other),
    }
}

/// Who is performing a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// A signed-in user
    User(String),
    /// A visitor identified only by an anonymous session id
    Anonymous(String),
}

impl Actor {
    /// The id recorded as author or voter
    ///
    /// Anonymous sessions are stored under `ANONYMOUS_ID_PREFIX`.
    pub fn id(&self) -> String {
        match self {
            Actor::User(id) => id.clone(),
            Actor::Anonymous(session) => format!("{}{}", ANONYMOUS_ID_PREFIX, session),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Actor::User(id) => Some(id),
            Actor::Anonymous(_) => None,
        }
    }

    fn from_parts(parts: &Parts) -> Result<Self, ApiError> {
        if let Some(user_id) = user_id_header(parts)? {
            return Ok(Actor::User(user_id));
        }
        header_value(parts, ANONYMOUS_ID_HEADER)
            .map(Actor::Anonymous)
            .ok_or(ApiError::Unauthorized)
    }
}

/// The acting user or anonymous session, without an organization
///
/// Used by the public routes, where the organization comes from the URL.
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Actor::from_parts(parts)
    }
}

/// A signed-in user, independent of any organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = user_id_header(parts)?.ok_or(ApiError::Unauthorized)?;
        Ok(Identity { user_id })
    }
}

/// The active organization together with the acting user or session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub organization_id: String,
    pub actor: Actor,
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let organization_id = header_value(parts, ORGANIZATION_ID_HEADER).ok_or(ApiError::Unauthorized)?;
        let actor = Actor::from_parts(parts)?;
        Ok(RequestContext { organization_id, actor })
    }
}

impl RequestContext {
    /// Requires a signed-in member of the active organization
    ///
    /// Anonymous sessions are rejected with 401, users outside the
    /// organization with 403.
    pub fn require_member(&self, pool: &DbPool) -> Result<Member, ApiError> {
        let user_id = self.actor.user_id().ok_or(ApiError::Unauthorized)?;

        repo::get_membership(pool, &self.organization_id, user_id)
            .map_err(ApiError::from_repo)?
            .ok_or_else(|| {
                debug!("User {} is not a member of {}", user_id, self.organization_id);
                ApiError::Forbidden("not a member of this organization".to_string())
            })
    }

    /// Requires a member holding at least `required`
    pub fn require_role(&self, pool: &DbPool, required: Role) -> Result<Member, ApiError> {
        let member = self.require_member(pool)?;

        if !member.get_role().satisfies(required) {
            return Err(ApiError::Forbidden(format!("{} role required", required)));
        }

        Ok(member)
    }

    /// Allows anyone on a public board, and only members elsewhere
    ///
    /// Used for reading and participating (commenting, voting) on a board's
    /// feedback.
    pub fn require_board_access(&self, pool: &DbPool, board: &Board) -> Result<(), ApiError> {
        if board.get_is_public() {
            return Ok(());
        }
        self.require_member(pool).map(|_| ())
    }

    /// Like `require_board_access`, starting from a post's board id
    ///
    /// A board that cannot be found is reported as 404.
    pub fn require_feedback_access(&self, pool: &DbPool, board_id: &str) -> Result<(), ApiError> {
        let board = repo::get_board(pool, &self.organization_id, board_id)
            .map_err(ApiError::from_repo)?
            .ok_or(ApiError::NotFound)?;
        self.require_board_access(pool, &board)
    }

    /// Whether the actor may edit content authored by `author_id`
    ///
    /// Authors may always edit their own content; admins may moderate. A
    /// session only matches content it recorded itself, never a user's.
    pub fn is_author_or(&self, pool: &DbPool, author_id: &str, moderator: Role) -> Result<bool, ApiError> {
        if self.actor.id() == author_id {
            return Ok(true);
        }

        let Some(user_id) = self.actor.user_id() else {
            return Ok(false);
        };

        let membership = repo::get_membership(pool, &self.organization_id, user_id).map_err(ApiError::from_repo)?;
        Ok(membership.is_some_and(|m| m.get_role().satisfies(moderator)))
    }
}
