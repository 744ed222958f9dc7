//! Feedboard: a multi-tenant feedback board backend
//!
//! Organizations collect feedback posts on boards, triage them with
//! statuses and tags, discuss them in comment threads, and announce what
//! shipped in a changelog. Every row belongs to exactly one organization,
//! and every query is scoped to the organization of the request.
//!
//! ### Modules
//!
//! - `auth`: Identity extractors and membership checks
//! - `config`: Layered configuration (defaults, config file, env, flags)
//! - `db`: Database connection management and migrations
//! - `dto`: Request and response bodies
//! - `errors`: API error type and its HTTP mapping
//! - `handlers`: HTTP handlers
//! - `logging`: Tracing subscriber setup
//! - `models`: Data structures stored in the database
//! - `pagination`: Page arithmetic for listings
//! - `repo`: Repository layer for database operations
//! - `schema`: Database schema definitions
//!
//! ### Web API
//!
//! Tenant routes read the active organization from the `x-organization-id`
//! header and the caller from `x-user-id` or `x-anonymous-id`. Routes under
//! `/public/{org_slug}` carry the organization in the URL instead.

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod repo;
pub mod schema;

#[cfg(test)]
pub mod test_utils;

pub use db::{run_migrations, setup_database};

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{warn, Level};

use handlers::*;

/// Creates the application router
///
/// This function sets up the Axum router with all the API endpoints and a
/// CORS layer that accepts any origin.
///
/// ### Arguments
///
/// * `pool` - The database connection pool to be shared with all handlers
///
/// ### Returns
///
/// An Axum Router configured with all routes and the database pool as state
pub fn create_app(pool: Arc<db::DbPool>) -> Router {
    create_app_with_origins(pool, &[])
}

/// Creates the application router, restricting CORS to `origins`
///
/// An empty list allows any origin.
pub fn create_app_with_origins(pool: Arc<db::DbPool>, origins: &[String]) -> Router {
    Router::new()
        // Users and the organizations they belong to
        .route("/users", post(create_user_handler).get(list_users_handler))
        .route("/users/{id}", get(get_user_handler))
        .route("/me/organizations", get(list_my_organizations_handler))
        .route("/organizations", post(create_organization_handler))
        .route("/organizations/{id}", get(get_organization_handler))
        // Membership in the active organization
        .route("/members", get(list_members_handler).post(add_member_handler))
        .route("/members/{user_id}", patch(update_member_role_handler).delete(remove_member_handler))
        .route("/teams", get(list_teams_handler).post(create_team_handler))
        .route("/teams/{id}", get(get_team_handler).delete(delete_team_handler))
        .route("/teams/{id}/members", get(list_team_members_handler))
        .route("/teams/{id}/members/{user_id}", post(add_team_member_handler).delete(remove_team_member_handler))
        // Boards and their workflow
        .route("/boards", get(list_boards_handler).post(create_board_handler))
        .route("/boards/{id}", get(get_board_handler).patch(update_board_handler).delete(delete_board_handler))
        .route("/statuses", get(list_statuses_handler).post(create_status_handler))
        .route("/statuses/{id}", patch(update_status_handler).delete(delete_status_handler))
        // Feedback posts
        .route("/feedback", get(list_feedback_handler).post(create_feedback_handler))
        .route("/feedback/{id}", get(get_feedback_handler).patch(update_feedback_handler).delete(delete_feedback_handler))
        .route("/feedback/{id}/summary", get(get_feedback_summary_handler))
        .route("/feedback/{id}/tags", get(list_tags_for_feedback_handler))
        .route("/feedback/{id}/tags/{tag_id}", post(add_tag_to_feedback_handler).delete(remove_tag_from_feedback_handler))
        .route("/feedback/{id}/comments", get(list_comments_handler).post(create_comment_handler))
        .route("/feedback/{id}/votes", get(get_feedback_votes_handler).post(vote_feedback_handler).delete(unvote_feedback_handler))
        .route("/tags", get(list_tags_handler).post(create_tag_handler))
        .route("/tags/{id}", get(get_tag_handler).delete(delete_tag_handler))
        // Comment threads
        .route("/comments/{id}", patch(update_comment_handler).delete(delete_comment_handler))
        .route("/comments/{id}/replies", get(list_replies_handler))
        .route("/comments/{id}/votes", get(get_comment_votes_handler).post(vote_comment_handler).delete(unvote_comment_handler))
        // Changelog
        .route("/changelog", get(list_changelog_handler).post(create_changelog_handler))
        .route("/changelog/{id}", get(get_changelog_handler).patch(update_changelog_handler).delete(delete_changelog_handler))
        .route("/changelog/{id}/publish", post(publish_changelog_handler))
        .route("/changelog/{id}/unpublish", post(unpublish_changelog_handler))
        // Public board and widget
        .route("/public/{org_slug}/boards", get(list_public_boards_handler))
        .route(
            "/public/{org_slug}/boards/{board_slug}/feedback",
            get(list_public_feedback_handler).post(submit_public_feedback_handler),
        )
        .route("/public/{org_slug}/changelog", get(list_public_changelog_handler))
        // Add the database pool to the application state
        .with_state(pool)
        .layer(cors_layer(origins))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Builds the CORS layer for the browser front ends
///
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(auth::USER_ID_HEADER),
            HeaderName::from_static(auth::ANONYMOUS_ID_HEADER),
            HeaderName::from_static(auth::ORGANIZATION_ID_HEADER),
        ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = create_app(test_utils::setup_test_db());

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_identity_is_401() {
        let app = create_app(test_utils::setup_test_db());

        let response = app
            .oneshot(Request::builder().uri("/boards").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin_only() {
        let origins = vec!["https://app.example.com".to_string(), "not a\norigin".to_string()];
        let app = create_app_with_origins(test_utils::setup_test_db(), &origins);

        let preflight = |origin: &'static str| {
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/public/acme/boards")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap()
        };

        let allowed = app.clone().oneshot(preflight("https://app.example.com")).await.unwrap();
        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://app.example.com"
        );

        let denied = app.oneshot(preflight("https://evil.example.com")).await.unwrap();
        assert!(denied.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
