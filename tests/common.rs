//! Common test utilities for Feedboard integration tests
//!
//! Shared setup for every integration test: a fresh application backed by
//! its own in-memory database, a request helper that sets the identity
//! headers, and helpers that seed users, organizations, boards and posts
//! through the API.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use feedboard::{
    auth::{ANONYMOUS_ID_HEADER, ORGANIZATION_ID_HEADER, USER_ID_HEADER},
    create_app,
    models::{Board, Feedback, Organization, User},
    setup_database,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Creates a test application with an in-memory SQLite database
///
/// Each call gets a uniquely named shared-cache database, so every pooled
/// connection sees the migrated schema while tests stay isolated.
pub fn create_test_app() -> Router {
    let database_url = format!("file:it_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = setup_database(&database_url).expect("Failed to set up test database");
    create_app(Arc::new(pool))
}

/// The identity headers sent with a request
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub user_id: Option<String>,
    pub anonymous_id: Option<String>,
    pub organization_id: Option<String>,
}

impl Caller {
    /// No identity headers at all
    pub fn nobody() -> Self {
        Self::default()
    }

    /// A signed-in user without an active organization
    pub fn identity(user: &User) -> Self {
        Self { user_id: Some(user.get_id()), ..Self::default() }
    }

    /// A signed-in user acting in `org`
    pub fn member(user: &User, org: &Organization) -> Self {
        Self {
            user_id: Some(user.get_id()),
            organization_id: Some(org.get_id()),
            ..Self::default()
        }
    }

    /// An anonymous session acting in `org`
    pub fn anonymous(session: &str, org: &Organization) -> Self {
        Self {
            anonymous_id: Some(session.to_string()),
            organization_id: Some(org.get_id()),
            ..Self::default()
        }
    }
}

/// A response status with its JSON body (`Null` when the body is empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// Asserts the status and deserializes the body
    pub fn expect<T: DeserializeOwned>(self, status: StatusCode) -> T {
        assert_eq!(self.status, status, "unexpected status, body: {}", self.body);
        serde_json::from_value(self.body).unwrap()
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// Sends a request to the application with the caller's identity headers
pub async fn send(app: &Router, method: &str, uri: &str, caller: &Caller, body: Option<Value>) -> TestResponse {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(ref id) = caller.user_id {
        builder = builder.header(USER_ID_HEADER, id);
    }
    if let Some(ref id) = caller.anonymous_id {
        builder = builder.header(ANONYMOUS_ID_HEADER, id);
    }
    if let Some(ref id) = caller.organization_id {
        builder = builder.header(ORGANIZATION_ID_HEADER, id);
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };

    TestResponse { status, body }
}

pub async fn get(app: &Router, uri: &str, caller: &Caller) -> TestResponse {
    send(app, "GET", uri, caller, None).await
}

pub async fn post(app: &Router, uri: &str, caller: &Caller, body: Value) -> TestResponse {
    send(app, "POST", uri, caller, Some(body)).await
}

pub async fn patch(app: &Router, uri: &str, caller: &Caller, body: Value) -> TestResponse {
    send(app, "PATCH", uri, caller, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, caller: &Caller) -> TestResponse {
    send(app, "DELETE", uri, caller, None).await
}

/// Registers a user named `name` with an `@example.com` address
pub async fn create_user(app: &Router, name: &str) -> User {
    post(app, "/users", &Caller::nobody(), json!({ "email": format!("{}@example.com", name), "name": name }))
        .await
        .expect(StatusCode::OK)
}

/// Creates an organization with the given slug, owned by a new user
pub async fn create_org(app: &Router, slug: &str) -> (Organization, User) {
    let owner = create_user(app, &format!("owner-{}", slug)).await;
    let org = post(app, "/organizations", &Caller::identity(&owner), json!({ "name": slug.to_uppercase(), "slug": slug }))
        .await
        .expect(StatusCode::OK);
    (org, owner)
}

/// Creates a user and adds them to `org` with `role`
pub async fn add_member(app: &Router, org: &Organization, owner: &User, name: &str, role: &str) -> User {
    let user = create_user(app, name).await;
    post(app, "/members", &Caller::member(owner, org), json!({ "user_id": user.get_id(), "role": role }))
        .await
        .expect::<Value>(StatusCode::OK);
    user
}

pub async fn create_board(app: &Router, caller: &Caller, slug: &str, is_public: bool) -> Board {
    post(app, "/boards", caller, json!({ "name": slug, "slug": slug, "is_public": is_public }))
        .await
        .expect(StatusCode::OK)
}

pub async fn create_feedback(app: &Router, caller: &Caller, board: &Board, title: &str) -> Feedback {
    post(app, "/feedback", caller, json!({ "board_id": board.get_id(), "title": title }))
        .await
        .expect(StatusCode::OK)
}
