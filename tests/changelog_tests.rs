//! Integration tests for the changelog and the public surface

use axum::http::StatusCode;
use feedboard::dto::FeedbackPage;
use feedboard::models::{Board, ChangelogEntry, Feedback};
use serde_json::json;

mod common;
use common::*;

#[tokio::test]
async fn test_publish_and_public_listing() {
    let app = create_test_app();
    let (org, owner) = create_org(&app, "acme").await;
    let caller = Caller::member(&owner, &org);

    let draft: ChangelogEntry = post(&app, "/changelog", &caller, json!({ "title": "Draft" })).await.expect(StatusCode::OK);
    let shipped: ChangelogEntry = post(&app, "/changelog", &caller, json!({ "title": "Dark mode", "body": "Finally" }))
        .await
        .expect(StatusCode::OK);
    assert!(!shipped.is_published());

    let published: ChangelogEntry = post(&app, &format!("/changelog/{}/publish", shipped.get_id()), &caller, json!({}))
        .await
        .expect(StatusCode::OK);
    assert!(published.is_published());

    let public: Vec<ChangelogEntry> = get(&app, "/public/acme/changelog", &Caller::nobody()).await.expect(StatusCode::OK);
    assert_eq!(public, vec![published.clone()]);

    let all: Vec<ChangelogEntry> = get(&app, "/changelog", &caller).await.expect(StatusCode::OK);
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|entry| entry.get_id() == draft.get_id()));

    post(&app, &format!("/changelog/{}/unpublish", shipped.get_id()), &caller, json!({}))
        .await
        .expect::<ChangelogEntry>(StatusCode::OK);
    let public: Vec<ChangelogEntry> = get(&app, "/public/acme/changelog", &Caller::nobody()).await.expect(StatusCode::OK);
    assert!(public.is_empty());
}

#[tokio::test]
async fn test_changelog_crud_and_permissions() {
    let app = create_test_app();
    let (org, owner) = create_org(&app, "acme").await;
    let caller = Caller::member(&owner, &org);
    let ada = add_member(&app, &org, &owner, "ada", "member").await;

    let entry: ChangelogEntry = post(&app, "/changelog", &caller, json!({ "title": "v2" })).await.expect(StatusCode::OK);
    let uri = format!("/changelog/{}", entry.get_id());

    let edited: ChangelogEntry = patch(&app, &uri, &caller, json!({ "body": "Notes" })).await.expect(StatusCode::OK);
    assert_eq!(edited.get_body(), "Notes");

    let fetched: ChangelogEntry = get(&app, &uri, &Caller::member(&ada, &org)).await.expect(StatusCode::OK);
    assert_eq!(fetched, edited);
    assert_eq!(delete(&app, &uri, &Caller::member(&ada, &org)).await.status, StatusCode::FORBIDDEN);

    assert_eq!(delete(&app, &uri, &caller).await.status, StatusCode::NO_CONTENT);
    assert_eq!(get(&app, &uri, &caller).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_board_and_widget() {
    let app = create_test_app();
    let (org, owner) = create_org(&app, "acme").await;
    let caller = Caller::member(&owner, &org);
    let roadmap = create_board(&app, &caller, "roadmap", true).await;
    create_board(&app, &caller, "internal", false).await;
    create_feedback(&app, &caller, &roadmap, "Dark mode").await;

    let boards: Vec<Board> = get(&app, "/public/acme/boards", &Caller::nobody()).await.expect(StatusCode::OK);
    assert_eq!(boards, vec![roadmap.clone()]);

    let submitted: Feedback = post(
        &app,
        "/public/acme/boards/roadmap/feedback",
        &Caller { anonymous_id: Some("visitor-7".to_string()), ..Caller::nobody() },
        json!({ "title": "Export to CSV" }),
    )
    .await
    .expect(StatusCode::OK);
    assert_eq!(submitted.get_author_id(), "anon:visitor-7");
    assert_eq!(submitted.get_organization_id(), org.get_id());

    let page: FeedbackPage = get(&app, "/public/acme/boards/roadmap/feedback?sort=oldest", &Caller::nobody())
        .await
        .expect(StatusCode::OK);
    assert_eq!(page.total, 2);
    assert_eq!(page.items[1].get_id(), submitted.get_id());

    let visitor = Caller { anonymous_id: Some("visitor-7".to_string()), ..Caller::nobody() };
    let response = post(&app, "/public/acme/boards/internal/feedback", &visitor, json!({ "title": "Sneaky" })).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = get(&app, "/public/acme/boards/internal/feedback", &Caller::nobody()).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = post(&app, "/public/acme/boards/roadmap/feedback", &Caller::nobody(), json!({ "title": "Who?" })).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    assert_eq!(get(&app, "/public/nobody/boards", &Caller::nobody()).await.status, StatusCode::NOT_FOUND);
}
