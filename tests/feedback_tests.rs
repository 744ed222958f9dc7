//! Integration tests for feedback posts: CRUD, filtering, sorting and paging

use axum::http::StatusCode;
use feedboard::dto::{FeedbackPage, FeedbackSummary};
use feedboard::models::{Feedback, Status, Tag};
use serde_json::{json, Value};

mod common;
use common::*;

#[tokio::test]
async fn test_feedback_lifecycle() {
    let app = create_test_app();
    let (org, owner) = create_org(&app, "acme").await;
    let caller = Caller::member(&owner, &org);
    let board = create_board(&app, &caller, "ideas", false).await;

    let post = create_feedback(&app, &caller, &board, "Dark mode").await;
    let uri = format!("/feedback/{}", post.get_id());

    let fetched: Feedback = get(&app, &uri, &caller).await.expect(StatusCode::OK);
    assert_eq!(fetched, post);

    let statuses: Vec<Status> = get(&app, "/statuses", &caller).await.expect(StatusCode::OK);
    let default = statuses.iter().find(|s| s.get_is_default()).unwrap();
    assert_eq!(post.get_status_id(), Some(default.get_id()));

    let planned = statuses.iter().find(|s| s.get_name() == "Planned").unwrap();
    let moved: Feedback = patch(&app, &uri, &caller, json!({ "status_id": planned.get_id(), "title": "Dark theme" }))
        .await
        .expect(StatusCode::OK);
    assert_eq!(moved.get_status_id(), Some(planned.get_id()));
    assert_eq!(moved.get_title(), "Dark theme");

    assert_eq!(delete(&app, &uri, &caller).await.status, StatusCode::NO_CONTENT);
    assert_eq!(get(&app, &uri, &caller).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_authors_edit_but_only_admins_triage() {
    let app = create_test_app();
    let (org, owner) = create_org(&app, "acme").await;
    let board = create_board(&app, &Caller::member(&owner, &org), "ideas", false).await;
    let ada = add_member(&app, &org, &owner, "ada", "member").await;
    let bob = add_member(&app, &org, &owner, "bob", "member").await;
    let ada_caller = Caller::member(&ada, &org);

    let post = create_feedback(&app, &ada_caller, &board, "Export").await;
    let uri = format!("/feedback/{}", post.get_id());

    let edited: Feedback = patch(&app, &uri, &ada_caller, json!({ "description": "As CSV" })).await.expect(StatusCode::OK);
    assert_eq!(edited.get_description(), "As CSV");

    let response = patch(&app, &uri, &Caller::member(&bob, &org), json!({ "title": "Mine now" })).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let statuses: Vec<Status> = get(&app, "/statuses", &ada_caller).await.expect(StatusCode::OK);
    let response = patch(&app, &uri, &ada_caller, json!({ "status_id": statuses[1].get_id() })).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = delete(&app, &uri, &Caller::member(&bob, &org)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_status_from_other_organization_is_rejected() {
    let app = create_test_app();
    let (acme, acme_owner) = create_org(&app, "acme").await;
    let (globex, globex_owner) = create_org(&app, "globex").await;
    let caller = Caller::member(&acme_owner, &acme);
    let board = create_board(&app, &caller, "ideas", false).await;
    let post = create_feedback(&app, &caller, &board, "Dark mode").await;

    let foreign: Vec<Status> = get(&app, "/statuses", &Caller::member(&globex_owner, &globex)).await.expect(StatusCode::OK);

    let response = patch(&app, &format!("/feedback/{}", post.get_id()), &caller, json!({ "status_id": foreign[0].get_id() })).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_feedback_is_scoped_to_organization() {
    let app = create_test_app();
    let (acme, acme_owner) = create_org(&app, "acme").await;
    let (globex, globex_owner) = create_org(&app, "globex").await;
    let acme_caller = Caller::member(&acme_owner, &acme);
    let globex_caller = Caller::member(&globex_owner, &globex);
    let board = create_board(&app, &acme_caller, "ideas", true).await;
    let post = create_feedback(&app, &acme_caller, &board, "Dark mode").await;

    assert_eq!(get(&app, &format!("/feedback/{}", post.get_id()), &globex_caller).await.status, StatusCode::NOT_FOUND);

    let page: FeedbackPage = get(&app, "/feedback", &globex_caller).await.expect(StatusCode::OK);
    assert_eq!(page.total, 0);

    // posting to another organization's board
    let response = post_feedback(&app, &globex_caller, &board.get_id()).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

async fn post_feedback(app: &axum::Router, caller: &Caller, board_id: &str) -> TestResponse {
    post(app, "/feedback", caller, json!({ "board_id": board_id, "title": "Sneaky" })).await
}

#[tokio::test]
async fn test_list_filters_and_top_sort() {
    let app = create_test_app();
    let (org, owner) = create_org(&app, "acme").await;
    let caller = Caller::member(&owner, &org);
    let ideas = create_board(&app, &caller, "ideas", false).await;
    let bugs = create_board(&app, &caller, "bugs", false).await;

    let quiet = create_feedback(&app, &caller, &ideas, "Quiet").await;
    let popular = create_feedback(&app, &caller, &ideas, "Popular").await;
    let bug = create_feedback(&app, &caller, &bugs, "Crash").await;

    for voter in ["ada", "bob"] {
        let user = add_member(&app, &org, &owner, voter, "member").await;
        post(&app, &format!("/feedback/{}/votes", popular.get_id()), &Caller::member(&user, &org), json!({}))
            .await
            .expect::<Value>(StatusCode::OK);
    }

    let page: FeedbackPage = get(&app, &format!("/feedback?board_id={}&sort=top", ideas.get_id()), &caller)
        .await
        .expect(StatusCode::OK);
    assert_eq!(page.items, vec![popular.clone(), quiet.clone()]);
    assert_eq!(page.total, 2);

    let page: FeedbackPage = get(&app, &format!("/feedback?board_id={}", bugs.get_id()), &caller).await.expect(StatusCode::OK);
    assert_eq!(page.items, vec![bug]);

    let page: FeedbackPage = get(&app, "/feedback?sort=oldest&per_page=2&page=2", &caller).await.expect(StatusCode::OK);
    assert_eq!(page.total, 3);
    assert_eq!(page.per_page, 2);
    assert_eq!(page.items.len(), 1);

    let response = get(&app, "/feedback?sort=loudest", &caller).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tag_filter_requires_every_tag() {
    let app = create_test_app();
    let (org, owner) = create_org(&app, "acme").await;
    let caller = Caller::member(&owner, &org);
    let board = create_board(&app, &caller, "ideas", false).await;

    let ux: Tag = post(&app, "/tags", &caller, json!({ "name": "ux" })).await.expect(StatusCode::OK);
    let mobile: Tag = post(&app, "/tags", &caller, json!({ "name": "mobile" })).await.expect(StatusCode::OK);

    let both = create_feedback(&app, &caller, &board, "Both").await;
    let only_ux = create_feedback(&app, &caller, &board, "Only ux").await;
    create_feedback(&app, &caller, &board, "Neither").await;

    for (post_id, tag_id) in [
        (both.get_id(), ux.get_id()),
        (both.get_id(), mobile.get_id()),
        (only_ux.get_id(), ux.get_id()),
    ] {
        post(&app, &format!("/feedback/{}/tags/{}", post_id, tag_id), &caller, json!({}))
            .await
            .expect::<Value>(StatusCode::OK);
    }

    let uri = format!("/feedback?tag_ids={}&tag_ids={}", ux.get_id(), mobile.get_id());
    let page: FeedbackPage = get(&app, &uri, &caller).await.expect(StatusCode::OK);
    assert_eq!(page.items, vec![both.clone()]);

    let uri = format!("/feedback?tag_ids={}&sort=oldest", ux.get_id());
    let page: FeedbackPage = get(&app, &uri, &caller).await.expect(StatusCode::OK);
    assert_eq!(page.items, vec![both, only_ux]);
}

#[tokio::test]
async fn test_summary_counts() {
    let app = create_test_app();
    let (org, owner) = create_org(&app, "acme").await;
    let caller = Caller::member(&owner, &org);
    let board = create_board(&app, &caller, "ideas", false).await;
    let post_ = create_feedback(&app, &caller, &board, "Dark mode").await;

    let comment: Value = post(&app, &format!("/feedback/{}/comments", post_.get_id()), &caller, json!({ "body": "+1" }))
        .await
        .expect(StatusCode::OK);
    post(
        &app,
        &format!("/feedback/{}/comments", post_.get_id()),
        &caller,
        json!({ "body": "agreed", "parent_id": comment["id"] }),
    )
    .await
    .expect::<Value>(StatusCode::OK);
    post(&app, &format!("/feedback/{}/votes", post_.get_id()), &caller, json!({})).await.expect::<Value>(StatusCode::OK);

    let summary: FeedbackSummary = get(&app, &format!("/feedback/{}/summary", post_.get_id()), &caller)
        .await
        .expect(StatusCode::OK);
    assert_eq!(summary.feedback, post_);
    assert_eq!(summary.vote_count, 1);
    assert_eq!(summary.comment_count, 2);
    assert!(summary.tags.is_empty());
}
