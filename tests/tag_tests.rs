//! Integration tests for tags and their links to feedback posts

use axum::http::StatusCode;
use feedboard::models::Tag;
use serde_json::{json, Value};

mod common;
use common::*;

#[tokio::test]
async fn test_tag_crud() {
    let app = create_test_app();
    let (org, owner) = create_org(&app, "acme").await;
    let caller = Caller::member(&owner, &org);

    let tag: Tag = post(&app, "/tags", &caller, json!({ "name": "ux", "color": "#ff0066" })).await.expect(StatusCode::OK);
    assert_eq!(tag.get_color(), "#ff0066");

    let default_color: Tag = post(&app, "/tags", &caller, json!({ "name": "api" })).await.expect(StatusCode::OK);
    assert_eq!(default_color.get_color(), "#6b7280");

    let response = post(&app, "/tags", &caller, json!({ "name": "ux" })).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let tags: Vec<Tag> = get(&app, "/tags", &caller).await.expect(StatusCode::OK);
    assert_eq!(tags, vec![default_color, tag.clone()]);

    let uri = format!("/tags/{}", tag.get_id());
    assert_eq!(delete(&app, &uri, &caller).await.status, StatusCode::NO_CONTENT);
    assert_eq!(get(&app, &uri, &caller).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tagging_feedback() {
    let app = create_test_app();
    let (org, owner) = create_org(&app, "acme").await;
    let caller = Caller::member(&owner, &org);
    let board = create_board(&app, &caller, "ideas", false).await;
    let feedback = create_feedback(&app, &caller, &board, "Dark mode").await;
    let tag: Tag = post(&app, "/tags", &caller, json!({ "name": "ux" })).await.expect(StatusCode::OK);

    let link_uri = format!("/feedback/{}/tags/{}", feedback.get_id(), tag.get_id());
    post(&app, &link_uri, &caller, json!({})).await.expect::<Value>(StatusCode::OK);

    let response = post(&app, &link_uri, &caller, json!({})).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let tags: Vec<Tag> = get(&app, &format!("/feedback/{}/tags", feedback.get_id()), &caller).await.expect(StatusCode::OK);
    assert_eq!(tags, vec![tag.clone()]);

    assert_eq!(delete(&app, &link_uri, &caller).await.status, StatusCode::NO_CONTENT);
    assert_eq!(delete(&app, &link_uri, &caller).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cannot_attach_tag_from_other_organization() {
    let app = create_test_app();
    let (acme, acme_owner) = create_org(&app, "acme").await;
    let (globex, globex_owner) = create_org(&app, "globex").await;
    let caller = Caller::member(&acme_owner, &acme);
    let board = create_board(&app, &caller, "ideas", false).await;
    let feedback = create_feedback(&app, &caller, &board, "Dark mode").await;
    let foreign: Tag = post(&app, "/tags", &Caller::member(&globex_owner, &globex), json!({ "name": "ux" }))
        .await
        .expect(StatusCode::OK);

    let response = post(&app, &format!("/feedback/{}/tags/{}", feedback.get_id(), foreign.get_id()), &caller, json!({})).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_tag_detaches_it() {
    let app = create_test_app();
    let (org, owner) = create_org(&app, "acme").await;
    let caller = Caller::member(&owner, &org);
    let board = create_board(&app, &caller, "ideas", false).await;
    let feedback = create_feedback(&app, &caller, &board, "Dark mode").await;
    let tag: Tag = post(&app, "/tags", &caller, json!({ "name": "ux" })).await.expect(StatusCode::OK);
    post(&app, &format!("/feedback/{}/tags/{}", feedback.get_id(), tag.get_id()), &caller, json!({}))
        .await
        .expect::<Value>(StatusCode::OK);

    delete(&app, &format!("/tags/{}", tag.get_id()), &caller).await;

    let tags: Vec<Tag> = get(&app, &format!("/feedback/{}/tags", feedback.get_id()), &caller).await.expect(StatusCode::OK);
    assert!(tags.is_empty());
}
