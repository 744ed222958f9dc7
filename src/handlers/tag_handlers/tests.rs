use super::*;
use crate::auth::Actor;
use crate::test_utils::{seed_organization, setup_fixture, Fixture};

fn owner(fx: &Fixture) -> RequestContext {
    RequestContext { organization_id: fx.org_id(), actor: Actor::User(fx.owner.get_id()) }
}

fn tag_payload(name: &str) -> CreateTagDto {
    CreateTagDto { name: name.to_string(), color: "#6b7280".to_string() }
}

#[tokio::test]
async fn test_create_tag_handler() {
    let fx = setup_fixture();

    let tag = create_tag_handler(State(fx.pool.clone()), owner(&fx), Json(tag_payload("ux"))).await.unwrap().0;

    assert_eq!(tag.get_name(), "ux");
    assert_eq!(tag.get_organization_id(), fx.org_id());
}

#[tokio::test]
async fn test_create_duplicate_tag_conflicts() {
    let fx = setup_fixture();

    create_tag_handler(State(fx.pool.clone()), owner(&fx), Json(tag_payload("ux"))).await.unwrap();
    let result = create_tag_handler(State(fx.pool.clone()), owner(&fx), Json(tag_payload("ux"))).await;

    assert!(matches!(result, Err(ApiError::Conflict(_))));
}

#[tokio::test]
async fn test_list_tags_handler() {
    let fx = setup_fixture();
    let (other, _) = seed_organization(&fx.pool, "globex");
    repo::create_tag(&fx.pool, &fx.org_id(), "ux".to_string(), "#111".to_string()).unwrap();
    repo::create_tag(&fx.pool, &other.get_id(), "api".to_string(), "#111".to_string()).unwrap();

    let tags = list_tags_handler(State(fx.pool.clone()), owner(&fx)).await.unwrap().0;

    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].get_name(), "ux");
}

#[tokio::test]
async fn test_get_tag_from_other_organization_is_not_found() {
    let fx = setup_fixture();
    let (other, _) = seed_organization(&fx.pool, "globex");
    let foreign = repo::create_tag(&fx.pool, &other.get_id(), "api".to_string(), "#111".to_string()).unwrap();

    let result = get_tag_handler(State(fx.pool.clone()), owner(&fx), Path(foreign.get_id())).await;
    assert!(matches!(result, Err(ApiError::NotFound)));
}

#[tokio::test]
async fn test_tag_feedback_handlers() {
    let fx = setup_fixture();
    let post = fx.feedback(&fx.board("ideas", false), "Dark mode");
    let tag = repo::create_tag(&fx.pool, &fx.org_id(), "ux".to_string(), "#111".to_string()).unwrap();

    add_tag_to_feedback_handler(State(fx.pool.clone()), owner(&fx), Path((post.get_id(), tag.get_id())))
        .await
        .unwrap();

    let tags = list_tags_for_feedback_handler(State(fx.pool.clone()), owner(&fx), Path(post.get_id())).await.unwrap().0;
    assert_eq!(tags, vec![tag.clone()]);

    let status = remove_tag_from_feedback_handler(State(fx.pool.clone()), owner(&fx), Path((post.get_id(), tag.get_id())))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let result = remove_tag_from_feedback_handler(State(fx.pool.clone()), owner(&fx), Path((post.get_id(), tag.get_id()))).await;
    assert!(matches!(result, Err(ApiError::NotFound)));
}

#[tokio::test]
async fn test_add_missing_tag_is_not_found() {
    let fx = setup_fixture();
    let post = fx.feedback(&fx.board("ideas", false), "Dark mode");

    let result = add_tag_to_feedback_handler(State(fx.pool.clone()), owner(&fx), Path((post.get_id(), "missing".to_string()))).await;
    assert!(matches!(result, Err(ApiError::NotFound)));
}

#[tokio::test]
async fn test_member_cannot_manage_tags() {
    let fx = setup_fixture();
    let ada = fx.add_user("ada", Role::Member);
    let ctx = RequestContext { organization_id: fx.org_id(), actor: Actor::User(ada.get_id()) };

    let result = create_tag_handler(State(fx.pool.clone()), ctx, Json(tag_payload("ux"))).await;
    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}
