use std::sync::Arc;

use poem::{Endpoint, http::StatusCode, test::TestClient};
use serde_json::json;
use uuid::Uuid;
use yoga_progress::api::build_route;
use yoga_progress::config::Config;
use yoga_progress::domain::{ContentKind, TransitionPolicy};
use yoga_progress::engine::ProgressEngine;
use yoga_progress::storage::MemoryStore;

fn app(policy: TransitionPolicy) -> (Arc<MemoryStore>, TestClient<impl Endpoint>) {
    let store = Arc::new(MemoryStore::new());
    let engine = Arc::new(ProgressEngine::new(store.clone(), store.clone(), policy));
    let config = Arc::new(Config::from_lookup(|_| None).expect("default config"));
    (store, TestClient::new(build_route(engine, config)))
}

#[tokio::test]
async fn lesson_progress_and_rating_round() {
    let (store, cli) = app(TransitionPolicy::Permissive);
    let (user, lesson) = (Uuid::new_v4(), Uuid::new_v4());
    store.add_content(ContentKind::Lesson, lesson).unwrap();

    let resp = cli
        .get(format!("/lesson/{lesson}/progress"))
        .header("X-User-Id", user.to_string())
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);

    let resp = cli
        .put(format!("/lesson/{lesson}/progress"))
        .header("X-User-Id", user.to_string())
        .body_json(&json!({ "resumePosition": 120 }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let body = json.value().object();
    body.get("status").assert_string("STARTED");
    body.get("resumePosition").assert_i64(120);
    body.get("kind").assert_string("lesson");

    let resp = cli
        .put(format!("/lesson/{lesson}/rating"))
        .header("X-User-Id", user.to_string())
        .body_json(&json!({ "rating": 4.5, "comment": "grounding" }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let body = json.value().object();
    body.get("status").assert_string("STARTED");
    body.get("rating").assert_f64(4.5);
    body.get("resumePosition").assert_i64(120);

    let resp = cli.get(format!("/lesson/{lesson}/rating")).send().await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let body = json.value().object();
    body.get("average").assert_f64(4.5);
    body.get("count").assert_i64(1);

    let resp = cli
        .get(format!("/lesson/{lesson}/progress"))
        .header("X-User-Id", user.to_string())
        .send()
        .await;
    resp.assert_status_is_ok();
}

#[tokio::test]
async fn out_of_range_rating_is_a_field_error() {
    let (store, cli) = app(TransitionPolicy::Permissive);
    let (user, practice) = (Uuid::new_v4(), Uuid::new_v4());
    store.add_content(ContentKind::Practice, practice).unwrap();

    let resp = cli
        .put(format!("/practice/{practice}/rating"))
        .header("X-User-Id", user.to_string())
        .body_json(&json!({ "rating": 5.5 }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let json = resp.json().await;
    json.value()
        .object()
        .get("fields")
        .object()
        .get("rating")
        .assert_string("must be between 0 and 5");
    assert!(store.is_empty().unwrap());
}

#[tokio::test]
async fn unknown_content_is_404() {
    let (_store, cli) = app(TransitionPolicy::Permissive);
    let resp = cli
        .put(format!("/program/{}/progress", Uuid::new_v4()))
        .header("X-User-Id", Uuid::new_v4().to_string())
        .body_json(&json!({ "resumePosition": 1 }))
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_identity_is_401() {
    let (store, cli) = app(TransitionPolicy::Permissive);
    let lesson = Uuid::new_v4();
    store.add_content(ContentKind::Lesson, lesson).unwrap();

    let resp = cli
        .put(format!("/lesson/{lesson}/progress"))
        .body_json(&json!({ "resumePosition": 1 }))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    assert!(store.is_empty().unwrap());
}

#[tokio::test]
async fn strict_policy_turns_regressions_into_409() {
    let (store, cli) = app(TransitionPolicy::Strict);
    let (user, program) = (Uuid::new_v4(), Uuid::new_v4());
    store.add_content(ContentKind::Program, program).unwrap();

    let resp = cli
        .put(format!("/program/{program}/status"))
        .header("X-User-Id", user.to_string())
        .body_json(&json!({ "status": "COMPLETED" }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = cli
        .put(format!("/program/{program}/status"))
        .header("X-User-Id", user.to_string())
        .body_json(&json!({ "status": "STARTED" }))
        .send()
        .await;
    resp.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn shorts_views_likes_and_listing() {
    let (store, cli) = app(TransitionPolicy::Permissive);
    let (user, shorts) = (Uuid::new_v4(), Uuid::new_v4());
    store.add_content(ContentKind::Shorts, shorts).unwrap();

    let resp = cli
        .put(format!("/shorts/{shorts}/progress"))
        .header("X-User-Id", user.to_string())
        .body_json(&json!({ "resumePosition": 3 }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = cli
        .put(format!("/shorts/{shorts}/like"))
        .header("X-User-Id", user.to_string())
        .body_json(&json!({ "liked": true }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value().object().get("status").assert_string("NEW");

    let resp = cli
        .put(format!("/shorts/{shorts}/view"))
        .header("X-User-Id", user.to_string())
        .send()
        .await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let body = json.value().object();
    body.get("status").assert_string("VIEWED");
    body.get("liked").assert_bool(true);

    let resp = cli
        .get("/shorts/progress")
        .header("X-User-Id", user.to_string())
        .send()
        .await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value().array().assert_len(1);
}

#[tokio::test]
async fn malformed_json_is_a_400_with_the_error_shape() {
    let (store, cli) = app(TransitionPolicy::Permissive);
    let (user, lesson) = (Uuid::new_v4(), Uuid::new_v4());
    store.add_content(ContentKind::Lesson, lesson).unwrap();

    let resp = cli
        .put(format!("/lesson/{lesson}/rating"))
        .header("X-User-Id", user.to_string())
        .content_type("application/json")
        .body("{not json")
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let json = resp.json().await;
    let body = json.value().object();
    assert!(!body.get("message").string().is_empty());
    body.get("fields").object();
    assert!(store.is_empty().unwrap());
}

#[tokio::test]
async fn content_id_must_be_a_uuid() {
    let (store, cli) = app(TransitionPolicy::Permissive);

    let resp = cli
        .put("/practice/sun-salutation/progress")
        .header("X-User-Id", Uuid::new_v4().to_string())
        .body_json(&json!({ "resumePosition": 10 }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let json = resp.json().await;
    let body = json.value().object();
    assert!(!body.get("message").string().is_empty());
    body.get("fields").object();
    assert!(store.is_empty().unwrap());
}

#[tokio::test]
async fn garbage_identity_is_401() {
    let (store, cli) = app(TransitionPolicy::Permissive);
    let lesson = Uuid::new_v4();
    store.add_content(ContentKind::Lesson, lesson).unwrap();

    let resp = cli
        .put(format!("/lesson/{lesson}/progress"))
        .header("X-User-Id", "not-a-user")
        .body_json(&json!({ "resumePosition": 1 }))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    let json = resp.json().await;
    json.value()
        .object()
        .get("message")
        .assert_string("missing or invalid X-User-Id");
    assert!(store.is_empty().unwrap());
}

#[tokio::test]
async fn rating_summary_of_unknown_content_is_404() {
    let (_store, cli) = app(TransitionPolicy::Permissive);

    let resp = cli.get(format!("/program/{}/rating", Uuid::new_v4())).send().await;
    resp.assert_status(StatusCode::NOT_FOUND);
    let json = resp.json().await;
    assert!(!json.value().object().get("message").string().is_empty());
}
