//! Integration tests for the registration endpoint.
//!
//! Covers the permissive-by-absence secret policy, case-insensitive secret
//! matching, identifier uniqueness, and URL construction from the request
//! host.

use axum::http::StatusCode;
use hooksink_testing::TestEnv;

#[tokio::test]
async fn register_without_key_succeeds() {
    let env = TestEnv::new().await.expect("test env setup");

    // Absent key is authorized. Documented permissive policy, preserved
    // for compatibility with existing clients.
    let response = env.get("/register").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = TestEnv::body_text(response).await;
    assert!(body.contains("Register Webhooks at Callback URL: https://gateway.test/"));
    assert!(body.contains("View Webhook Events at URL: https://gateway.test/"));
    assert!(body.contains("/events\n") || body.ends_with("/events"));
    assert!(body.contains("/events_history"));
}

#[tokio::test]
async fn register_with_empty_key_is_authorized() {
    let env = TestEnv::new().await.expect("test env setup");

    // A present-but-empty key counts as absent under the permissive
    // policy; only a non-empty mismatching key is rejected.
    let response = env.get("/register?key=").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_with_wrong_key_is_unauthorized() {
    let env = TestEnv::new().await.expect("test env setup");

    let response = env.get("/register?key=WRONGSECRET").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = TestEnv::body_text(response).await;
    assert_eq!(body, "Unauthorized");
}

#[tokio::test]
async fn register_secret_matches_case_insensitively() {
    let env = TestEnv::new().await.expect("test env setup");

    for key in ["superdupersecret", "SuperDuperSecret", "SUPERDUPERSECRET"] {
        let response = env.get(&format!("/register?key={key}")).await;
        assert_eq!(response.status(), StatusCode::OK, "key {key} must be accepted");
    }
}

#[tokio::test]
async fn successive_registrations_issue_distinct_ids() {
    let env = TestEnv::new().await.expect("test env setup");

    let first = env.register().await;
    let second = env.register().await;

    assert_ne!(first, second);
}

#[tokio::test]
async fn registered_id_starts_with_empty_history() {
    let env = TestEnv::new().await.expect("test env setup");

    let id = env.register().await;
    let response = env.get(&format!("/{id}/events_history")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = TestEnv::body_text(response).await;
    assert!(!body.contains("<pre>"), "fresh subscriber renders no event blocks");
}

#[tokio::test]
async fn returned_urls_embed_the_stored_identifier() {
    let env = TestEnv::new().await.expect("test env setup");

    let id = env.register().await;

    // The id parsed out of the callback URL is known to the store.
    let events = env
        .storage
        .subscribers
        .events(&id.as_str().into())
        .await
        .expect("events query");
    assert_eq!(events, Some(vec![]));
}
