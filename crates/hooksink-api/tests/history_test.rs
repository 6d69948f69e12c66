//! Integration tests for the rendered event history.

use axum::http::StatusCode;
use hooksink_testing::TestEnv;
use serde_json::json;

#[tokio::test]
async fn unknown_id_is_not_found() {
    let env = TestEnv::new().await.expect("test env setup");

    let response = env.get("/nosuchid/events_history").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(TestEnv::body_text(response).await, "Not found");
}

#[tokio::test]
async fn history_is_served_as_html() {
    let env = TestEnv::new().await.expect("test env setup");
    let id = env.register().await;

    let response = env.get(&format!("/{id}/events_history")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .expect("content-type header")
        .to_string();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn events_render_pretty_printed_in_arrival_order() {
    let env = TestEnv::new().await.expect("test env setup");
    let id = env.register().await;

    for n in 1..=3 {
        env.post_json(&format!("/{id}/events"), &json!({"a": n})).await;
    }

    let response = env.get(&format!("/{id}/events_history")).await;
    let body = TestEnv::body_text(response).await;

    // Pretty-printed with 2-space indentation, one block per event.
    let first = body.find("\"a\": 1").expect("first event rendered");
    let second = body.find("\"a\": 2").expect("second event rendered");
    let third = body.find("\"a\": 3").expect("third event rendered");
    assert!(first < second && second < third);
    assert_eq!(body.matches("<pre>").count(), 3);
}

#[tokio::test]
async fn rendered_block_round_trips_to_original_document() {
    let env = TestEnv::new().await.expect("test env setup");
    let id = env.register().await;

    let original = json!({"text": "a <b> & \"c\"", "nested": {"n": [1, 2]}});
    env.post_json(&format!("/{id}/events"), &original).await;

    let response = env.get(&format!("/{id}/events_history")).await;
    let body = TestEnv::body_text(response).await;

    let start = body.find("<pre>").expect("event block present") + "<pre>".len();
    let end = body.find("</pre>").expect("event block closed");
    let reparsed: serde_json::Value =
        serde_json::from_str(&unescape_html(&body[start..end])).expect("rendered block parses");

    assert_eq!(reparsed, original);
}

#[tokio::test]
async fn corrupted_stored_entry_renders_error_block() {
    let env = TestEnv::new().await.expect("test env setup");
    let id = env.register().await;

    // Simulate external corruption of the store.
    env.storage
        .subscribers
        .replace_events(&id.as_str().into(), &["this is not json".to_string()])
        .await
        .expect("replace events");

    let response = env.get(&format!("/{id}/events_history")).await;
    assert_eq!(response.status(), StatusCode::OK, "render still succeeds");

    let body = TestEnv::body_text(response).await;
    assert!(body.contains("pre class=\"broken\""));
}

#[tokio::test]
async fn history_uses_dark_theme_layout() {
    let env = TestEnv::new().await.expect("test env setup");
    let id = env.register().await;

    let response = env.get(&format!("/{id}/events_history")).await;
    let body = TestEnv::body_text(response).await;

    assert!(body.contains("#1c1e21"));
    assert!(body.contains("flex-wrap: wrap"));
    assert!(body.contains("<div id=\"events\">"));
}

/// Reverses the renderer's minimal HTML escaping.
fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<").replace("&gt;", ">").replace("&quot;", "\"").replace("&amp;", "&")
}
