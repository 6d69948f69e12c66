//! History renderer: a human-viewable HTML document of stored events.

use axum::{
    extract::{Path, State},
    response::Html,
};
use hooksink_core::SubscriberId;
use tracing::{debug, instrument, warn};

use crate::{ApiError, AppState};

/// Dark-themed stylesheet; one flex-wrapped panel per event.
const STYLE: &str = r"
body {
    background-color: #1c1e21;
}

#events {
    display: flex;
    flex-wrap: wrap;
}

pre {
    border: 1px solid #444950;
    color: #e4e6eb;
    padding: 22px;
    margin-left: 2em;
}

pre.broken {
    border-color: #d93025;
    color: #d93025;
}
";

/// Handles `GET /{id}/events_history`.
///
/// Reads the full stored sequence and renders each event pretty-printed, in
/// arrival order. A stored entry that no longer parses as JSON (possible
/// only if the database was edited externally) renders as a visible error
/// block; the rest of the document still renders.
///
/// # Errors
///
/// - 404 when the identifier is unknown
/// - 500 when the store is unavailable
#[instrument(name = "events_history", skip(state), fields(subscriber_id = %id))]
pub async fn events_history(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Html<String>, ApiError> {
    let id = SubscriberId::from(id);

    let Some(events) = state.storage.subscribers.events(&id).await? else {
        return Err(ApiError::NotFound);
    };

    debug!(event_count = events.len(), "rendering event history");
    Ok(Html(render_history(&events)))
}

/// Renders the stored events into a complete HTML document.
fn render_history(events: &[String]) -> String {
    let blocks: Vec<String> = events.iter().map(|raw| render_event(raw)).collect();
    let body = blocks.join("\n");

    format!(
        "<html>\n<head>\n<style>{STYLE}</style>\n</head>\n<body>\n  <div id=\"events\">\n{body}\n  </div>\n</body>\n</html>"
    )
}

/// Renders one stored event as a `<pre>` block.
///
/// Payloads are third-party input, so the pretty-printed text is
/// HTML-escaped before embedding.
fn render_event(raw: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => {
            let pretty = serde_json::to_string_pretty(&value)
                .unwrap_or_else(|_| value.to_string());
            format!("<pre>{}</pre>", escape_html(&pretty))
        },
        Err(e) => {
            warn!(error = %e, "stored event is not valid JSON");
            format!("<pre class=\"broken\">unreadable event: {}</pre>", escape_html(&e.to_string()))
        },
    }
}

/// Minimal HTML escaping for text embedded in `<pre>` blocks.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_render_pretty_printed_in_order() {
        let events = vec![r#"{"a":1}"#.to_string(), r#"{"a":2}"#.to_string()];
        let html = render_history(&events);

        let first = html.find("\"a\": 1").expect("first event rendered");
        let second = html.find("\"a\": 2").expect("second event rendered");
        assert!(first < second, "events must render in insertion order");
    }

    #[test]
    fn empty_history_renders_document_without_blocks() {
        let html = render_history(&[]);

        assert!(html.contains("<div id=\"events\">"));
        assert!(!html.contains("<pre>"));
    }

    #[test]
    fn payload_text_is_html_escaped() {
        let events = vec![r#"{"xss":"<script>alert(1)</script>"}"#.to_string()];
        let html = render_history(&events);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn unparseable_entry_renders_error_block() {
        let events = vec!["not json at all".to_string(), r#"{"ok":true}"#.to_string()];
        let html = render_history(&events);

        assert!(html.contains("pre class=\"broken\""));
        // The good entry still renders.
        assert!(html.contains("\"ok\": true"));
    }

    #[test]
    fn escape_html_covers_metacharacters() {
        assert_eq!(escape_html(r#"<"&">"#), "&lt;&quot;&amp;&quot;&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
