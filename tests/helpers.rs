// Shared test helpers for mock aggregator responses.
//
// Builds `text/event-stream` bodies and history documents the way the aggregator
// sends them.

use indicator_console::{Config, LogLevel};
use serde_json::{json, Value};
use wiremock::ResponseTemplate;

/// Config pointing at a mock server's `/api` base.
#[allow(dead_code)] // Used by other test files
pub fn test_config(server_uri: &str) -> Config {
    Config {
        api_url: format!("{}/api", server_uri),
        log_level: LogLevel::Error,
        connect_timeout_seconds: 2,
        user_agent: "indicator_console_test/1.0".to_string(),
        ..Default::default()
    }
}

/// One server-sent event frame.
pub fn sse_frame(event: &str, id: &str, data: &Value) -> String {
    format!("event: {}\nid: {}\ndata: {}\n\n", event, id, data)
}

/// `fetching_start` naming `(id, name, has_source_code)` sources.
#[allow(dead_code)]
pub fn start_frame(request_id: &str, sources: &[(&str, &str, bool)]) -> String {
    let roster: Vec<Value> = sources
        .iter()
        .map(|(id, name, has_code)| {
            json!({
                "source": {"id": id, "slug": id, "name": name, "url": format!("https://{}.test", id)},
                "hasSourceCode": has_code
            })
        })
        .collect();
    sse_frame("fetching_start", request_id, &Value::Array(roster))
}

#[allow(dead_code)]
pub fn data_frame(source_id: &str, data: Value) -> String {
    sse_frame(
        "fetching_data",
        source_id,
        &json!({
            "timing": {"startedAt": "2024-05-01T10:00:00Z", "endedAt": "2024-05-01T10:00:01Z"},
            "data": data
        }),
    )
}

#[allow(dead_code)]
pub fn error_frame(source_id: &str, errors: Value) -> String {
    sse_frame("fetching_error", source_id, &errors)
}

/// 200 response carrying an event-stream body.
#[allow(dead_code)]
pub fn sse_response(frames: &[String]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(frames.concat(), "text/event-stream")
}
