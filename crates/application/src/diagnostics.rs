//! Human-readable rendering of request/response exchanges.

use std::fmt::Write;

use reqres_domain::request::RequestSpec;
use reqres_domain::response::ResponseSpec;

const RULE_WIDTH: usize = 50;

/// Renders one exchange as a text block.
///
/// The response body is pretty-printed when it parses as JSON and shown
/// verbatim otherwise.
#[must_use]
pub fn render_exchange(request: &RequestSpec, response: &ResponseSpec) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "=== {} Request to {} ===",
        request.method,
        request.display_url()
    );
    // An empty object counts as no body.
    if let Some(body) = request
        .body
        .as_ref()
        .filter(|body| body.as_object().is_none_or(|object| !object.is_empty()))
    {
        let _ = writeln!(out, "Request body: {}", pretty_json(body));
    }
    let _ = writeln!(out, "Status code: {}", response.status);
    let _ = writeln!(out, "Response body: {}", render_body(response));
    out.push_str(&"=".repeat(RULE_WIDTH));
    out
}

fn render_body(response: &ResponseSpec) -> String {
    response
        .body_as_json()
        .map_or_else(|_| response.body.clone(), |json| pretty_json(&json))
}

fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
