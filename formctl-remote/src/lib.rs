//! One-shot widget feed fetch.
//!
//! Widgets load their data with a single GET against a spreadsheet-backed
//! web app. There is deliberately no retry and no cancellation: a failed
//! load leaves the widget in its pre-fetch state and the caller surfaces
//! a status message. Three payload shapes exist in the wild and all are
//! accepted; anything else is a load failure.

use formctl_core::{FormError, Result, Row};
use serde_json::Value;
use tracing::{debug, warn};

/// A successfully parsed feed payload
#[derive(Debug, Clone, PartialEq)]
pub enum Feed {
    /// Flat option strings (dropdown and staff-list feeds)
    Options(Vec<String>),
    /// Row objects (register-table feeds)
    Rows(Vec<Row>),
}

impl Feed {
    /// Option strings, regardless of feed shape (rows yield nothing)
    pub fn into_options(self) -> Vec<String> {
        match self {
            Feed::Options(options) => options,
            Feed::Rows(_) => Vec::new(),
        }
    }

    /// Row objects, regardless of feed shape (options yield nothing)
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Feed::Options(_) => Vec::new(),
            Feed::Rows(rows) => rows,
        }
    }
}

/// Fetch and parse a feed. One request, no retry.
pub async fn fetch_feed(url: &str) -> Result<Feed> {
    debug!(%url, "fetching widget feed");
    let response = reqwest::get(url)
        .await
        .map_err(|e| FormError::fetch(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FormError::fetch(format!("HTTP status {}", status)));
    }

    let payload: Value = response
        .json()
        .await
        .map_err(|e| FormError::payload(format!("invalid JSON body: {}", e)))?;

    let feed = parse_payload(&payload);
    if let Err(err) = &feed {
        warn!(%url, error = %err, "feed rejected");
    }
    feed
}

/// Parse one of the accepted payload shapes:
///
/// - `{ "data": [[...]] }`: nested arrays flattened to option strings
/// - `{ "status": "success", "data": [...] }`: row objects; any other
///   status is a failure carrying the payload's `message`
/// - `{ "values": [[...]] }`: rows of cells, first cell per row
///
/// A top-level `error` field always wins and fails the load.
pub fn parse_payload(payload: &Value) -> Result<Feed> {
    let Some(object) = payload.as_object() else {
        return Err(FormError::payload("payload is not a JSON object"));
    };

    if let Some(error) = object.get("error") {
        return Err(FormError::payload(text_of(error)));
    }

    if let Some(status) = object.get("status").and_then(Value::as_str) {
        if status != "success" {
            let message = object
                .get("message")
                .map(text_of)
                .unwrap_or_else(|| format!("status was \"{}\"", status));
            return Err(FormError::payload(message));
        }
        let Some(rows) = object.get("data").and_then(Value::as_array) else {
            return Err(FormError::payload("success payload missing data array"));
        };
        let rows = rows
            .iter()
            .filter_map(|row| row.as_object().cloned())
            .collect();
        return Ok(Feed::Rows(rows));
    }

    if let Some(data) = object.get("data").and_then(Value::as_array) {
        return Ok(Feed::Options(flatten_options(data)));
    }

    if let Some(values) = object.get("values").and_then(Value::as_array) {
        let options = values
            .iter()
            .filter_map(|row| row.as_array())
            .filter_map(|cells| cells.first())
            .map(text_of)
            .filter(|s| !s.is_empty())
            .collect();
        return Ok(Feed::Options(options));
    }

    Err(FormError::payload("no data, values, or status field"))
}

/// Flatten arbitrarily nested arrays into a flat list of option strings
fn flatten_options(values: &[Value]) -> Vec<String> {
    let mut out = Vec::new();
    for value in values {
        match value {
            Value::Array(inner) => out.extend(flatten_options(inner)),
            other => {
                let text = text_of(other);
                if !text.is_empty() {
                    out.push(text);
                }
            }
        }
    }
    out
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
