//! Read a dataset from the webhook receiver over HTTP.

use crate::errors::{AppError, AppResult};
use serde_json::Value;
use std::time::Duration;

/// Header the receiver checks against its shared secret.
pub const TOKEN_HEADER: &str = "X-Gitlab-Token";

const TIMEOUT: Duration = Duration::from_secs(30);

/// `GET {url}/events` and return the dataset text it carries.
///
/// The receiver answers with the dataset JSON encoded once more as a JSON
/// string; a plain dataset object is accepted too.
pub fn fetch_events(url: &str, token: Option<&str>) -> AppResult<String> {
    let base = url.trim_end_matches('/');
    if base.is_empty() {
        return Err(AppError::Remote("receiver url must not be empty".into()));
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()
        .map_err(|e| AppError::Remote(format!("failed to build HTTP client: {e}")))?;

    let mut request = client.get(format!("{base}/events"));
    if let Some(token) = token {
        request = request.header(TOKEN_HEADER, token);
    }

    let response = request
        .send()
        .map_err(|e| AppError::Remote(format!("GET {base}/events failed: {e}")))?;

    let status = response.status();
    let body = response
        .text()
        .map_err(|e| AppError::Remote(format!("failed to read response body: {e}")))?;

    if !status.is_success() {
        return Err(AppError::Remote(format!(
            "GET {base}/events returned {}: {}",
            status.as_u16(),
            body.chars().take(240).collect::<String>()
        )));
    }

    match serde_json::from_str::<Value>(&body)? {
        Value::String(inner) => Ok(inner),
        Value::Object(_) => Ok(body),
        other => Err(AppError::Remote(format!(
            "unexpected response: {}",
            other.to_string().chars().take(80).collect::<String>()
        ))),
    }
}
