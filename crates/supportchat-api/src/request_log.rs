//! Debug tracing of backend traffic.

use reqwest::StatusCode;
use serde::Serialize;

const MAX_LOGGED_BODY: usize = 2000;

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        // Reserve space for "..." suffix
        let trunc_chars = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

/// Show only enough of a credential to tell keys apart
pub fn mask_api_key(api_key: &str) -> String {
    if api_key.is_empty() {
        return "<none>".to_string();
    }
    format!("{}***", api_key.chars().take(4).collect::<String>())
}

pub fn log_request<B: Serialize>(method: &str, url: &str, api_key: &str, body: Option<&B>) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }

    log::debug!("{} {} (X-API-Key: {})", method, url, mask_api_key(api_key));
    if let Some(body) = body {
        match serde_json::to_string(body) {
            Ok(json) => log::debug!("Request body: {}", safe_truncate(&json, MAX_LOGGED_BODY)),
            Err(e) => log::debug!("Error serializing request body: {}", e),
        }
    }
}

pub fn log_response(url: &str, status: StatusCode, body: &str) {
    log::debug!(
        "{} -> {} ({} bytes): {}",
        url,
        status,
        body.len(),
        safe_truncate(body, MAX_LOGGED_BODY)
    );
}
