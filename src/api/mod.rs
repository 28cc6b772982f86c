//! Beer API
//!
//! Bindings to the game backend, organized by endpoint. Every call goes
//! either through the worker under `ApiConfig::base` or straight to
//! Supabase when it is configured.

mod beers;
mod leaderboard;
mod submit;

use gloo_net::http::{Method, RequestBuilder};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use thiserror::Error;

use crate::config::SupabaseConfig;

pub use beers::*;
pub use leaderboard::*;
pub use submit::*;

/// Characters left as-is in query values
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Longest body excerpt kept in error messages
const SNIPPET_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} for {url}\n{body}")]
    Http { url: String, status: u16, body: String },

    #[error("Expected JSON from {url}, got {status} {content_type}: {snippet}")]
    NotJson { url: String, status: u16, content_type: String, snippet: String },

    #[error("Invalid response from {url}: {message}")]
    Decode { url: String, message: String },
}

// ========================
// Requests
// ========================

/// A request described as data, sent by [`send`]
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn get(url: String) -> Self {
        Self { method: Method::GET, url, headers: Vec::new(), body: None }
    }

    pub fn post_json(url: String, body: &Value) -> Self {
        Self {
            method: Method::POST,
            url,
            headers: vec![("content-type", "application/json".to_string())],
            body: Some(body.to_string()),
        }
    }

    /// Add the anonymous Supabase credentials
    pub fn with_supabase_auth(mut self, sb: &SupabaseConfig) -> Self {
        self.headers.push(("apikey", sb.anon_key.clone()));
        self.headers.push(("Authorization", format!("Bearer {}", sb.anon_key)));
        self
    }
}

/// Encode `key=value` pairs into a query string
pub fn query_string(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, utf8_percent_encode(v, QUERY_VALUE)))
        .collect::<Vec<_>>()
        .join("&")
}

// ========================
// Responses
// ========================

/// Response body with the metadata needed for error reporting
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub url: String,
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl RawResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail on non-2xx statuses
    pub fn ensure_ok(self) -> Result<Self, ApiError> {
        if self.ok() {
            Ok(self)
        } else {
            Err(ApiError::Http { url: self.url, status: self.status, body: self.body })
        }
    }

    /// Parse the body, refusing anything not declared as JSON
    pub fn json(&self) -> Result<Value, ApiError> {
        if !self.content_type.contains("application/json") {
            return Err(ApiError::NotJson {
                url: self.url.clone(),
                status: self.status,
                content_type: self.content_type.clone(),
                snippet: self.body.chars().take(SNIPPET_CHARS).collect(),
            });
        }
        serde_json::from_str(&self.body)
            .map_err(|e| ApiError::Decode { url: self.url.clone(), message: e.to_string() })
    }
}

pub async fn send(request: ApiRequest) -> Result<RawResponse, ApiError> {
    log::debug!("[API] {} {}", request.method, request.url);

    let mut builder = RequestBuilder::new(&request.url).method(request.method.clone());
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    let prepared = match request.body {
        Some(body) => builder.body(body),
        None => builder.build(),
    }
    .map_err(|e| ApiError::Network(e.to_string()))?;

    let response = prepared.send().await.map_err(|e| {
        log::warn!("[API] {} failed: {}", request.url, e);
        ApiError::Network(e.to_string())
    })?;

    let status = response.status();
    let url = response.url();
    let content_type = response.headers().get("content-type").unwrap_or_default();
    let body = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;

    Ok(RawResponse { url: if url.is_empty() { request.url } else { url }, status, content_type, body })
}

// ========================
// Loose JSON helpers
// ========================

/// String form of a field, empty when missing or null
pub(crate) fn field_string(row: &Value, key: &str) -> String {
    match row.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Numeric form of a field, 0 when missing or not a number
pub(crate) fn field_number(row: &Value, key: &str) -> f64 {
    match row.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0)
            }
        }
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

/// Elements of a JSON array, nothing for any other shape
pub(crate) fn rows(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}
