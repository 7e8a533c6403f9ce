//! API error types and display normalization

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// Shown when nothing more specific can be extracted from a failure.
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// Failure of a call against the backend.
///
/// Cloneable so a single refresh failure can be handed to every request
/// queued behind it.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Server answered with a non-2xx status
    #[error("HTTP {status}{}", payload_suffix(.payload))]
    Status { status: u16, payload: Option<Value> },

    /// No response: connection refused, DNS, TLS, timeout
    #[error("Request failed: {0}")]
    Transport(#[source] Arc<reqwest::Error>),

    /// Response arrived but its body did not have the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Request could not be built (bad path, unreadable attachment, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request was rejected with 401 and the token refresh it waited on failed
    #[error("Session expired: {cause}")]
    RefreshFailed {
        unauthorized: Box<ApiError>,
        cause: Arc<ApiError>,
    },

    /// The refresh this request waited on was dropped before completing
    #[error("Token refresh was abandoned")]
    RefreshAbandoned,

    /// Client could not be constructed
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

fn payload_suffix(payload: &Option<Value>) -> String {
    match payload {
        Some(Value::String(s)) => format!(": {}", s),
        Some(v) => format!(": {}", v),
        None => String::new(),
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(Arc::new(e))
    }
}

impl ApiError {
    /// HTTP status the failure maps to, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::RefreshFailed { unauthorized, .. } => unauthorized.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// Single human-readable line for display.
    pub fn to_message(&self) -> String {
        to_message(self)
    }
}

/// Reduce any failure to one display string.
///
/// Precedence, first match wins:
/// 1. payload mapping whose first value is a list: its first string
/// 2. payload mapping whose first value is a string: that string
/// 3. payload that is itself a string
/// 4. payload `message`, then `detail`
/// 5. transport-level message
/// 6. [`FALLBACK_MESSAGE`]
pub fn to_message(error: &ApiError) -> String {
    match error {
        ApiError::Status { payload, .. } => payload
            .as_ref()
            .and_then(payload_message)
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
        ApiError::RefreshFailed { cause, .. } => to_message(cause),
        ApiError::Transport(e) => non_empty(e.to_string()),
        ApiError::Decode(msg) | ApiError::InvalidRequest(msg) | ApiError::Configuration(msg) => {
            non_empty(msg.clone())
        }
        ApiError::RefreshAbandoned => error.to_string(),
    }
}

fn non_empty(msg: String) -> String {
    if msg.is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        msg
    }
}

fn payload_message(payload: &Value) -> Option<String> {
    let first = match payload {
        Value::Object(map) => map.values().next(),
        Value::Array(items) => items.first(),
        Value::String(s) if !s.is_empty() => return Some(s.clone()),
        _ => None,
    };

    match first {
        Some(Value::Array(items)) => {
            if let Some(Value::String(s)) = items.first() {
                if !s.is_empty() {
                    return Some(s.clone());
                }
            }
        }
        Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
        _ => {}
    }

    ["message", "detail"]
        .iter()
        .find_map(|key| payload.get(key).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
