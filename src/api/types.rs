use std::fmt;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Every way a request can fail. Variants carry enough info for callers to
/// branch exhaustively; `status()` is 0 when no HTTP response was received.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 400. Message is the server's if it sent one.
    Validation { status: u16, message: String, body: Option<Value> },
    /// 401. Always tears the session down.
    Unauthorized { status: u16, message: String, body: Option<Value> },
    /// 404.
    NotFound { status: u16, message: String, body: Option<Value> },
    /// 500 and any other non-2xx status.
    Server { status: u16, message: String, body: Option<Value> },
    /// The request never reached a server (DNS, refused connection, ...).
    Network { message: String },
    /// The per-request bound elapsed and the request was aborted.
    Timeout { message: String },
    /// Anything else: undecodable bodies, client-side preconditions.
    Unknown { message: String },
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Validation { status, .. }
            | ApiError::Unauthorized { status, .. }
            | ApiError::NotFound { status, .. }
            | ApiError::Server { status, .. } => *status,
            ApiError::Network { .. } | ApiError::Timeout { .. } | ApiError::Unknown { .. } => 0,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation { message, .. }
            | ApiError::Unauthorized { message, .. }
            | ApiError::NotFound { message, .. }
            | ApiError::Server { message, .. }
            | ApiError::Network { message }
            | ApiError::Timeout { message }
            | ApiError::Unknown { message } => message,
        }
    }

    /// Raw response payload, kept for diagnostics only.
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Validation { body, .. }
            | ApiError::Unauthorized { body, .. }
            | ApiError::NotFound { body, .. }
            | ApiError::Server { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation",
            ApiError::Unauthorized { .. } => "unauthorized",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Server { .. } => "server",
            ApiError::Network { .. } => "network",
            ApiError::Timeout { .. } => "timeout",
            ApiError::Unknown { .. } => "unknown",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status() {
            0 => write!(f, "{} error: {}", self.class(), self.message()),
            status => write!(f, "{} error (HTTP {}): {}", self.class(), status, self.message()),
        }
    }
}

impl std::error::Error for ApiError {}

/// The normalized result of every API call.
///
/// Fields are private so the shape invariant holds by construction:
/// `success() == error().is_none()`, and `data()` is only populated on
/// success.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T = Value> {
    data: Option<T>,
    error: Option<ApiError>,
    status_code: u16,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, status_code: u16) -> Self {
        Self {
            data: Some(data),
            error: None,
            status_code,
        }
    }

    pub fn failed(error: ApiError) -> Self {
        Self {
            data: None,
            status_code: error.status(),
            error: Some(error),
        }
    }

    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// Classified message, `None` on success.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(ApiError::message)
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn into_result(self) -> Result<T, ApiError> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) => Err(ApiError::Unknown {
                message: "response carried no data".to_string(),
            }),
        }
    }
}

impl ApiResponse<Value> {
    /// Decodes the success payload into a concrete type.
    pub fn decode<D: DeserializeOwned>(&self) -> Option<D> {
        self.data
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Per-call request options. Built fresh for each call and consumed by
/// [`super::ApiClient::request`].
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    /// Overrides the client's default timeout.
    pub timeout: Option<Duration>,
    /// When false, failures are returned without a notification.
    pub notify_on_error: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
            query: Vec::new(),
            timeout: None,
            notify_on_error: true,
        }
    }
}

impl RequestConfig {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header override. Invalid names or values are skipped.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => log::warn!("Skipping invalid header override {}", name),
        }
        self
    }

    pub fn query<K: Into<String>, V: Into<String>>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn silent(mut self) -> Self {
        self.notify_on_error = false;
        self
    }

    /// Only mutating methods carry a body.
    pub fn sends_body(&self) -> bool {
        self.body.is_some()
            && matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
    }
}
