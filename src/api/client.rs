//! # API Gateway Client
//!
//! Turns every outbound call into an [`ApiResponse`]. Callers never see a
//! transport error: failures are classified into [`ApiError`] variants,
//! logged, optionally surfaced through the [`Notifier`], and a 401 always
//! tears the session down.
//!
//! ```text
//! request(endpoint, config)
//!   ├── headers: defaults ← overrides ← Authorization (if stored, not overridden)
//!   ├── timeout(bound) { send → read body (json | text) → non-2xx = failure }
//!   └── on failure: classify → 401 side effects → notify (unless silent)
//! ```

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;

use super::types::{ApiError, ApiResponse, RequestConfig};
use crate::core::config::ResolvedConfig;
use crate::core::constants::{ErrorMessages, NOTIFICATION_MEDIUM, Severity, StorageKey};
use crate::core::host::{Location, Notifier};
use crate::core::preferences::read_language;
use crate::core::storage::Storage;

/// Connection settings for one client instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Where a 401 sends the user.
    pub login_path: String,
}

impl From<&ResolvedConfig> for ClientConfig {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout: config.timeout,
            login_path: config.login_path.clone(),
        }
    }
}

/// What went wrong before classification.
#[derive(Debug)]
enum Failure {
    Status { status: u16, body: Value },
    Transport(reqwest::Error),
    Timeout,
}

#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    default_headers: HeaderMap,
    http: reqwest::Client,
    storage: Storage,
    notifier: Arc<dyn Notifier>,
    location: Arc<dyn Location>,
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        storage: Storage,
        notifier: Arc<dyn Notifier>,
        location: Arc<dyn Location>,
    ) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            config: ClientConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
            default_headers,
            http: reqwest::Client::new(),
            storage,
            notifier,
            location,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn login_path(&self) -> &str {
        &self.config.login_path
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub(crate) fn location(&self) -> &Arc<dyn Location> {
        &self.location
    }

    // ------------------------------------------------------------------------
    // Token storage
    // ------------------------------------------------------------------------

    pub fn auth_token(&self) -> Option<String> {
        self.storage.get_entry(StorageKey::AuthToken)
    }

    pub(crate) fn set_auth_token(&self, token: &str) -> bool {
        self.storage.set_entry(StorageKey::AuthToken, token)
    }

    pub(crate) fn remove_auth_token(&self) -> bool {
        self.storage.remove_entry(StorageKey::AuthToken)
    }

    /// Defaults, then caller overrides, then the bearer token unless the
    /// caller already supplied an Authorization header.
    fn headers(&self, overrides: &HeaderMap) -> HeaderMap {
        let mut headers = self.default_headers.clone();
        for (name, value) in overrides {
            headers.insert(name.clone(), value.clone());
        }
        if !headers.contains_key(AUTHORIZATION) {
            if let Some(token) = self.auth_token() {
                match HeaderValue::from_str(&format!("Bearer {token}")) {
                    Ok(value) => {
                        headers.insert(AUTHORIZATION, value);
                    }
                    Err(e) => warn!("Stored auth token is not a valid header value: {}", e),
                }
            }
        }
        headers
    }

    // ------------------------------------------------------------------------
    // Request pipeline
    // ------------------------------------------------------------------------

    /// Executes one request. Always resolves to a normalized response.
    pub async fn request(&self, endpoint: &str, config: RequestConfig) -> ApiResponse {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let bound = config.timeout.unwrap_or(self.config.timeout);
        debug!("{} {} (timeout {:?})", config.method, url, bound);

        let mut builder = self
            .http
            .request(config.method.clone(), &url)
            .headers(self.headers(&config.headers));
        if !config.query.is_empty() {
            builder = builder.query(&config.query);
        }
        if config.sends_body() {
            if let Some(body) = &config.body {
                builder = builder.json(body);
            }
        }

        // Dropping the inner future on elapse aborts the in-flight request.
        let outcome = match tokio::time::timeout(bound, async {
            let response = builder.send().await.map_err(Failure::Transport)?;
            read_response(response).await
        })
        .await
        {
            Ok(outcome) => outcome,
            Err(_elapsed) => Err(Failure::Timeout),
        };

        match outcome {
            Ok((status, data)) => {
                debug!("{} {} -> {}", config.method, url, status);
                ApiResponse::ok(data, status)
            }
            Err(failure) => self.handle_error(failure, config.notify_on_error),
        }
    }

    fn handle_error(&self, failure: Failure, notify: bool) -> ApiResponse {
        let messages = ErrorMessages::for_language(read_language(&self.storage));
        let error = classify(failure, messages);
        warn!("API request failed: {}", error);

        if let ApiError::Unauthorized { .. } = error {
            self.teardown_session();
        }

        if notify {
            self.notifier
                .notify(error.message(), Severity::Error, NOTIFICATION_MEDIUM);
        }

        ApiResponse::failed(error)
    }

    /// Drops the stored token and sends the user to the login view unless
    /// they are already on it.
    fn teardown_session(&self) {
        self.remove_auth_token();
        if self.location.pathname() != self.config.login_path {
            info!("Unauthorized, redirecting to {}", self.config.login_path);
            self.location.assign(&self.config.login_path);
        }
    }

    // ------------------------------------------------------------------------
    // Method shorthands
    // ------------------------------------------------------------------------

    pub async fn get(&self, endpoint: &str) -> ApiResponse {
        self.request(endpoint, RequestConfig::new(Method::GET)).await
    }

    pub async fn post(&self, endpoint: &str, body: Option<Value>) -> ApiResponse {
        let mut config = RequestConfig::new(Method::POST);
        config.body = body;
        self.request(endpoint, config).await
    }

    pub async fn put(&self, endpoint: &str, body: Value) -> ApiResponse {
        self.request(endpoint, RequestConfig::new(Method::PUT).body(body))
            .await
    }

    pub async fn patch(&self, endpoint: &str, body: Value) -> ApiResponse {
        self.request(endpoint, RequestConfig::new(Method::PATCH).body(body))
            .await
    }

    pub async fn delete(&self, endpoint: &str) -> ApiResponse {
        self.request(endpoint, RequestConfig::new(Method::DELETE))
            .await
    }
}

/// Reads the body according to its declared content type. A non-2xx status
/// is a failure whatever the body holds; an unparseable error body is kept
/// as text so the status still reaches the caller.
async fn read_response(response: reqwest::Response) -> Result<(u16, Value), Failure> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    if !status.is_success() {
        let text = response.text().await.unwrap_or_else(|e| {
            warn!("Could not read error body (HTTP {}): {}", status.as_u16(), e);
            String::new()
        });
        let body = if is_json {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        } else {
            Value::String(text)
        };
        return Err(Failure::Status {
            status: status.as_u16(),
            body,
        });
    }

    let data = if is_json {
        response.json::<Value>().await.map_err(Failure::Transport)?
    } else {
        Value::String(response.text().await.map_err(Failure::Transport)?)
    };
    Ok((status.as_u16(), data))
}

fn server_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn classify(failure: Failure, messages: &ErrorMessages) -> ApiError {
    match failure {
        Failure::Status { status, body } => {
            let server = server_message(&body);
            let body = Some(body);
            match status {
                400 => ApiError::Validation {
                    status,
                    message: server.unwrap_or_else(|| messages.validation.to_string()),
                    body,
                },
                401 => ApiError::Unauthorized {
                    status,
                    message: messages.unauthorized.to_string(),
                    body,
                },
                404 => ApiError::NotFound {
                    status,
                    message: messages.not_found.to_string(),
                    body,
                },
                500 => ApiError::Server {
                    status,
                    message: messages.server.to_string(),
                    body,
                },
                _ => ApiError::Server {
                    status,
                    message: server.unwrap_or_else(|| messages.server.to_string()),
                    body,
                },
            }
        }
        Failure::Timeout => ApiError::Timeout {
            message: messages.timeout.to_string(),
        },
        Failure::Transport(e) if e.is_timeout() => ApiError::Timeout {
            message: messages.timeout.to_string(),
        },
        Failure::Transport(e) if e.is_connect() || e.is_request() => ApiError::Network {
            message: messages.network.to_string(),
        },
        Failure::Transport(e) => {
            let detail = e.to_string();
            ApiError::Unknown {
                message: if detail.is_empty() {
                    messages.unknown.to_string()
                } else {
                    detail
                },
            }
        }
    }
}
