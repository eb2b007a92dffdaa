//! # Session Operations
//!
//! Thin compositions over [`ApiClient::request`] that own the auth keys in
//! persistent storage:
//!
//! | key | written by | cleared by |
//! |---|---|---|
//! | auth token | login, register, refresh | logout, any 401 |
//! | refresh token | login | logout |
//! | user data | login, register | logout |
//! | remember me | login | logout |
//!
//! There is no expiry timer. A stale token is discovered by the next call
//! that comes back 401.

use log::{info, warn};
use serde_json::{Value, json};

use super::client::ApiClient;
use super::routes;
use super::types::{ApiError, ApiResponse};
use crate::core::constants::StorageKey;

#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

fn field<'a>(response: &'a ApiResponse, name: &str) -> Option<&'a Value> {
    response
        .data()
        .and_then(|d| d.get(name))
        .filter(|v| !v.is_null())
}

fn token(response: &ApiResponse, name: &str) -> Option<String> {
    field(response, name)
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, email: &str, password: &str, remember: bool) -> ApiResponse {
        let response = self
            .client
            .post(
                routes::auth::LOGIN,
                Some(json!({ "email": email, "password": password })),
            )
            .await;

        if response.success() {
            if let Some(auth_token) = token(&response, "token") {
                let storage = self.client.storage();
                self.client.set_auth_token(&auth_token);
                if let Some(refresh) = token(&response, "refreshToken") {
                    storage.set_entry(StorageKey::RefreshToken, &refresh);
                }
                if let Some(user) = field(&response, "user") {
                    storage.set_entry(StorageKey::UserData, user);
                }
                storage.set_entry(StorageKey::RememberMe, &remember);
                info!("Logged in as {}", email);
            }
        }
        response
    }

    pub async fn register(&self, user_data: Value) -> ApiResponse {
        let response = self
            .client
            .post(routes::auth::REGISTER, Some(user_data))
            .await;

        if response.success() {
            if let Some(auth_token) = token(&response, "token") {
                self.client.set_auth_token(&auth_token);
                if let Some(user) = field(&response, "user") {
                    self.client.storage().set_entry(StorageKey::UserData, user);
                }
                info!("Registered new account");
            }
        }
        response
    }

    /// Tells the backend, then clears the session and leaves for the login
    /// view whatever the backend answered.
    pub async fn logout(&self) -> ApiResponse {
        let response = self.client.post(routes::auth::LOGOUT, None).await;
        if !response.success() {
            warn!("Logout call failed, clearing session anyway");
        }

        let storage = self.client.storage();
        for key in StorageKey::SESSION {
            storage.remove_entry(key);
        }
        // A 401 on the logout call itself already redirected.
        if !matches!(response.error(), Some(ApiError::Unauthorized { .. })) {
            self.client.location().assign(self.client.login_path());
        }
        response
    }

    pub async fn refresh_token(&self) -> ApiResponse {
        let refresh: Option<String> = self.client.storage().get_entry(StorageKey::RefreshToken);
        let Some(refresh) = refresh else {
            return ApiResponse::failed(ApiError::Unknown {
                message: "No refresh token available".to_string(),
            });
        };

        let response = self
            .client
            .post(routes::auth::REFRESH, Some(json!({ "refreshToken": refresh })))
            .await;

        if response.success() {
            if let Some(auth_token) = token(&response, "token") {
                self.client.set_auth_token(&auth_token);
            }
        }
        response
    }

    pub async fn forgot_password(&self, email: &str) -> ApiResponse {
        self.client
            .post(routes::auth::FORGOT_PASSWORD, Some(json!({ "email": email })))
            .await
    }

    pub async fn reset_password(&self, reset_token: &str, new_password: &str) -> ApiResponse {
        self.client
            .post(
                routes::auth::RESET_PASSWORD,
                Some(json!({ "token": reset_token, "newPassword": new_password })),
            )
            .await
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.auth_token().is_some()
    }

    /// Cached profile from the last login or registration.
    pub fn current_user(&self) -> Option<Value> {
        self.client.storage().get_entry(StorageKey::UserData)
    }

    pub fn remember_me(&self) -> bool {
        self.client
            .storage()
            .get_entry(StorageKey::RememberMe)
            .unwrap_or(false)
    }
}
