//! Resource APIs for schedules, teachers, subjects, analytics and users.
//!
//! All list calls accept optional filter/pagination pairs which are sent as
//! the query string.

use reqwest::Method;
use serde_json::{Value, json};

use super::client::ApiClient;
use super::routes;
use super::types::{ApiResponse, RequestConfig};
use crate::core::constants::ExportFormat;

pub type Filters<'a> = &'a [(&'a str, &'a str)];

async fn list(client: &ApiClient, endpoint: &str, filters: Filters<'_>) -> ApiResponse {
    let config = RequestConfig::new(Method::GET).query(filters.iter().copied());
    client.request(endpoint, config).await
}

#[derive(Clone)]
pub struct ScheduleApi {
    client: ApiClient,
}

impl ScheduleApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn generate(&self, params: Value) -> ApiResponse {
        self.client
            .post(routes::schedules::GENERATE, Some(params))
            .await
    }

    pub async fn list(&self, filters: Filters<'_>) -> ApiResponse {
        list(&self.client, routes::schedules::LIST, filters).await
    }

    pub async fn get(&self, id: &str) -> ApiResponse {
        self.client.get(&routes::schedules::by_id(id)).await
    }

    pub async fn update(&self, id: &str, data: Value) -> ApiResponse {
        self.client.put(&routes::schedules::by_id(id), data).await
    }

    pub async fn delete(&self, id: &str) -> ApiResponse {
        self.client.delete(&routes::schedules::by_id(id)).await
    }

    pub async fn export(&self, id: &str, format: ExportFormat) -> ApiResponse {
        let config = RequestConfig::new(Method::GET).query([("format", format.as_str())]);
        self.client
            .request(&routes::schedules::export(id), config)
            .await
    }
}

#[derive(Clone)]
pub struct TeacherApi {
    client: ApiClient,
}

impl TeacherApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: Filters<'_>) -> ApiResponse {
        list(&self.client, routes::teachers::LIST, filters).await
    }

    pub async fn create(&self, data: Value) -> ApiResponse {
        self.client
            .post(routes::teachers::CREATE, Some(data))
            .await
    }

    pub async fn get(&self, id: &str) -> ApiResponse {
        self.client.get(&routes::teachers::by_id(id)).await
    }

    pub async fn update(&self, id: &str, data: Value) -> ApiResponse {
        self.client.put(&routes::teachers::by_id(id), data).await
    }

    pub async fn delete(&self, id: &str) -> ApiResponse {
        self.client.delete(&routes::teachers::by_id(id)).await
    }

    pub async fn availability(&self, id: &str) -> ApiResponse {
        self.client.get(&routes::teachers::availability(id)).await
    }

    pub async fn update_availability(&self, id: &str, availability: Value) -> ApiResponse {
        self.client
            .put(
                &routes::teachers::availability(id),
                json!({ "availability": availability }),
            )
            .await
    }
}

#[derive(Clone)]
pub struct SubjectApi {
    client: ApiClient,
}

impl SubjectApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: Filters<'_>) -> ApiResponse {
        list(&self.client, routes::subjects::LIST, filters).await
    }

    pub async fn create(&self, data: Value) -> ApiResponse {
        self.client
            .post(routes::subjects::CREATE, Some(data))
            .await
    }

    pub async fn get(&self, id: &str) -> ApiResponse {
        self.client.get(&routes::subjects::by_id(id)).await
    }

    pub async fn update(&self, id: &str, data: Value) -> ApiResponse {
        self.client.put(&routes::subjects::by_id(id), data).await
    }

    pub async fn delete(&self, id: &str) -> ApiResponse {
        self.client.delete(&routes::subjects::by_id(id)).await
    }
}

#[derive(Clone)]
pub struct AnalyticsApi {
    client: ApiClient,
}

impl AnalyticsApi {
    pub const DEFAULT_PERIOD: &'static str = "month";

    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn dashboard(&self) -> ApiResponse {
        self.client.get(routes::analytics::DASHBOARD).await
    }

    pub async fn projects(&self, period: &str) -> ApiResponse {
        let config = RequestConfig::new(Method::GET).query([("period", period)]);
        self.client
            .request(routes::analytics::PROJECTS, config)
            .await
    }

    pub async fn teachers(&self) -> ApiResponse {
        self.client.get(routes::analytics::TEACHERS).await
    }

    pub async fn subjects(&self) -> ApiResponse {
        self.client.get(routes::analytics::SUBJECTS).await
    }
}

#[derive(Clone)]
pub struct UserApi {
    client: ApiClient,
}

impl UserApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn profile(&self) -> ApiResponse {
        self.client.get(routes::users::PROFILE).await
    }

    pub async fn update_profile(&self, data: Value) -> ApiResponse {
        self.client.put(routes::users::UPDATE, data).await
    }

    pub async fn delete_account(&self) -> ApiResponse {
        self.client.delete(routes::users::DELETE).await
    }
}
