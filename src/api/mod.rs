pub mod auth;
pub mod client;
pub mod resources;
pub mod routes;
pub mod types;

pub use auth::AuthApi;
pub use client::{ApiClient, ClientConfig};
pub use resources::{AnalyticsApi, ScheduleApi, SubjectApi, TeacherApi, UserApi};
pub use types::{ApiError, ApiResponse, RequestConfig};
