//! # Dashboard Views
//!
//! The six routes of the dashboard and the loaders behind them. API-backed
//! loaders turn a failed response into [`LoadError::Api`]; the client has
//! already told the user, the router then mounts the error panel.

mod catalog;
mod dashboard;
mod pages;

use serde_json::Value;

use crate::api::{AnalyticsApi, ApiClient, ScheduleApi, SubjectApi, TeacherApi};
use crate::core::preferences::Preferences;
use crate::router::{LoadError, RouteTable};

pub use catalog::{ScheduleListLoader, SubjectListLoader, TeacherListLoader};
pub use dashboard::DashboardLoader;
pub use pages::{ConfigurationLoader, HelpLoader};

/// Registers every dashboard route in sidebar order.
pub fn default_routes(client: &ApiClient, preferences: Preferences) -> RouteTable {
    RouteTable::new()
        .register(
            "dashboard",
            "Dashboard",
            DashboardLoader::new(AnalyticsApi::new(client.clone())),
        )
        .register(
            "schedule",
            "Horarios",
            ScheduleListLoader::new(ScheduleApi::new(client.clone())),
        )
        .register(
            "teachers",
            "Profesores",
            TeacherListLoader::new(TeacherApi::new(client.clone())),
        )
        .register(
            "subjects",
            "Materias",
            SubjectListLoader::new(SubjectApi::new(client.clone())),
        )
        .register("configuration", "Configuración", ConfigurationLoader::new(preferences))
        .register("help", "Ayuda", HelpLoader)
}

/// Unwraps a response payload or converts the failure for the router.
fn payload(response: crate::api::ApiResponse) -> Result<Value, LoadError> {
    response.into_result().map_err(LoadError::from)
}

/// Items of a list payload: a bare array, or an object holding one under
/// `key` or `data`.
fn list_items<'a>(payload: &'a Value, key: &str) -> &'a [Value] {
    payload
        .as_array()
        .or_else(|| payload.get(key).and_then(Value::as_array))
        .or_else(|| payload.get("data").and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// First present field of `item` rendered as display text.
fn text(item: &Value, fields: &[&str]) -> String {
    fields
        .iter()
        .find_map(|f| item.get(*f).filter(|v| !v.is_null()))
        .map(display)
        .unwrap_or_else(|| "-".to_string())
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display).collect::<Vec<_>>().join(", "),
        Value::Bool(b) => if *b { "Sí" } else { "No" }.to_string(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}
