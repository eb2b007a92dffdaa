use async_trait::async_trait;
use serde_json::Value;

use super::{list_items, payload, text};
use crate::api::AnalyticsApi;
use crate::core::view::{ProgressItem, Section, Stat, View};
use crate::router::{LoadContext, LoadError, ViewLoader};

/// Summary cards plus recent project progress.
pub struct DashboardLoader {
    analytics: AnalyticsApi,
}

impl DashboardLoader {
    pub fn new(analytics: AnalyticsApi) -> Self {
        Self { analytics }
    }
}

#[async_trait]
impl ViewLoader for DashboardLoader {
    async fn load(&self, _ctx: LoadContext) -> Result<View, LoadError> {
        let data = payload(self.analytics.dashboard().await)?;
        Ok(dashboard_view(&data))
    }
}

fn stat(data: &Value, label: &str, field: &str, trend_field: &str) -> Stat {
    Stat {
        label: label.to_string(),
        value: text(data, &[field]),
        trend: data
            .get(trend_field)
            .filter(|v| !v.is_null())
            .map(|_| text(data, &[trend_field])),
    }
}

fn dashboard_view(data: &Value) -> View {
    let stats = vec![
        stat(data, "Total Proyectos", "totalProjects", "projectsTrend"),
        stat(data, "Tareas Completadas", "completedTasks", "tasksTrend"),
        stat(data, "Miembros del Equipo", "teamMembers", "membersTrend"),
        stat(data, "Tiempo Dedicado", "hoursLogged", "hoursTrend"),
    ];

    let projects = list_items(data, "recentProjects")
        .iter()
        .map(|p| ProgressItem {
            name: text(p, &["name"]),
            percent: p
                .get("progress")
                .and_then(Value::as_u64)
                .map(|v| v.min(100) as u8)
                .unwrap_or(0),
        })
        .collect();

    View::new("Dashboard")
        .heading("Dashboard", "Bienvenido de nuevo, aquí está tu resumen")
        .with(Section::Stats { items: stats })
        .with(Section::Heading {
            text: "Proyectos Recientes".to_string(),
            subtitle: None,
        })
        .with(Section::Progress { items: projects })
}
