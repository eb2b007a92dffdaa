use std::sync::{Arc, Mutex};
use std::time::Duration;

use qualarbi::api::{ApiClient, ClientConfig};
use qualarbi::core::constants::Severity;
use qualarbi::core::host::{ContainerRef, Location, NavLink, Notifier, Renderer};
use qualarbi::core::preferences::Preferences;
use qualarbi::core::storage::Storage;
use qualarbi::core::view::{Section, View};
use qualarbi::router::{
    HistoryState, LoadError, MemoryHistory, NavigationController, NavigationOutcome,
    NavigationTicket, Phase, PopStateEvent, RouteTable, RouterConfig, loader_fn,
};
use qualarbi::views::default_routes;
use serde_json::json;
use tokio::sync::Notify;
use tokio_test::{assert_pending, assert_ready};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

#[derive(Default)]
struct Screen {
    views: Mutex<Vec<View>>,
    busy: Mutex<Vec<bool>>,
}

impl Screen {
    fn last_view(&self) -> Option<View> {
        self.views.lock().unwrap().last().cloned()
    }

    fn busy_changes(&self) -> Vec<bool> {
        self.busy.lock().unwrap().clone()
    }
}

impl Renderer for Screen {
    fn render_view(&self, _container: &ContainerRef, view: &View) {
        self.views.lock().unwrap().push(view.clone());
    }

    fn set_title(&self, _title: &str) {}

    fn update_nav_links(&self, _links: &[NavLink]) {}

    fn set_busy(&self, _container: &ContainerRef, busy: bool) {
        self.busy.lock().unwrap().push(busy);
    }

    fn reset_scroll(&self, _container: &ContainerRef) {}
}

struct Silent;

impl Notifier for Silent {
    fn notify(&self, _message: &str, _severity: Severity, _duration: Duration) {}
}

impl Location for Silent {
    fn pathname(&self) -> String {
        "/views/dashboard.html".to_string()
    }

    fn assign(&self, _url: &str) {}
}

fn static_route(title: &'static str) -> impl qualarbi::router::ViewLoader {
    loader_fn(move |_ctx| async move { Ok(View::new(title)) })
}

fn router_config() -> RouterConfig {
    RouterConfig {
        app_name: "Qualarbi".to_string(),
        default_route: "dashboard".to_string(),
        container: ContainerRef::default(),
    }
}

fn router(routes: RouteTable, path: &str) -> (NavigationController, Arc<Screen>) {
    let screen = Arc::new(Screen::default());
    let controller = NavigationController::new(
        router_config(),
        routes,
        Box::new(MemoryHistory::new(path)),
        screen.clone(),
    );
    (controller, screen)
}

fn basic_routes() -> RouteTable {
    RouteTable::new()
        .register("dashboard", "Dashboard", static_route("dashboard"))
        .register("schedule", "Horarios", static_route("schedule"))
        .register("teachers", "Profesores", static_route("teachers"))
}

fn active_links(controller: &NavigationController) -> Vec<String> {
    controller
        .state()
        .nav_links
        .into_iter()
        .filter(|l| l.active)
        .map(|l| l.route)
        .collect()
}

// ============================================================================
// Navigation
// ============================================================================

#[tokio::test]
async fn test_navigate_mounts_route_and_marks_one_link() {
    let (controller, screen) = router(basic_routes(), "/views/dashboard.html");

    let outcome = controller.navigate("teachers").await;

    assert_eq!(outcome, NavigationOutcome::Mounted("teachers".to_string()));
    let state = controller.state();
    assert_eq!(state.current.as_deref(), Some("teachers"));
    assert_eq!(state.phase, Phase::Mounted("teachers".to_string()));
    assert_eq!(state.document_title, "Profesores - Qualarbi");
    assert!(!state.in_flight);
    assert_eq!(active_links(&controller), vec!["teachers"]);
    assert_eq!(controller.pathname(), "/views/teachers.html");
    assert_eq!(
        controller.current_entry().unwrap().state,
        Some(HistoryState {
            route: "teachers".to_string()
        })
    );
    assert_eq!(screen.busy_changes(), vec![true, false]);
}

#[tokio::test]
async fn test_navigate_to_unregistered_route_changes_nothing() {
    let (controller, _) = router(basic_routes(), "/views/dashboard.html");
    controller.start().await;
    let before = controller.state();

    let outcome = controller.navigate("billing").await;

    assert_eq!(outcome, NavigationOutcome::UnknownRoute("billing".to_string()));
    assert_eq!(controller.state(), before);
}

#[tokio::test]
async fn test_load_route_unregistered_falls_back_to_default() {
    let (controller, _) = router(basic_routes(), "/views/dashboard.html");

    let outcome = controller.load_route("ghost", true).await;

    assert_eq!(outcome, NavigationOutcome::Mounted("dashboard".to_string()));
    assert_eq!(controller.current_route().as_deref(), Some("dashboard"));
}

#[tokio::test]
async fn test_navigation_dropped_while_in_flight() {
    let gate = Arc::new(Notify::new());
    let loader_gate = gate.clone();
    let routes = RouteTable::new()
        .register("dashboard", "Dashboard", static_route("dashboard"))
        .register(
            "schedule",
            "Horarios",
            loader_fn(move |_ctx| {
                let gate = loader_gate.clone();
                async move {
                    gate.notified().await;
                    Ok(View::new("schedule"))
                }
            }),
        );
    let (controller, _) = router(routes, "/views/dashboard.html");

    let mut slow = tokio_test::task::spawn(controller.navigate("schedule"));
    assert_pending!(slow.poll());
    assert!(controller.is_in_flight());

    let during = controller.state();
    assert_eq!(controller.navigate("dashboard").await, NavigationOutcome::Busy);
    assert_eq!(controller.load_route("dashboard", true).await, NavigationOutcome::Busy);
    assert_eq!(controller.back().await, NavigationOutcome::Busy);
    assert_eq!(controller.state(), during);

    gate.notify_one();
    assert!(slow.is_woken());
    let outcome = assert_ready!(slow.poll());
    assert_eq!(outcome, NavigationOutcome::Mounted("schedule".to_string()));
    assert!(!controller.is_in_flight());
}

#[tokio::test]
async fn test_failed_loader_shows_error_panel_then_recovers() {
    let routes = basic_routes().register(
        "subjects",
        "Materias",
        loader_fn(|_ctx| async { Err(LoadError::Message("sin conexión".to_string())) }),
    );
    let (controller, screen) = router(routes, "/views/dashboard.html");

    let outcome = controller.navigate("subjects").await;

    assert!(matches!(outcome, NavigationOutcome::Failed { .. }));
    assert_eq!(controller.state().phase, Phase::Error("subjects".to_string()));
    let view = screen.last_view().unwrap();
    assert_eq!(
        view.sections[0],
        Section::ErrorPanel {
            heading: "Error al cargar".to_string(),
            message: "sin conexión".to_string(),
        }
    );
    assert_eq!(screen.busy_changes(), vec![true, false]);

    assert_eq!(
        controller.navigate("dashboard").await,
        NavigationOutcome::Mounted("dashboard".to_string())
    );
}

// ============================================================================
// History
// ============================================================================

#[tokio::test]
async fn test_popstate_twice_is_idempotent() {
    let (controller, screen) = router(basic_routes(), "/views/dashboard.html");
    controller.start().await;
    let event = PopStateEvent {
        state: Some(HistoryState {
            route: "schedule".to_string(),
        }),
        path: "/views/schedule.html".to_string(),
    };

    assert_eq!(
        controller.handle_popstate(event.clone()).await,
        NavigationOutcome::Mounted("schedule".to_string())
    );
    let renders = screen.views.lock().unwrap().len();
    let state = controller.state();

    assert_eq!(
        controller.handle_popstate(event).await,
        NavigationOutcome::Unchanged("schedule".to_string())
    );
    assert_eq!(controller.state(), state);
    assert_eq!(screen.views.lock().unwrap().len(), renders);
}

#[tokio::test]
async fn test_popstate_without_state_derives_route_from_path() {
    let (controller, _) = router(basic_routes(), "/views/dashboard.html");

    let outcome = controller
        .handle_popstate(PopStateEvent {
            state: None,
            path: "/views/teachers.html".to_string(),
        })
        .await;
    assert_eq!(outcome, NavigationOutcome::Mounted("teachers".to_string()));

    let outcome = controller
        .handle_popstate(PopStateEvent {
            state: None,
            path: "/views/".to_string(),
        })
        .await;
    assert_eq!(outcome, NavigationOutcome::Mounted("dashboard".to_string()));
}

#[tokio::test]
async fn test_popstate_to_unregistered_route_rewrites_entry() {
    let (controller, _) = router(basic_routes(), "/views/dashboard.html");
    controller.start().await;
    controller.navigate("teachers").await;

    let outcome = controller
        .handle_popstate(PopStateEvent {
            state: Some(HistoryState {
                route: "billing".to_string(),
            }),
            path: "/views/billing.html".to_string(),
        })
        .await;

    assert_eq!(outcome, NavigationOutcome::Mounted("dashboard".to_string()));
    assert_eq!(
        controller.current_entry().unwrap().state,
        Some(HistoryState {
            route: "dashboard".to_string()
        })
    );
    assert_eq!(controller.pathname(), "/views/dashboard.html");
}

#[tokio::test]
async fn test_back_and_forward_follow_history() {
    let (controller, _) = router(basic_routes(), "/views/dashboard.html");
    controller.start().await;
    controller.navigate("schedule").await;
    controller.navigate("teachers").await;

    assert_eq!(
        controller.back().await,
        NavigationOutcome::Mounted("schedule".to_string())
    );
    assert_eq!(
        controller.back().await,
        NavigationOutcome::Mounted("dashboard".to_string())
    );
    assert_eq!(controller.back().await, NavigationOutcome::NoHistory);
    assert_eq!(
        controller.forward().await,
        NavigationOutcome::Mounted("schedule".to_string())
    );
    assert_eq!(active_links(&controller), vec!["schedule"]);
}

#[tokio::test]
async fn test_ticket_goes_stale_after_next_navigation() {
    let seen: Arc<Mutex<Option<NavigationTicket>>> = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    let routes = basic_routes().register(
        "help",
        "Ayuda",
        loader_fn(move |ctx| {
            *sink.lock().unwrap() = Some(ctx.ticket.clone());
            async move { Ok(View::new("help")) }
        }),
    );
    let (controller, _) = router(routes, "/views/dashboard.html");

    controller.navigate("help").await;
    let ticket = seen.lock().unwrap().clone().unwrap();
    assert!(ticket.is_current());

    controller.navigate("dashboard").await;
    assert!(!ticket.is_current());
}

// ============================================================================
// Dashboard Routes
// ============================================================================

fn dashboard_router(server: &MockServer) -> (NavigationController, Arc<Screen>) {
    let storage = Storage::in_memory("qualarbi");
    let client = ApiClient::new(
        ClientConfig {
            base_url: format!("{}/api", server.uri()),
            timeout: Duration::from_secs(5),
            login_path: "/views/login.html".to_string(),
        },
        storage.clone(),
        Arc::new(Silent),
        Arc::new(Silent),
    );
    router(
        default_routes(&client, Preferences::new(storage)),
        "/views/dashboard.html",
    )
}

#[tokio::test]
async fn test_default_routes_registered_in_sidebar_order() {
    let server = MockServer::start().await;
    let (controller, _) = dashboard_router(&server);

    let labels: Vec<String> = controller
        .state()
        .nav_links
        .into_iter()
        .map(|l| l.label)
        .collect();
    assert_eq!(
        labels,
        vec!["Dashboard", "Horarios", "Profesores", "Materias", "Configuración", "Ayuda"]
    );
}

#[tokio::test]
async fn test_teachers_route_renders_table_from_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/teachers/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "teachers": [{"name": "Ana Pérez", "email": "ana@colegio.edu"}]
        })))
        .mount(&server)
        .await;
    let (controller, screen) = dashboard_router(&server);

    let outcome = controller.navigate("teachers").await;

    assert_eq!(outcome, NavigationOutcome::Mounted("teachers".to_string()));
    let view = screen.last_view().unwrap();
    let rows = view.sections.iter().find_map(|s| match s {
        Section::Table { rows, .. } => Some(rows.clone()),
        _ => None,
    });
    assert_eq!(rows.unwrap()[0][0], "Ana Pérez");
}

#[tokio::test]
async fn test_dashboard_route_api_failure_mounts_error_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/analytics/dashboard"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let (controller, screen) = dashboard_router(&server);

    let outcome = controller.start().await;

    assert_eq!(
        outcome,
        NavigationOutcome::Failed {
            route: "dashboard".to_string(),
            message: "Error del servidor. Intenta nuevamente más tarde.".to_string(),
        }
    );
    assert!(screen.last_view().unwrap().is_error());
}
