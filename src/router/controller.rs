//! # Navigation Controller
//!
//! Maps route identifiers to rendered views without reloading the shell,
//! keeping session history and the visible UI consistent.
//!
//! ```text
//!            navigate / loadRoute / popstate
//!   Idle ─────────────┐
//!                     ▼
//!   Mounted(r) ──► Loading(r') ──► Mounted(r')
//!   Error(r)   ──►      │
//!                       └────────► Error(r')   (loader failed or panicked)
//! ```
//!
//! At most one load is in flight. A navigation requested meanwhile is
//! dropped (not queued) and reported as [`NavigationOutcome::Busy`].
//!
//! Every public operation resolves to a [`NavigationOutcome`]; loader
//! failures become an in-place error view and the next navigation recovers
//! normally.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use log::{debug, error, info, warn};

use super::history::{History, HistoryEntry, PopStateEvent, route_from_path};
use super::route::{LoadContext, NavigationTicket, Route, RouteTable};
use crate::core::config::ResolvedConfig;
use crate::core::host::{ContainerRef, NavLink, Renderer};
use crate::core::view::View;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading(String),
    Mounted(String),
    Error(String),
}

/// Observable controller state. Only the load path mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub current: Option<String>,
    pub in_flight: bool,
    pub phase: Phase,
    pub document_title: String,
    pub nav_links: Vec<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Mounted(String),
    /// The loader failed; its error view is mounted instead.
    Failed { route: String, message: String },
    /// Already mounted on the route and the call came from history.
    Unchanged(String),
    /// Another load was in flight; nothing happened.
    Busy,
    /// Not in the route table (and no fallback could stand in).
    UnknownRoute(String),
    /// Back/forward past either end of the history stack.
    NoHistory,
}

#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub app_name: String,
    pub default_route: String,
    pub container: ContainerRef,
}

impl From<&ResolvedConfig> for RouterConfig {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            default_route: config.default_route.clone(),
            container: ContainerRef::default(),
        }
    }
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the in-flight flag if a load is dropped before it settles.
struct InFlightGuard<'a> {
    state: &'a Mutex<NavigationState>,
    route: String,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn new(state: &'a Mutex<NavigationState>, route: &str) -> Self {
        Self {
            state,
            route: route.to_string(),
            armed: true,
        }
    }

    fn settle(mut self, phase: Phase) {
        let mut state = lock(self.state);
        state.phase = phase;
        state.in_flight = false;
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Load of route '{}' was cancelled before settling", self.route);
            let mut state = lock(self.state);
            state.phase = Phase::Error(self.route.clone());
            state.in_flight = false;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "loader panicked".to_string()
    }
}

pub struct NavigationController {
    config: RouterConfig,
    routes: RouteTable,
    /// Registered route used when a request names an unknown one.
    fallback: Option<String>,
    state: Mutex<NavigationState>,
    history: Mutex<Box<dyn History>>,
    renderer: Arc<dyn Renderer>,
    generation: Arc<AtomicU64>,
}

impl NavigationController {
    pub fn new(
        config: RouterConfig,
        routes: RouteTable,
        history: Box<dyn History>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        let fallback = if routes.contains(&config.default_route) {
            Some(config.default_route.clone())
        } else {
            let first = routes.iter().next().map(|r| r.id.clone());
            warn!(
                "Default route '{}' is not registered, falling back to {:?}",
                config.default_route, first
            );
            first
        };

        let nav_links = routes
            .iter()
            .map(|r| NavLink {
                route: r.id.clone(),
                label: r.title.clone(),
                active: false,
            })
            .collect();

        Self {
            config,
            routes,
            fallback,
            state: Mutex::new(NavigationState {
                current: None,
                in_flight: false,
                phase: Phase::Idle,
                document_title: String::new(),
                nav_links,
            }),
            history: Mutex::new(history),
            renderer,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn state(&self) -> NavigationState {
        lock(&self.state).clone()
    }

    pub fn current_route(&self) -> Option<String> {
        lock(&self.state).current.clone()
    }

    pub fn is_in_flight(&self) -> bool {
        lock(&self.state).in_flight
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn container(&self) -> &ContainerRef {
        &self.config.container
    }

    pub fn current_entry(&self) -> Option<HistoryEntry> {
        lock(&self.history).current().cloned()
    }

    pub fn pathname(&self) -> String {
        lock(&self.history).pathname()
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Pushes a history entry for `route` and loads it.
    pub async fn navigate(&self, route: &str) -> NavigationOutcome {
        let Some(entry) = self.routes.get(route).cloned() else {
            error!("Route not found: {}", route);
            return NavigationOutcome::UnknownRoute(route.to_string());
        };
        let ticket = match self.begin(&entry.id, true) {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };
        lock(&self.history).push_state(HistoryEntry::for_route(&entry.id));
        self.run(entry, ticket).await
    }

    /// Loads `route` without pushing history. Unknown routes load the
    /// default route instead, and the current entry is rewritten to name
    /// it. With `update_history == false` (history
    /// driven), re-entering the mounted route is a no-op.
    pub async fn load_route(&self, route: &str, update_history: bool) -> NavigationOutcome {
        let Some(entry) = self.resolve(route) else {
            error!("Route not found and no fallback registered: {}", route);
            return NavigationOutcome::UnknownRoute(route.to_string());
        };
        let ticket = match self.begin(&entry.id, update_history) {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };
        if entry.id != route {
            // The entry named a route that is not registered; record the stand-in.
            lock(&self.history).replace_state(HistoryEntry::for_route(&entry.id));
        }
        self.run(entry, ticket).await
    }

    /// Back/forward handler. History state wins; the URL is only consulted
    /// when the entry carries none.
    pub async fn handle_popstate(&self, event: PopStateEvent) -> NavigationOutcome {
        let route = match event.state {
            Some(state) => state.route,
            None => {
                debug!("popstate without state, deriving route from {}", event.path);
                route_from_path(&event.path, &self.config.default_route)
            }
        };
        self.load_route(&route, false).await
    }

    pub async fn back(&self) -> NavigationOutcome {
        self.traverse(-1).await
    }

    pub async fn forward(&self) -> NavigationOutcome {
        self.traverse(1).await
    }

    async fn traverse(&self, delta: isize) -> NavigationOutcome {
        let busy = lock(&self.state).in_flight;
        if busy {
            return NavigationOutcome::Busy;
        }
        let event = lock(&self.history).go(delta);
        match event {
            Some(event) => self.handle_popstate(event).await,
            None => NavigationOutcome::NoHistory,
        }
    }

    /// First load: derive the route from the current URL, stamp the entry
    /// with its state and mount it.
    pub async fn start(&self) -> NavigationOutcome {
        let path = self.pathname();
        let requested = route_from_path(&path, &self.config.default_route);
        let Some(entry) = self.resolve(&requested) else {
            error!("No routes registered, nothing to start");
            return NavigationOutcome::UnknownRoute(requested);
        };
        info!("Starting at route '{}' (path {})", entry.id, path);
        lock(&self.history).replace_state(HistoryEntry::for_route(&entry.id));
        self.load_route(&entry.id, true).await
    }

    /// Sidebar link handler: only links naming a registered route navigate.
    pub async fn handle_link_click(&self, data_page: Option<&str>) -> Option<NavigationOutcome> {
        match data_page {
            Some(route) if self.routes.contains(route) => Some(self.navigate(route).await),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn resolve(&self, route: &str) -> Option<Route> {
        if let Some(entry) = self.routes.get(route) {
            return Some(entry.clone());
        }
        let fallback = self.fallback.as_deref()?;
        warn!("Unknown route '{}', loading '{}' instead", route, fallback);
        self.routes.get(fallback).cloned()
    }

    /// Claims the in-flight slot for `route`.
    fn begin(&self, route: &str, update_history: bool) -> Result<NavigationTicket, NavigationOutcome> {
        let mut state = lock(&self.state);
        if state.in_flight {
            debug!("Navigation to '{}' dropped: a load is in flight", route);
            return Err(NavigationOutcome::Busy);
        }
        if !update_history && state.phase == Phase::Mounted(route.to_string()) {
            return Err(NavigationOutcome::Unchanged(route.to_string()));
        }
        state.in_flight = true;
        state.current = Some(route.to_string());
        state.phase = Phase::Loading(route.to_string());
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(NavigationTicket::new(generation, self.generation.clone()))
    }

    async fn run(&self, entry: Route, ticket: NavigationTicket) -> NavigationOutcome {
        let guard = InFlightGuard::new(&self.state, &entry.id);
        let container = &self.config.container;
        let title = format!("{} - {}", entry.title, self.config.app_name);

        self.renderer.set_busy(container, true);
        self.renderer.set_title(&title);
        let links = {
            let mut state = lock(&self.state);
            state.document_title = title;
            for link in &mut state.nav_links {
                link.active = link.route == entry.id;
            }
            state.nav_links.clone()
        };
        self.renderer.update_nav_links(&links);

        let ctx = LoadContext {
            route: entry.id.clone(),
            ticket,
        };
        let result = AssertUnwindSafe(entry.loader.load(ctx))
            .catch_unwind()
            .await;

        let failure = match result {
            Ok(Ok(view)) => {
                self.renderer.render_view(container, &view);
                self.renderer.set_busy(container, false);
                self.renderer.reset_scroll(container);
                self.renderer.refresh_icons();
                info!("Mounted route '{}'", entry.id);
                guard.settle(Phase::Mounted(entry.id.clone()));
                return NavigationOutcome::Mounted(entry.id);
            }
            Ok(Err(e)) => e.to_string(),
            Err(panic) => panic_message(panic.as_ref()),
        };

        error!("Error loading route '{}': {}", entry.id, failure);
        self.renderer.render_view(container, &View::error(failure.clone()));
        self.renderer.set_busy(container, false);
        self.renderer.refresh_icons();
        guard.settle(Phase::Error(entry.id.clone()));
        NavigationOutcome::Failed {
            route: entry.id,
            message: failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::history::MemoryHistory;
    use crate::router::route::{LoadError, loader_fn};
    use crate::test_support::{RecordingRenderer, RenderCall};

    fn ok_loader(title: &'static str) -> impl crate::router::route::ViewLoader {
        loader_fn(move |_ctx| async move { Ok(View::new(title)) })
    }

    fn controller(path: &str) -> (NavigationController, Arc<RecordingRenderer>) {
        let renderer = Arc::new(RecordingRenderer::default());
        let routes = RouteTable::new()
            .register("dashboard", "Dashboard", ok_loader("dash"))
            .register("teachers", "Profesores", ok_loader("teachers"))
            .register(
                "broken",
                "Roto",
                loader_fn(|_ctx| async { Err(LoadError::Message("sin datos".into())) }),
            );
        let controller = NavigationController::new(
            RouterConfig {
                app_name: "Qualarbi".into(),
                default_route: "dashboard".into(),
                container: ContainerRef::default(),
            },
            routes,
            Box::new(MemoryHistory::new(path)),
            renderer.clone(),
        );
        (controller, renderer)
    }

    #[tokio::test]
    async fn test_start_mounts_route_from_url() {
        let (controller, renderer) = controller("/views/teachers.html");
        assert_eq!(controller.start().await, NavigationOutcome::Mounted("teachers".into()));
        assert_eq!(controller.state().document_title, "Profesores - Qualarbi");
        assert_eq!(
            controller.current_entry().unwrap().state.unwrap().route,
            "teachers"
        );
        assert!(renderer.calls().contains(&RenderCall::ResetScroll));
    }

    #[tokio::test]
    async fn test_start_with_empty_path_uses_default() {
        let (controller, _) = controller("/views/");
        assert_eq!(controller.start().await, NavigationOutcome::Mounted("dashboard".into()));
        assert_eq!(controller.pathname(), "/views/dashboard.html");
    }

    #[tokio::test]
    async fn test_failed_loader_renders_error_and_recovers() {
        let (controller, renderer) = controller("/views/dashboard.html");
        let outcome = controller.navigate("broken").await;
        assert_eq!(
            outcome,
            NavigationOutcome::Failed {
                route: "broken".into(),
                message: "sin datos".into()
            }
        );
        assert_eq!(controller.state().phase, Phase::Error("broken".into()));
        assert!(!controller.is_in_flight());
        assert!(renderer.last_view().unwrap().is_error());

        assert_eq!(controller.navigate("teachers").await, NavigationOutcome::Mounted("teachers".into()));
    }

    #[tokio::test]
    async fn test_panicking_loader_is_contained() {
        let renderer = Arc::new(RecordingRenderer::default());
        let routes = RouteTable::new().register(
            "dashboard",
            "Dashboard",
            loader_fn(|_ctx| async {
                if true {
                    panic!("kaboom");
                }
                Ok(View::new("unreachable"))
            }),
        );
        let controller = NavigationController::new(
            RouterConfig {
                app_name: "Qualarbi".into(),
                default_route: "dashboard".into(),
                container: ContainerRef::default(),
            },
            routes,
            Box::new(MemoryHistory::new("/")),
            renderer,
        );
        let outcome = controller.load_route("dashboard", true).await;
        assert_eq!(
            outcome,
            NavigationOutcome::Failed {
                route: "dashboard".into(),
                message: "kaboom".into()
            }
        );
        assert!(!controller.is_in_flight());
    }

    #[tokio::test]
    async fn test_missing_default_falls_back_to_first_route() {
        let controller = NavigationController::new(
            RouterConfig {
                app_name: "Qualarbi".into(),
                default_route: "nope".into(),
                container: ContainerRef::default(),
            },
            RouteTable::new().register("help", "Ayuda", ok_loader("help")),
            Box::new(MemoryHistory::new("/")),
            Arc::new(RecordingRenderer::default()),
        );
        assert_eq!(
            controller.load_route("ghost", true).await,
            NavigationOutcome::Mounted("help".into())
        );
    }

    #[tokio::test]
    async fn test_empty_table_reports_unknown_route() {
        let controller = NavigationController::new(
            RouterConfig {
                app_name: "Qualarbi".into(),
                default_route: "dashboard".into(),
                container: ContainerRef::default(),
            },
            RouteTable::new(),
            Box::new(MemoryHistory::new("/")),
            Arc::new(RecordingRenderer::default()),
        );
        assert_eq!(
            controller.start().await,
            NavigationOutcome::UnknownRoute("dashboard".into())
        );
    }

    #[tokio::test]
    async fn test_link_click_ignores_unregistered_routes() {
        let (controller, _) = controller("/views/dashboard.html");
        assert_eq!(controller.handle_link_click(Some("billing")).await, None);
        assert_eq!(controller.handle_link_click(None).await, None);
        assert_eq!(
            controller.handle_link_click(Some("teachers")).await,
            Some(NavigationOutcome::Mounted("teachers".into()))
        );
    }

    #[tokio::test]
    async fn test_cancelled_load_releases_guard() {
        let renderer = Arc::new(RecordingRenderer::default());
        let routes = RouteTable::new().register(
            "dashboard",
            "Dashboard",
            loader_fn(|_ctx| async {
                futures::future::pending::<()>().await;
                Ok(View::new("never"))
            }),
        );
        let controller = NavigationController::new(
            RouterConfig {
                app_name: "Qualarbi".into(),
                default_route: "dashboard".into(),
                container: ContainerRef::default(),
            },
            routes,
            Box::new(MemoryHistory::new("/")),
            renderer,
        );
        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            controller.navigate("dashboard"),
        )
        .await;
        assert!(timed_out.is_err());
        assert!(!controller.is_in_flight());
        assert_eq!(controller.state().phase, Phase::Error("dashboard".into()));
    }
}
