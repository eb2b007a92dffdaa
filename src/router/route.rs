use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use indexmap::IndexMap;
use log::warn;

use crate::api::ApiError;
use crate::core::view::View;

/// Why a loader could not produce its view.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// A backing API call failed. The client has already notified the user.
    Api(ApiError),
    Message(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Api(e) => write!(f, "{}", e.message()),
            LoadError::Message(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<ApiError> for LoadError {
    fn from(e: ApiError) -> Self {
        LoadError::Api(e)
    }
}

/// Identifies one navigation. Still current until the controller starts
/// the next one.
#[derive(Debug, Clone)]
pub struct NavigationTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl NavigationTicket {
    pub(crate) fn new(generation: u64, latest: Arc<AtomicU64>) -> Self {
        Self { generation, latest }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False once a later navigation began. Work detached from a loader
    /// checks this before applying its result.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }
}

/// What a loader is told about the navigation it serves.
#[derive(Debug, Clone)]
pub struct LoadContext {
    pub route: String,
    pub ticket: NavigationTicket,
}

#[async_trait]
pub trait ViewLoader: Send + Sync {
    async fn load(&self, ctx: LoadContext) -> Result<View, LoadError>;
}

/// Adapts an async closure into a [`ViewLoader`].
pub struct LoaderFn<F>(F);

pub fn loader_fn<F, Fut>(f: F) -> LoaderFn<F>
where
    F: Fn(LoadContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<View, LoadError>> + Send,
{
    LoaderFn(f)
}

#[async_trait]
impl<F, Fut> ViewLoader for LoaderFn<F>
where
    F: Fn(LoadContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<View, LoadError>> + Send,
{
    async fn load(&self, ctx: LoadContext) -> Result<View, LoadError> {
        (self.0)(ctx).await
    }
}

#[derive(Clone)]
pub struct Route {
    pub id: String,
    pub title: String,
    pub loader: Arc<dyn ViewLoader>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("id", &self.id)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// Routes in registration order. Built once, then moved into the
/// controller which only ever reads it.
#[derive(Default, Clone, Debug)]
pub struct RouteTable {
    routes: IndexMap<String, Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        loader: impl ViewLoader + 'static,
    ) -> Self {
        let id = id.into();
        let route = Route {
            id: id.clone(),
            title: title.into(),
            loader: Arc::new(loader),
        };
        if self.routes.insert(id.clone(), route).is_some() {
            warn!("Route '{}' registered twice, keeping the last loader", id);
        }
        self
    }

    pub fn get(&self, id: &str) -> Option<&Route> {
        self.routes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.routes.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
