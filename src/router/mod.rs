pub mod controller;
pub mod history;
pub mod route;

pub use controller::{NavigationController, NavigationOutcome, NavigationState, Phase, RouterConfig};
pub use history::{History, HistoryEntry, HistoryState, MemoryHistory, PopStateEvent};
pub use route::{LoadContext, LoadError, NavigationTicket, Route, RouteTable, ViewLoader, loader_fn};
