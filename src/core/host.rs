//! # Host Contracts
//!
//! The router and the API client never touch a display directly. They talk
//! to the host environment through three narrow traits:
//!
//! - [`Renderer`]: put a [`View`] into a container, plus the small set of
//!   page-level effects a transition needs (title, active link, scroll, busy
//!   state, icon refresh).
//! - [`Notifier`]: show a transient message.
//! - [`Location`]: where the host currently is, and hard navigation.

use std::time::Duration;

use crate::core::constants::Severity;
use crate::core::view::View;

/// Identifies the element a view is mounted into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerRef(String);

impl ContainerRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl Default for ContainerRef {
    fn default() -> Self {
        Self::new("main-content")
    }
}

/// One entry in the sidebar navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub route: String,
    pub label: String,
    pub active: bool,
}

pub trait Renderer: Send + Sync {
    /// Replaces the container's content.
    fn render_view(&self, container: &ContainerRef, view: &View);

    fn set_title(&self, title: &str);

    /// Called with the full link list after the active flag was updated.
    fn update_nav_links(&self, links: &[NavLink]);

    fn set_busy(&self, container: &ContainerRef, busy: bool);

    fn reset_scroll(&self, container: &ContainerRef);

    /// Post-render hook for icon materialization.
    fn refresh_icons(&self) {}
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity, duration: Duration);
}

pub trait Location: Send + Sync {
    /// Current document path, e.g. `/views/teachers.html`.
    fn pathname(&self) -> String;

    /// Full-document navigation away from the single-page shell.
    fn assign(&self, url: &str);
}
