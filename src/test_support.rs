//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;
use std::time::Duration;

use crate::core::constants::Severity;
use crate::core::host::{ContainerRef, Location, NavLink, Notifier, Renderer};
use crate::core::view::View;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    View(View),
    Title(String),
    Links(Vec<NavLink>),
    Busy(bool),
    ResetScroll,
    Icons,
}

/// Renderer that remembers every call in order.
#[derive(Default)]
pub struct RecordingRenderer {
    calls: Mutex<Vec<RenderCall>>,
}

impl RecordingRenderer {
    fn record(&self, call: RenderCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_view(&self) -> Option<View> {
        self.calls().into_iter().rev().find_map(|c| match c {
            RenderCall::View(v) => Some(v),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn render_view(&self, _container: &ContainerRef, view: &View) {
        self.record(RenderCall::View(view.clone()));
    }

    fn set_title(&self, title: &str) {
        self.record(RenderCall::Title(title.to_string()));
    }

    fn update_nav_links(&self, links: &[NavLink]) {
        self.record(RenderCall::Links(links.to_vec()));
    }

    fn set_busy(&self, _container: &ContainerRef, busy: bool) {
        self.record(RenderCall::Busy(busy));
    }

    fn reset_scroll(&self, _container: &ContainerRef) {
        self.record(RenderCall::ResetScroll);
    }

    fn refresh_icons(&self) {
        self.record(RenderCall::Icons);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, Severity, Duration)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, Severity, Duration)> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity, duration: Duration) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), severity, duration));
    }
}

/// Location fixed at one path that records hard navigations.
pub struct RecordingLocation {
    path: String,
    assigned: Mutex<Vec<String>>,
}

impl RecordingLocation {
    pub fn at(path: &str) -> Self {
        Self {
            path: path.to_string(),
            assigned: Mutex::new(Vec::new()),
        }
    }

    pub fn assigned(&self) -> Vec<String> {
        self.assigned.lock().unwrap().clone()
    }
}

impl Location for RecordingLocation {
    fn pathname(&self) -> String {
        self.path.clone()
    }

    fn assign(&self, url: &str) {
        self.assigned.lock().unwrap().push(url.to_string());
    }
}
