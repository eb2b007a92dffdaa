//! # Session History
//!
//! Each navigable route maps to a URL `<route>.html` and a history entry
//! carrying `{route}` as its state. The state is the source of truth; URL
//! parsing is only a fallback for entries without state (first load,
//! bookmarked URL).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub route: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub state: Option<HistoryState>,
    pub url: String,
}

impl HistoryEntry {
    pub fn for_route(route: &str) -> Self {
        Self {
            state: Some(HistoryState {
                route: route.to_string(),
            }),
            url: route_url(route),
        }
    }
}

/// Delivered when the user moves through history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopStateEvent {
    pub state: Option<HistoryState>,
    pub path: String,
}

pub fn route_url(route: &str) -> String {
    format!("{route}.html")
}

/// Last path segment without its `.html` suffix, or `default_route` when
/// that leaves nothing.
pub fn route_from_path(path: &str, default_route: &str) -> String {
    let page = path.rsplit('/').next().unwrap_or("");
    let page = page.strip_suffix(".html").unwrap_or(page);
    if page.is_empty() {
        default_route.to_string()
    } else {
        page.to_string()
    }
}

pub trait History: Send {
    fn push_state(&mut self, entry: HistoryEntry);
    fn replace_state(&mut self, entry: HistoryEntry);
    fn current(&self) -> Option<&HistoryEntry>;
    /// Path of the current document.
    fn pathname(&self) -> String;
    /// Moves by `delta` entries. `None` if that falls outside the stack.
    fn go(&mut self, delta: isize) -> Option<PopStateEvent>;
}

/// Browser-style history stack. Pushing drops any forward entries.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    /// Directory the relative `<route>.html` URLs resolve against.
    base: String,
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl MemoryHistory {
    /// Starts at `initial_path` with no state, as a fresh page load would.
    pub fn new(initial_path: &str) -> Self {
        let base = match initial_path.rfind('/') {
            Some(i) => initial_path[..=i].to_string(),
            None => "/".to_string(),
        };
        Self {
            base,
            entries: vec![HistoryEntry {
                state: None,
                url: initial_path.to_string(),
            }],
            index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    fn resolve(&self, url: &str) -> String {
        if url.starts_with('/') {
            url.to_string()
        } else {
            format!("{}{}", self.base, url)
        }
    }
}

impl History for MemoryHistory {
    fn push_state(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.index + 1);
        let url = self.resolve(&entry.url);
        self.entries.push(HistoryEntry { url, ..entry });
        self.index = self.entries.len() - 1;
    }

    fn replace_state(&mut self, entry: HistoryEntry) {
        let url = self.resolve(&entry.url);
        if let Some(current) = self.entries.get_mut(self.index) {
            *current = HistoryEntry { url, ..entry };
        }
    }

    fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.index)
    }

    fn pathname(&self) -> String {
        self.current().map(|e| e.url.clone()).unwrap_or_default()
    }

    fn go(&mut self, delta: isize) -> Option<PopStateEvent> {
        let target = self.index.checked_add_signed(delta)?;
        let entry = self.entries.get(target)?;
        let event = PopStateEvent {
            state: entry.state.clone(),
            path: entry.url.clone(),
        };
        self.index = target;
        Some(event)
    }
}
