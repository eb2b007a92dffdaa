//! # Console Adapter
//!
//! Host implementations for running the dashboard in a terminal: views are
//! printed as plain text, notifications queue as toasts, and hard
//! navigations are recorded for the command loop to act on.

use std::fmt::Write as _;
use std::sync::{Mutex, PoisonError};

use log::debug;

use crate::core::host::{ContainerRef, Location, NavLink, Renderer};
use crate::core::notify::Toast;
use crate::core::view::{Section, View};

/// Renders to stdout.
#[derive(Debug, Default)]
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn render_view(&self, container: &ContainerRef, view: &View) {
        debug!("Rendering '{}' into #{}", view.title, container.id());
        println!("{}", format_view(view));
    }

    fn set_title(&self, title: &str) {
        println!("\n=== {title} ===");
    }

    fn update_nav_links(&self, links: &[NavLink]) {
        println!("{}", format_nav(links));
    }

    fn set_busy(&self, _container: &ContainerRef, busy: bool) {
        if busy {
            println!("Cargando...");
        }
    }

    fn reset_scroll(&self, _container: &ContainerRef) {}
}

pub fn format_nav(links: &[NavLink]) -> String {
    links
        .iter()
        .map(|l| {
            if l.active {
                format!("[{}]", l.label)
            } else {
                l.label.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn format_view(view: &View) -> String {
    let mut out = String::new();
    for section in &view.sections {
        match section {
            Section::Heading { text, subtitle } => {
                let _ = writeln!(out, "\n# {text}");
                if let Some(sub) = subtitle {
                    let _ = writeln!(out, "  {sub}");
                }
            }
            Section::Paragraph { text } => {
                let _ = writeln!(out, "{text}");
            }
            Section::Stats { items } => {
                for stat in items {
                    let trend = stat
                        .trend
                        .as_deref()
                        .map(|t| format!(" ({t})"))
                        .unwrap_or_default();
                    let _ = writeln!(out, "  {:<22} {}{}", stat.label, stat.value, trend);
                }
            }
            Section::Table { columns, rows } => {
                let widths: Vec<usize> = columns
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        rows.iter()
                            .filter_map(|r| r.get(i))
                            .map(|cell| cell.chars().count())
                            .chain(std::iter::once(c.chars().count()))
                            .max()
                            .unwrap_or(0)
                    })
                    .collect();
                let _ = writeln!(out, "{}", table_row(columns, &widths));
                let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                let _ = writeln!(out, "{}", table_row(&rule, &widths));
                for row in rows {
                    let _ = writeln!(out, "{}", table_row(row, &widths));
                }
            }
            Section::Progress { items } => {
                for item in items {
                    let filled = usize::from(item.percent.min(100)) / 5;
                    let _ = writeln!(
                        out,
                        "  {:<24} [{}{}] {}%",
                        item.name,
                        "#".repeat(filled),
                        ".".repeat(20 - filled),
                        item.percent
                    );
                }
            }
            Section::Fields { items } => {
                for (label, value) in items {
                    let _ = writeln!(out, "  {label}: {value}");
                }
            }
            Section::Faq { items } => {
                for (question, answer) in items {
                    let _ = writeln!(out, "  ? {question}\n    {answer}");
                }
            }
            Section::ErrorPanel { heading, message } => {
                let _ = writeln!(out, "!! {heading}\n   {message}");
            }
        }
    }
    out
}

fn table_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}", w = *w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

pub fn format_toast(toast: &Toast) -> String {
    format!("[{}] {}", toast.severity.label(), toast.message)
}

/// Current path as seen by the API client, plus redirects it requested.
pub struct ConsoleLocation {
    path: Mutex<String>,
    redirects: Mutex<Vec<String>>,
}

impl ConsoleLocation {
    pub fn new(path: &str) -> Self {
        Self {
            path: Mutex::new(path.to_string()),
            redirects: Mutex::new(Vec::new()),
        }
    }

    /// Keeps the client's view of the path in step with the router.
    pub fn sync(&self, path: &str) {
        *self.path.lock().unwrap_or_else(PoisonError::into_inner) = path.to_string();
    }

    /// Redirects requested since the last call.
    pub fn take_redirects(&self) -> Vec<String> {
        std::mem::take(&mut *self.redirects.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Location for ConsoleLocation {
    fn pathname(&self) -> String {
        self.path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn assign(&self, url: &str) {
        self.sync(url);
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::view::{ProgressItem, Stat};

    #[test]
    fn test_format_nav_marks_active() {
        let links = vec![
            NavLink {
                route: "dashboard".into(),
                label: "Dashboard".into(),
                active: false,
            },
            NavLink {
                route: "help".into(),
                label: "Ayuda".into(),
                active: true,
            },
        ];
        assert_eq!(format_nav(&links), "Dashboard | [Ayuda]");
    }

    #[test]
    fn test_format_view_sections() {
        let view = View::new("t")
            .with(Section::Stats {
                items: vec![Stat::new("Total", "3")],
            })
            .with(Section::Table {
                columns: vec!["Nombre".into(), "Horas".into()],
                rows: vec![vec!["Ana".into(), "20".into()]],
            })
            .with(Section::Progress {
                items: vec![ProgressItem {
                    name: "p".into(),
                    percent: 50,
                }],
            });
        let text = format_view(&view);
        assert!(text.contains("Total"));
        assert!(text.contains("Nombre  Horas"));
        assert!(text.contains("Ana     20"));
        assert!(text.contains("[##########..........] 50%"));
    }

    #[test]
    fn test_location_records_redirects() {
        let location = ConsoleLocation::new("/dashboard");
        location.assign("/views/login.html");
        assert_eq!(location.pathname(), "/views/login.html");
        assert_eq!(location.take_redirects(), vec!["/views/login.html"]);
        assert!(location.take_redirects().is_empty());
    }
}
