//! # View Descriptions
//!
//! Loaders do not produce markup. They return a [`View`]: a title plus a
//! list of content [`Section`]s. A presentation adapter (see
//! [`crate::console`]) decides how each section is drawn.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub title: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Heading { text: String, subtitle: Option<String> },
    Paragraph { text: String },
    Stats { items: Vec<Stat> },
    Table { columns: Vec<String>, rows: Vec<Vec<String>> },
    Progress { items: Vec<ProgressItem> },
    Fields { items: Vec<(String, String)> },
    Faq { items: Vec<(String, String)> },
    ErrorPanel { heading: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub label: String,
    pub value: String,
    pub trend: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressItem {
    pub name: String,
    /// 0..=100
    pub percent: u8,
}

impl View {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Builder-style section append.
    pub fn with(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn heading(self, text: impl Into<String>, subtitle: impl Into<String>) -> Self {
        self.with(Section::Heading {
            text: text.into(),
            subtitle: Some(subtitle.into()),
        })
    }

    /// The in-place panel shown when a route fails to load.
    pub fn error(message: impl Into<String>) -> Self {
        View::new("Error").with(Section::ErrorPanel {
            heading: "Error al cargar".to_string(),
            message: message.into(),
        })
    }

    pub fn is_error(&self) -> bool {
        self.sections
            .iter()
            .any(|s| matches!(s, Section::ErrorPanel { .. }))
    }
}

impl Stat {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            trend: None,
        }
    }
}
