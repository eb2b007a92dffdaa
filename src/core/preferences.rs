//! Theme and language preferences.
//!
//! This module is the only writer of the theme and language storage keys.
//! Other components may read them (the API client picks its error message
//! catalog from the language) but never write.

use log::info;
use serde::{Deserialize, Serialize};

use crate::core::constants::{Language, StorageKey};
use crate::core::storage::Storage;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

impl Theme {
    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }
}

#[derive(Clone)]
pub struct Preferences {
    storage: Storage,
}

impl Preferences {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn theme(&self) -> Theme {
        self.storage.get_entry(StorageKey::Theme).unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> bool {
        info!("Theme set to {}", theme.label());
        self.storage.set_entry(StorageKey::Theme, &theme)
    }

    /// Flips between light and dark. `auto` counts as light.
    pub fn toggle_theme(&self) -> Theme {
        let next = match self.theme() {
            Theme::Dark => Theme::Light,
            Theme::Light | Theme::Auto => Theme::Dark,
        };
        self.set_theme(next);
        next
    }

    pub fn language(&self) -> Language {
        read_language(&self.storage)
    }

    pub fn set_language(&self, language: Language) -> bool {
        self.storage.set_entry(StorageKey::Language, &language)
    }
}

/// Read-only access for components that are not the language's writer.
pub fn read_language(storage: &Storage) -> Language {
    storage.get_entry(StorageKey::Language).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let prefs = Preferences::new(Storage::in_memory("t"));
        assert_eq!(prefs.theme(), Theme::Light);
        assert_eq!(prefs.language(), Language::Es);
    }

    #[test]
    fn test_toggle_theme_persists() {
        let storage = Storage::in_memory("t");
        let prefs = Preferences::new(storage.clone());
        assert_eq!(prefs.toggle_theme(), Theme::Dark);
        assert_eq!(storage.get::<String>("t_theme").as_deref(), Some("dark"));
        assert_eq!(prefs.toggle_theme(), Theme::Light);
    }

    #[test]
    fn test_auto_toggles_to_dark() {
        let prefs = Preferences::new(Storage::in_memory("t"));
        prefs.set_theme(Theme::Auto);
        assert_eq!(prefs.toggle_theme(), Theme::Dark);
    }

    #[test]
    fn test_language_round_trip() {
        let storage = Storage::in_memory("t");
        let prefs = Preferences::new(storage.clone());
        assert!(prefs.set_language(Language::En));
        assert_eq!(read_language(&storage), Language::En);
    }
}
