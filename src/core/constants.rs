//! # Application Constants
//!
//! Fixed values shared by the router, the API client and the console adapter.
//! Anything a deployment may want to change lives in [`crate::core::config`]
//! instead; what remains here is the vocabulary of the dashboard itself.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "Qualarbi";
pub const APP_VERSION: &str = "1.0.0";

// ============================================================================
// Persistent Storage Keys
// ============================================================================

/// Every key the dashboard keeps in the persistent store.
///
/// Each key has exactly one writer: the auth keys belong to the API client,
/// theme and language belong to [`crate::core::preferences`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    AuthToken,
    RefreshToken,
    UserData,
    Theme,
    Language,
    RememberMe,
}

impl StorageKey {
    pub const ALL: [StorageKey; 6] = [
        StorageKey::AuthToken,
        StorageKey::RefreshToken,
        StorageKey::UserData,
        StorageKey::Theme,
        StorageKey::Language,
        StorageKey::RememberMe,
    ];

    /// Keys cleared by a session teardown.
    pub const SESSION: [StorageKey; 4] = [
        StorageKey::AuthToken,
        StorageKey::RefreshToken,
        StorageKey::UserData,
        StorageKey::RememberMe,
    ];

    /// Unprefixed key name.
    pub fn name(self) -> &'static str {
        match self {
            StorageKey::AuthToken => "auth_token",
            StorageKey::RefreshToken => "refresh_token",
            StorageKey::UserData => "user_data",
            StorageKey::Theme => "theme",
            StorageKey::Language => "language",
            StorageKey::RememberMe => "remember_me",
        }
    }

    /// Key as written to the store, e.g. `qualarbi_auth_token`.
    pub fn namespaced(self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.name())
    }
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

pub const NOTIFICATION_SHORT: Duration = Duration::from_millis(3000);
pub const NOTIFICATION_MEDIUM: Duration = Duration::from_millis(5000);
pub const NOTIFICATION_LONG: Duration = Duration::from_millis(8000);

// ============================================================================
// Localized Messages
// ============================================================================

/// Interface language. Spanish is the product default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "es" => Some(Language::Es),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

/// Generic messages for each failure class, used when the backend does not
/// supply its own.
#[derive(Debug, Clone, Copy)]
pub struct ErrorMessages {
    pub network: &'static str,
    pub server: &'static str,
    pub unauthorized: &'static str,
    pub not_found: &'static str,
    pub validation: &'static str,
    pub timeout: &'static str,
    pub unknown: &'static str,
}

const ERRORS_ES: ErrorMessages = ErrorMessages {
    network: "Error de conexión. Por favor, verifica tu conexión a internet.",
    server: "Error del servidor. Intenta nuevamente más tarde.",
    unauthorized: "No tienes permisos para realizar esta acción.",
    not_found: "El recurso solicitado no fue encontrado.",
    validation: "Los datos ingresados no son válidos.",
    timeout: "La solicitud ha excedido el tiempo de espera.",
    unknown: "Ha ocurrido un error inesperado.",
};

const ERRORS_EN: ErrorMessages = ErrorMessages {
    network: "Connection error. Please check your internet connection.",
    server: "Server error. Please try again later.",
    unauthorized: "You are not allowed to perform this action.",
    not_found: "The requested resource was not found.",
    validation: "The submitted data is not valid.",
    timeout: "The request timed out.",
    unknown: "An unexpected error occurred.",
};

impl ErrorMessages {
    pub fn for_language(language: Language) -> &'static ErrorMessages {
        match language {
            Language::Es => &ERRORS_ES,
            Language::En => &ERRORS_EN,
        }
    }
}

pub const LOGIN_SUCCESS: &str = "¡Bienvenido de vuelta!";
pub const REGISTER_SUCCESS: &str = "¡Cuenta creada exitosamente!";

// ============================================================================
// Scheduling Vocabulary
// ============================================================================

/// Tuning constants for the timetable generator. The generator itself runs
/// on the backend; these are sent along with generation requests.
pub mod schedule_generation {
    pub const MAX_ITERATIONS: u32 = 10_000;
    pub const POPULATION_SIZE: u32 = 100;
    pub const MUTATION_RATE: f64 = 0.1;
    pub const CROSSOVER_RATE: f64 = 0.8;
    pub const ELITISM: f64 = 0.2;
    pub const MAX_CONSECUTIVE_CLASSES: u32 = 3;
    /// Minutes.
    pub const MIN_BREAK_TIME: u32 = 15;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weekday {
    pub id: u8,
    pub name: &'static str,
    pub short: &'static str,
}

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday { id: 1, name: "Lunes", short: "L" },
    Weekday { id: 2, name: "Martes", short: "M" },
    Weekday { id: 3, name: "Miércoles", short: "Mi" },
    Weekday { id: 4, name: "Jueves", short: "J" },
    Weekday { id: 5, name: "Viernes", short: "V" },
    Weekday { id: 6, name: "Sábado", short: "S" },
    Weekday { id: 7, name: "Domingo", short: "D" },
];

/// A one-hour teaching slot, `start`/`end` in 24h `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassPeriod {
    pub id: u8,
    pub start: &'static str,
    pub end: &'static str,
}

pub const CLASS_PERIODS: [ClassPeriod; 10] = [
    ClassPeriod { id: 1, start: "07:00", end: "08:00" },
    ClassPeriod { id: 2, start: "08:00", end: "09:00" },
    ClassPeriod { id: 3, start: "09:00", end: "10:00" },
    ClassPeriod { id: 4, start: "10:00", end: "11:00" },
    ClassPeriod { id: 5, start: "11:00", end: "12:00" },
    ClassPeriod { id: 6, start: "12:00", end: "13:00" },
    ClassPeriod { id: 7, start: "13:00", end: "14:00" },
    ClassPeriod { id: 8, start: "14:00", end: "15:00" },
    ClassPeriod { id: 9, start: "15:00", end: "16:00" },
    ClassPeriod { id: 10, start: "16:00", end: "17:00" },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Coordinator,
    Teacher,
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Create,
    Read,
    Update,
    Delete,
    Generate,
    Export,
}

impl UserRole {
    pub fn permissions(self) -> &'static [Permission] {
        use Permission::*;
        match self {
            UserRole::Admin => &[Create, Read, Update, Delete, Generate, Export],
            UserRole::Coordinator => &[Create, Read, Update, Generate, Export],
            UserRole::Teacher => &[Read, Export],
            UserRole::Viewer => &[Read],
        }
    }

    pub fn can(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}
