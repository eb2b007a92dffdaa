//! # Core
//!
//! Everything the router and the API client share: configuration,
//! constants, persistent storage, preferences and the contracts the host
//! environment fulfils.
//!
//! ```text
//!     ┌──────────┐    ┌──────────┐
//!     │  router  │    │   api    │
//!     └────┬─────┘    └────┬─────┘
//!          │               │
//!          ▼               ▼
//!   ┌─────────────────────────────────┐
//!   │              CORE               │
//!   │  host traits · view · storage   │
//!   │  preferences · config · consts  │
//!   └───────────────┬─────────────────┘
//!                   │ implemented by
//!                   ▼
//!            console / tests
//! ```
//!
//! ## Modules
//!
//! - [`host`]: `Renderer`, `Notifier`, `Location`
//! - [`view`]: what a loader returns
//! - [`storage`]: namespaced key-value persistence
//! - [`preferences`]: theme and language
//! - [`notify`]: the toast queue

pub mod config;
pub mod constants;
pub mod host;
pub mod notify;
pub mod preferences;
pub mod storage;
pub mod view;
