//! Qualarbi dashboard library: client-side router, API gateway client and
//! the dashboard views.

pub mod api;
pub mod console;
pub mod core;
pub mod router;
pub mod views;

#[cfg(test)]
pub mod test_support;
