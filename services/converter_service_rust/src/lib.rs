//! Converter Service Library
//!
//! Exposes the HTTP router, configuration and shared state for the binary and
//! for integration tests.

pub mod api;
pub mod config;
pub mod state;

pub use api::router;
pub use config::Config;
pub use state::AppState;
