//! Terminal user interface for the output form
//!
//! The application shell owns the theme and the status bar and renders the
//! single output form screen.

pub mod app;
pub mod components;
pub mod screens;
pub mod traits;
pub mod ui;

pub use app::App;
pub use screens::OutputFormScreen;
