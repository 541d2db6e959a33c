//! Terminal form for registering research outputs.

pub mod cli;
pub mod config;
pub mod errors;
pub mod form;
pub mod models;
pub mod schema;
pub mod submit;
pub mod tui;
