//! Screen modules for the form TUI

pub mod output_form;

pub use output_form::OutputFormScreen;
