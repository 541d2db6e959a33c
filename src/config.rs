//! Centralized configuration management for output-form

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::form::ValidationMode;
use crate::tui::ui::ThemeName;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// File the TUI writes its log to
    pub log_file: PathBuf,
    /// When edits trigger validation
    pub validation_mode: ValidationMode,
    /// Colour theme for the terminal UI
    pub theme: ThemeName,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("output_form.log"),
            validation_mode: ValidationMode::default(),
            theme: ThemeName::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let log_file = lookup("OUTPUT_FORM_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file);

        Ok(Config {
            log_file,
            validation_mode: parse_var(&lookup, "OUTPUT_FORM_VALIDATION_MODE")?
                .unwrap_or(defaults.validation_mode),
            theme: parse_var(&lookup, "OUTPUT_FORM_THEME")?.unwrap_or(defaults.theme),
        })
    }

    /// Get log file path as string
    pub fn log_file_str(&self) -> &str {
        self.log_file.to_str().unwrap_or("output_form.log")
    }

    /// Directory and file name of the log, for the file appender
    pub fn log_file_parts(&self) -> (PathBuf, PathBuf) {
        let dir = match self.log_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file = self
            .log_file
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("output_form.log"));
        (dir, file)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let (dir, _) = self.log_file_parts();
        if !dir.is_dir() {
            return Err(anyhow::anyhow!(
                "Log file directory does not exist: {}",
                dir.display()
            ));
        }
        Ok(())
    }
}

/// Helper function to parse a variable as a specific type
fn parse_var<T, F>(lookup: &F, var_name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match lookup(var_name) {
        Some(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        None => Ok(None),
    }
}
