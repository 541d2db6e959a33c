//! Core traits for the form TUI
//!
//! Screens turn key presses into [`ScreenAction`]s which the application
//! shell applies; form-like screens additionally implement [`FormHandler`]
//! for focus movement and text entry.

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::models::OutputSubmission;

/// Actions that can be returned from screen event handling
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// Set status message
    SetStatus(String),
    /// Set warning message
    SetWarning(String),
    /// Set error message
    SetError(String),
    /// A record passed validation and was handed off
    Submitted(OutputSubmission),
    /// No action taken
    None,
}

/// Core trait for all TUI screens
pub trait Screen {
    /// Draw the screen content
    fn draw(&mut self, f: &mut Frame, area: Rect);

    /// Handle keyboard input and return an optional action
    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction>;

    /// Context help shown in the help popup
    fn help_text(&self) -> &'static str {
        ""
    }

    /// Called when screen becomes active
    fn on_enter(&mut self) {}
}

/// Trait for form handling
pub trait FormHandler {
    /// Get current focus slot
    fn get_current_field(&self) -> usize;

    /// Move focus to a slot
    fn set_current_field(&mut self, field: usize);

    /// Get total number of focus slots
    fn get_field_count(&self) -> usize;

    /// Move to next field
    fn next_field(&mut self) {
        let current = self.get_current_field();
        let total = self.get_field_count();
        self.set_current_field((current + 1) % total);
    }

    /// Move to previous field
    fn previous_field(&mut self) {
        let current = self.get_current_field();
        let total = self.get_field_count();
        self.set_current_field(if current == 0 { total - 1 } else { current - 1 });
    }

    /// Handle character input for current field
    fn handle_char_input(&mut self, c: char);

    /// Handle backspace for current field
    fn handle_backspace(&mut self);

    /// Handle delete for current field
    fn handle_delete(&mut self);

    /// Submit form
    async fn submit(&mut self) -> Result<ScreenAction>;
}
