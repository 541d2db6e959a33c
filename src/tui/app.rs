//! Main TUI application state and logic

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tracing::{debug, info};

use super::components::StatusDisplay;
use super::screens::OutputFormScreen;
use super::traits::{Screen, ScreenAction};
use super::ui::{centered_rect, Theme};
use crate::config::Config;
use crate::models::{FieldValues, OutputSubmission};
use crate::submit::SubmissionHandler;

const GLOBAL_HELP: &str = "Global Shortcuts:\n\
    Esc - Close help / quit\n\
    Ctrl+C - Quit\n\
    F1 - Toggle this help\n\n";

/// Main TUI application state
pub struct App {
    /// Application configuration
    pub config: Config,
    pub theme: Theme,
    pub form_screen: OutputFormScreen,
    pub status: StatusDisplay,

    // Global application state
    pub should_quit: bool,
    pub show_help_popup: bool,
    /// Record accepted by the submission handler, if any
    pub submitted: Option<OutputSubmission>,
}

impl App {
    /// Create a new TUI application
    pub fn new(config: Config, submitter: Box<dyn SubmissionHandler>) -> Self {
        let theme = Theme::from_name(config.theme);
        let mut form_screen =
            OutputFormScreen::new(config.validation_mode, submitter).with_theme(theme);
        form_screen.on_enter();

        Self {
            config,
            theme,
            form_screen,
            status: StatusDisplay::new()
                .with_timestamps()
                .with_idle_text("Output Form | F1: Help | Esc: Quit"),
            should_quit: false,
            show_help_popup: false,
            submitted: None,
        }
    }

    /// Prefill the form before the first draw
    pub fn with_defaults(mut self, values: FieldValues) -> Self {
        self.form_screen = self.form_screen.with_defaults(values);
        self
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key).await?;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Handle keyboard input events
    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return Ok(());
            }
            KeyCode::Esc => {
                if self.show_help_popup {
                    self.show_help_popup = false;
                } else {
                    self.should_quit = true;
                }
                return Ok(());
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return Ok(());
            }
            _ => {}
        }

        if self.show_help_popup {
            return Ok(());
        }

        let action = self.form_screen.handle_key_event(key).await?;
        self.apply_action(action);
        Ok(())
    }

    fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::SetStatus(message) => self.status.set_info(message),
            ScreenAction::SetWarning(message) => self.status.set_warning(message),
            ScreenAction::SetError(message) => self.status.set_error(message),
            ScreenAction::Submitted(record) => {
                info!(title = %record.title, "Submission accepted");
                self.status.set_success(format!(
                    "Submitted \"{}\". Press Esc to exit.",
                    record.title
                ));
                self.submitted = Some(record);
            }
            ScreenAction::None => {}
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        // Main layout: status bar at bottom, content area above
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.form_screen.draw(f, chunks[0]);
        self.status.render(f, chunks[1], &self.theme);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(80, 70, area);
        debug!("Drawing help popup");

        f.render_widget(Clear, popup_area);

        let help_content = format!("{}{}", GLOBAL_HELP, self.form_screen.help_text());
        let help_popup = Paragraph::new(help_content)
            .block(
                Block::default()
                    .title("Help - Shortcuts")
                    .borders(Borders::ALL)
                    .style(self.theme.title()),
            )
            .style(self.theme.default_style());

        f.render_widget(help_popup, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AsapFunded, FieldName, OutputType};
    use crate::tui::components::status_display::StatusType;
    use crate::submit::LogSubmitter;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(Config::default(), Box::new(LogSubmitter::new()))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_escape_closes_help_before_quitting() {
        let mut app = app();
        app.handle_key_event(press(KeyCode::F(1))).await.unwrap();
        assert!(app.show_help_popup);

        app.handle_key_event(press(KeyCode::Esc)).await.unwrap();
        assert!(!app.show_help_popup);
        assert!(!app.should_quit);

        app.handle_key_event(press(KeyCode::Esc)).await.unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_keys_are_ignored_while_help_is_open() {
        let mut app = app();
        app.handle_key_event(press(KeyCode::F(1))).await.unwrap();
        app.handle_key_event(press(KeyCode::Char('x'))).await.unwrap();
        assert_eq!(app.form_screen.form.value(FieldName::Title), None);
    }

    #[tokio::test]
    async fn test_invalid_submit_sets_error_status() {
        let mut app = app();
        app.handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .await
            .unwrap();

        let current = app.status.get_current().unwrap();
        assert_eq!(current.message, "4 field(s) need attention");
        assert!(app.submitted.is_none());
    }

    #[tokio::test]
    async fn test_prefilled_submit_records_submission() {
        let mut app = app().with_defaults(
            FieldValues::new()
                .with(FieldName::Title, "My Paper")
                .with(FieldName::Url, "https://example.com/paper")
                .with(FieldName::Type, "Preprint")
                .with(FieldName::AsapFunded, "Not Sure"),
        );
        app.handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .await
            .unwrap();

        let record = app.submitted.clone().unwrap();
        assert_eq!(record.output_type, OutputType::Preprint);
        assert_eq!(record.asap_funded, AsapFunded::NotSure);
        assert_eq!(record.usage_notes.as_deref(), Some(""));
        assert!(!app.should_quit);

        app.handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .await
            .unwrap();
        let current = app.status.get_current().unwrap();
        assert_eq!(current.status_type, StatusType::Warning);
        assert_eq!(current.message, "This output has already been submitted");
    }

    #[test]
    fn test_draw_with_help_popup() {
        let mut app = app();
        app.show_help_popup = true;
        let mut terminal = Terminal::new(TestBackend::new(100, 45)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
        }
        assert!(text.contains("Help - Shortcuts"));
        assert!(text.contains("Ctrl+S - Submit from any field"));
    }
}
