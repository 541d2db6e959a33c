//! Output submission form screen

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{error, info};

use crate::{
    errors::FormError,
    form::{FormState, ValidationMode},
    models::{AsapFunded, FieldName, FieldValues, OutputType},
    submit::SubmissionHandler,
    tui::{
        components::{FormField, FormFieldType},
        traits::{FormHandler, Screen, ScreenAction},
        ui::Theme,
    },
};

const HEADING: &str = "What are you sharing?";

const HELP: &str = "Output Form:\n\
    Tab / Shift+Tab - Next / previous field\n\
    ↑/↓ - Change type, or move between fields\n\
    ←/→ / Space - Choose ASAP funding option\n\
    Enter - Submit (on the Submit button), new line in usage notes\n\
    Ctrl+S - Submit from any field\n\
    Ctrl+R - Reset the form";

/// The single form screen. Focus slots are the fields followed by the
/// Submit button.
pub struct OutputFormScreen {
    pub form: FormState,
    pub fields: Vec<FormField>,
    pub current_field: usize,
    pub theme: Theme,
    submitter: Box<dyn SubmissionHandler>,
}

impl OutputFormScreen {
    pub fn new(mode: ValidationMode, submitter: Box<dyn SubmissionHandler>) -> Self {
        let mut screen = Self {
            form: FormState::new(mode).with_defaults(Self::mount_values(FieldValues::new())),
            fields: Self::build_fields(),
            current_field: 0,
            theme: Theme::default(),
            submitter,
        };
        screen.update_focus();
        screen
    }

    fn build_fields() -> Vec<FormField> {
        vec![
            FormField::new(FieldName::Title, FormFieldType::Text),
            FormField::new(FieldName::Url, FormFieldType::Text).with_placeholder("https://"),
            FormField::new(FieldName::UsageNotes, FormFieldType::TextArea),
            FormField::new(FieldName::Type, FormFieldType::Select)
                .with_placeholder("Choose a type")
                .with_options(
                    OutputType::ALL
                        .iter()
                        .map(|t| t.as_str().to_string())
                        .collect(),
                ),
            FormField::new(FieldName::AsapFunded, FormFieldType::RadioGroup).with_options(
                AsapFunded::ALL
                    .iter()
                    .map(|a| a.as_str().to_string())
                    .collect(),
            ),
        ]
    }

    /// Values the controls hold before any input. Untouched text controls
    /// hold `""`, not nothing.
    fn mount_values(values: FieldValues) -> FieldValues {
        values.with_blank_text_fields()
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Prefill the form. Values are shown in the controls and stored as
    /// pristine defaults.
    pub fn with_defaults(mut self, values: FieldValues) -> Self {
        for field in &mut self.fields {
            if let Some(value) = values.get(field.name) {
                field.set_value(value);
            }
        }
        self.form = FormState::new(self.form.mode()).with_defaults(Self::mount_values(values));
        self
    }

    fn submit_slot(&self) -> usize {
        self.fields.len()
    }

    fn is_on_submit(&self) -> bool {
        self.current_field == self.submit_slot()
    }

    fn update_focus(&mut self) {
        let current = self.current_field;
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.set_focus(i == current);
        }
    }

    fn current_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.current_field)
    }

    /// Copy the current widget value into the form state
    fn push_current_value(&mut self) {
        let Some(field) = self.fields.get(self.current_field) else {
            return;
        };
        let name = field.name;
        match field.form_value() {
            Some(value) => self.form.set_field(name, value),
            None => self.form.clear_field(name),
        }
        self.sync_errors();
    }

    /// Refresh every widget's error text from the form state
    fn sync_errors(&mut self) {
        for field in &mut self.fields {
            let error = self.form.error(field.name).map(|e| e.to_string());
            field.set_error(error);
        }
    }

    fn focus_first_error(&mut self) {
        if let Some(index) = self
            .fields
            .iter()
            .position(|f| f.validation_error.is_some())
        {
            self.current_field = index;
            self.update_focus();
        }
    }

    pub fn reset(&mut self) {
        self.form.reset();
        self.form =
            std::mem::take(&mut self.form).with_defaults(Self::mount_values(FieldValues::new()));
        for field in &mut self.fields {
            field.clear();
        }
        self.current_field = 0;
        self.update_focus();
    }

    fn edit_current<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut FormField) -> bool,
    {
        if self.form.is_submitted() {
            return;
        }
        let changed = match self.current_mut() {
            Some(field) => edit(field),
            None => false,
        };
        if changed {
            self.push_current_value();
        }
    }

    fn draw_submit_button(&self, f: &mut Frame, area: Rect) {
        let (label, style) = if self.form.is_submitted() {
            ("Submitted ✓", self.theme.success())
        } else if self.is_on_submit() {
            ("[ Submit ]", self.theme.selected())
        } else {
            ("[ Submit ]", self.theme.default_style())
        };

        let border = if self.is_on_submit() {
            self.theme.active_border()
        } else {
            self.theme.inactive_border()
        };

        let button = Paragraph::new(label)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(border));
        f.render_widget(button, area);
    }
}

impl Screen for OutputFormScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let card = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.inactive_border());
        let inner = card.inner(area);
        f.render_widget(card, area);

        let mut constraints = vec![Constraint::Length(2)];
        constraints.extend(self.fields.iter().map(|f| Constraint::Length(f.height())));
        constraints.push(Constraint::Length(3));
        constraints.push(Constraint::Min(0));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        f.render_widget(
            Paragraph::new(HEADING).style(self.theme.title()),
            chunks[0],
        );

        for (i, field) in self.fields.iter().enumerate() {
            field.render(f, chunks[i + 1], &self.theme);
        }

        let button_area = chunks[self.fields.len() + 1];
        let button_area = Rect {
            width: button_area.width.min(20),
            ..button_area
        };
        self.draw_submit_button(f, button_area);
    }

    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('s') => self.submit().await,
                KeyCode::Char('r') => {
                    self.reset();
                    info!("Form reset");
                    Ok(ScreenAction::SetStatus("Form cleared".to_string()))
                }
                _ => Ok(ScreenAction::None),
            };
        }

        let field_type = self.fields.get(self.current_field).map(|f| f.field_type.clone());

        match (key.code, field_type) {
            (KeyCode::Tab, _) => self.next_field(),
            (KeyCode::BackTab, _) => self.previous_field(),
            (KeyCode::Enter, None) => return self.submit().await,
            (KeyCode::Enter, Some(FormFieldType::TextArea)) => self.handle_char_input('\n'),
            (KeyCode::Enter, Some(_)) => self.next_field(),
            (KeyCode::Up, Some(FormFieldType::Select)) => {
                self.edit_current(|f| f.select_previous())
            }
            (KeyCode::Down, Some(FormFieldType::Select)) => self.edit_current(|f| f.select_next()),
            (KeyCode::Up, _) => self.previous_field(),
            (KeyCode::Down, _) => self.next_field(),
            (KeyCode::Left, Some(FormFieldType::RadioGroup)) => {
                self.edit_current(|f| f.select_previous())
            }
            (KeyCode::Right, Some(FormFieldType::RadioGroup)) => {
                self.edit_current(|f| f.select_next())
            }
            (KeyCode::Char(' '), Some(FormFieldType::RadioGroup | FormFieldType::Select)) => {
                self.edit_current(|f| f.select_next())
            }
            (KeyCode::Left, Some(_)) => {
                if let Some(field) = self.current_mut() {
                    field.move_cursor_left();
                }
            }
            (KeyCode::Right, Some(_)) => {
                if let Some(field) = self.current_mut() {
                    field.move_cursor_right();
                }
            }
            (KeyCode::Home, Some(_)) => {
                if let Some(field) = self.current_mut() {
                    field.move_cursor_to_start();
                }
            }
            (KeyCode::End, Some(_)) => {
                if let Some(field) = self.current_mut() {
                    field.move_cursor_to_end();
                }
            }
            (KeyCode::Char(c), Some(_)) => self.handle_char_input(c),
            (KeyCode::Backspace, Some(_)) => self.handle_backspace(),
            (KeyCode::Delete, Some(_)) => self.handle_delete(),
            _ => {}
        }

        Ok(ScreenAction::None)
    }

    fn help_text(&self) -> &'static str {
        HELP
    }

    fn on_enter(&mut self) {
        self.current_field = 0;
        self.update_focus();
    }
}

impl FormHandler for OutputFormScreen {
    fn get_current_field(&self) -> usize {
        self.current_field
    }

    /// Moving focus away from a field blurs it
    fn set_current_field(&mut self, field: usize) {
        if field > self.submit_slot() || field == self.current_field {
            return;
        }
        if let Some(left) = self.fields.get(self.current_field) {
            let name = left.name;
            self.form.blur(name);
            self.sync_errors();
        }
        self.current_field = field;
        self.update_focus();
    }

    fn get_field_count(&self) -> usize {
        self.fields.len() + 1
    }

    fn handle_char_input(&mut self, c: char) {
        self.edit_current(|f| f.insert_char(c));
    }

    fn handle_backspace(&mut self) {
        self.edit_current(|f| f.delete_char());
    }

    fn handle_delete(&mut self) {
        self.edit_current(|f| f.delete_char_forward());
    }

    async fn submit(&mut self) -> Result<ScreenAction> {
        let result = self.form.submit(self.submitter.as_ref()).await;
        self.sync_errors();

        match result {
            Ok(record) => {
                info!(title = %record.title, "Output form submitted");
                Ok(ScreenAction::Submitted(record))
            }
            Err(FormError::Invalid(errors)) => {
                self.focus_first_error();
                Ok(ScreenAction::SetError(format!(
                    "{} field(s) need attention",
                    errors.len()
                )))
            }
            Err(FormError::AlreadySubmitted) => Ok(ScreenAction::SetWarning(
                "This output has already been submitted".to_string(),
            )),
            Err(e @ FormError::Submission(_)) => {
                error!("Submission handler failed: {:#}", e);
                Ok(ScreenAction::SetError(e.to_string()))
            }
        }
    }
}
