//! Form field component for user input

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::models::FieldName;
use crate::tui::ui::Theme;

/// Type of form field
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldType {
    Text,
    TextArea,
    /// Dropdown with a placeholder entry meaning "nothing chosen"
    Select,
    /// Single-select radio buttons laid out in a row
    RadioGroup,
}

/// Individual form field bound to one record field
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: FieldName,
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub field_type: FormFieldType,
    pub is_focused: bool,
    /// Cursor position in characters, not bytes
    pub cursor_position: usize,
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub validation_error: Option<String>,
}

impl FormField {
    pub fn new(name: FieldName, field_type: FormFieldType) -> Self {
        Self {
            name,
            label: name.label().to_string(),
            value: String::new(),
            placeholder: String::new(),
            field_type,
            is_focused: false,
            cursor_position: 0,
            options: Vec::new(),
            selected: None,
            validation_error: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    /// Replace the displayed value. For choice fields an unknown value
    /// resets the selection.
    pub fn set_value(&mut self, value: &str) {
        if self.is_choice() {
            self.selected = self.options.iter().position(|o| o == value);
            self.value = self
                .selected
                .map(|i| self.options[i].clone())
                .unwrap_or_default();
        } else {
            self.value = value.to_string();
            self.cursor_position = self.value.chars().count();
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(
            self.field_type,
            FormFieldType::Select | FormFieldType::RadioGroup
        )
    }

    /// Value to store in the form state; `None` when nothing is chosen
    pub fn form_value(&self) -> Option<String> {
        if self.is_choice() {
            self.selected.and_then(|i| self.options.get(i).cloned())
        } else {
            Some(self.value.clone())
        }
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.validation_error = error;
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    /// Returns whether the value changed
    pub fn insert_char(&mut self, c: char) -> bool {
        if self.is_choice() {
            return false;
        }
        if c == '\n' && self.field_type != FormFieldType::TextArea {
            return false;
        }
        let at = self.byte_index(self.cursor_position);
        self.value.insert(at, c);
        self.cursor_position += 1;
        true
    }

    pub fn delete_char(&mut self) -> bool {
        if self.is_choice() || self.cursor_position == 0 {
            return false;
        }
        self.cursor_position -= 1;
        let at = self.byte_index(self.cursor_position);
        self.value.remove(at);
        true
    }

    pub fn delete_char_forward(&mut self) -> bool {
        if self.is_choice() || self.cursor_position >= self.char_count() {
            return false;
        }
        let at = self.byte_index(self.cursor_position);
        self.value.remove(at);
        true
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.char_count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.char_count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
        self.selected = None;
        self.validation_error = None;
    }

    /// Move the choice forward. A select wraps through its placeholder,
    /// a radio group wraps among its options only.
    pub fn select_next(&mut self) -> bool {
        if !self.is_choice() || self.options.is_empty() {
            return false;
        }
        let len = self.options.len();
        self.selected = match (self.selected, &self.field_type) {
            (None, _) => Some(0),
            (Some(i), FormFieldType::Select) if i + 1 == len => None,
            (Some(i), _) => Some((i + 1) % len),
        };
        self.sync_choice_value();
        true
    }

    pub fn select_previous(&mut self) -> bool {
        if !self.is_choice() || self.options.is_empty() {
            return false;
        }
        let len = self.options.len();
        self.selected = match (self.selected, &self.field_type) {
            (None, _) => Some(len - 1),
            (Some(0), FormFieldType::Select) => None,
            (Some(0), _) => Some(len - 1),
            (Some(i), _) => Some(i - 1),
        };
        self.sync_choice_value();
        true
    }

    fn sync_choice_value(&mut self) {
        self.value = self
            .selected
            .and_then(|i| self.options.get(i).cloned())
            .unwrap_or_default();
    }

    /// Rows needed for the control plus its error line
    pub fn height(&self) -> u16 {
        let body = match self.field_type {
            FormFieldType::TextArea => 5,
            _ => 3,
        };
        body + 1
    }

    /// Render the form field with its inline error text
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let border_style = if self.is_focused {
            theme.active_border()
        } else if self.validation_error.is_some() {
            theme.error()
        } else {
            theme.inactive_border()
        };

        let block = Block::default()
            .title(self.label.as_str())
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(chunks[0]);

        let body = match self.field_type {
            FormFieldType::RadioGroup => Paragraph::new(self.radio_line(theme)),
            _ => {
                let showing_placeholder = self.value.is_empty() && !self.placeholder.is_empty();
                let (text, style) = if showing_placeholder {
                    (self.placeholder.clone(), theme.inactive())
                } else {
                    (self.value.clone(), theme.default_style())
                };
                let text = match self.field_type {
                    FormFieldType::Select => format!("▾ {}", text),
                    FormFieldType::TextArea => {
                        wrap_rows(&text, usize::from(inner.width)).join("\n")
                    }
                    _ => text,
                };
                Paragraph::new(text).style(style)
            }
        };

        // Keep the cursor row inside a focused text area
        let scroll = if self.is_focused && self.field_type == FormFieldType::TextArea {
            let (_, row) = self.cursor_offset(inner.width);
            row.saturating_sub(inner.height.saturating_sub(1))
        } else {
            0
        };

        f.render_widget(body.scroll((scroll, 0)).block(block), chunks[0]);

        if let Some(ref error) = self.validation_error {
            f.render_widget(
                Paragraph::new(error.as_str()).style(theme.error()),
                chunks[1],
            );
        }

        if self.is_focused && !self.is_choice() {
            self.place_cursor(f, inner, scroll);
        }
    }

    fn radio_line(&self, theme: &Theme) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, option) in self.options.iter().enumerate() {
            let checked = self.selected == Some(i);
            let marker = if checked { "(•) " } else { "( ) " };
            let style = if checked && self.is_focused {
                theme.selected()
            } else {
                theme.default_style()
            };
            spans.push(Span::styled(format!("{}{}", marker, option), style));
            spans.push(Span::raw("  "));
        }
        Line::from(spans)
    }

    /// Cursor column and row relative to the inside of the border. Text
    /// areas wrap at `inner_width` the same way they are drawn.
    fn cursor_offset(&self, inner_width: u16) -> (u16, u16) {
        let before: String = self.value.chars().take(self.cursor_position).collect();
        let (col, row) = if self.field_type == FormFieldType::TextArea {
            let width = usize::from(inner_width);
            let rows = wrap_rows(&before, width);
            let row = rows.len().saturating_sub(1);
            let col = rows.last().map(|r| r.width()).unwrap_or(0);
            if width > 0 && col >= width {
                (0, row + 1)
            } else {
                (col, row)
            }
        } else {
            (before.width(), 0)
        };
        (to_u16(col), to_u16(row))
    }

    fn place_cursor(&self, f: &mut Frame, inner: Rect, scroll: u16) {
        let (col, row) = self.cursor_offset(inner.width);
        let row = row.saturating_sub(scroll);
        if col < inner.width && row < inner.height {
            f.set_cursor(inner.x.saturating_add(col), inner.y.saturating_add(row));
        }
    }
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Split `text` into display rows at newlines and at `width` columns
fn wrap_rows(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for line in text.split('\n') {
        let mut row = String::new();
        let mut row_width = 0;
        for c in line.chars() {
            let w = c.width().unwrap_or(0);
            if row_width + w > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            row.push(c);
            row_width += w;
        }
        rows.push(row);
    }
    rows
}
