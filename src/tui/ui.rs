//! Common UI styles and layout helpers for the form TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
};
use std::str::FromStr;
use thiserror::Error;

/// Named colour themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Default,
    HighContrast,
}

#[derive(Error, Debug)]
#[error("Unknown theme '{0}'. Expected one of: default, high-contrast")]
pub struct ParseThemeError(String);

impl FromStr for ThemeName {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(ThemeName::Default),
            "high-contrast" | "high_contrast" | "contrast" => Ok(ThemeName::HighContrast),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

/// Colour palette shared by every widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
    pub info: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from_name(ThemeName::Default)
    }
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self {
                accent: Color::Yellow,
                text: Color::Reset,
                muted: Color::Gray,
                error: Color::Red,
                success: Color::Green,
                warning: Color::Yellow,
                info: Color::Cyan,
                selection_bg: Color::Blue,
                selection_fg: Color::White,
            },
            ThemeName::HighContrast => Self {
                accent: Color::White,
                text: Color::White,
                muted: Color::White,
                error: Color::LightRed,
                success: Color::LightGreen,
                warning: Color::LightYellow,
                info: Color::LightCyan,
                selection_bg: Color::White,
                selection_fg: Color::Black,
            },
        }
    }

    pub fn default_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .fg(self.selection_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn info(&self) -> Style {
        Style::default().fg(self.info)
    }

    pub fn inactive(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn active_border(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn inactive_border(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

/// Center a rectangle within another rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
