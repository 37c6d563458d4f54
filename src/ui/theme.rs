//! Theme definitions for todo-tui
//!
//! A fixed base palette plus the accent color of the selected theme.
//! The accent is applied to interactive elements only.

use crate::types::{ThemeData, GRAY, THEMES};
use ratatui::style::{Color, Modifier, Style};

/// Complete theme with all required colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors (terminal defaults)
    pub bg: Color,
    pub fg: Color,
    pub fg_dim: Color,

    // Selected accent
    pub accent: Color,

    // Status colors
    pub success: Color,
    pub error: Color,

    // UI element colors
    pub border: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub capsule: Color,
}

impl Theme {
    /// Create a theme from the persisted theme index
    pub fn from_index(index: usize) -> Self {
        let data = ThemeData::get(index).unwrap_or(&THEMES[0]);
        Self::with_accent(data)
    }

    fn with_accent(data: &ThemeData) -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::Reset,
            fg_dim: Color::DarkGray,

            accent: data.color,

            success: Color::Green,
            error: Color::Red,

            border: Color::DarkGray,
            selection_bg: Color::Rgb(58, 58, 60), // #3a3a3c
            selection_fg: Color::White,
            capsule: GRAY,
        }
    }

    // Style helpers for common UI patterns

    /// Default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Dimmed text style
    pub fn text_dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    /// Background style for blocks
    pub fn block_style(&self) -> Style {
        Style::default().bg(self.bg)
    }

    /// Title/header style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Accent-colored text
    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Selected item style
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selection_fg)
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Border style (unfocused)
    pub fn border(&self) -> Style {
        Style::default().fg(self.border).bg(self.bg)
    }

    /// Border style (focused)
    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.accent).bg(self.bg)
    }

    /// Priority capsule text
    pub fn capsule(&self) -> Style {
        Style::default().fg(self.capsule)
    }

    /// Success message style
    pub fn success(&self) -> Style {
        Style::default().fg(self.success).bg(self.bg)
    }

    /// Error message style
    pub fn error(&self) -> Style {
        Style::default().fg(self.error).bg(self.bg)
    }
}
