//! Core data types for todo-tui
//!
//! This module defines the shared data structures: todo records, priorities,
//! the static theme list and the screens of the application.

use anyhow::{bail, Error};
use ratatui::style::Color;
use std::str::FromStr;

/// Pink used for high priority and the pink theme
pub const PINK: Color = Color::Rgb(255, 45, 85); // #ff2d55
/// Blue used for low priority and the blue theme
pub const BLUE: Color = Color::Rgb(0, 122, 255); // #007aff
/// Green used for normal priority and the green theme
pub const GREEN: Color = Color::Rgb(52, 199, 89); // #34c759
/// Neutral color for records without a recognised priority
pub const GRAY: Color = Color::Rgb(142, 142, 147); // #8e8e93

/// Priority of a todo record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    High,
    #[default]
    Normal,
    Low,
}

impl Priority {
    /// Order used by the add form picker
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Normal, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Normal => "Normal",
            Priority::Low => "Low",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Priority::High => Priority::Normal,
            Priority::Normal => Priority::Low,
            Priority::Low => Priority::High,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Priority::High => Priority::Low,
            Priority::Normal => Priority::High,
            Priority::Low => Priority::Normal,
        }
    }

    /// Interpret a priority column value.
    ///
    /// Absent and unrecognised values both resolve to `None`, which renders
    /// as "Unknown" with the neutral color.
    pub fn parse_stored(value: Option<&str>) -> Option<Priority> {
        value.and_then(|v| v.parse().ok())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Priority::High),
            "Normal" => Ok(Priority::Normal),
            "Low" => Ok(Priority::Low),
            other => bail!("Unknown priority {:?}", other),
        }
    }
}

/// Color of the priority dot
pub fn priority_color(priority: Option<Priority>) -> Color {
    match priority {
        Some(Priority::High) => PINK,
        Some(Priority::Normal) => GREEN,
        Some(Priority::Low) => BLUE,
        None => GRAY,
    }
}

/// Text of the priority capsule
pub fn priority_label(priority: Option<Priority>) -> &'static str {
    match priority {
        Some(p) => p.as_str(),
        None => "Unknown",
    }
}

/// A single stored task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub name: Option<String>,
    pub priority: Option<Priority>,
}

impl Todo {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    pub fn color(&self) -> Color {
        priority_color(self.priority)
    }

    pub fn priority_label(&self) -> &'static str {
        priority_label(self.priority)
    }
}

/// A selectable accent theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeData {
    pub id: usize,
    pub name: &'static str,
    pub color: Color,
}

/// All selectable themes, indexed by `id`
pub static THEMES: [ThemeData; 3] = [
    ThemeData { id: 0, name: "Pink Theme", color: PINK },
    ThemeData { id: 1, name: "Blue Theme", color: BLUE },
    ThemeData { id: 2, name: "Green Theme", color: GREEN },
];

impl ThemeData {
    pub fn get(index: usize) -> Option<&'static ThemeData> {
        THEMES.get(index)
    }
}

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    List,
    Settings,
}

impl Screen {
    pub fn label(&self) -> &'static str {
        match self {
            Screen::List => "ToDo",
            Screen::Settings => "Settings",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_colors() {
        assert_eq!(priority_color(Some(Priority::High)), PINK);
        assert_eq!(priority_color(Some(Priority::Normal)), GREEN);
        assert_eq!(priority_color(Some(Priority::Low)), BLUE);
        assert_eq!(priority_color(None), GRAY);
    }

    #[test]
    fn test_unknown_priority_falls_back_to_gray() {
        for raw in [None, Some("high"), Some(""), Some("Urgent"), Some(" Low")] {
            let priority = Priority::parse_stored(raw);
            assert_eq!(priority, None, "{:?} should not parse", raw);
            assert_eq!(priority_color(priority), GRAY);
            assert_eq!(priority_label(priority), "Unknown");
        }
    }

    #[test]
    fn test_priority_roundtrip_names() {
        for p in Priority::ALL {
            assert_eq!(Priority::parse_stored(Some(p.as_str())), Some(p));
        }
    }

    #[test]
    fn test_priority_cycle() {
        let p = Priority::default();
        assert_eq!(p, Priority::Normal);
        assert_eq!(p.next(), Priority::Low);
        assert_eq!(p.next().next(), Priority::High);
        assert_eq!(p.previous(), Priority::High);
        assert_eq!(p.next().previous(), p);
    }

    #[test]
    fn test_todo_display() {
        let todo = Todo { id: 1, name: None, priority: None };
        assert_eq!(todo.display_name(), "Unknown");
        assert_eq!(todo.priority_label(), "Unknown");

        let todo = Todo { id: 2, name: Some("Buy milk".into()), priority: Some(Priority::High) };
        assert_eq!(todo.display_name(), "Buy milk");
        assert_eq!(todo.color(), PINK);
    }

    #[test]
    fn test_theme_lookup() {
        assert_eq!(THEMES.len(), 3);
        for (i, theme) in THEMES.iter().enumerate() {
            assert_eq!(theme.id, i);
        }
        assert_eq!(ThemeData::get(1).map(|t| t.name), Some("Blue Theme"));
        assert!(ThemeData::get(3).is_none());
    }
}
