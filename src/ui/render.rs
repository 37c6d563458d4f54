//! Main rendering module
//!
//! Handles rendering the complete UI including:
//! - Header with edit toggle and settings hint
//! - The todo list or the settings screen
//! - Popups and overlays
//! - Status bar

use crate::app::{App, AppState, PopupState, SettingsRow};
use crate::icons::{IconNames, ICON_NAMES};
use crate::types::{Priority, Screen, THEMES};
use crate::ui::widgets;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState},
    Frame,
};

/// Main render function - entry point for all UI rendering
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Main layout: header, content, status bar
    let layout = Layout::vertical([
        Constraint::Length(2), // Header
        Constraint::Min(5),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_header(frame, app, layout[0]);

    match app.screen {
        Screen::List => render_list_screen(frame, app, layout[1]),
        Screen::Settings => render_settings_screen(frame, app, layout[1]),
    }

    render_status_bar(frame, app, layout[2]);

    render_popups(frame, app, area);
}

/// Render the navigation header
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .style(theme.block_style())
        .borders(Borders::BOTTOM)
        .border_style(theme.border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::horizontal([
        Constraint::Length(14),
        Constraint::Min(10),
        Constraint::Length(14),
    ])
    .split(inner);

    let left = match app.screen {
        Screen::List if app.edit_mode => "[e] Done",
        Screen::List => "[e] Edit",
        Screen::Settings => "",
    };
    let right = match app.screen {
        Screen::List => "[s] Settings",
        Screen::Settings => "[Esc] Close",
    };

    frame.render_widget(Paragraph::new(left).style(theme.accent()), columns[0]);
    frame.render_widget(
        Paragraph::new(app.screen.label())
            .style(theme.text().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        columns[1],
    );
    frame.render_widget(
        Paragraph::new(right)
            .style(theme.accent())
            .alignment(Alignment::Right),
        columns[2],
    );
}

/// Render the todo list (or the empty view)
fn render_list_screen(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .style(theme.block_style())
        .borders(Borders::ALL)
        .border_style(theme.border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.todos.is_empty() {
        render_empty_list(frame, app, inner);
        return;
    }

    let rows: Vec<Row> = app
        .todos
        .iter()
        .enumerate()
        .map(|(i, todo)| {
            let marker = if !app.edit_mode {
                ""
            } else if app.marked.contains(&todo.id) {
                "■"
            } else {
                "□"
            };

            Row::new(vec![
                Cell::from(Span::styled(marker, theme.accent())),
                Cell::from(widgets::priority_dot(todo)),
                Cell::from(Span::styled(
                    todo.display_name().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Cell::from(widgets::priority_capsule(todo.priority_label(), theme)),
            ])
            .style(theme.text())
        })
        .collect();

    let marker_width = if app.edit_mode { 2 } else { 0 };
    let table = Table::new(
        rows,
        [
            Constraint::Length(marker_width),
            Constraint::Length(2),
            Constraint::Min(10),
            Constraint::Length(11),
        ],
    )
    .highlight_style(theme.selected());

    let mut state = TableState::default().with_selected(Some(app.cursor));
    frame.render_stateful_widget(table, inner, &mut state);
}

/// Placeholder shown when there are no todos
fn render_empty_list(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let lines = vec![
        Line::styled("Nothing to do yet", theme.text().add_modifier(Modifier::BOLD)),
        Line::raw(""),
        Line::styled(app.tip, theme.accent().add_modifier(Modifier::ITALIC)),
        Line::raw(""),
        Line::styled("Press [a] to add a todo", theme.text_dim()),
    ];

    let height = lines.len() as u16;
    let centered = widgets::centered_rect(area.width, height, area);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        centered,
    );
}

/// Settings screen: icon picker, theme picker, about section
fn render_settings_screen(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .style(theme.block_style())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let selected_row = SettingsRow::at(app.settings_cursor);
    let mut items: Vec<ListItem> = Vec::new();
    let mut selected_item = 0;

    let row_style = |row: SettingsRow| {
        if Some(row) == selected_row {
            theme.selected()
        } else {
            theme.text()
        }
    };

    // Section 1: icons
    items.push(section_header("Choose the app icon", None));
    for index in 0..ICON_NAMES.len() {
        let row = SettingsRow::Icon(index);
        if Some(row) == selected_row {
            selected_item = items.len();
        }
        let check = if app.icons.current_index == index { "✓" } else { " " };
        items.push(
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", check), theme.accent()),
                Span::raw(IconNames::display_name(index)),
            ]))
            .style(row_style(row)),
        );
    }
    items.push(ListItem::new(""));

    // Section 2: themes
    items.push(section_header("Choose the app theme", Some(theme.accent())));
    for data in THEMES.iter() {
        let row = SettingsRow::Theme(data.id);
        if Some(row) == selected_row {
            selected_item = items.len();
        }
        let check = if app.config.theme == data.id { "✓" } else { " " };
        items.push(
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", check), theme.accent()),
                Span::styled("● ", Style::default().fg(data.color)),
                Span::raw(data.name),
            ]))
            .style(row_style(row)),
        );
    }
    items.push(ListItem::new(""));

    // Section 3: about
    items.push(section_header("About the application", None));
    for (label, value) in about_rows() {
        items.push(ListItem::new(Line::from(vec![
            Span::styled(format!("   {:<16}", label), theme.text_dim()),
            Span::styled(value, theme.text()),
        ])));
    }
    items.push(ListItem::new(""));
    items.push(ListItem::new(Line::styled(
        "   Copyright © All rights reserved.",
        theme.text_dim(),
    )));

    let list = List::new(items);
    let mut state = ListState::default().with_selected(Some(selected_item));
    frame.render_stateful_widget(list, inner, &mut state);
}

fn section_header(title: &str, dot: Option<Style>) -> ListItem<'static> {
    let mut spans = vec![Span::styled(
        title.to_uppercase(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(style) = dot {
        spans.push(Span::styled(" ●", style));
    }
    ListItem::new(Line::from(spans))
}

fn about_rows() -> [(&'static str, &'static str); 4] {
    [
        ("Application", "ToDo"),
        ("Compatibility", "Linux, macOS, Windows"),
        ("Developer", env!("CARGO_PKG_AUTHORS")),
        ("Version", env!("CARGO_PKG_VERSION")),
    ]
}

/// Render status bar with keybindings
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let hints = match (app.state(), app.screen) {
        (AppState::AddTodo, _) => "[Enter] Save  [Tab] Priority  [Esc] Cancel",
        (AppState::ShowError, _) => "[any key] Dismiss",
        (AppState::Normal, Screen::List) if app.edit_mode => {
            "[Space] Mark  [d] Delete marked  [e] Done  [q] Quit"
        }
        (AppState::Normal, Screen::List) => {
            "[j/k] Navigate  [a] Add  [d] Delete  [e] Edit  [s] Settings  [q] Quit"
        }
        (AppState::Normal, Screen::Settings) => "[j/k] Navigate  [Enter] Select  [Esc] Back",
    };

    let count = match app.todos.len() {
        1 => "1 todo".to_string(),
        n => format!("{} todos", n),
    };

    widgets::render_status_bar(frame, hints, &count, theme, area);
}

/// Render popups if active
fn render_popups(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    match &app.popup {
        PopupState::None => {}

        PopupState::AddTodo(form) => {
            let mut priority_spans = vec![Span::styled("Priority: ", theme.text_dim())];
            for priority in Priority::ALL {
                let style = if priority == form.priority {
                    theme.title()
                } else {
                    theme.text_dim()
                };
                let label = if priority == form.priority {
                    format!("[{}]", priority.as_str())
                } else {
                    format!(" {} ", priority.as_str())
                };
                priority_spans.push(Span::styled(label, style));
                priority_spans.push(Span::raw(" "));
            }

            let content = vec![
                Line::raw(""),
                Line::from(vec![
                    Span::styled("Todo:     ", theme.text_dim()),
                    Span::styled(format!("{}_", form.name), theme.text()),
                ]),
                Line::raw(""),
                Line::from(priority_spans),
            ];

            widgets::render_popup(
                frame,
                "New Todo",
                content,
                &[("Save", "Enter"), ("Cancel", "Esc")],
                theme,
                area,
            );
        }

        PopupState::Error { title, message } => {
            widgets::render_error_popup(frame, title, message, theme, area);
        }
    }

    // Flash message
    if let Some((msg, _)) = &app.flash_message {
        widgets::render_flash_message(frame, msg, theme, area);
    }
}
