//! Application state and event handling
//!
//! This is the core of todo-tui, managing:
//! - The todo list snapshot and cursor
//! - The add-todo form and error popups
//! - The settings screen (icon and theme pickers)

use crate::config::Config;
use crate::icons::{IconNames, IconSwitcher, ICON_NAMES};
use crate::store::TodoStore;
use crate::types::{Priority, Screen, Todo, THEMES};
use crate::ui::Theme;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

/// Tips shown while the list is empty
pub const EMPTY_TIPS: [&str; 7] = [
    "Use your time wisely.",
    "Slow and steady wins the race.",
    "Keep it short and sweet.",
    "Put hard tasks first.",
    "Reward yourself after work.",
    "Collect tasks ahead of time.",
    "Each night schedule for tomorrow.",
];

/// Seconds a flash message stays visible
const FLASH_SECONDS: u64 = 3;

/// Main application state
pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub config: Config,
    pub config_path: PathBuf,
    pub theme: Theme,
    pub icons: IconNames,
    switcher: Box<dyn IconSwitcher>,
    store: TodoStore,

    // List screen state
    pub todos: Vec<Todo>,
    pub cursor: usize,
    pub edit_mode: bool,
    /// Ids of the todos marked in edit mode
    pub marked: BTreeSet<i64>,
    pub tip: &'static str,

    // Settings screen state
    pub settings_cursor: usize,

    // Popup state
    pub popup: PopupState,

    // Flash message (temporary feedback)
    pub flash_message: Option<(String, Instant)>, // (message, timestamp)
}

/// Popup overlay state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupState {
    None,
    AddTodo(AddTodoForm),
    Error {
        title: String,
        message: String,
    },
}

/// Contents of the add-todo form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddTodoForm {
    pub name: String,
    pub priority: Priority,
}

/// Application state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    AddTodo,
    ShowError,
}

/// A selectable row of the settings screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    Icon(usize),
    Theme(usize),
}

impl SettingsRow {
    /// Number of selectable rows
    pub fn count() -> usize {
        ICON_NAMES.len() + THEMES.len()
    }

    pub fn at(index: usize) -> Option<Self> {
        if index < ICON_NAMES.len() {
            Some(SettingsRow::Icon(index))
        } else if index < Self::count() {
            Some(SettingsRow::Theme(index - ICON_NAMES.len()))
        } else {
            None
        }
    }
}

impl App {
    /// Create a new App instance
    pub fn new(
        config: Config,
        config_path: PathBuf,
        store: TodoStore,
        switcher: Box<dyn IconSwitcher>,
    ) -> Result<Self> {
        let theme = Theme::from_index(config.theme);
        let icons = IconNames::new(switcher.as_ref());
        let todos = store.list()?;

        let mut app = Self {
            should_quit: false,
            screen: Screen::List,
            config,
            config_path,
            theme,
            icons,
            switcher,
            store,

            todos,
            cursor: 0,
            edit_mode: false,
            marked: BTreeSet::new(),
            tip: pick_tip(),

            settings_cursor: 0,

            popup: PopupState::None,
            flash_message: None,
        };

        // The platform is authoritative for the icon actually shown
        if app.icons.current_index != app.config.icon {
            log::info!(
                "Stored icon index {} differs from platform icon {}, updating",
                app.config.icon,
                app.icons.current_index
            );
            app.config.icon = app.icons.current_index;
            app.save_config();
        }

        match app.store.count() {
            Ok(count) => log::info!("Loaded {} todo(s)", count),
            Err(e) => log::warn!("{:#}", e),
        }
        Ok(app)
    }

    /// Get current app state
    pub fn state(&self) -> AppState {
        match &self.popup {
            PopupState::None => AppState::Normal,
            PopupState::AddTodo(_) => AppState::AddTodo,
            PopupState::Error { .. } => AppState::ShowError,
        }
    }

    /// Drop expired flash messages
    pub fn tick(&mut self) {
        if let Some((_, instant)) = &self.flash_message {
            if instant.elapsed().as_secs() >= FLASH_SECONDS {
                self.flash_message = None;
            }
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        self.tick();

        match self.state() {
            AppState::AddTodo => self.handle_form_key(key),
            AppState::ShowError => self.handle_error_key(key),
            AppState::Normal => match self.screen {
                Screen::List => self.handle_list_key(key),
                Screen::Settings => self.handle_settings_key(key),
            },
        }
    }

    /// Handle keys on the list screen
    fn handle_list_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.cursor < self.todos.len().saturating_sub(1) {
                    self.cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Char('g') => self.cursor = 0,
            KeyCode::Char('G') => self.cursor = self.todos.len().saturating_sub(1),
            KeyCode::Char('a') => {
                self.popup = PopupState::AddTodo(AddTodoForm::default());
            }
            KeyCode::Char('e') => {
                self.edit_mode = !self.edit_mode;
                if !self.edit_mode {
                    self.marked.clear();
                }
            }
            KeyCode::Char(' ') if self.edit_mode => {
                if let Some(todo) = self.todos.get(self.cursor) {
                    if !self.marked.remove(&todo.id) {
                        self.marked.insert(todo.id);
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('s') => {
                self.screen = Screen::Settings;
                self.settings_cursor = 0;
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle keys inside the add-todo form
    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.popup = PopupState::None;
                return Ok(());
            }
            KeyCode::Enter => {
                self.save_form();
                return Ok(());
            }
            _ => {}
        }

        let PopupState::AddTodo(form) = &mut self.popup else {
            return Ok(());
        };

        match key.code {
            KeyCode::Tab | KeyCode::Right => form.priority = form.priority.next(),
            KeyCode::BackTab | KeyCode::Left => form.priority = form.priority.previous(),
            KeyCode::Backspace => {
                form.name.pop();
            }
            KeyCode::Char(c) => form.name.push(c),
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in error popup
    fn handle_error_key(&mut self, _key: KeyEvent) -> Result<()> {
        self.popup = PopupState::None;
        Ok(())
    }

    /// Handle keys on the settings screen
    fn handle_settings_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q') => {
                self.screen = Screen::List;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.settings_cursor < SettingsRow::count() - 1 {
                    self.settings_cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.settings_cursor = self.settings_cursor.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => match SettingsRow::at(self.settings_cursor) {
                Some(SettingsRow::Icon(index)) => self.select_icon(index),
                Some(SettingsRow::Theme(index)) => self.select_theme(index),
                None => {}
            },
            _ => {}
        }
        Ok(())
    }

    /// Save the add-todo form into the store
    fn save_form(&mut self) {
        let PopupState::AddTodo(form) = &self.popup else {
            return;
        };

        if form.name.trim().is_empty() {
            self.show_error(
                "Invalid Name",
                "Make sure to enter something for the new todo item.",
            );
            return;
        }

        match self.store.insert(&form.name, form.priority) {
            Ok(todo) => {
                log::info!("Added todo {:?} ({})", todo.display_name(), todo.priority_label());
                self.popup = PopupState::None;
                self.refresh();
                if let Some(pos) = self.todos.iter().position(|t| t.id == todo.id) {
                    self.cursor = pos;
                }
            }
            Err(e) => {
                log::error!("Failed to save todo: {:#}", e);
                self.popup = PopupState::None;
            }
        }
    }

    /// Delete marked rows in edit mode, otherwise the row under the cursor
    fn delete_selected(&mut self) {
        let positions: BTreeSet<usize> = if self.edit_mode && !self.marked.is_empty() {
            self.todos
                .iter()
                .enumerate()
                .filter(|(_, todo)| self.marked.contains(&todo.id))
                .map(|(pos, _)| pos)
                .collect()
        } else if self.cursor < self.todos.len() {
            BTreeSet::from([self.cursor])
        } else {
            return;
        };

        match self.store.delete_at(&positions) {
            Ok(deleted) => {
                log::info!("Deleted {} todo(s)", deleted);
                let noun = if deleted == 1 { "todo" } else { "todos" };
                self.show_flash(&format!("Deleted {} {}", deleted, noun));
            }
            Err(e) => log::error!("Failed to delete todos: {:#}", e),
        }

        self.marked.clear();
        self.refresh();
    }

    fn select_icon(&mut self, index: usize) {
        match self.icons.select(index, self.switcher.as_mut()) {
            Ok(true) => {
                log::info!("Changed the app icon to {}", IconNames::display_name(index));
                self.config.icon = index;
                self.save_config();
            }
            Ok(false) => {}
            Err(e) => log::error!("Failed to change the app icon: {:#}", e),
        }
    }

    fn select_theme(&mut self, index: usize) {
        if let Err(e) = self.config.select_theme(index) {
            log::error!("{:#}", e);
            return;
        }
        self.theme = Theme::from_index(self.config.theme);
        log::info!("Selected {}", self.config.theme_data().name);
        self.save_config();
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save_to(&self.config_path) {
            log::error!("Failed to save settings: {:#}", e);
        }
    }

    /// Re-query the store and keep the cursor in bounds
    fn refresh(&mut self) {
        match self.store.list() {
            Ok(todos) => self.todos = todos,
            Err(e) => log::error!("Failed to load todos: {:#}", e),
        }

        if self.todos.is_empty() {
            self.tip = pick_tip();
        }
        self.cursor = self.cursor.min(self.todos.len().saturating_sub(1));
        let todos = &self.todos;
        self.marked.retain(|id| todos.iter().any(|todo| todo.id == *id));
    }

    /// Show an error popup
    fn show_error(&mut self, title: &str, message: &str) {
        self.popup = PopupState::Error {
            title: title.into(),
            message: message.into(),
        };
    }

    /// Show a flash message
    fn show_flash(&mut self, message: &str) {
        self.flash_message = Some((message.into(), Instant::now()));
    }
}

fn pick_tip() -> &'static str {
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as usize)
        .unwrap_or(0);
    EMPTY_TIPS[seed % EMPTY_TIPS.len()]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::icons::tests::FakeIcons;
    use crossterm::event::KeyModifiers;
    use std::fs;

    pub fn temp_config(name: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("todo-tui-app-{}-{}", std::process::id(), name))
            .join("config.toml");
        let _ = fs::remove_file(&path);
        path
    }

    pub fn test_app(name: &str) -> App {
        let store = TodoStore::open_in_memory().unwrap();
        App::new(
            Config::default(),
            temp_config(name),
            store,
            Box::new(FakeIcons::default()),
        )
        .unwrap()
    }

    pub fn cleanup(app: &App) {
        if let Some(dir) = app.config_path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add(app: &mut App, name: &str, priority_steps: usize) {
        press(app, KeyCode::Char('a'));
        type_str(app, name);
        for _ in 0..priority_steps {
            press(app, KeyCode::Tab);
        }
        press(app, KeyCode::Enter);
    }

    fn names(app: &App) -> Vec<&str> {
        app.todos.iter().map(|t| t.display_name()).collect()
    }

    #[test]
    fn test_add_todo_defaults_to_normal() {
        let mut app = test_app("add");
        add(&mut app, "Call mom", 0);

        assert_eq!(app.state(), AppState::Normal);
        assert_eq!(app.todos.len(), 1);
        assert_eq!(app.todos[0].priority, Some(Priority::Normal));
        cleanup(&app);
    }

    #[test]
    fn test_form_typing_q_does_not_quit() {
        let mut app = test_app("typing");
        add(&mut app, "quiz", 2);

        assert!(!app.should_quit);
        assert_eq!(names(&app), vec!["quiz"]);
        assert_eq!(app.todos[0].priority, Some(Priority::High));
        cleanup(&app);
    }

    #[test]
    fn test_empty_name_shows_error() {
        let mut app = test_app("empty");
        add(&mut app, "   ", 0);

        assert_eq!(app.state(), AppState::ShowError);
        assert!(app.todos.is_empty());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state(), AppState::Normal);
        cleanup(&app);
    }

    #[test]
    fn test_escape_cancels_form() {
        let mut app = test_app("cancel");
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "nope");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.state(), AppState::Normal);
        assert!(app.todos.is_empty());
        cleanup(&app);
    }

    #[test]
    fn test_list_sorted_and_cursor_follows_new_item() {
        let mut app = test_app("sorted");
        add(&mut app, "Zebra", 0);
        add(&mut app, "Apple", 0);
        add(&mut app, "Mango", 0);

        assert_eq!(names(&app), vec!["Apple", "Mango", "Zebra"]);
        assert_eq!(app.cursor, 1);
        cleanup(&app);
    }

    #[test]
    fn test_delete_cursor_row() {
        let mut app = test_app("delete");
        add(&mut app, "Buy milk", 2);
        add(&mut app, "Call mom", 1);

        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('d'));

        assert_eq!(names(&app), vec!["Call mom"]);
        assert_eq!(app.todos[0].priority, Some(Priority::Low));
        assert!(app.flash_message.is_some());
        cleanup(&app);
    }

    #[test]
    fn test_delete_marked_rows_in_edit_mode() {
        let mut app = test_app("edit");
        for name in ["a", "b", "c", "d"] {
            add(&mut app, name, 0);
        }

        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.marked, BTreeSet::from([app.todos[0].id, app.todos[2].id]));

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(names(&app), vec!["b", "d"]);
        assert!(app.marked.is_empty());
        assert_eq!(app.cursor, 1);

        press(&mut app, KeyCode::Char('e'));
        assert!(!app.edit_mode);
        cleanup(&app);
    }

    #[test]
    fn test_marks_follow_records_when_list_resorts() {
        let mut app = test_app("resort");
        add(&mut app, "b", 0);
        add(&mut app, "c", 0);

        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char(' '));

        // "a" sorts ahead of the marked "b"
        add(&mut app, "a", 0);
        assert_eq!(names(&app), vec!["a", "b", "c"]);
        assert!(app.edit_mode);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(names(&app), vec!["a", "c"]);
        assert!(app.marked.is_empty());
        cleanup(&app);
    }

    #[test]
    fn test_delete_on_empty_list_is_noop() {
        let mut app = test_app("noop");
        press(&mut app, KeyCode::Char('d'));
        assert!(app.todos.is_empty());
        assert!(app.flash_message.is_none());
        cleanup(&app);
    }

    #[test]
    fn test_theme_selection_persists() {
        let mut app = test_app("theme");
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.screen, Screen::Settings);

        // Skip past the icon rows to the second theme
        for _ in 0..ICON_NAMES.len() + 1 {
            press(&mut app, KeyCode::Down);
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.config.theme, 1);
        assert_eq!(app.theme.accent, THEMES[1].color);

        let reloaded = Config::load_from(&app.config_path).unwrap();
        assert_eq!(reloaded.theme, 1);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::List);
        cleanup(&app);
    }

    #[test]
    fn test_icon_selection_updates_config() {
        let mut app = test_app("icon");
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.icons.current_index, 2);
        assert_eq!(app.config.icon, 2);
        assert_eq!(app.switcher.alternate_icon_name().as_deref(), Some("Blue-Light"));
        cleanup(&app);
    }

    #[test]
    fn test_icon_failure_is_only_logged() {
        let store = TodoStore::open_in_memory().unwrap();
        let fake = FakeIcons { fail: true, ..Default::default() };
        let mut app = App::new(Config::default(), temp_config("icon-fail"), store, Box::new(fake))
            .unwrap();

        app.select_icon(4);
        assert_eq!(app.icons.current_index, 0);
        assert_eq!(app.config.icon, 0);
        assert_eq!(app.state(), AppState::Normal);
        cleanup(&app);
    }

    #[test]
    fn test_platform_icon_overrides_stored_index() {
        let store = TodoStore::open_in_memory().unwrap();
        let fake = FakeIcons { current: Some("Pink".into()), ..Default::default() };
        let app = App::new(Config::default(), temp_config("icon-sync"), store, Box::new(fake))
            .unwrap();

        assert_eq!(app.config.icon, 3);
        cleanup(&app);
    }

    #[test]
    fn test_settings_rows() {
        assert_eq!(SettingsRow::at(0), Some(SettingsRow::Icon(0)));
        assert_eq!(SettingsRow::at(ICON_NAMES.len()), Some(SettingsRow::Theme(0)));
        assert_eq!(SettingsRow::at(SettingsRow::count() - 1), Some(SettingsRow::Theme(2)));
        assert_eq!(SettingsRow::at(SettingsRow::count()), None);
    }

    #[test]
    fn test_quit() {
        let mut app = test_app("quit");
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
        cleanup(&app);
    }
}
