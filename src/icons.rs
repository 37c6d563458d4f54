//! Alternate application icons
//!
//! The icon variant is a platform setting. On Linux desktops that is the
//! `Icon=` key of the application's freedesktop entry:
//! ~/.local/share/applications/todo-tui.desktop

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Icon theme name of the primary icon
pub const APP_ICON: &str = "todo-tui";

/// Main group of a desktop entry file
const ENTRY_GROUP: &str = "Desktop Entry";

/// Selectable icons. `None` is the primary icon.
pub const ICON_NAMES: [Option<&str>; 9] = [
    None,
    Some("Blue-Dark"),
    Some("Blue-Light"),
    Some("Pink"),
    Some("Pink-Dark"),
    Some("Pink-Light"),
    Some("Green"),
    Some("Green-Dark"),
    Some("Green-Light"),
];

/// Platform hook for switching the application icon
pub trait IconSwitcher {
    /// Name of the active alternate icon, `None` for the primary icon
    fn alternate_icon_name(&self) -> Option<String>;

    /// Activate an alternate icon, `None` restores the primary icon
    fn set_alternate_icon_name(&mut self, name: Option<&str>) -> Result<()>;
}

/// Icon switching through a desktop entry file
#[derive(Debug, Clone)]
pub struct DesktopEntryIcons {
    path: PathBuf,
}

impl DesktopEntryIcons {
    /// Default desktop entry path
    pub fn path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().context("Could not determine data directory")?;
        Ok(data_dir.join("applications").join("todo-tui.desktop"))
    }

    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_icon_key(&self) -> Option<String> {
        let content = fs::read_to_string(&self.path).ok()?;
        let mut in_entry = false;
        for line in content.lines() {
            let line = line.trim();
            if let Some(group) = group_name(line) {
                in_entry = group == ENTRY_GROUP;
            } else if in_entry {
                if let Some(value) = line.strip_prefix("Icon=") {
                    return Some(value.trim().to_string());
                }
            }
        }
        None
    }
}

impl IconSwitcher for DesktopEntryIcons {
    fn alternate_icon_name(&self) -> Option<String> {
        let key = self.read_icon_key()?;
        let suffix = key.strip_prefix(APP_ICON)?.strip_prefix('-')?;

        ICON_NAMES
            .iter()
            .flatten()
            .find(|name| name.to_lowercase() == suffix)
            .map(|name| name.to_string())
    }

    fn set_alternate_icon_name(&mut self, name: Option<&str>) -> Result<()> {
        if let Some(name) = name {
            if !ICON_NAMES.iter().any(|candidate| *candidate == Some(name)) {
                bail!("Unknown alternate icon {:?}", name);
            }
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(existing) => existing,
            Err(_) => default_desktop_entry(),
        };

        write_entry(&self.path, &replace_icon_line(&content, &icon_key(name)))
    }
}

fn icon_key(name: Option<&str>) -> String {
    match name {
        None => APP_ICON.to_string(),
        Some(name) => format!("{}-{}", APP_ICON, name.to_lowercase()),
    }
}

fn default_desktop_entry() -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name=ToDo\n\
         Comment=Terminal to-do list\n\
         Exec=todo-tui\n\
         Terminal=true\n\
         Categories=Utility;\n\
         Icon={}\n",
        APP_ICON
    )
}

/// Group name of a `[Group]` header line
fn group_name(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']')
}

/// Set the `Icon=` key of the `[Desktop Entry]` group, leaving action groups alone
fn replace_icon_line(content: &str, key: &str) -> String {
    let icon_line = format!("Icon={}", key);
    let mut lines: Vec<String> = Vec::new();
    let mut in_entry = false;
    let mut seen_entry = false;
    let mut replaced = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if let Some(group) = group_name(trimmed) {
            if in_entry && !replaced {
                lines.push(icon_line.clone());
                replaced = true;
            }
            in_entry = group == ENTRY_GROUP;
            seen_entry |= in_entry;
            lines.push(line.to_string());
        } else if in_entry && !replaced && trimmed.starts_with("Icon=") {
            lines.push(icon_line.clone());
            replaced = true;
        } else {
            lines.push(line.to_string());
        }
    }

    if !replaced {
        if !seen_entry {
            lines.push(format!("[{}]", ENTRY_GROUP));
        }
        lines.push(icon_line);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn write_entry(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write desktop entry {:?}", path))
}

/// The icon picker model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconNames {
    pub current_index: usize,
}

impl IconNames {
    /// Start from whatever icon the platform currently shows
    pub fn new(switcher: &dyn IconSwitcher) -> Self {
        Self {
            current_index: index_of(switcher.alternate_icon_name().as_deref()),
        }
    }

    pub fn display_name(index: usize) -> &'static str {
        ICON_NAMES
            .get(index)
            .copied()
            .flatten()
            .unwrap_or("Blue")
    }

    /// Switch to the icon at `index`.
    ///
    /// Returns `Ok(false)` when the platform already shows that icon.
    pub fn select(&mut self, index: usize, switcher: &mut dyn IconSwitcher) -> Result<bool> {
        let Some(&name) = ICON_NAMES.get(index) else {
            bail!("Icon index {} out of range", index);
        };

        if index_of(switcher.alternate_icon_name().as_deref()) == index {
            self.current_index = index;
            return Ok(false);
        }

        switcher.set_alternate_icon_name(name)?;
        self.current_index = index;
        Ok(true)
    }
}

fn index_of(name: Option<&str>) -> usize {
    ICON_NAMES
        .iter()
        .position(|candidate| *candidate == name)
        .unwrap_or(0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory switcher that can be told to fail
    #[derive(Debug, Default)]
    pub struct FakeIcons {
        pub current: Option<String>,
        pub calls: usize,
        pub fail: bool,
    }

    impl IconSwitcher for FakeIcons {
        fn alternate_icon_name(&self) -> Option<String> {
            self.current.clone()
        }

        fn set_alternate_icon_name(&mut self, name: Option<&str>) -> Result<()> {
            self.calls += 1;
            if self.fail {
                bail!("icon switching unavailable");
            }
            self.current = name.map(str::to_string);
            Ok(())
        }
    }

    fn temp_entry(name: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("todo-tui-icons-{}-{}", std::process::id(), name))
            .join("todo-tui.desktop");
        let _ = fs::remove_file(&path);
        path
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(IconNames::display_name(0), "Blue");
        assert_eq!(IconNames::display_name(3), "Pink");
        assert_eq!(IconNames::display_name(100), "Blue");
    }

    #[test]
    fn test_current_index_from_platform() {
        let fake = FakeIcons { current: Some("Green".into()), ..Default::default() };
        assert_eq!(IconNames::new(&fake).current_index, 6);

        let fake = FakeIcons { current: Some("Purple".into()), ..Default::default() };
        assert_eq!(IconNames::new(&fake).current_index, 0);
    }

    #[test]
    fn test_select_skips_current_icon() {
        let mut fake = FakeIcons::default();
        let mut icons = IconNames::new(&fake);

        assert!(!icons.select(0, &mut fake).unwrap());
        assert_eq!(fake.calls, 0);

        assert!(icons.select(3, &mut fake).unwrap());
        assert_eq!(fake.calls, 1);
        assert_eq!(fake.current.as_deref(), Some("Pink"));
        assert_eq!(icons.current_index, 3);

        assert!(icons.select(0, &mut fake).unwrap());
        assert_eq!(fake.current, None);
    }

    #[test]
    fn test_select_failure_keeps_index() {
        let mut fake = FakeIcons { fail: true, ..Default::default() };
        let mut icons = IconNames::new(&fake);

        assert!(icons.select(2, &mut fake).is_err());
        assert_eq!(icons.current_index, 0);
        assert!(icons.select(42, &mut fake).is_err());
    }

    #[test]
    fn test_desktop_entry_roundtrip() {
        let path = temp_entry("roundtrip");
        let mut entry = DesktopEntryIcons::new(path.clone());
        assert_eq!(entry.alternate_icon_name(), None);

        entry.set_alternate_icon_name(Some("Pink-Dark")).unwrap();
        assert_eq!(entry.alternate_icon_name().as_deref(), Some("Pink-Dark"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Icon=todo-tui-pink-dark"));
        assert!(content.contains("Exec=todo-tui"));
        assert_eq!(content.matches("Icon=").count(), 1);

        entry.set_alternate_icon_name(None).unwrap();
        assert_eq!(entry.alternate_icon_name(), None);
        assert!(fs::read_to_string(&path).unwrap().contains("Icon=todo-tui\n"));
        cleanup(&path);
    }

    #[test]
    fn test_desktop_entry_preserves_other_keys() {
        let path = temp_entry("preserve");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[Desktop Entry]\nName=Custom\nExec=/opt/todo-tui\n").unwrap();

        let mut entry = DesktopEntryIcons::new(path.clone());
        entry.set_alternate_icon_name(Some("Green")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Name=Custom"));
        assert!(content.contains("Exec=/opt/todo-tui"));
        assert!(content.ends_with("Icon=todo-tui-green\n"));
        cleanup(&path);
    }

    #[test]
    fn test_desktop_entry_ignores_action_groups() {
        let path = temp_entry("actions");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "[Desktop Action Quick]\nName=Quick add\nIcon=list-add\n\n\
             [Desktop Entry]\nName=ToDo\nIcon=todo-tui-pink\n\n\
             [Desktop Action Clear]\nIcon=edit-clear\n",
        )
        .unwrap();

        let mut entry = DesktopEntryIcons::new(path.clone());
        assert_eq!(entry.alternate_icon_name().as_deref(), Some("Pink"));

        entry.set_alternate_icon_name(Some("Green-Dark")).unwrap();
        assert_eq!(entry.alternate_icon_name().as_deref(), Some("Green-Dark"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Name=Quick add\nIcon=list-add\n"));
        assert!(content.contains("Name=ToDo\nIcon=todo-tui-green-dark\n"));
        assert!(content.contains("[Desktop Action Clear]\nIcon=edit-clear\n"));
        cleanup(&path);
    }

    #[test]
    fn test_icon_key_added_to_entry_group() {
        let content = "[Desktop Entry]\nName=ToDo\n\n[Desktop Action Quick]\nIcon=list-add\n";
        assert_eq!(
            replace_icon_line(content, "todo-tui-pink"),
            "[Desktop Entry]\nName=ToDo\n\nIcon=todo-tui-pink\n[Desktop Action Quick]\nIcon=list-add\n"
        );

        assert_eq!(
            replace_icon_line("[Desktop Action Quick]\nIcon=list-add\n", "todo-tui"),
            "[Desktop Action Quick]\nIcon=list-add\n[Desktop Entry]\nIcon=todo-tui\n"
        );
    }

    #[test]
    fn test_desktop_entry_rejects_unknown_icon() {
        let path = temp_entry("unknown");
        let mut entry = DesktopEntryIcons::new(path.clone());
        assert!(entry.set_alternate_icon_name(Some("Rainbow")).is_err());
        cleanup(&path);
    }
}
