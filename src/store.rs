//! Local todo storage
//!
//! A single SQLite table holds every record. Reads are always sorted by name
//! so list positions shown on screen map directly onto `list()` indices.
//! Default location: ~/.local/share/todo-tui/todos.db

use crate::types::{Priority, Todo};
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS todos (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name     TEXT,
    priority TEXT
)";

const SELECT_SORTED: &str = "SELECT id, name, priority FROM todos ORDER BY name ASC, id ASC";

pub struct TodoStore {
    conn: Connection,
}

impl TodoStore {
    /// Default database path
    pub fn path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .context("Could not determine data directory")?
            .join("todo-tui");
        Ok(data_dir.join("todos.db"))
    }

    /// Open (or create) the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {:?}", path))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(SCHEMA, [])
            .context("Failed to create todos table")?;
        Ok(Self { conn })
    }

    /// Insert a new record. The name is trimmed and must not be empty.
    pub fn insert(&self, name: &str, priority: Priority) -> Result<Todo> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Todo name must not be empty");
        }

        self.conn
            .execute(
                "INSERT INTO todos (name, priority) VALUES (?1, ?2)",
                params![name, priority.as_str()],
            )
            .with_context(|| format!("Failed to save todo {:?}", name))?;

        log::debug!("Inserted todo {:?} ({})", name, priority.as_str());

        Ok(Todo {
            id: self.conn.last_insert_rowid(),
            name: Some(name.to_string()),
            priority: Some(priority),
        })
    }

    /// All records, sorted ascending by name
    pub fn list(&self) -> Result<Vec<Todo>> {
        let mut stmt = self
            .conn
            .prepare(SELECT_SORTED)
            .context("Failed to prepare todo query")?;

        let rows = stmt.query_map([], todo_from_row)?;

        let mut todos = Vec::new();
        for row in rows {
            todos.push(row.context("Failed to read todo row")?);
        }
        Ok(todos)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0))
            .context("Failed to count todos")?;
        Ok(count as usize)
    }

    /// Delete the records at the given positions of the sorted list.
    ///
    /// All deletions commit together; an out-of-range position aborts
    /// before anything is removed. Returns the number of deleted rows.
    pub fn delete_at(&mut self, positions: &BTreeSet<usize>) -> Result<usize> {
        if positions.is_empty() {
            return Ok(0);
        }

        let todos = self.list()?;
        let mut ids = Vec::with_capacity(positions.len());
        for &pos in positions {
            match todos.get(pos) {
                Some(todo) => ids.push(todo.id),
                None => bail!("Position {} is out of range ({} todos)", pos, todos.len()),
            }
        }

        let tx = self
            .conn
            .transaction()
            .context("Failed to start delete transaction")?;
        let mut deleted = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM todos WHERE id = ?1")?;
            for id in &ids {
                deleted += stmt.execute(params![id])?;
            }
        }
        tx.commit().context("Failed to commit delete")?;

        log::debug!("Deleted {} todo(s) at positions {:?}", deleted, positions);
        Ok(deleted)
    }
}

fn todo_from_row(row: &Row) -> rusqlite::Result<Todo> {
    let priority: Option<String> = row.get(2)?;
    Ok(Todo {
        id: row.get(0)?,
        name: row.get(1)?,
        priority: Priority::parse_stored(priority.as_deref()),
    })
}
