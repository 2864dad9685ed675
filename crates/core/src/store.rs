//! SQLite persistence for commands and variables.
//!
//! The database carries its schema version in `PRAGMA user_version`. A fresh
//! file (version 0) is stamped with [`SCHEMA_VERSION`]; any other mismatch
//! makes [`Store::open`] fail before a single table is touched.
//!
//! Every operation is one auto-committed statement. Database failures are
//! logged where they happen and returned as [`Error::Storage`].
//!
//! # Example
//!
//! ```no_run
//! use mita_core::store::Store;
//!
//! let store = Store::open("/tmp/mita.db")?;
//! store.add_command("list", "ls -la")?;
//! store.set_variable("host", "db-1")?;
//! for command in store.list_commands()? {
//!     println!("{command}");
//! }
//! # Ok::<(), mita_core::error::Error>(())
//! ```

use std::fs;
use std::path::Path;

use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::command_definitions::{CommandRecord, VariableRecord};
use crate::error::{Error, Result};

/// Schema version this build reads and writes.
pub const SCHEMA_VERSION: i64 = 1;

const CREATE_COMMANDS_TABLE: &str = "
    CREATE TABLE commands (
        id INTEGER PRIMARY KEY,
        label TEXT NOT NULL,
        command TEXT NOT NULL
    )";

const CREATE_VARIABLES_TABLE: &str = "
    CREATE TABLE variables (
        name TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        past_value TEXT
    )";

/// Handle on the command and variable database.
pub struct Store {
    conn: Connection,
    created_tables: Vec<&'static str>,
}

impl Store {
    /// Opens (creating if needed) the database file at `path`.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleVersion`] if the file was written by a
    /// different schema version, or [`Error::Storage`] / [`Error::Io`] if it
    /// cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::io_error(
                    "database directory".to_string(),
                    parent.display().to_string(),
                    e,
                )
            })?;
        }

        let conn = Connection::open(path).map_err(|e| Error::storage("opening database", e))?;
        Self::from_connection(conn)
    }

    /// Opens a throwaway database that lives only as long as the handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| Error::storage("opening database", e))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        check_version(&conn)?;
        let created_tables = create_missing_tables(&conn)?;

        Ok(Self {
            conn,
            created_tables,
        })
    }

    /// Tables this handle had to create when it was opened.
    pub fn created_tables(&self) -> &[&'static str] {
        &self.created_tables
    }

    /// Saves a command under `label` and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCommand`] if the exact `(label, command)` pair
    /// is already stored. The same label may point at different commands.
    pub fn add_command(&self, label: &str, command: &str) -> Result<i64> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM commands WHERE command = ?1 AND label = ?2",
                params![command, label],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| Error::storage("adding command", e))?;

        if existing.is_some() {
            return Err(Error::DuplicateCommand {
                label: label.to_string(),
                command: command.to_string(),
            });
        }

        self.conn
            .execute(
                "INSERT INTO commands (label, command) VALUES (?1, ?2)",
                params![label, command],
            )
            .map_err(|e| Error::storage("adding command", e))?;

        let id = self.conn.last_insert_rowid();
        info!("Added command {id}: {label} -> {command}");
        Ok(id)
    }

    /// Replaces the text and label of command `id`.
    ///
    /// Returns the number of rows changed; an unknown id changes nothing.
    pub fn modify_command(&self, id: i64, command: &str, label: &str) -> Result<usize> {
        self.conn
            .execute(
                "UPDATE commands SET command = ?1, label = ?2 WHERE id = ?3",
                params![command, label, id],
            )
            .map_err(|e| Error::storage("modifying command", e))
    }

    /// Deletes command `id`. Returns the number of rows removed.
    pub fn delete_command(&self, id: i64) -> Result<usize> {
        self.conn
            .execute("DELETE FROM commands WHERE id = ?1", params![id])
            .map_err(|e| Error::storage("deleting command", e))
    }

    /// Deletes every command whose text is exactly `command`.
    pub fn delete_commands_by_text(&self, command: &str) -> Result<usize> {
        self.conn
            .execute("DELETE FROM commands WHERE command = ?1", params![command])
            .map_err(|e| Error::storage("deleting command", e))
    }

    /// All commands in insertion order.
    pub fn list_commands(&self) -> Result<Vec<CommandRecord>> {
        self.collect(
            "listing commands",
            "SELECT id, label, command FROM commands ORDER BY id",
            command_from_row,
        )
    }

    /// All variables in insertion order.
    pub fn list_variables(&self) -> Result<Vec<VariableRecord>> {
        self.collect(
            "listing variables",
            "SELECT name, value, past_value FROM variables ORDER BY rowid",
            variable_from_row,
        )
    }

    pub fn get_variable(&self, name: &str) -> Result<Option<VariableRecord>> {
        self.conn
            .query_row(
                "SELECT name, value, past_value FROM variables WHERE name = ?1",
                params![name],
                variable_from_row,
            )
            .optional()
            .map_err(|e| Error::storage("reading variable", e))
    }

    /// Sets `name` to `value`, keeping the previous value as history.
    ///
    /// A new variable starts without history.
    pub fn set_variable(&self, name: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO variables (name, value, past_value) VALUES (?1, ?2, NULL)
                 ON CONFLICT(name) DO UPDATE
                 SET past_value = variables.value, value = excluded.value",
                params![name, value],
            )
            .map_err(|e| Error::storage("setting variable", e))?;

        info!("Set variable {name}");
        Ok(())
    }

    /// Writes a variable row as-is, history included.
    pub fn put_variable(&self, variable: &VariableRecord) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO variables (name, value, past_value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE
                 SET value = excluded.value, past_value = excluded.past_value",
                params![variable.name, variable.value, variable.past_value],
            )
            .map_err(|e| Error::storage("restoring variable", e))?;

        Ok(())
    }

    /// Exchanges the current and past value of `name` and returns the new row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VariableNotFound`] if there is no such variable and
    /// [`Error::NoHistory`] if it has never been overwritten.
    pub fn swap_variable(&self, name: &str) -> Result<VariableRecord> {
        let Some(variable) = self.get_variable(name)? else {
            return Err(Error::VariableNotFound(name.to_string()));
        };

        let Some(past_value) = variable.past_value else {
            return Err(Error::NoHistory(name.to_string()));
        };

        self.conn
            .execute(
                "UPDATE variables SET value = past_value, past_value = value
                 WHERE name = ?1 AND past_value IS NOT NULL",
                params![name],
            )
            .map_err(|e| Error::storage("swapping variable", e))?;

        info!("Swapped variable {name}");
        Ok(VariableRecord {
            name: variable.name,
            value: past_value,
            past_value: Some(variable.value),
        })
    }

    /// Deletes variable `name`. Returns the number of rows removed.
    pub fn delete_variable(&self, name: &str) -> Result<usize> {
        self.conn
            .execute("DELETE FROM variables WHERE name = ?1", params![name])
            .map_err(|e| Error::storage("deleting variable", e))
    }

    fn collect<T>(
        &self,
        action: &str,
        sql: &str,
        map_row: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let run = || -> rusqlite::Result<Vec<T>> {
            let mut statement = self.conn.prepare(sql)?;
            let rows = statement.query_map([], map_row)?;
            rows.collect()
        };

        run().map_err(|e| Error::storage(action, e))
    }
}

fn command_from_row(row: &Row<'_>) -> rusqlite::Result<CommandRecord> {
    Ok(CommandRecord {
        id: row.get(0)?,
        label: row.get(1)?,
        command: row.get(2)?,
    })
}

fn variable_from_row(row: &Row<'_>) -> rusqlite::Result<VariableRecord> {
    Ok(VariableRecord {
        name: row.get(0)?,
        value: row.get(1)?,
        past_value: row.get(2)?,
    })
}

/// Checks `user_version`, stamping fresh databases with [`SCHEMA_VERSION`].
fn check_version(conn: &Connection) -> Result<()> {
    let found: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| Error::storage("reading database version", e))?;

    if found == SCHEMA_VERSION {
        return Ok(());
    }

    if found == 0 {
        info!("Setting database version to {SCHEMA_VERSION}");
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
            .map_err(|e| Error::storage("setting database version", e))?;
        return Ok(());
    }

    Err(Error::IncompatibleVersion {
        found,
        expected: SCHEMA_VERSION,
    })
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    conn.query_row(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![name],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
    .map_err(|e| Error::storage("checking tables", e))
}

fn create_missing_tables(conn: &Connection) -> Result<Vec<&'static str>> {
    let mut created = Vec::new();

    for (table, sql) in [
        ("commands", CREATE_COMMANDS_TABLE),
        ("variables", CREATE_VARIABLES_TABLE),
    ] {
        if table_exists(conn, table)? {
            continue;
        }

        info!("Creating {table} table");
        conn.execute_batch(sql)
            .map_err(|e| Error::storage("creating tables", e))?;
        created.push(table);
    }

    Ok(created)
}
