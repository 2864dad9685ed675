//! Configuration path utilities for mita.
//!
//! This module resolves the database location, the selector program and the
//! reserved label prefix into a [`Config`] that is handed to the store and the
//! router, instead of being read from globals.

use std::env;

use crate::error::{Error, Result};

/// Default path for the command and variable database
const DEFAULT_DATABASE_PATH: &str = "~/.config/mita/database.db";

/// Prefix of every system command label, e.g. `mita: add command`
pub const RESERVED_PREFIX: &str = "mita";

/// External fuzzy finder used when no selector is configured
pub const DEFAULT_SELECTOR: &str = "fzf";

/// Selector name that picks the in-process terminal picker
pub const BUILTIN_SELECTOR: &str = "builtin";

/// Resolved settings for a single invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: String,
    pub reserved_prefix: String,
    pub selector: String,
}

impl Config {
    /// Resolves the configuration from optional command-line values.
    ///
    /// # Examples
    ///
    /// ```
    /// use mita_core::config::{Config, DEFAULT_SELECTOR, RESERVED_PREFIX};
    ///
    /// let config = Config::resolve(&Some("/tmp/mita.db".to_string()), &None);
    /// assert_eq!(config.database_path, "/tmp/mita.db");
    /// assert_eq!(config.selector, DEFAULT_SELECTOR);
    /// assert_eq!(config.reserved_prefix, RESERVED_PREFIX);
    /// ```
    pub fn resolve(database_path_arg: &Option<String>, selector_arg: &Option<String>) -> Self {
        Self {
            database_path: get_database_path(database_path_arg),
            reserved_prefix: RESERVED_PREFIX.to_string(),
            selector: selector_arg
                .clone()
                .unwrap_or_else(|| DEFAULT_SELECTOR.to_string()),
        }
    }
}

/// Resolves the database file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// database path. Shell expansions like `~` are resolved.
///
/// # Arguments
///
/// * `database_path_arg` - Optional custom database file path
///
/// # Returns
///
/// The resolved absolute path to the database file
pub fn get_database_path(database_path_arg: &Option<String>) -> String {
    let database_path = match database_path_arg {
        Some(database_path) => database_path,
        None => DEFAULT_DATABASE_PATH,
    };

    shellexpand::tilde(database_path).to_string()
}

/// Whether a user label would collide with the system command entries.
///
/// The comparison is a case-insensitive prefix match.
pub fn is_reserved_label(label: &str, reserved_prefix: &str) -> bool {
    label
        .to_lowercase()
        .starts_with(&reserved_prefix.to_lowercase())
}

/// Rejects labels that start with the reserved prefix.
///
/// # Errors
///
/// Returns [`Error::ReservedLabel`] when [`is_reserved_label`] matches.
pub fn ensure_label_allowed(label: &str, reserved_prefix: &str) -> Result<()> {
    if is_reserved_label(label, reserved_prefix) {
        return Err(Error::ReservedLabel {
            label: label.to_string(),
            prefix: reserved_prefix.to_string(),
        });
    }

    Ok(())
}

/// The user's editor, from `VISUAL` then `EDITOR`.
pub fn get_editor() -> Option<String> {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .find(|editor| !editor.trim().is_empty())
}
