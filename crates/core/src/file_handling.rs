//! Snapshot files for backing up and restoring a store.
//!
//! A snapshot is a YAML document listing every command (label and text) and
//! every variable (with its history). Ids are not kept; commands get fresh ids
//! when imported.

use std::fs::File;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::command_definitions::VariableRecord;
use crate::config::ensure_label_allowed;
use crate::error::{Error, Result};
use crate::store::Store;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    pub label: String,
    pub command: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    #[serde(default)]
    pub commands: Vec<CommandEntry>,
    #[serde(default)]
    pub variables: Vec<VariableRecord>,
}

/// What an import did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub commands_added: usize,
    pub duplicates_skipped: usize,
    pub reserved_skipped: usize,
    pub variables_restored: usize,
}

impl Snapshot {
    /// Reads every command and variable out of `store`.
    pub fn capture(store: &Store) -> Result<Self> {
        let commands = store
            .list_commands()?
            .into_iter()
            .map(|record| CommandEntry {
                label: record.label,
                command: record.command,
            })
            .collect();

        Ok(Self {
            commands,
            variables: store.list_variables()?,
        })
    }

    /// Writes the snapshot's contents into `store`.
    ///
    /// Commands already present and commands with a reserved label are
    /// skipped. Variables overwrite existing ones, history included.
    pub fn restore(&self, store: &Store, reserved_prefix: &str) -> Result<ImportReport> {
        let mut report = ImportReport::default();

        for entry in &self.commands {
            if let Err(e) = ensure_label_allowed(&entry.label, reserved_prefix) {
                warn!("{e}");
                report.reserved_skipped += 1;
                continue;
            }

            match store.add_command(&entry.label, &entry.command) {
                Ok(_) => report.commands_added += 1,
                Err(Error::DuplicateCommand { .. }) => report.duplicates_skipped += 1,
                Err(e) => return Err(e),
            }
        }

        for variable in &self.variables {
            store.put_variable(variable)?;
            report.variables_restored += 1;
        }

        Ok(report)
    }
}

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    File::open(path)
        .map_err(|e| Error::io_error(file_description.to_string(), path.to_string(), e))
}

/// Reads a snapshot from disk.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The file contains invalid YAML
/// - The YAML doesn't match the expected structure
pub fn read_snapshot(path: &str) -> Result<Snapshot> {
    let reader = get_reader("snapshot", path)?;

    serde_yaml::from_reader(reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "snapshot".to_string(),
            path.to_string(),
            e,
        )
    })
}

/// Writes a snapshot to disk, replacing the file if it exists.
///
/// # Errors
///
/// Returns an error if the file cannot be created or serialization fails.
pub fn write_snapshot(path: &str, snapshot: &Snapshot) -> Result<()> {
    let f = File::create(path)
        .map_err(|e| Error::io_error("snapshot".to_string(), path.to_string(), e))?;

    serde_yaml::to_writer(f, snapshot).map_err(|e| {
        Error::yaml_error(
            "writing".to_string(),
            "snapshot".to_string(),
            path.to_string(),
            e,
        )
    })
}
