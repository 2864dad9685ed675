//! Command-line argument parsing.
//!
//! A bare `mita` runs the interactive selection flow. Subcommands manage
//! commands and variables directly, without a selector.

use clap::{Parser, Subcommand};
use mita_core::command_definitions::Assignment;

/// Command-line arguments for the `mita` binary.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use mita_cli::cli_args::Args;
///
/// let args = Args::parse_from(["mita", "--find"]);
/// assert!(args.find_mode);
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(version, about, term_width = 0)]
pub struct Args {
    /// Print the selection without a trailing newline and hide system commands.
    ///
    /// Meant for shell key bindings that splice the output into the prompt.
    #[arg(long = "find", short = 'f', action)]
    pub find_mode: bool,

    /// Print the selected command as stored, without substituting variables.
    #[arg(long, short = 'n', action)]
    pub no_render: bool,

    /// Path to the database file.
    ///
    /// If not provided, defaults to `~/.config/mita/database.db`.
    #[arg(long = "database", short = 'd', env = "MITA_DATABASE", global = true)]
    pub database_path: Option<String>,

    /// Selector used to pick from lists: an fzf-compatible program, or `builtin`.
    #[arg(long, env = "MITA_SELECTOR", global = true)]
    pub selector: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Manage saved commands
    #[command(subcommand)]
    Commands(CommandsAction),

    /// Manage variables
    #[command(subcommand)]
    Vars(VarsAction),

    /// Write every command and variable to a YAML file
    Export { path: String },

    /// Add commands and variables from a YAML file written by `export`
    Import { path: String },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CommandsAction {
    /// Save a command
    Add {
        /// The command text
        #[arg(long, short = 'c')]
        command: String,

        /// Label shown in the selector; defaults to the command text
        #[arg(long, short = 'l')]
        label: Option<String>,
    },

    /// Print every saved command
    List,

    /// Delete a command by id, or every command with the given text
    Delete(DeleteArgs),
}

/// Exactly one of `--id` or `--command`.
#[derive(clap::Args, Debug, PartialEq, Eq)]
#[group(required = true, multiple = false)]
pub struct DeleteArgs {
    #[arg(long)]
    id: Option<i64>,

    #[arg(long, short = 'c')]
    command: Option<String>,
}

/// Which commands `commands delete` removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Id(i64),
    Text(String),
}

impl DeleteArgs {
    #[must_use]
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            command: None,
        }
    }

    #[must_use]
    pub fn by_text(command: impl Into<String>) -> Self {
        Self {
            id: None,
            command: Some(command.into()),
        }
    }

    /// The selected target; the argument group guarantees one is present.
    #[must_use]
    pub fn target(self) -> DeleteTarget {
        match self.id {
            Some(id) => DeleteTarget::Id(id),
            None => DeleteTarget::Text(self.command.unwrap_or_default()),
        }
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum VarsAction {
    /// Set a variable, keeping its previous value
    Set {
        #[arg(value_name = "NAME=VALUE", value_parser = parse_assignment)]
        assignment: Assignment,
    },

    /// Print every variable
    List,

    /// Exchange a variable's value with its previous value
    Swap { name: String },

    /// Delete a variable
    Delete { name: String },
}

fn parse_assignment(raw: &str) -> Result<Assignment, String> {
    raw.parse::<Assignment>().map_err(|e| e.to_string())
}
