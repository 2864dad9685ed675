//! Built-in actions offered next to the user's commands.
//!
//! Every system command shows up in the selection list as
//! `<prefix>: <name>` (for example `mita: add command`). Each one is a short
//! interactive flow: pick a target, change the store, report the outcome.
//! Row-level failures are reported to the user and never abort the process.

use std::fmt::{Display, Formatter};

use log::debug;
use mita_core::command_definitions::{default_label, Assignment, CommandRecord, VariableRecord};
use mita_core::config::ensure_label_allowed;
use mita_core::error::Result;
use mita_core::store::Store;

use crate::command_selection::{Console, Selector};

/// Everything a system command needs to run.
pub struct Session<'a> {
    pub store: &'a Store,
    pub selector: &'a dyn Selector,
    pub console: &'a dyn Console,
    pub reserved_prefix: &'a str,
}

impl Session<'_> {
    /// Reports a recoverable failure, passes anything else up.
    fn settle<T>(&self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_recoverable() => {
                self.console.report(&e.to_string());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn select_command(&self, prompt: &str) -> Result<Option<CommandRecord>> {
        let Some(commands) = self.settle(self.store.list_commands())? else {
            return Ok(None);
        };

        if commands.is_empty() {
            self.console
                .report("No commands saved yet. Use `mita commands add` to add one.");
            return Ok(None);
        }

        let labels: Vec<String> = commands.iter().map(|c| c.label.clone()).collect();
        let Some(selection) = self.selector.select_one(prompt, &labels)? else {
            return Ok(None);
        };

        Ok(commands.into_iter().find(|c| c.label == selection))
    }

    fn select_variable(&self, prompt: &str) -> Result<Option<VariableRecord>> {
        let Some(variables) = self.settle(self.store.list_variables())? else {
            return Ok(None);
        };

        if variables.is_empty() {
            self.console
                .report("No variables saved yet. Use `mita vars set NAME=VALUE` to set one.");
            return Ok(None);
        }

        let names: Vec<String> = variables.iter().map(|v| v.name.clone()).collect();
        let Some(selection) = self.selector.select_one(prompt, &names)? else {
            return Ok(None);
        };

        Ok(variables.into_iter().find(|v| v.name == selection))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemCommand {
    Swap,
    DeleteVariable,
    DeleteCommand,
    ModifyCommand,
    AddCommand,
    SetVariable,
}

impl SystemCommand {
    /// All system commands, in the order they are listed.
    pub const ALL: [SystemCommand; 6] = [
        SystemCommand::Swap,
        SystemCommand::DeleteVariable,
        SystemCommand::DeleteCommand,
        SystemCommand::ModifyCommand,
        SystemCommand::AddCommand,
        SystemCommand::SetVariable,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SystemCommand::Swap => "swap",
            SystemCommand::DeleteVariable => "delete variable",
            SystemCommand::DeleteCommand => "delete command",
            SystemCommand::ModifyCommand => "modify command",
            SystemCommand::AddCommand => "add command",
            SystemCommand::SetVariable => "set variable",
        }
    }

    /// The entry shown in the selection list.
    #[must_use]
    pub fn label(self, reserved_prefix: &str) -> String {
        format!("{reserved_prefix}: {}", self.name())
    }

    /// Labels of every system command, in listing order.
    #[must_use]
    pub fn labels(reserved_prefix: &str) -> Vec<String> {
        Self::ALL
            .iter()
            .map(|command| command.label(reserved_prefix))
            .collect()
    }

    /// The system command whose label is exactly `label`.
    #[must_use]
    pub fn from_label(label: &str, reserved_prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.label(reserved_prefix) == label)
    }

    /// Runs the interactive flow for this command.
    ///
    /// # Errors
    ///
    /// Only environment failures (selector or terminal) are returned; store
    /// failures are reported through the console.
    pub fn run(self, session: &Session<'_>) -> Result<()> {
        debug!("Running system command `{}`", self.name());

        match self {
            SystemCommand::Swap => handle_swap_variable(session),
            SystemCommand::DeleteVariable => handle_delete_variable(session),
            SystemCommand::DeleteCommand => handle_delete_command(session),
            SystemCommand::ModifyCommand => handle_modify_command(session),
            SystemCommand::AddCommand => handle_add_command(session),
            SystemCommand::SetVariable => handle_set_variable(session),
        }
    }
}

impl Display for SystemCommand {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Text from the editor, without the trailing newlines editors add.
fn strip_trailing_newlines(text: &str) -> String {
    text.trim_end_matches(['\n', '\r']).to_string()
}

fn handle_add_command(session: &Session<'_>) -> Result<()> {
    let command = match session.console.edit("\n")? {
        Some(edited) => strip_trailing_newlines(&edited),
        None => session.console.prompt("Enter command to add", Some(""))?,
    };

    if command.is_empty() {
        session.console.report("No command entered, nothing added.");
        return Ok(());
    }

    let fallback = default_label(&command);
    let mut label = session.console.prompt("Enter label", Some(&fallback))?;
    if label.is_empty() {
        label = fallback;
    }

    if session
        .settle(ensure_label_allowed(&label, session.reserved_prefix))?
        .is_none()
    {
        return Ok(());
    }

    if session.settle(session.store.add_command(&label, &command))?.is_some() {
        session
            .console
            .report(&format!("Added command: {label} -> {command}"));
    }

    Ok(())
}

fn handle_modify_command(session: &Session<'_>) -> Result<()> {
    let Some(current) = session.select_command("Select command")? else {
        return Ok(());
    };

    let command = match session.console.edit(&format!("{}\n", current.command))? {
        Some(edited) => strip_trailing_newlines(&edited),
        None => session
            .console
            .prompt("Enter new command", Some(&current.command))?,
    };

    let label = session
        .console
        .prompt("Enter new label", Some(&current.label))?;

    if session
        .settle(ensure_label_allowed(&label, session.reserved_prefix))?
        .is_none()
    {
        return Ok(());
    }

    if session
        .settle(session.store.modify_command(current.id, &command, &label))?
        .is_some()
    {
        session
            .console
            .report(&format!("Modified command: {} to {command}", current.label));
    }

    Ok(())
}

fn handle_delete_command(session: &Session<'_>) -> Result<()> {
    let Some(command) = session.select_command("Select command")? else {
        return Ok(());
    };

    if session.settle(session.store.delete_command(command.id))?.is_some() {
        session
            .console
            .report(&format!("Deleted command: {}", command.label));
    }

    Ok(())
}

fn handle_set_variable(session: &Session<'_>) -> Result<()> {
    let assignment = match session.select_variable("Select variable (esc to create)")? {
        Some(variable) => {
            let value = session.console.prompt(
                &format!("Enter new value for {}", variable.name),
                Some(&variable.value),
            )?;
            Assignment {
                name: variable.name,
                value,
            }
        }
        None => {
            let pair = session
                .console
                .prompt("Enter variable to set (name=value)", None)?;
            match session.settle(pair.parse::<Assignment>())? {
                Some(assignment) => assignment,
                None => return Ok(()),
            }
        }
    };

    if session
        .settle(
            session
                .store
                .set_variable(&assignment.name, &assignment.value),
        )?
        .is_some()
    {
        session.console.report(&format!("Set {assignment}"));
    }

    Ok(())
}

fn handle_delete_variable(session: &Session<'_>) -> Result<()> {
    let Some(variable) = session.select_variable("Select variable")? else {
        return Ok(());
    };

    if session
        .settle(session.store.delete_variable(&variable.name))?
        .is_some()
    {
        session
            .console
            .report(&format!("Deleted variable: {}", variable.name));
    }

    Ok(())
}

fn handle_swap_variable(session: &Session<'_>) -> Result<()> {
    let Some(variable) = session.select_variable("Select variable")? else {
        return Ok(());
    };

    if let Some(swapped) = session.settle(session.store.swap_variable(&variable.name))? {
        session.console.report(&format!("Swapped {swapped}"));
    }

    Ok(())
}
