//! Direct subcommands: `commands`, `vars`, `export` and `import`.
//!
//! These run without a selector. Refusals that concern one row (a duplicate,
//! a reserved label, a swap without history) are printed and the process
//! still succeeds. Storage faults and file errors are returned.

use std::io::Write;

use log::info;
use mita_core::command_definitions::default_label;
use mita_core::config::{ensure_label_allowed, Config};
use mita_core::error::{Error, Result};
use mita_core::file_handling::{read_snapshot, write_snapshot, Snapshot};
use mita_core::store::Store;

use crate::cli_args::{Command, CommandsAction, DeleteArgs, DeleteTarget, VarsAction};

/// Runs one direct subcommand, writing user-facing output to `out`.
///
/// # Errors
///
/// Returns an error on storage faults, unreadable snapshot files or when
/// `out` cannot be written.
pub fn run(command: Command, store: &Store, config: &Config, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Commands(action) => run_commands(action, store, config, out),
        Command::Vars(action) => run_vars(action, store, out),
        Command::Export { path } => export(&path, store, out),
        Command::Import { path } => import(&path, store, config, out),
    }
}

/// Prints a refusal; passes anything else up.
fn refuse(result: Result<()>, out: &mut dyn Write) -> Result<()> {
    match result {
        Err(e @ Error::Storage { .. }) => Err(e),
        Err(e) if e.is_recoverable() => {
            writeln!(out, "{e}")?;
            Ok(())
        }
        other => other,
    }
}

fn run_commands(
    action: CommandsAction,
    store: &Store,
    config: &Config,
    out: &mut dyn Write,
) -> Result<()> {
    match action {
        CommandsAction::Add { command, label } => {
            let label = label.unwrap_or_else(|| default_label(&command));
            let result = ensure_label_allowed(&label, &config.reserved_prefix)
                .and_then(|()| store.add_command(&label, &command))
                .and_then(|_| {
                    writeln!(out, "Added command: {label} -> {command}")?;
                    Ok(())
                });
            refuse(result, out)
        }
        CommandsAction::List => {
            for record in store.list_commands()? {
                writeln!(out, "{}\t{record}", record.id)?;
            }
            Ok(())
        }
        CommandsAction::Delete(delete) => match delete.target() {
            DeleteTarget::Id(id) => {
                if store.delete_command(id)? == 0 {
                    writeln!(out, "No command with id {id}")?;
                } else {
                    writeln!(out, "Deleted command {id}")?;
                }
                Ok(())
            }
            DeleteTarget::Text(command) => {
                let deleted = store.delete_commands_by_text(&command)?;
                writeln!(out, "Deleted {deleted} command(s) matching `{command}`")?;
                Ok(())
            }
        },
    }
}

fn run_vars(action: VarsAction, store: &Store, out: &mut dyn Write) -> Result<()> {
    match action {
        VarsAction::Set { assignment } => {
            store.set_variable(&assignment.name, &assignment.value)?;
            writeln!(out, "Set {assignment}")?;
            Ok(())
        }
        VarsAction::List => {
            for variable in store.list_variables()? {
                writeln!(out, "{variable}")?;
            }
            Ok(())
        }
        VarsAction::Swap { name } => {
            let result = store.swap_variable(&name).and_then(|swapped| {
                writeln!(out, "Swapped {swapped}")?;
                Ok(())
            });
            refuse(result, out)
        }
        VarsAction::Delete { name } => {
            if store.delete_variable(&name)? == 0 {
                writeln!(out, "{}", Error::VariableNotFound(name))?;
            } else {
                writeln!(out, "Deleted variable: {name}")?;
            }
            Ok(())
        }
    }
}

fn export(path: &str, store: &Store, out: &mut dyn Write) -> Result<()> {
    let snapshot = Snapshot::capture(store)?;
    write_snapshot(path, &snapshot)?;

    writeln!(
        out,
        "Exported {} command(s) and {} variable(s) to {path}",
        snapshot.commands.len(),
        snapshot.variables.len()
    )?;
    Ok(())
}

fn import(path: &str, store: &Store, config: &Config, out: &mut dyn Write) -> Result<()> {
    let report = read_snapshot(path)?.restore(store, &config.reserved_prefix)?;
    info!("Imported {path}: {report:?}");

    writeln!(
        out,
        "Imported {} command(s) and {} variable(s) from {path}",
        report.commands_added, report.variables_restored
    )?;
    if report.duplicates_skipped > 0 {
        writeln!(
            out,
            "Skipped {} command(s) already saved",
            report.duplicates_skipped
        )?;
    }
    if report.reserved_skipped > 0 {
        writeln!(
            out,
            "Skipped {} command(s) with a label starting with {}",
            report.reserved_skipped, config.reserved_prefix
        )?;
    }
    Ok(())
}
