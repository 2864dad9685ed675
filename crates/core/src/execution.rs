use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use log::{debug, info};

use crate::error::{Error, Result};

fn program_name(command: &Command) -> String {
    command.get_program().to_string_lossy().to_string()
}

fn spawn_error(program: String, original: std::io::Error) -> Error {
    if original.kind() == ErrorKind::NotFound {
        Error::ProgramNotFound(program)
    } else {
        Error::SubProcess(original)
    }
}

/// Runs a command attached to the current terminal and waits for it.
///
/// # Errors
///
/// Returns [`Error::ProgramNotFound`] if the program does not exist, or
/// [`Error::SubProcessExit`] if it exits with a non-zero status.
pub fn execute_command(mut command: Command) -> Result<()> {
    let program = program_name(&command);
    let command = command
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    info!("Executing `{program}`");

    let subprocess_exit_success = command
        .spawn()
        .map_err(|e| spawn_error(program, e))?
        .wait()
        .map_err(Error::SubProcess)?
        .success();

    if subprocess_exit_success {
        Ok(())
    } else {
        Err(Error::SubProcessExit)
    }
}

/// Feeds `input` to a command's stdin and collects what it prints on stdout.
///
/// Stderr stays attached to the terminal. The exit status is not inspected:
/// interactive filters use non-zero codes for "nothing chosen", which shows up
/// here as empty output.
///
/// # Errors
///
/// Returns [`Error::ProgramNotFound`] if the program does not exist.
pub fn exchange_with_command(mut command: Command, input: &str) -> Result<String> {
    let program = program_name(&command);
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| spawn_error(program.clone(), e))?;

    if let Some(mut stdin) = child.stdin.take() {
        // The child may exit before reading everything, e.g. on an early choice
        if let Err(e) = stdin.write_all(input.as_bytes()) {
            if e.kind() != ErrorKind::BrokenPipe {
                return Err(Error::SubProcess(e));
            }
        }
    }

    let output = child.wait_with_output().map_err(Error::SubProcess)?;
    debug!("`{program}` exited with {}", output.status);

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
