use std::fs;
use std::io::{stdin, stdout, Write};
use std::process::Command;

use log::warn;
use mita_core::error::{Error, Result};
use mita_core::execution::execute_command;

/// Line prompts, the text editor and user-facing messages.
pub trait Console {
    /// Asks for a line of text.
    ///
    /// An empty answer returns `default` when there is one; without a default
    /// the question is repeated.
    fn prompt(&self, message: &str, default: Option<&str>) -> Result<String>;

    /// Opens `initial` in the user's editor.
    ///
    /// Returns `None` when no editor is available or the text was left as is.
    fn edit(&self, initial: &str) -> Result<Option<String>>;

    /// Tells the user what happened.
    fn report(&self, message: &str);
}

/// Console on the process's stdin/stdout and `$VISUAL`/`$EDITOR`.
pub struct TerminalConsole {
    editor: Option<String>,
}

impl TerminalConsole {
    pub fn new(editor: Option<String>) -> Self {
        Self { editor }
    }
}

impl Console for TerminalConsole {
    fn prompt(&self, message: &str, default: Option<&str>) -> Result<String> {
        loop {
            match default {
                Some(default) if !default.is_empty() => print!("{message} [{default}]: "),
                _ => print!("{message}: "),
            }

            stdout().flush()?;

            // Read user input
            let mut input = String::new();
            if stdin().read_line(&mut input)? == 0 {
                return Err(Error::InputClosed);
            }

            if let Some(answer) = resolve_answer(&input, default) {
                return Ok(answer);
            }

            // No input and no default - loop again
        }
    }

    fn edit(&self, initial: &str) -> Result<Option<String>> {
        let Some(editor) = &self.editor else {
            return Ok(None);
        };

        let file = tempfile::Builder::new()
            .prefix("mita-")
            .suffix(".sh")
            .tempfile()
            .map_err(|e| {
                Error::io_error("editor".to_string(), "temporary file".to_string(), e)
            })?;
        let path = file.path();
        let path_description = path.display().to_string();

        fs::write(path, initial)
            .map_err(|e| Error::io_error("editor".to_string(), path_description.clone(), e))?;

        // Editors are often configured with arguments, e.g. `code --wait`
        let mut parts = editor.split_whitespace();
        let Some(program) = parts.next() else {
            return Ok(None);
        };
        let mut command = Command::new(program);
        command.args(parts).arg(path);

        match execute_command(command) {
            Ok(()) => {}
            Err(e @ (Error::SubProcessExit | Error::ProgramNotFound(_))) => {
                warn!("Editor `{editor}` failed ({e}), falling back to a prompt");
                return Ok(None);
            }
            Err(e) => return Err(e),
        }

        let edited = fs::read_to_string(path)
            .map_err(|e| Error::io_error("editor".to_string(), path_description, e))?;

        if edited == initial {
            Ok(None)
        } else {
            Ok(Some(edited))
        }
    }

    fn report(&self, message: &str) {
        println!("{message}");
    }
}

/// The value a raw input line stands for, if any.
fn resolve_answer(input: &str, default: Option<&str>) -> Option<String> {
    let read_value = input.trim_end_matches(['\n', '\r']);

    if !read_value.is_empty() {
        return Some(read_value.to_string());
    }

    default.map(ToString::to_string)
}
