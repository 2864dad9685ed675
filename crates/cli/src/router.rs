//! The default flow: pick something from the list and act on it.
//!
//! The list is the user's command labels followed, outside finder mode, by the
//! system command labels. Picking a system command runs its flow; picking a
//! user command renders it against the current variables.

use log::{debug, warn};
use mita_core::error::{Error, Result};
use mita_core::interpolation::{build_bindings, get_placeholders, renderer_for, Renderer};

use crate::system_commands::{Session, SystemCommand};

/// Flags of a bare invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Leave system commands out and print without a trailing newline
    pub find_mode: bool,
    /// Print the command text without substituting variables
    pub no_render: bool,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user picked nothing
    NoSelection,
    /// A system command flow ran
    SystemCommand(SystemCommand),
    /// A user command, ready to print
    Output(String),
}

impl Outcome {
    /// The text to write to stdout, if any.
    ///
    /// Finder mode output has no trailing newline so it can be spliced into
    /// the shell's command line.
    #[must_use]
    pub fn printable(&self, options: RunOptions) -> Option<String> {
        match self {
            Outcome::Output(text) if options.find_mode => Some(text.clone()),
            Outcome::Output(text) => Some(format!("{text}\n")),
            _ => None,
        }
    }
}

pub struct Router<'a> {
    session: Session<'a>,
}

impl<'a> Router<'a> {
    pub fn new(session: Session<'a>) -> Self {
        Self { session }
    }

    /// Runs one select-and-act pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector cannot run or the chosen command is
    /// not a valid template.
    pub fn run(&self, options: RunOptions) -> Result<Outcome> {
        let session = &self.session;

        let commands = session.store.list_commands().unwrap_or_else(|e| {
            warn!("Continuing without saved commands: {e}");
            Vec::new()
        });

        let mut labels: Vec<String> = commands.iter().map(|c| c.label.clone()).collect();
        if !options.find_mode {
            labels.extend(SystemCommand::labels(session.reserved_prefix));
        }

        let Some(selection) = session.selector.select_one("Select command", &labels)? else {
            return Ok(Outcome::NoSelection);
        };

        if let Some(system_command) = SystemCommand::from_label(&selection, session.reserved_prefix)
        {
            system_command.run(session)?;
            return Ok(Outcome::SystemCommand(system_command));
        }

        // Labels may repeat; the first one listed wins
        let Some(command) = commands.iter().find(|c| c.label == selection) else {
            return Err(Error::CommandNotFound(selection));
        };

        let variables = if options.no_render {
            Vec::new()
        } else {
            debug!(
                "`{}` uses {:?}",
                command.label,
                get_placeholders(&command.command)
            );

            session.store.list_variables().unwrap_or_else(|e| {
                warn!("Rendering without variables: {e}");
                Vec::new()
            })
        };

        let rendered =
            renderer_for(options.no_render).render(&command.command, &build_bindings(&variables))?;

        Ok(Outcome::Output(rendered))
    }
}
