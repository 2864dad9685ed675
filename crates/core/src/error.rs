use handlebars::RenderError;
use log::error;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("The sub process exiting with non-success code.")]
    SubProcessExit,

    #[error("Error running sub process: {}", .0)]
    SubProcess(std::io::Error),

    #[error("Error reading from or writing to the terminal: {}", .0)]
    Terminal(#[from] std::io::Error),

    #[error("Could not find `{}`. Is it installed and on your PATH?", .0)]
    ProgramNotFound(String),

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Error {}: {}", .action, .original)]
    Storage {
        action: String,
        original: rusqlite::Error,
    },

    #[error("Database version mismatch: {} != {}", .found, .expected)]
    IncompatibleVersion { found: i64, expected: i64 },

    #[error("Command already exists: {} -> {}", .label, .command)]
    DuplicateCommand { label: String, command: String },

    #[error("No command with label `{}`", .0)]
    CommandNotFound(String),

    #[error("Variable {} does not exist.", .0)]
    VariableNotFound(String),

    #[error("Variable {} does not have a past value.", .0)]
    NoHistory(String),

    #[error("Label `{}` starts with {}, which is reserved for system commands.", .label, .prefix)]
    ReservedLabel { label: String, prefix: String },

    #[error("Invalid format `{}`. Use name=value.", .0)]
    InvalidAssignment(String),

    #[error("Input was closed before a value was entered.")]
    InputClosed,

    #[error("Error rendering command template: {}", .0)]
    Render(#[from] RenderError),
}

impl Error {
    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    /// Logs a failed database statement and wraps it.
    pub fn storage(action: &str, original: rusqlite::Error) -> Self {
        error!("Error {action}: {original}");
        Self::Storage {
            action: action.to_string(),
            original,
        }
    }

    /// Failures that concern a single row or a single user input.
    ///
    /// Interactive flows report these and carry on.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DuplicateCommand { .. }
                | Self::VariableNotFound(_)
                | Self::NoHistory(_)
                | Self::ReservedLabel { .. }
                | Self::InvalidAssignment(_)
                | Self::Storage { .. }
        )
    }
}
