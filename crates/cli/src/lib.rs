//! Mita CLI Library
//!
//! This crate provides the command-line interface for mita: pick a saved
//! command with a fuzzy finder, render it against the current variables and
//! print it, ready for the shell.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`command_selection`]: Selector backends (fzf or the builtin picker) and the console
//! - [`router`]: The default select-render-print flow
//! - [`system_commands`]: Interactive add/modify/delete/set/swap flows
//! - [`subcommands`]: Non-interactive `commands`, `vars`, `export` and `import`
//!
//! # Examples
//!
//! ```bash
//! # Pick a command and print it rendered
//! mita
//!
//! # Shell key binding: no trailing newline, no system commands
//! mita --find
//!
//! # Manage commands and variables directly
//! mita commands add -c 'ssh {{ user }}@{{ host }}' -l connect
//! mita vars set host=10.0.0.5
//! mita vars swap host
//! ```

pub mod cli_args;
pub mod command_selection;
pub mod router;
pub mod subcommands;
pub mod system_commands;
