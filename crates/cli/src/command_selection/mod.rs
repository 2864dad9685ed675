//! Interactive selection and user input handling.
//!
//! This module provides the two ways mita asks the user to pick from a list
//! (an external fuzzy finder or the built-in terminal picker) and the console
//! used by the interactive flows for prompts, the editor and messages.
//!
//! # User Interface
//!
//! The built-in picker supports:
//! - Typing to filter (fuzzy search)
//! - Arrow keys or Ctrl-P/Ctrl-N to move
//! - Enter to choose
//! - Escape or Ctrl-C to cancel

// Export public items from submodules
pub mod external;
pub mod input;
pub mod types;
pub mod ui;

use mita_core::config::BUILTIN_SELECTOR;
use mita_core::error::Result;

// Re-exports for convenience
pub use external::ExternalSelector;
pub use input::{Console, TerminalConsole};
pub use ui::TerminalSelector;

/// Lets the user pick one entry out of an ordered list.
pub trait Selector {
    /// Shows `candidates` in order and returns the chosen one.
    ///
    /// `None` means the user cancelled or chose nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection UI cannot be started.
    fn select_one(&self, prompt: &str, candidates: &[String]) -> Result<Option<String>>;
}

/// Builds the selector named in the configuration.
///
/// `builtin` picks the in-process picker; anything else is run as a program.
pub fn build_selector(name: &str) -> Box<dyn Selector> {
    if name == BUILTIN_SELECTOR {
        Box::new(TerminalSelector)
    } else {
        Box::new(ExternalSelector::new(name))
    }
}
