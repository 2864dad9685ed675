use std::process::Command;

use itertools::Itertools;
use log::debug;

use super::Selector;
use mita_core::error::Result;
use mita_core::execution::exchange_with_command;

/// Delegates selection to an external fuzzy finder such as `fzf`.
///
/// Candidates are written one per line to the finder's stdin and the line it
/// prints back is the selection.
pub struct ExternalSelector {
    program: String,
}

impl ExternalSelector {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn build_command(&self, prompt: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.arg("--prompt").arg(format!("{prompt}> "));
        command
    }
}

impl Selector for ExternalSelector {
    fn select_one(&self, prompt: &str, candidates: &[String]) -> Result<Option<String>> {
        debug!("Offering {} candidates to `{}`", candidates.len(), self.program);

        let input = candidates.iter().join("\n");
        let output = exchange_with_command(self.build_command(prompt), &input)?;

        Ok(non_empty_selection(&output))
    }
}

/// Trims the finder's output; blank output means nothing was chosen.
fn non_empty_selection(output: &str) -> Option<String> {
    let selection = output.trim();

    if selection.is_empty() {
        None
    } else {
        Some(selection.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mita_core::error::Error;

    #[test]
    fn test_non_empty_selection() {
        assert_eq!(non_empty_selection("  git status \n"), Some("git status".to_string()));
        assert_eq!(non_empty_selection("\n"), None);
        assert_eq!(non_empty_selection(""), None);
    }

    #[test]
    fn test_prompt_argument() {
        let selector = ExternalSelector::new("fzf");
        let command = selector.build_command("Select command");
        let args: Vec<String> = command
            .get_args()
            .map(|arg| arg.to_string_lossy().to_string())
            .collect();
        assert_eq!(args, vec!["--prompt", "Select command> "]);
    }

    #[test]
    fn test_missing_finder_is_fatal() {
        let selector = ExternalSelector::new("mita-missing-finder");
        let result = selector.select_one("Select command", &["a".to_string()]);
        assert!(matches!(result, Err(Error::ProgramNotFound(_))));
    }
}
