use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A saved shell snippet as stored in the `commands` table.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub id: i64,
    pub label: String,
    pub command: String,
}

impl Display for CommandRecord {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        if self.label == self.command {
            formatter.write_str(&self.label)
        } else {
            write!(formatter, "{} -> {}", self.label, self.command)
        }
    }
}

/// A named template value with one step of history.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VariableRecord {
    pub name: String,
    pub value: String,
    pub past_value: Option<String>,
}

impl Display for VariableRecord {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}={}", self.name, self.value)?;

        if let Some(past_value) = &self.past_value {
            write!(formatter, " (was {past_value})")?;
        }

        Ok(())
    }
}

/// The label a command gets when none is given: its first non-blank line.
///
/// Selectors list one entry per line, so a label never spans lines.
pub fn default_label(command: &str) -> String {
    command
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or(command)
        .to_string()
}

/// A `name=value` pair as typed on the command line or at a prompt.
///
/// Only the first `=` separates name from value, so values may contain `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub value: String,
}

impl FromStr for Assignment {
    type Err = Error;

    fn from_str(pair: &str) -> Result<Self, Self::Err> {
        match pair.split_once('=') {
            Some((name, value)) => Ok(Self {
                name: name.to_string(),
                value: value.to_string(),
            }),
            None => Err(Error::InvalidAssignment(pair.to_string())),
        }
    }
}

impl Display for Assignment {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}={}", self.name, self.value)
    }
}
