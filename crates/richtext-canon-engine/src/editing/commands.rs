//! Editor commands and the annotation exclusivity rules.
//!
//! The three inline annotations are mutually exclusive at any position:
//! toggling one clears whichever other one is active first. Link is
//! orthogonal — creating a link clears the inline annotations so link text
//! carries no conflicting style, but toggling an annotation never removes
//! an existing link.

use thiserror::Error;

/// Commands the application can issue against the active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Emphasis,
    Strong,
    Code,
    Link,
    UnorderedList,
    OrderedList,
    Indent,
    Outdent,
}

/// An unrecognized command name. This is a programming error in the
/// caller: `exec` itself takes [`Command`] and cannot receive one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown editor command: {0:?}")]
pub struct UnknownCommand(pub String);

impl Command {
    /// The host-facing name boundary (toolbar wiring, shortcut tables).
    pub fn parse(name: &str) -> Result<Command, UnknownCommand> {
        match name {
            "em" => Ok(Command::Emphasis),
            "strong" => Ok(Command::Strong),
            "code" => Ok(Command::Code),
            "link" => Ok(Command::Link),
            "ul" => Ok(Command::UnorderedList),
            "ol" => Ok(Command::OrderedList),
            "indent" => Ok(Command::Indent),
            "outdent" => Ok(Command::Outdent),
            other => Err(UnknownCommand(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Emphasis => "em",
            Command::Strong => "strong",
            Command::Code => "code",
            Command::Link => "link",
            Command::UnorderedList => "ul",
            Command::OrderedList => "ol",
            Command::Indent => "indent",
            Command::Outdent => "outdent",
        }
    }

    /// The mutually exclusive inline annotations.
    pub const ANNOTATIONS: [Command; 3] = [Command::Emphasis, Command::Strong, Command::Code];
}
