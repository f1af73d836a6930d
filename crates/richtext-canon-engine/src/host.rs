//! The native formatting capability.
//!
//! Everything the engine needs from the platform that actually renders the
//! editable surface goes through [`FormattingHost`]: apply or query
//! bold/italic/list/link state on the current selection, insert markup,
//! and answer one capability probe resolved by the host once at
//! integration time. Host failures are absorbed by the engine at the point
//! of use — a failed query reads as "inactive", a failed command is a
//! no-op — and are never surfaced to the application.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("native command not supported: {0}")]
    Unsupported(String),
    #[error("native command rejected: {0}")]
    Rejected(String),
}

/// Selection-state queries the engine issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateQuery {
    Bold,
    Italic,
    UnorderedList,
    OrderedList,
}

/// Commands the engine hands to the host for execution at the current
/// selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCommand {
    ToggleBold,
    ToggleItalic,
    SetFontName(String),
    RemoveFormat,
    CreateLink(String),
    ToggleUnorderedList,
    ToggleOrderedList,
    Indent,
    Outdent,
}

pub trait FormattingHost {
    /// Whether the given formatting state is active at the selection.
    fn query_state(&self, query: StateQuery) -> Result<bool, HostError>;

    /// The font family applied at the selection, as the host reports it.
    fn query_font_name(&self) -> Result<String, HostError>;

    /// Execute a formatting command at the selection.
    fn exec(&mut self, command: NativeCommand) -> Result<(), HostError>;

    /// Insert sanitized markup at the selection.
    fn insert_markup(&mut self, markup: &str) -> Result<(), HostError>;

    /// Ask the user (or the embedding application) for a link target.
    /// `None` aborts the link command.
    fn request_link_target(&mut self) -> Option<String>;

    /// Capability probe: whether `query_font_name` reports only the single
    /// applied font rather than the full configured stack. Resolved once
    /// by the host, not sniffed per call.
    fn single_font_name_reported(&self) -> bool {
        false
    }
}

/// Compare two font families for the code-active check.
///
/// Families are normalized for whitespace around commas and quote style.
/// With the single-name capability set, a lone name on either side matches
/// by membership in the other side's stack.
pub fn same_font_family(a: &str, b: &str, single_name_fallback: bool) -> bool {
    let a = normalize_font_family(a);
    let b = normalize_font_family(b);
    if single_name_fallback {
        let a_names: Vec<&str> = a.split(',').collect();
        let b_names: Vec<&str> = b.split(',').collect();
        if a_names.len() == 1 {
            return b_names.contains(&a.as_str());
        }
        if b_names.len() == 1 {
            return a_names.contains(&b.as_str());
        }
    }
    a == b
}

fn normalize_font_family(family: &str) -> String {
    family
        .split(',')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(",")
        .replace('\'', "\"")
}
