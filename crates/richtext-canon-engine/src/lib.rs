//! Constrained rich-text editing over a native formatting surface.
//!
//! A live, user-editable region is held to a small semantic vocabulary:
//! paragraphs, ordered/unordered lists, and the mutually exclusive inline
//! annotations emphasis/strong/code plus links. The engine's job is the
//! bidirectional normalization between that canonical form and whatever
//! presentational markup the host platform's native formatting commands
//! produce — plus paste sanitization, selection preservation across
//! structural rewrites, and text-direction classification.

pub mod direction;
pub mod dom;
pub mod editing;
pub mod host;
pub mod models;
pub mod normalize;

// Re-export key types for easier usage
pub use direction::{Direction, classify};
pub use dom::Fragment;
pub use editing::{
    Command, EditableRegion, EditorOptions, EditorSession, Selection, SelectionPoint,
    UnknownCommand, with_preserved_selection,
};
pub use host::{FormattingHost, HostError, NativeCommand, StateQuery, same_font_family};
pub use models::{AnnotationKind, ContentNode, InlineRun, ItemNode, List, ListItem};
pub use normalize::{CODE_MARKER_CLASS, desemantify, mark_code_fonts, sanitize_paste, semantify};
