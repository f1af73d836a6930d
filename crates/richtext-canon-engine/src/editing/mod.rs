//! The editing layer.
//!
//! One [`session::EditorSession`] owns one [`region::EditableRegion`] for
//! the duration of an activation. The session wires the normalization
//! engine to a host's native formatting capability, keeps the selection
//! alive across structural rewrites, coalesces change notifications, and
//! runs the two-phase paste pipeline.

pub mod commands;
pub mod events;
pub mod options;
pub mod region;
pub mod schedule;
pub mod selection;
pub mod session;

pub use commands::{Command, UnknownCommand};
pub use events::EventBus;
pub use options::EditorOptions;
pub use region::{EditableRegion, Selection, SelectionPoint};
pub use schedule::{CHANGE_DEBOUNCE_MS, Debounce, PASTE_CAPTURE_DELAY_MS};
pub use selection::with_preserved_selection;
pub use session::EditorSession;
