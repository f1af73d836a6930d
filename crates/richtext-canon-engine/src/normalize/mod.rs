//! Bidirectional structural normalization.
//!
//! `semantify` rewrites whatever a native editing surface produced into the
//! canonical vocabulary {p, ul, ol, li, strong, em, code, a}; `desemantify`
//! rewrites canonical form back into the presentational form native
//! formatting commands recognize; `sanitize` filters externally-sourced
//! markup down to the allowed vocabulary on paste.

mod desemantify;
mod sanitize;
mod semantify;

pub use desemantify::{desemantify, mark_code_fonts};
pub use sanitize::sanitize_paste;
pub use semantify::semantify;

/// Class carried by the presentational font element that stands in for
/// `code`. The only reliable way to query "is code active" through a
/// native command interface is the applied font family, so the marker
/// class identifies our own code wrappers on the way back in.
pub const CODE_MARKER_CLASS: &str = "canon-code";
