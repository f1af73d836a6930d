use serde::{Deserialize, Serialize};

/// Per-activation configuration. There is no config file; the embedding
/// application passes a value of this into `activate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    /// Allow more than one block of content.
    pub multiline: bool,
    /// Rich formatting; `false` turns the region into a plain-text field.
    pub markup: bool,
    /// Text shown while the region is empty.
    pub placeholder: String,
    /// Start in the placeholder state instead of focusing the region.
    pub start_empty: bool,
    /// Font stack applied to inline code; also what the code-active query
    /// compares against.
    pub code_font_family: String,
}

impl Default for EditorOptions {
    fn default() -> Self {
        EditorOptions {
            multiline: true,
            markup: true,
            placeholder: "Enter Text".to_string(),
            start_empty: false,
            code_font_family: "Monaco, Consolas, \"Lucida Console\", monospace".to_string(),
        }
    }
}
