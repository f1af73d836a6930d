//! The editable region.
//!
//! One region is under edit per session; ownership moves into `activate`
//! and comes back out of `deactivate`, so exclusivity is a property of the
//! type system rather than of a process-wide active-element global.

use crate::dom::{Fragment, NodeId};

/// One endpoint of a selection: a node identity plus an offset inside it
/// (characters for text nodes, child index for elements).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPoint {
    pub node: NodeId,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: SelectionPoint,
    pub focus: SelectionPoint,
}

impl Selection {
    pub fn caret(point: SelectionPoint) -> Selection {
        Selection {
            anchor: point,
            focus: point,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.anchor == self.focus
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditableRegion {
    pub(crate) fragment: Fragment,
    pub(crate) selection: Option<Selection>,
}

impl EditableRegion {
    pub fn new(fragment: Fragment) -> EditableRegion {
        EditableRegion {
            fragment,
            selection: None,
        }
    }

    pub fn from_html(html: &str) -> EditableRegion {
        EditableRegion::new(Fragment::parse(html))
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Set the selection; endpoints pointing outside the region are
    /// refused.
    pub fn select(&mut self, selection: Selection) {
        if self.fragment.contains(selection.anchor.node)
            && self.fragment.contains(selection.focus.node)
        {
            self.selection = Some(selection);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn text(&self) -> String {
        self.fragment.text()
    }

    pub fn is_blank(&self) -> bool {
        self.fragment.is_blank()
    }

    pub fn to_html(&self) -> String {
        self.fragment.to_html()
    }
}
