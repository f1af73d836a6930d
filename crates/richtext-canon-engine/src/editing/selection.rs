//! Selection preservation across structural mutations.
//!
//! Rewrites replace nodes that may contain the cursor. The guard snapshots
//! both endpoints, applies the rewrite, then restores whatever endpoints
//! still exist in the new tree. Best effort by contract: a mutation that
//! removes the selected text loses the selection, never errors.

use super::region::{EditableRegion, Selection, SelectionPoint};
use crate::dom::Fragment;

/// Run a structural rewrite of the region's content, preserving the
/// selection where its anchors survive.
///
/// An endpoint is restored only if its node is still attached to the new
/// tree; its offset is clamped to the node's current length. If only one
/// endpoint survives the selection collapses to it; if neither does the
/// selection is left unset.
pub fn with_preserved_selection(
    region: &mut EditableRegion,
    mutate: impl FnOnce(&Fragment) -> Fragment,
) {
    let snapshot = region.selection;
    region.fragment = mutate(&region.fragment);

    let Some(snapshot) = snapshot else {
        return;
    };
    let anchor = revalidate(&region.fragment, snapshot.anchor);
    let focus = revalidate(&region.fragment, snapshot.focus);
    region.selection = match (anchor, focus) {
        (Some(anchor), Some(focus)) => Some(Selection { anchor, focus }),
        (Some(point), None) | (None, Some(point)) => {
            tracing::trace!("selection endpoint lost by mutation, collapsing");
            Some(Selection::caret(point))
        }
        (None, None) => {
            tracing::trace!("selection fully detached by mutation, dropping");
            None
        }
    };
}

fn revalidate(fragment: &Fragment, point: SelectionPoint) -> Option<SelectionPoint> {
    let node = fragment.node(point.node)?;
    Some(SelectionPoint {
        node: point.node,
        offset: point.offset.min(node.selection_len()),
    })
}
