//! Search-match highlighting inside the document tree.
//!
//! Highlighting replaces each matching text leaf with a
//! `span.highlight-group` fragment in which every occurrence of the query is
//! wrapped in a `span.highlight` marker. Clearing undoes both wrappers and
//! re-merges the text, so `highlight` followed by `clear_highlights` leaves
//! the tree as it was.

use regex::{Regex, RegexBuilder};

use crate::dom::{Dom, NodeId};

/// Class of the marker around one matched substring.
pub const HIGHLIGHT_CLASS: &str = "highlight";
/// Class of the fragment that replaces a highlighted text leaf.
pub const GROUP_CLASS: &str = "highlight-group";

/// Build the literal, case-insensitive pattern for `query`.
///
/// Returns `None` for an empty query.
pub fn marker_pattern(query: &str) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }
    match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(regex) => Some(regex),
        Err(err) => {
            tracing::warn!(%err, query, "could not build highlight pattern");
            None
        }
    }
}

/// Wrap every occurrence of `query` in the text under `scope`.
///
/// Returns the number of markers inserted.
pub fn highlight_text(dom: &mut Dom, scope: NodeId, query: &str) -> usize {
    let Some(pattern) = marker_pattern(query) else {
        return 0;
    };
    let mut inserted = 0;
    for leaf in dom.text_leaves(scope) {
        if inside_marker(dom, leaf) {
            continue;
        }
        let Some(text) = dom.text(leaf).map(ToOwned::to_owned) else {
            continue;
        };
        if !pattern.is_match(&text) {
            continue;
        }

        let group = dom.create_element("span");
        dom.add_class(group, GROUP_CLASS);
        let mut cursor = 0;
        for found in pattern.find_iter(&text) {
            if found.start() > cursor {
                let plain = dom.create_text(&text[cursor..found.start()]);
                dom.append_child(group, plain);
            }
            let marker = dom.append_element(group, "span", Some(found.as_str()));
            dom.add_class(marker, HIGHLIGHT_CLASS);
            inserted += 1;
            cursor = found.end();
        }
        if cursor < text.len() {
            let plain = dom.create_text(&text[cursor..]);
            dom.append_child(group, plain);
        }
        dom.replace(leaf, group);
    }
    inserted
}

fn inside_marker(dom: &Dom, node: NodeId) -> bool {
    dom.parent(node)
        .is_some_and(|parent| dom.has_class(parent, HIGHLIGHT_CLASS))
}

/// Remove every marker and fragment wrapper under `scope`.
///
/// Returns the number of markers removed.
pub fn clear_highlights(dom: &mut Dom, scope: NodeId) -> usize {
    let markers = dom.query_class(scope, HIGHLIGHT_CLASS);
    let removed = markers.len();
    for marker in markers {
        let Some(parent) = dom.parent(marker) else {
            continue;
        };
        dom.unwrap_node(marker);
        dom.normalize(parent);
    }

    for group in dom.query_class(scope, GROUP_CLASS) {
        let Some(parent) = dom.parent(group) else {
            continue;
        };
        dom.unwrap_node(group);
        dom.normalize(parent);
    }
    removed
}

/// Number of markers currently under `scope`.
pub fn marker_count(dom: &Dom, scope: NodeId) -> usize {
    dom.query_class(scope, HIGHLIGHT_CLASS).len()
}
