//! Search functionality.
//!
//! Provides the query normalization and the method-entry match test used by
//! the page controller's search pass:
//! - Queries are lower-cased and trimmed; empty means "no filter"
//! - Matching is case-insensitive substring containment
//! - A method matches on its name OR its description

use serde::Serialize;

use crate::dom::{Dom, NodeId};

/// Class marking a method entry.
pub const METHOD_CLASS: &str = "api-method";
/// Class marking a method's description.
pub const DESCRIPTION_CLASS: &str = "description";
/// Tag holding a method's display name.
pub const NAME_TAG: &str = "h3";

/// Lower-case and trim raw input into a query.
pub fn normalize_query(raw: &str) -> String {
    raw.to_lowercase().trim().to_string()
}

/// A method entry's searchable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodEntry {
    pub node: NodeId,
    pub name: String,
    pub description: Option<String>,
}

impl MethodEntry {
    /// Read the name and optional description under `node`.
    ///
    /// A method without a name heading gets an empty name.
    pub fn read(dom: &Dom, node: NodeId) -> Self {
        let name = dom
            .first_by_tag(node, NAME_TAG)
            .map(|heading| dom.text_content(heading))
            .unwrap_or_default();
        let description = dom
            .first_by_class(node, DESCRIPTION_CLASS)
            .map(|desc| dom.text_content(desc));
        Self {
            node,
            name,
            description,
        }
    }

    /// Whether a normalized `query` occurs in the name or the description.
    pub fn matches(&self, query: &str) -> bool {
        matches_text(&self.name, query)
            || self
                .description
                .as_deref()
                .is_some_and(|description| matches_text(description, query))
    }
}

/// Case-insensitive substring test; `query` must already be lower-case.
pub fn matches_text(text: &str, query: &str) -> bool {
    text.to_lowercase().contains(query)
}

/// Result of one search pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// The normalized query that was run.
    pub query: String,
    /// Method entries that matched, in document order.
    pub matched_methods: usize,
    /// Sections revealed by the pass.
    pub visible_sections: usize,
}

impl SearchOutcome {
    pub const fn has_results(&self) -> bool {
        self.matched_methods > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn test_normalize_query_trims_and_lowercases() {
        assert_eq!(normalize_query("  PlayList \t"), "playlist");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn test_matches_is_substring_not_word_based() {
        assert!(matches_text("Get Video Details", "vid"));
        assert!(!matches_text("Get Channel", "vid"));
    }

    #[test]
    fn test_entry_matches_name_or_description() {
        let dom = parse_html(
            r#"<div class="api-method"><h3>get_channel</h3><div class="description">Fetch a Video owner</div></div>
               <div class="api-method"><h3>ping</h3></div>"#,
        )
        .unwrap();
        let methods = dom.query_class(dom.root(), METHOD_CLASS);
        let first = MethodEntry::read(&dom, methods[0]);
        let second = MethodEntry::read(&dom, methods[1]);

        assert!(first.matches("channel"));
        assert!(first.matches("video"));
        assert!(!first.matches("playlist"));
        assert_eq!(second.description, None);
        assert!(second.matches("pin"));
        assert!(!second.matches("video"));
    }

    #[test]
    fn test_entry_without_name_heading_has_empty_name() {
        let dom = parse_html(r#"<div class="api-method"><p>loose</p></div>"#).unwrap();
        let method = dom.first_by_class(dom.root(), METHOD_CLASS).unwrap();
        let entry = MethodEntry::read(&dom, method);
        assert_eq!(entry.name, "");
        assert!(!entry.matches("loose"));
    }
}
