//! Method counts per category.
//!
//! Computed once when a page is loaded and written into the page's
//! `.stats-summary` list. Counts for categories outside the known vocabulary
//! land in the "other" bucket.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dom::Dom;
use crate::page::Page;
use crate::search::METHOD_CLASS;

/// Class of the element holding the summary list.
pub const STATS_CLASS: &str = "stats-summary";

/// The closed category vocabulary of the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Basic,
    Info,
    Search,
    List,
    Pagination,
    Simple,
    Helper,
    Playlist,
}

impl Category {
    pub const ALL: [Self; 8] = [
        Self::Basic,
        Self::Info,
        Self::Search,
        Self::List,
        Self::Pagination,
        Self::Simple,
        Self::Helper,
        Self::Playlist,
    ];

    /// Key used by sections' `data-category`.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Info => "info",
            Self::Search => "search",
            Self::List => "list",
            Self::Pagination => "pagination",
            Self::Simple => "simple",
            Self::Helper => "helper",
            Self::Playlist => "playlist",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic classes",
            Self::Info => "Basic info",
            Self::Search => "Search",
            Self::List => "List retrieval",
            Self::Pagination => "Pagination",
            Self::Simple => "Simplified methods",
            Self::Helper => "Helper methods",
            Self::Playlist => "Playlist management",
        }
    }
}

/// Method counts keyed by section id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MethodStats {
    counts: BTreeMap<String, usize>,
    total: usize,
}

impl MethodStats {
    /// Count method entries in every non-intro section.
    ///
    /// A section is keyed by its `id` (empty when it has none). A later
    /// section with the same key replaces the earlier count.
    pub fn compute(page: &Page) -> Self {
        let dom = page.dom();
        let mut stats = Self::default();
        for &section in page.sections() {
            if Some(section) == page.intro() {
                continue;
            }
            let key = dom.attr(section, "id").unwrap_or_default();
            let methods = dom.query_class(section, METHOD_CLASS).len();
            stats.set(key, methods);
        }
        stats
    }

    /// Build stats from explicit `(category, count)` pairs.
    pub fn from_counts<'a>(counts: impl IntoIterator<Item = (&'a str, usize)>) -> Self {
        let mut stats = Self::default();
        for (key, count) in counts {
            stats.set(key, count);
        }
        stats
    }

    fn set(&mut self, key: &str, count: usize) {
        if let Some(previous) = self.counts.insert(key.to_string(), count) {
            self.total -= previous;
        }
        self.total += count;
    }

    pub fn count(&self, category: Category) -> usize {
        self.counts.get(category.key()).copied().unwrap_or(0)
    }

    pub const fn total(&self) -> usize {
        self.total
    }

    /// Methods outside the known vocabulary.
    pub fn other(&self) -> usize {
        let named: usize = Category::ALL.into_iter().map(|c| self.count(c)).sum();
        self.total.saturating_sub(named)
    }

    /// One line per known category plus the "other" bucket.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = Category::ALL
            .into_iter()
            .map(|category| format!("{}: {} methods", category.label(), self.count(category)))
            .collect();
        lines.push(format!("Other: {} methods", self.other()));
        lines
    }

    pub fn total_line(&self) -> String {
        format!("Total: {} implemented methods", self.total)
    }

    /// Write the summary into the page's stats list.
    ///
    /// Returns `false` and leaves the page alone when the list is missing.
    pub fn render_into(&self, dom: &mut Dom) -> bool {
        let Some(summary) = dom.first_by_class(dom.root(), STATS_CLASS) else {
            return false;
        };
        let Some(list) = dom.first_by_tag(summary, "ul") else {
            return false;
        };
        dom.remove_children(list);
        for line in self.summary_lines() {
            dom.append_element(list, "li", Some(&line));
        }

        let total = dom.parent(list).and_then(|parent| {
            dom.descendants(parent)
                .filter(|node| dom.tag_name(*node) == Some("p"))
                .find_map(|p| dom.first_by_tag(p, "strong"))
        });
        if let Some(total) = total {
            dom.set_text_content(total, &self.total_line());
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    const PAGE: &str = r#"
        <div class="content">
          <section class="api-section" id="intro">
            <div class="stats-summary"><p><strong>?</strong></p><ul><li>stale</li></ul></div>
          </section>
          <section class="api-section" id="basic" data-category="basic">
            <div class="api-method"><h3>A</h3></div>
            <div class="api-method"><h3>B</h3></div>
            <div class="api-method"><h3>C</h3></div>
          </section>
          <section class="api-section" id="info" data-category="info">
            <div class="api-method"><h3>D</h3></div>
            <div class="api-method"><h3>E</h3></div>
          </section>
          <section class="api-section" id="search" data-category="search"></section>
        </div>"#;

    #[test]
    fn test_counts_named_categories_and_other() {
        let page = Page::attach(parse_html(PAGE).unwrap());
        let stats = MethodStats::compute(&page);
        assert_eq!(stats.count(Category::Basic), 3);
        assert_eq!(stats.count(Category::Info), 2);
        assert_eq!(stats.count(Category::Search), 0);
        assert_eq!(stats.total(), 5);
        assert_eq!(stats.other(), 0);
    }

    #[test]
    fn test_unknown_categories_fall_into_other() {
        let stats = MethodStats::from_counts([("basic", 2), ("comments", 4), ("channels", 1)]);
        assert_eq!(stats.total(), 7);
        assert_eq!(stats.other(), 5);
        assert_eq!(
            stats.summary_lines().last().map(String::as_str),
            Some("Other: 5 methods")
        );
    }

    #[test]
    fn test_sections_are_keyed_by_id_not_category() {
        let page = Page::attach(
            parse_html(
                r#"<section class="api-section" id="playlist" data-category="helper">
                     <div class="api-method"></div>
                   </section>"#,
            )
            .unwrap(),
        );
        let stats = MethodStats::compute(&page);
        assert_eq!(stats.count(Category::Playlist), 1);
        assert_eq!(stats.count(Category::Helper), 0);
    }

    #[test]
    fn test_duplicate_section_ids_keep_the_last_count() {
        let page = Page::attach(
            parse_html(
                r#"<section class="api-section" id="basic">
                     <div class="api-method"></div><div class="api-method"></div>
                   </section>
                   <section class="api-section" id="basic"><div class="api-method"></div></section>"#,
            )
            .unwrap(),
        );
        let stats = MethodStats::compute(&page);
        assert_eq!(stats.count(Category::Basic), 1);
        assert_eq!(stats.total(), 1);
    }

    #[test]
    fn test_render_into_replaces_list_and_total() {
        let mut page = Page::attach(parse_html(PAGE).unwrap());
        let stats = MethodStats::compute(&page);
        assert!(stats.render_into(page.dom_mut()));

        let dom = page.dom();
        let summary = dom.first_by_class(dom.root(), STATS_CLASS).unwrap();
        let list = dom.first_by_tag(summary, "ul").unwrap();
        assert_eq!(dom.children(list).len(), 9);
        assert_eq!(
            dom.text_content(dom.children(list)[0]),
            "Basic classes: 3 methods"
        );
        let strong = dom.first_by_tag(summary, "strong").unwrap();
        assert_eq!(dom.text_content(strong), "Total: 5 implemented methods");
    }

    #[test]
    fn test_render_into_skips_missing_container() {
        let mut dom = parse_html("<p>no stats here</p>").unwrap();
        let before = dom.text_content(dom.root());
        assert!(!MethodStats::default().render_into(&mut dom));
        assert_eq!(dom.text_content(dom.root()), before);
    }
}
