//! The page controller's document operations.
//!
//! [`Page`] owns the [`Dom`] of a loaded reference page plus the handles the
//! controller discovers once at startup (search field, nav links, sections,
//! method entries). Every mutation the controller makes to the document goes
//! through here: section visibility, nav activation, method emphasis,
//! highlight markers and the no-results panel.
//!
//! Missing optional structure never fails an operation; the affected update
//! is skipped.

mod no_results;

use crate::dom::{Dom, NodeId};
use crate::highlight;
use crate::search::{METHOD_CLASS, MethodEntry, SearchOutcome, normalize_query};

pub use no_results::{NO_RESULTS_ID, no_results_guidance};

/// Id of the search input.
pub const SEARCH_BOX_ID: &str = "searchBox";
/// Id of the section shown by default.
pub const INTRO_ID: &str = "intro";
pub const NAV_LINK_CLASS: &str = "nav-link";
pub const SECTION_CLASS: &str = "api-section";
pub const CONTENT_CLASS: &str = "content";
pub const ACTIVE_CLASS: &str = "active";

const EMPHASIS_BORDER: &str = "2px solid #ff0000";
const EMPHASIS_BACKGROUND: &str = "#fff5f5";

/// A loaded reference page and its controller handles.
#[derive(Debug, Clone, Default)]
pub struct Page {
    dom: Dom,
    search_box: Option<NodeId>,
    nav_links: Vec<NodeId>,
    sections: Vec<NodeId>,
    methods: Vec<NodeId>,
    intro: Option<NodeId>,
}

impl Page {
    /// Discover the controller handles in `dom`.
    pub fn attach(dom: Dom) -> Self {
        let root = dom.root();
        let search_box = dom.by_id(SEARCH_BOX_ID);
        if search_box.is_none() {
            tracing::warn!("page has no #{SEARCH_BOX_ID} element; search input is detached");
        }
        let nav_links = dom.query_class(root, NAV_LINK_CLASS);
        let sections = dom.query_class(root, SECTION_CLASS);
        let methods = dom.query_class(root, METHOD_CLASS);
        let intro = sections
            .iter()
            .copied()
            .find(|section| dom.attr(*section, "id") == Some(INTRO_ID));
        Self {
            dom,
            search_box,
            nav_links,
            sections,
            methods,
            intro,
        }
    }

    pub const fn dom(&self) -> &Dom {
        &self.dom
    }

    pub const fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn nav_links(&self) -> &[NodeId] {
        &self.nav_links
    }

    pub fn sections(&self) -> &[NodeId] {
        &self.sections
    }

    pub fn methods(&self) -> &[NodeId] {
        &self.methods
    }

    pub const fn intro(&self) -> Option<NodeId> {
        self.intro
    }

    pub const fn search_box(&self) -> Option<NodeId> {
        self.search_box
    }

    /// Element the flowed view starts from: `.content`, else `body`, else the root.
    pub fn content_root(&self) -> NodeId {
        let root = self.dom.root();
        self.dom
            .first_by_class(root, CONTENT_CLASS)
            .or_else(|| self.dom.first_by_tag(root, "body"))
            .unwrap_or(root)
    }

    /// Category carried by a nav link or section.
    pub fn category(&self, node: NodeId) -> Option<&str> {
        self.dom.data(node, "category")
    }

    /// Label shown for a nav link.
    pub fn nav_label(&self, index: usize) -> String {
        self.nav_links
            .get(index)
            .map(|link| collapse_whitespace(&self.dom.text_content(*link)))
            .unwrap_or_default()
    }

    pub fn is_nav_active(&self, index: usize) -> bool {
        self.nav_links
            .get(index)
            .is_some_and(|link| self.dom.has_class(*link, ACTIVE_CLASS))
    }

    /// Activate the nav link at `index` and reveal its category.
    ///
    /// Returns the revealed section, if one matched.
    pub fn activate_nav(&mut self, index: usize) -> Option<NodeId> {
        let link = *self.nav_links.get(index)?;
        for other in self.nav_links.clone() {
            self.dom.remove_class(other, ACTIVE_CLASS);
        }
        self.dom.add_class(link, ACTIVE_CLASS);
        let category = self.category(link).map(ToOwned::to_owned);
        tracing::debug!(index, ?category, "nav link activated");
        self.show_section(category.as_deref())
    }

    /// Show exactly the section whose category matches; hide all others and the intro.
    pub fn show_section(&mut self, category: Option<&str>) -> Option<NodeId> {
        let mut revealed = None;
        for section in self.sections.clone() {
            let shown = Some(section) != self.intro
                && category.is_some()
                && self.category(section) == category;
            self.set_section_visible(section, shown);
            if shown && revealed.is_none() {
                revealed = Some(section);
            }
        }
        revealed
    }

    /// The default view: intro shown, every other section hidden.
    pub fn show_default_sections(&mut self) {
        for section in self.sections.clone() {
            let shown = Some(section) == self.intro;
            self.set_section_visible(section, shown);
        }
    }

    pub fn hide_all_sections(&mut self) {
        for section in self.sections.clone() {
            self.set_section_visible(section, false);
        }
    }

    fn set_section_visible(&mut self, section: NodeId, visible: bool) {
        self.dom
            .set_style(section, "display", if visible { "block" } else { "none" });
    }

    pub fn is_section_visible(&self, section: NodeId) -> bool {
        self.dom.display(section) != Some("none")
    }

    pub fn visible_sections(&self) -> Vec<NodeId> {
        self.sections
            .iter()
            .copied()
            .filter(|section| self.is_section_visible(*section))
            .collect()
    }

    /// Give a method entry the match emphasis.
    pub fn emphasize(&mut self, method: NodeId) {
        self.dom.set_style(method, "border", EMPHASIS_BORDER);
        self.dom
            .set_style(method, "background-color", EMPHASIS_BACKGROUND);
    }

    pub fn clear_emphasis(&mut self, method: NodeId) {
        self.dom.set_style(method, "border", "");
        self.dom.set_style(method, "background-color", "");
    }

    pub fn is_emphasized(&self, method: NodeId) -> bool {
        self.dom.style(method, "border").is_some()
    }

    /// Remove all highlight markers and all method emphasis.
    pub fn clear_highlights(&mut self) {
        let root = self.dom.root();
        highlight::clear_highlights(&mut self.dom, root);
        for method in self.methods.clone() {
            self.clear_emphasis(method);
        }
    }

    /// The canonical reset: no highlights, default sections, no-results hidden.
    pub fn reset(&mut self) {
        self.clear_highlights();
        self.show_default_sections();
        self.hide_no_results();
    }

    /// Run `raw` input through the search handler.
    ///
    /// An empty query resets the page and yields `None`.
    pub fn apply_query(&mut self, raw: &str) -> Option<SearchOutcome> {
        let query = normalize_query(raw);
        if query.is_empty() {
            self.reset();
            return None;
        }
        Some(self.search(&query))
    }

    /// One search pass over every method entry for a normalized, non-empty query.
    pub fn search(&mut self, query: &str) -> SearchOutcome {
        let _scope = crate::perf::scope("page.search");
        self.hide_all_sections();
        self.clear_highlights();
        self.hide_no_results();

        let mut matched = 0;
        for method in self.methods.clone() {
            let entry = MethodEntry::read(&self.dom, method);
            if entry.matches(query) {
                matched += 1;
                if let Some(section) = self.dom.closest_class(method, SECTION_CLASS) {
                    self.set_section_visible(section, true);
                }
                highlight::highlight_text(&mut self.dom, method, query);
                self.emphasize(method);
            } else {
                self.clear_emphasis(method);
            }
        }

        if matched == 0 {
            self.show_no_results(query);
        }

        let outcome = SearchOutcome {
            query: query.to_string(),
            matched_methods: matched,
            visible_sections: self.visible_sections().len(),
        };
        tracing::debug!(
            query,
            matched = outcome.matched_methods,
            sections = outcome.visible_sections,
            "search pass"
        );
        outcome
    }

    pub fn search_value(&self) -> &str {
        self.search_box.map_or("", |input| self.dom.value(input))
    }

    pub fn set_search_value(&mut self, value: &str) {
        if let Some(input) = self.search_box {
            self.dom.set_value(input, value);
        }
    }

    pub fn search_selected(&self) -> bool {
        self.search_box
            .is_some_and(|input| self.dom.contents_selected(input))
    }

    /// Type a character into the search field, replacing a selection.
    pub fn insert_search_char(&mut self, ch: char) {
        let mut value = if self.search_selected() {
            String::new()
        } else {
            self.search_value().to_string()
        };
        value.push(ch);
        self.set_search_value(&value);
    }

    /// Delete backwards in the search field; a selection is deleted whole.
    pub fn search_backspace(&mut self) {
        let mut value = if self.search_selected() {
            String::new()
        } else {
            self.search_value().to_string()
        };
        value.pop();
        self.set_search_value(&value);
    }

    /// Focus the search field and select its contents.
    pub fn focus_search(&mut self) {
        if let Some(input) = self.search_box {
            self.dom.focus(input);
            self.dom.select_contents(input);
        }
    }

    /// Focus the search field with the caret at the end, as a plain click does.
    pub fn focus_search_field(&mut self) {
        if let Some(input) = self.search_box {
            self.dom.focus(input);
            self.dom.clear_selection(input);
        }
    }

    pub fn blur(&mut self) {
        self.dom.blur();
    }

    pub fn search_focused(&self) -> bool {
        self.search_box.is_some() && self.dom.active_element() == self.search_box
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.search_box
            .and_then(|input| self.dom.attr(input, "placeholder"))
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
