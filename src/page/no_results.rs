use crate::dom::NodeId;

use super::Page;

/// Id of the reusable "no results" panel.
pub const NO_RESULTS_ID: &str = "no-results";

const GUIDANCE: [&str; 4] = [
    "Check the spelling of your keywords",
    "Try a more general keyword",
    "Try a different keyword",
    "Pick a category from the navigation on the left",
];

const TIP: &str =
    "Try basic keywords such as \"video\", \"search\", \"playlist\", \"channel\" or \"comment\"";

/// Static guidance lines shown under the "no results" heading.
pub fn no_results_guidance() -> &'static [&'static str] {
    &GUIDANCE
}

impl Page {
    /// The panel, if it has been created.
    pub fn no_results_panel(&self) -> Option<NodeId> {
        self.dom.by_id(NO_RESULTS_ID)
    }

    /// Show the panel for `query`, building it on first use.
    ///
    /// Later uses only rewrite the heading.
    pub fn show_no_results(&mut self, query: &str) {
        let panel = match self.no_results_panel() {
            Some(panel) => panel,
            None => self.build_no_results_panel(),
        };
        let heading = format!("No results found for \u{201c}{query}\u{201d}");
        match self.dom.first_by_tag(panel, "h3") {
            Some(title) => self.dom.set_text_content(title, &heading),
            None => {
                self.dom.append_element(panel, "h3", Some(&heading));
            }
        }
        self.dom.set_style(panel, "display", "block");
    }

    fn build_no_results_panel(&mut self) -> NodeId {
        let container = self.content_root();
        let dom = &mut self.dom;
        let panel = dom.append_element(container, "div", None);
        dom.set_attr(panel, "id", NO_RESULTS_ID);

        let body = dom.append_element(panel, "div", None);
        dom.append_element(body, "h3", None);
        dom.append_element(body, "p", Some("Try the following:"));
        let list = dom.append_element(body, "ul", None);
        for line in GUIDANCE {
            dom.append_element(list, "li", Some(line));
        }
        let tips = dom.append_element(body, "div", None);
        dom.append_element(tips, "strong", Some("Search tips:"));
        dom.append_element(tips, "br", None);
        let tip = dom.create_text(TIP);
        dom.append_child(tips, tip);
        panel
    }

    /// Hide the panel if it exists.
    pub fn hide_no_results(&mut self) {
        if let Some(panel) = self.no_results_panel() {
            self.dom.set_style(panel, "display", "none");
        }
    }

    pub fn is_no_results_visible(&self) -> bool {
        self.no_results_panel()
            .is_some_and(|panel| self.dom.display(panel) != Some("none"))
    }
}
