use std::path::PathBuf;

use crate::page::Page;
use crate::search::SearchOutcome;
use crate::stats::MethodStats;
use crate::ui::flow::FlowDocument;
use crate::ui::viewport::Viewport;

/// Which filter the page is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    /// Intro section only.
    #[default]
    Default,
    /// Exactly the sections of one nav category.
    Category(String),
    /// Sections holding at least one matching method.
    Search { query: String, matches: usize },
    /// A non-empty query matched nothing; the no-results panel is up.
    NoResults { query: String },
}

impl ViewState {
    /// State reached after a search pass, `None` meaning the reset path.
    pub fn from_outcome(outcome: Option<&SearchOutcome>) -> Self {
        match outcome {
            None => Self::Default,
            Some(outcome) if outcome.has_results() => Self::Search {
                query: outcome.query.clone(),
                matches: outcome.matched_methods,
            },
            Some(outcome) => Self::NoResults {
                query: outcome.query.clone(),
            },
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Default => "Overview".to_string(),
            Self::Category(category) => format!("Category: {category}"),
            Self::Search { query, matches } => {
                let noun = if *matches == 1 { "method" } else { "methods" };
                format!("\u{201c}{query}\u{201d}: {matches} {noun}")
            }
            Self::NoResults { query } => format!("No results for \u{201c}{query}\u{201d}"),
        }
    }
}

/// Keyboard focus outside the search field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pane {
    Nav,
    #[default]
    Content,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug, Default)]
pub struct Model {
    /// The loaded page and its controller
    pub page: Page,
    pub view: ViewState,
    /// Computed once at load
    pub stats: MethodStats,
    /// Scroll state of the content pane
    pub viewport: Viewport,
    /// The page flowed at the current content width
    pub flow: FlowDocument,
    pub pane: Pane,
    /// Highlighted nav entry
    pub nav_cursor: usize,
    /// Whether the nav sidebar is shown
    pub nav_visible: bool,
    /// Selected entry of `flow.links()`
    pub link_cursor: Option<usize>,
    pub file_path: PathBuf,
    pub last_outcome: Option<SearchOutcome>,
    pub should_quit: bool,
}

impl Model {
    /// Initialize the controller over a freshly attached page.
    ///
    /// Shows the default section, computes the method stats once and writes
    /// them into the page, then flows the result for the terminal size.
    pub fn new(file_path: PathBuf, mut page: Page, terminal_size: (u16, u16)) -> Self {
        let _scope = crate::perf::scope("model.init");
        page.show_default_sections();
        let stats = MethodStats::compute(&page);
        if !stats.render_into(page.dom_mut()) {
            tracing::debug!("page has no stats summary list");
        }
        tracing::info!(
            total_methods = stats.total(),
            categorized_sections = page
                .sections()
                .iter()
                .filter(|section| page.category(**section).is_some())
                .count(),
            nav_links = page.nav_links().len(),
            "page loaded"
        );

        let (width, height) = terminal_size;
        let mut model = Self {
            page,
            stats,
            viewport: Viewport::new(width, crate::ui::content_height(height), 0),
            nav_visible: true,
            file_path,
            ..Self::default()
        };
        model.relayout();
        model
    }

    pub fn with_nav_visible(mut self, visible: bool) -> Self {
        self.nav_visible = visible;
        if !visible {
            self.pane = Pane::Content;
        }
        self.relayout();
        self
    }

    /// Width available to flowed text.
    pub fn content_width(&self) -> u16 {
        crate::ui::document_content_width(self.viewport.width(), self.nav_visible)
    }

    /// Re-flow the page after any visibility, highlight or size change.
    pub fn relayout(&mut self) {
        let _scope = crate::perf::scope("model.relayout");
        let dom = self.page.dom();
        self.flow = FlowDocument::build(dom, dom.root(), self.content_width());
        self.viewport.set_total_lines(self.flow.line_count());
        self.link_cursor = None;
    }

    /// The link element under the link cursor.
    pub fn selected_link(&self) -> Option<crate::dom::NodeId> {
        self.link_cursor
            .and_then(|index| self.flow.links().get(index))
            .map(|link| link.anchor)
    }

    /// Jump so that the block starting at `node` is the top line.
    pub fn scroll_to_node(&mut self, node: crate::dom::NodeId) -> bool {
        let Some(line) = self.flow.line_of(node) else {
            return false;
        };
        self.viewport.go_to_line(line);
        true
    }

    pub fn nav_len(&self) -> usize {
        self.page.nav_links().len()
    }
}
