//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, Pane, ViewState};
pub use update::{Message, update};

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::dom::parse_html;
use crate::page::Page;

/// Quiet period before a typed query is searched.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Main application struct that owns the terminal and runs the event loop.
#[derive(Debug, Clone)]
pub struct App {
    file_path: PathBuf,
    debounce_ms: u64,
    nav_visible: bool,
    initial_category: Option<String>,
    initial_search: Option<String>,
}

impl App {
    /// Create a new application for the given page.
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            nav_visible: true,
            initial_category: None,
            initial_search: None,
        }
    }

    pub const fn with_debounce_ms(mut self, delay_ms: u64) -> Self {
        self.debounce_ms = delay_ms;
        self
    }

    /// Set initial nav sidebar visibility.
    pub const fn with_nav_visible(mut self, visible: bool) -> Self {
        self.nav_visible = visible;
        self
    }

    /// Start with the nav entry for `category` activated.
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.initial_category = category;
        self
    }

    /// Start with `query` typed into the search field and searched.
    pub fn with_search(mut self, query: Option<String>) -> Self {
        self.initial_search = query;
        self
    }

    /// Read and parse the page file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not well-formed
    /// enough to parse.
    pub fn load_page(&self) -> Result<Page> {
        let _scope = crate::perf::scope("app.load_page");
        let source = std::fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        let dom = parse_html(&source)
            .with_context(|| format!("Failed to parse {}", self.file_path.display()))?;
        tracing::debug!(
            path = %self.file_path.display(),
            nodes = dom.node_count(),
            "page parsed"
        );
        Ok(Page::attach(dom))
    }

    /// Initialize the model and apply the requested starting category and
    /// search, in that order.
    pub fn prepare_model(&self, page: Page, terminal_size: (u16, u16)) -> Model {
        let mut model = Model::new(self.file_path.clone(), page, terminal_size)
            .with_nav_visible(self.nav_visible);

        if let Some(category) = self.initial_category.as_deref() {
            let index = model
                .page
                .nav_links()
                .iter()
                .position(|link| model.page.category(*link) == Some(category));
            match index {
                Some(index) => model = update(model, Message::NavClick(index)),
                None => tracing::warn!(category, "no nav entry for category"),
            }
        }
        if let Some(query) = self.initial_search.as_deref() {
            model.page.set_search_value(query);
            model = update(model, Message::SearchCommit);
        }
        model
    }

    /// [`App::load_page`] followed by [`App::prepare_model`].
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be loaded.
    pub fn load_model(&self, terminal_size: (u16, u16)) -> Result<Model> {
        let page = self.load_page()?;
        Ok(self.prepare_model(page, terminal_size))
    }
}

#[cfg(test)]
mod tests;
