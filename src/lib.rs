// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. search::SearchOutcome)
    clippy::module_name_repetitions
)]

//! # apiref
//!
//! A terminal browser for static API reference pages.
//!
//! apiref loads an HTML reference page and drives it the way the page's
//! own controller would:
//! - Category navigation showing one section at a time
//! - Debounced, case-insensitive search with match highlighting
//! - A "no results" panel with guidance
//! - Method counts per category written into the page's summary
//!
//! ## Architecture
//!
//! apiref uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`dom`]: Document tree and HTML parsing
//! - [`page`]: The page controller (navigation, search, no-results panel)
//! - [`search`]: Query normalization and method matching
//! - [`highlight`]: Match markers in the document tree
//! - [`stats`]: Method counts per category
//! - [`debounce`]: Superseding timers
//! - [`ui`]: Terminal UI components
//! - [`report`]: Text and JSON output without a terminal

pub mod app;
pub mod config;
pub mod debounce;
pub mod dom;
pub mod highlight;
pub mod page;
pub mod perf;
pub mod report;
pub mod search;
pub mod stats;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model, ViewState};
    pub use crate::dom::{Dom, NodeId, parse_html};
    pub use crate::page::Page;
    pub use crate::ui::viewport::Viewport;
}
