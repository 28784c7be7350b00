//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`flow`]: Flowing the visible page into wrapped lines
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Theming and colors

pub mod flow;
pub mod style;
pub mod viewport;

mod render;
mod status;

pub use render::{
    ScreenLayout, content_height, document_content_width, nav_scroll_start, render, screen_area,
    screen_layout, split_main_columns,
};

/// Gutter left of the flowed content; emphasized methods draw their frame here.
pub const DOCUMENT_LEFT_PADDING: u16 = 2;
pub const NAV_WIDTH_PERCENT: u16 = 30;
pub const DOC_WIDTH_PERCENT: u16 = 70;
/// Bordered search field at the top.
pub const SEARCH_BAR_HEIGHT: u16 = 3;
pub const STATUS_BAR_HEIGHT: u16 = 1;
