use crate::app::Model;
use crate::app::model::{Pane, ViewState};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Content scrolling
    ScrollUp(usize),
    ScrollDown(usize),
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,

    // In-page links
    /// Select the next link in the content pane
    NextLink,
    /// Select the previous link in the content pane
    PrevLink,
    /// Follow the selected link
    FollowLink,
    /// Jump to the element with this id
    FollowAnchor(String),

    // Navigation sidebar
    /// Move the nav cursor up
    NavUp,
    /// Move the nav cursor down
    NavDown,
    /// Activate the nav entry under the cursor
    NavSelect,
    /// Activate nav entry by index (mouse)
    NavClick(usize),
    /// Switch focus between nav sidebar and content
    SwitchFocus,

    // Search field
    /// Focus the search field and select its contents
    FocusSearch,
    /// Focus the search field, leaving its contents unselected (mouse)
    ClickSearch,
    SearchInsert(char),
    SearchBackspace,
    /// Run the search for the field's current value
    SearchCommit,
    /// Clear the search field and reset the page (search field focused only)
    Escape,
    /// Leave the search field
    BlurSearch,

    /// Terminal resized
    Resize(u16, u16),
    Quit,
}

impl Message {
    /// Whether this message changes the search field's value.
    pub const fn edits_search(&self) -> bool {
        matches!(self, Self::SearchInsert(_) | Self::SearchBackspace)
    }
}

/// Pure state transition.
///
/// Side effects (debounce timers, terminal) live in the event loop; this
/// only mutates the model and its page.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::ScrollUp(n) => model.viewport.scroll_up(n),
        Message::ScrollDown(n) => model.viewport.scroll_down(n),
        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => model.viewport.page_down(),
        Message::GoToTop => model.viewport.go_to_top(),
        Message::GoToBottom => model.viewport.go_to_bottom(),

        Message::NextLink => step_link(&mut model, true),
        Message::PrevLink => step_link(&mut model, false),
        Message::FollowLink => {
            let target = model
                .selected_link()
                .and_then(|link| model.page.dom().attr(link, "href"))
                .and_then(|href| href.strip_prefix('#'))
                .map(ToOwned::to_owned);
            if let Some(target) = target {
                follow_anchor(&mut model, &target);
            }
        }
        Message::FollowAnchor(target) => follow_anchor(&mut model, &target),

        Message::NavUp => {
            model.nav_cursor = model.nav_cursor.saturating_sub(1);
        }
        Message::NavDown => {
            if model.nav_cursor + 1 < model.nav_len() {
                model.nav_cursor += 1;
            }
        }
        Message::NavSelect => {
            let index = model.nav_cursor;
            activate_nav(&mut model, index);
        }
        Message::NavClick(index) => {
            model.pane = Pane::Nav;
            activate_nav(&mut model, index);
        }
        Message::SwitchFocus => {
            model.page.blur();
            model.pane = match model.pane {
                Pane::Content if model.nav_visible && model.nav_len() > 0 => Pane::Nav,
                _ => Pane::Content,
            };
        }

        Message::FocusSearch => model.page.focus_search(),
        Message::ClickSearch => model.page.focus_search_field(),
        Message::SearchInsert(ch) => model.page.insert_search_char(ch),
        Message::SearchBackspace => model.page.search_backspace(),
        Message::SearchCommit => {
            let value = model.page.search_value().to_string();
            run_search(&mut model, &value);
        }
        Message::Escape => {
            if model.page.search_focused() {
                model.page.set_search_value("");
                run_search(&mut model, "");
            }
        }
        Message::BlurSearch => model.page.blur(),

        Message::Resize(width, height) => {
            model
                .viewport
                .resize(width, crate::ui::content_height(height));
            model.relayout();
        }
        Message::Quit => model.should_quit = true,
    }
    model
}

fn activate_nav(model: &mut Model, index: usize) {
    if index >= model.nav_len() {
        return;
    }
    model.nav_cursor = index;
    let category = model
        .page
        .nav_links()
        .get(index)
        .and_then(|link| model.page.category(*link))
        .unwrap_or_default()
        .to_string();
    let revealed = model.page.activate_nav(index);
    tracing::debug!(index, category = %category, revealed = revealed.is_some(), "nav activated");

    model.view = ViewState::Category(category);
    model.relayout();
    match revealed {
        Some(section) => {
            model.scroll_to_node(section);
        }
        None => model.viewport.go_to_top(),
    }
}

fn step_link(model: &mut Model, forward: bool) {
    let len = model.flow.links().len();
    if len == 0 {
        return;
    }
    let next = match (model.link_cursor, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(index), true) => (index + 1) % len,
        (Some(index), false) => (index + len - 1) % len,
    };
    model.link_cursor = Some(next);
    let line = model.flow.links()[next].line;
    model.viewport.reveal(line);
}

/// Scroll to the element whose id is `target`; missing or hidden targets
/// leave the view alone.
fn follow_anchor(model: &mut Model, target: &str) {
    let node = model.page.dom().by_id(target);
    let jumped = node.is_some_and(|node| model.scroll_to_node(node));
    tracing::debug!(anchor = target, jumped, "anchor followed");
}

fn run_search(model: &mut Model, raw: &str) {
    let outcome = model.page.apply_query(raw);
    model.view = ViewState::from_outcome(outcome.as_ref());
    model.last_outcome = outcome;
    model.relayout();
    model.viewport.go_to_top();
}
