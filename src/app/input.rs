use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

use crate::app::model::Pane;
use crate::app::{App, Message, Model};
use crate::debounce::Debouncer;

const WHEEL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut Debouncer<(u16, u16)>,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Resize(width, height) => {
                tracing::trace!(width, height, "resize queued");
                resize_debouncer.schedule((*width, *height), now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let command = ctrl || key.modifiers.contains(KeyModifiers::SUPER);

        match key.code {
            KeyCode::Char('c') if ctrl => return Some(Message::Quit),
            KeyCode::Char('k' | 'K') if command => return Some(Message::FocusSearch),
            _ => {}
        }

        if model.page.search_focused() {
            return Self::handle_search_key(key);
        }

        match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('/') => Some(Message::FocusSearch),
            KeyCode::Tab | KeyCode::BackTab => Some(Message::SwitchFocus),
            KeyCode::PageUp => Some(Message::PageUp),
            KeyCode::PageDown => Some(Message::PageDown),
            KeyCode::Home | KeyCode::Char('g') => Some(Message::GoToTop),
            KeyCode::End | KeyCode::Char('G') => Some(Message::GoToBottom),
            _ => match model.pane {
                Pane::Nav => Self::handle_nav_key(key),
                Pane::Content => Self::handle_content_key(key),
            },
        }
    }

    fn handle_search_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Esc => Some(Message::Escape),
            KeyCode::Enter => Some(Message::SearchCommit),
            KeyCode::Tab | KeyCode::BackTab => Some(Message::BlurSearch),
            KeyCode::Backspace => Some(Message::SearchBackspace),
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER) =>
            {
                Some(Message::SearchInsert(ch))
            }
            KeyCode::PageUp => Some(Message::PageUp),
            KeyCode::PageDown => Some(Message::PageDown),
            _ => None,
        }
    }

    fn handle_nav_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Message::NavUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::NavDown),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Message::NavSelect),
            _ => None,
        }
    }

    fn handle_content_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Message::ScrollUp(1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::ScrollDown(1)),
            KeyCode::Char(' ') => Some(Message::PageDown),
            KeyCode::Char('b') => Some(Message::PageUp),
            KeyCode::Char(']') => Some(Message::NextLink),
            KeyCode::Char('[') => Some(Message::PrevLink),
            KeyCode::Enter => Some(Message::FollowLink),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        let layout = crate::ui::screen_layout(crate::ui::screen_area(model), model.nav_visible);
        let (col, row) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Up(MouseButton::Left) => {
                if point_in_rect(col, row, layout.search) {
                    return Some(Message::ClickSearch);
                }
                if let Some(nav) = layout.nav
                    && point_in_rect(col, row, nav)
                {
                    return nav_index_at_row(model, nav, row).map(Message::NavClick);
                }
                if point_in_rect(col, row, layout.content) {
                    return anchor_at(model, layout.content, col, row).map(Message::FollowAnchor);
                }
                None
            }
            MouseEventKind::ScrollDown if point_in_rect(col, row, layout.content) => {
                Some(Message::ScrollDown(WHEEL_LINES))
            }
            MouseEventKind::ScrollUp if point_in_rect(col, row, layout.content) => {
                Some(Message::ScrollUp(WHEEL_LINES))
            }
            _ => None,
        }
    }
}

fn nav_index_at_row(model: &Model, nav: Rect, row: u16) -> Option<usize> {
    // Rows inside the border only.
    if row <= nav.y || row >= nav.y + nav.height.saturating_sub(1) {
        return None;
    }
    let rows = nav.height.saturating_sub(2) as usize;
    let start = crate::ui::nav_scroll_start(model.nav_cursor, model.nav_len(), rows);
    let index = start + (row - nav.y - 1) as usize;
    (index < model.nav_len()).then_some(index)
}

/// Target id of the in-page link drawn at (`col`, `row`) of the content pane.
fn anchor_at(model: &Model, content: Rect, col: u16, row: u16) -> Option<String> {
    let index = model.viewport.visible_range().start + usize::from(row - content.y);
    let line = model.flow.lines().get(index)?;
    let lead = usize::from(crate::ui::DOCUMENT_LEFT_PADDING + line.indent);
    let mut column = usize::from(col - content.x).checked_sub(lead)?;
    let span = line.spans.iter().find(|span| {
        let width = span.text.width();
        if column < width {
            return true;
        }
        column -= width;
        false
    })?;
    let href = model.page.dom().attr(span.link?, "href")?;
    href.strip_prefix('#').map(ToOwned::to_owned)
}

const fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}
