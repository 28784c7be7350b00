use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, Pane};
use crate::dom::NodeId;

use super::flow::FlowLine;
use super::style::{Theme, theme};
use super::{
    DOC_WIDTH_PERCENT, DOCUMENT_LEFT_PADDING, NAV_WIDTH_PERCENT, SEARCH_BAR_HEIGHT,
    STATUS_BAR_HEIGHT, status,
};

const FRAME_GUTTER: &str = "\u{2503} ";

/// Where each part of the screen goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub search: Rect,
    pub nav: Option<Rect>,
    pub content: Rect,
    pub status: Rect,
}

pub fn split_main_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(NAV_WIDTH_PERCENT),
            Constraint::Percentage(DOC_WIDTH_PERCENT),
        ])
        .split(area)
}

pub fn screen_layout(area: Rect, nav_visible: bool) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(SEARCH_BAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    let (nav, content) = if nav_visible {
        let columns = split_main_columns(rows[1]);
        (Some(columns[0]), columns[1])
    } else {
        (None, rows[1])
    };
    ScreenLayout {
        search: rows[0],
        nav,
        content,
        status: rows[2],
    }
}

/// The full terminal area a model was laid out for.
pub fn screen_area(model: &Model) -> Rect {
    Rect::new(
        0,
        0,
        model.viewport.width(),
        model
            .viewport
            .height()
            .saturating_add(SEARCH_BAR_HEIGHT + STATUS_BAR_HEIGHT),
    )
}

/// Rows left for flowed content in a terminal `total_height` rows tall.
pub const fn content_height(total_height: u16) -> u16 {
    total_height.saturating_sub(SEARCH_BAR_HEIGHT + STATUS_BAR_HEIGHT)
}

pub fn document_content_width(total_width: u16, nav_visible: bool) -> u16 {
    let area = Rect::new(0, 0, total_width, 1);
    let doc_width = if nav_visible {
        split_main_columns(area)[1].width
    } else {
        total_width
    };
    doc_width.saturating_sub(DOCUMENT_LEFT_PADDING).max(1)
}

/// First nav entry shown so that `cursor` stays inside `rows` rows.
pub fn nav_scroll_start(cursor: usize, len: usize, rows: usize) -> usize {
    if rows == 0 {
        return 0;
    }
    cursor
        .saturating_sub(rows - 1)
        .min(len.saturating_sub(rows))
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let theme = theme();
    let layout = screen_layout(frame.area(), model.nav_visible);

    render_search_bar(model, &theme, frame, layout.search);
    if let Some(nav) = layout.nav {
        render_nav(model, &theme, frame, nav);
    }
    render_content(model, &theme, frame, layout.content);
    status::render_status_bar(model, &theme, frame, layout.status);
}

fn focus_border(theme: &Theme, focused: bool) -> Style {
    if focused {
        theme.focus_border
    } else {
        Style::default()
    }
}

fn render_search_bar(model: &Model, theme: &Theme, frame: &mut Frame, area: Rect) {
    let page = &model.page;
    let focused = page.search_focused();
    let block = Block::default()
        .title(" Search (Ctrl+K) ")
        .borders(Borders::ALL)
        .border_style(focus_border(theme, focused));
    let inner = block.inner(area);

    let value = page.search_value();
    let line = if value.is_empty() && !focused {
        Line::styled(page.placeholder().unwrap_or_default().to_string(), theme.placeholder)
    } else if page.search_selected() && !value.is_empty() {
        Line::styled(value.to_string(), Style::default().reversed())
    } else {
        Line::raw(value.to_string())
    };
    frame.render_widget(Paragraph::new(line).block(block), area);

    if focused && inner.width > 0 {
        let typed = u16::try_from(value.width()).unwrap_or(u16::MAX);
        let x = inner.x.saturating_add(typed.min(inner.width - 1));
        frame.set_cursor_position((x, inner.y));
    }
}

fn render_nav(model: &Model, theme: &Theme, frame: &mut Frame, area: Rect) {
    let page = &model.page;
    let focused = model.pane == Pane::Nav && !page.search_focused();
    let rows = area.height.saturating_sub(2) as usize;
    let len = model.nav_len();
    let start = nav_scroll_start(model.nav_cursor, len, rows);

    let items: Vec<Line> = (start..len.min(start + rows))
        .map(|index| {
            let under_cursor = focused && model.nav_cursor == index;
            let marker = if under_cursor { ">" } else { " " };
            let style = if page.is_nav_active(index) {
                theme.nav_active
            } else {
                Style::default()
            };
            let style = if under_cursor { style.reversed() } else { style };
            Line::styled(format!("{marker} {}", page.nav_label(index)), style)
        })
        .collect();

    let block = Block::default()
        .title(" Categories ")
        .borders(Borders::ALL)
        .border_style(focus_border(theme, focused));
    frame.render_widget(Paragraph::new(items).block(block), area);
}

fn render_content(model: &Model, theme: &Theme, frame: &mut Frame, area: Rect) {
    let lines = model.flow.lines();
    let range = model.viewport.visible_range();
    let selected = model.selected_link();
    let content: Vec<Line> = lines
        .get(range)
        .unwrap_or_default()
        .iter()
        .map(|line| styled_line(line, theme, selected))
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);
}

fn styled_line(line: &FlowLine, theme: &Theme, selected: Option<NodeId>) -> Line<'static> {
    let mut spans = Vec::with_capacity(line.spans.len() + 2);
    if line.framed {
        spans.push(Span::styled(FRAME_GUTTER, theme.frame));
    } else {
        spans.push(Span::raw(" ".repeat(DOCUMENT_LEFT_PADDING as usize)));
    }
    if line.indent > 0 {
        spans.push(Span::raw(" ".repeat(line.indent as usize)));
    }
    for span in &line.spans {
        let mut style = theme.span(span.kind);
        if line.framed && style.bg.is_none() {
            style = style.bg(theme.framed_bg);
        }
        if selected.is_some() && span.link == selected {
            style = style.reversed();
        }
        spans.push(Span::styled(span.text.clone(), style));
    }
    Line::from(spans)
}
