use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, Pane, ViewState};

use super::style::Theme;

pub fn render_status_bar(model: &Model, theme: &Theme, frame: &mut Frame, area: Rect) {
    let style = if matches!(model.view, ViewState::NoResults { .. }) {
        theme.alert()
    } else {
        theme.status()
    };
    let bar = Paragraph::new(status_text(model)).style(style);
    frame.render_widget(bar, area);
}

pub fn status_text(model: &Model) -> String {
    let filename = model
        .file_path
        .file_name()
        .map_or_else(|| "untitled".to_string(), |s| s.to_string_lossy().to_string());
    let percent = model.viewport.scroll_percent();
    let hints = if model.page.search_focused() {
        "Enter:search  Esc:clear  Tab:leave"
    } else if model.pane == Pane::Nav {
        "Enter:open  Tab:content  /:search  q:quit"
    } else {
        "/:search  Tab:nav  [ ]:links  q:quit"
    };

    format!(
        " {filename}  {}  [{percent}%]  {} methods  {hints}",
        model.view.label(),
        model.stats.total()
    )
}
