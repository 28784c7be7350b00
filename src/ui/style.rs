//! Theming and color definitions.
//!
//! Uses ANSI colors that adapt to the terminal's palette. The background
//! mode is process-wide: set once from the `--theme` flag, otherwise guessed
//! from `COLORFGBG`.

use std::sync::{Mutex, OnceLock};

use ratatui::style::{Color, Modifier, Style};

use super::flow::SpanKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: OnceLock<Mutex<Option<Background>>> = OnceLock::new();

/// Force the background mode, or `None` to fall back to detection.
pub fn set_background_mode(mode: Option<Background>) {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(mut guard) = lock.lock() {
        *guard = mode;
    }
}

pub fn background_mode() -> Background {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(guard) = lock.lock()
        && let Some(mode) = *guard
    {
        return mode;
    }
    background_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_from_colorfgbg(colorfgbg: Option<&str>) -> Background {
    let Some(value) = colorfgbg else {
        return Background::Dark;
    };
    let bg = value.rsplit(';').next().unwrap_or(value);
    match bg.parse::<u8>() {
        Ok(7 | 15) => Background::Light,
        _ => Background::Dark,
    }
}

/// The palette for the current background mode.
pub fn theme() -> Theme {
    match background_mode() {
        Background::Light => Theme::light(),
        Background::Dark => Theme::dark(),
    }
}

/// Theme configuration for the entire application.
#[derive(Debug, Clone)]
pub struct Theme {
    pub h1: Style,
    pub h2: Style,
    pub h3: Style,
    /// Heading level 4+ style
    pub h4: Style,
    pub code: Style,
    pub link: Style,
    pub emphasis: Style,
    pub strong: Style,
    /// Bullets and rules
    pub decoration: Style,
    /// Search-match markers
    pub highlight: Style,
    /// Gutter drawn next to emphasized method entries
    pub frame: Style,
    /// Background behind emphasized method entries
    pub framed_bg: Color,
    pub nav_active: Style,
    pub focus_border: Style,
    pub placeholder: Style,
    pub status_bg: Color,
    pub status_fg: Color,
    pub alert_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            h1: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            h2: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            h3: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            h4: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            code: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            link: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            emphasis: Style::default().add_modifier(Modifier::ITALIC),
            strong: Style::default().add_modifier(Modifier::BOLD),
            decoration: Style::default().fg(Color::Yellow),
            highlight: Style::default().bg(Color::Yellow).fg(Color::Black),
            frame: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            framed_bg: Color::Indexed(52),
            nav_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            focus_border: Style::default().fg(Color::Yellow),
            placeholder: Style::default()
                .fg(Color::Indexed(243))
                .add_modifier(Modifier::ITALIC),
            status_bg: Color::Indexed(236),
            status_fg: Color::Indexed(252),
            alert_bg: Color::Red,
        }
    }
}

impl Theme {
    /// Create a theme optimized for dark terminals.
    pub fn dark() -> Self {
        Self::default()
    }

    /// Create a theme optimized for light terminals.
    pub fn light() -> Self {
        Self {
            h1: Style::default()
                .fg(Color::Indexed(31))
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            h2: Style::default()
                .fg(Color::Indexed(28))
                .add_modifier(Modifier::BOLD),
            h3: Style::default()
                .fg(Color::Indexed(136))
                .add_modifier(Modifier::BOLD),
            h4: Style::default()
                .fg(Color::Indexed(25))
                .add_modifier(Modifier::BOLD),
            code: Style::default()
                .fg(Color::Indexed(124))
                .add_modifier(Modifier::BOLD),
            link: Style::default()
                .fg(Color::Indexed(25))
                .add_modifier(Modifier::UNDERLINED),
            decoration: Style::default().fg(Color::Indexed(136)),
            highlight: Style::default().bg(Color::Indexed(228)).fg(Color::Black),
            frame: Style::default()
                .fg(Color::Indexed(160))
                .add_modifier(Modifier::BOLD),
            // #fff5f5
            framed_bg: Color::Indexed(255),
            nav_active: Style::default()
                .fg(Color::Indexed(25))
                .add_modifier(Modifier::BOLD),
            focus_border: Style::default().fg(Color::Indexed(130)),
            placeholder: Style::default()
                .fg(Color::Indexed(245))
                .add_modifier(Modifier::ITALIC),
            status_bg: Color::Indexed(252),
            status_fg: Color::Indexed(235),
            ..Self::default()
        }
    }

    pub fn span(&self, kind: SpanKind) -> Style {
        match kind {
            SpanKind::Plain => Style::default(),
            SpanKind::Heading(1) => self.h1,
            SpanKind::Heading(2) => self.h2,
            SpanKind::Heading(3) => self.h3,
            SpanKind::Heading(_) => self.h4,
            SpanKind::Strong => self.strong,
            SpanKind::Emphasis => self.emphasis,
            SpanKind::Code => self.code,
            SpanKind::Link => self.link,
            SpanKind::Highlight => self.highlight,
            SpanKind::Decoration => self.decoration,
        }
    }

    pub fn status(&self) -> Style {
        Style::default().bg(self.status_bg).fg(self.status_fg)
    }

    pub fn alert(&self) -> Style {
        Style::default().bg(self.alert_bg).fg(Color::White)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_styles_are_bold() {
        for level in 1..=6 {
            let style = Theme::dark().span(SpanKind::Heading(level));
            assert!(style.add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn test_h1_is_underlined() {
        let style = Theme::light().span(SpanKind::Heading(1));
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_highlight_has_background_in_both_themes() {
        assert!(Theme::dark().span(SpanKind::Highlight).bg.is_some());
        assert!(Theme::light().span(SpanKind::Highlight).bg.is_some());
    }

    #[test]
    fn test_plain_span_is_unstyled() {
        assert_eq!(Theme::dark().span(SpanKind::Plain), Style::default());
    }

    #[test]
    fn test_colorfgbg_detection() {
        assert_eq!(background_from_colorfgbg(None), Background::Dark);
        assert_eq!(background_from_colorfgbg(Some("0;15")), Background::Light);
        assert_eq!(background_from_colorfgbg(Some("15;0")), Background::Dark);
        assert_eq!(background_from_colorfgbg(Some("garbage")), Background::Dark);
    }
}
