//! Scroll state for the flowed document pane.
//!
//! The [`Viewport`] knows the pane size and how many flowed lines the page
//! currently has. Every visibility change re-flows the page, so the line
//! count shrinks and grows constantly; the offset is clamped on each update.

use std::ops::Range;

/// The visible window over the flowed page.
///
/// # Example
///
/// ```
/// use apiref::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 20, 50);
/// assert_eq!(vp.visible_range(), 0..20);
///
/// vp.scroll_down(40);
/// assert_eq!(vp.visible_range(), 30..50);
///
/// vp.set_total_lines(25);
/// assert_eq!(vp.offset(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Lines currently on screen, clamped to the page.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.height as usize).min(self.total_lines);
        self.offset.min(end)..end
    }

    /// Scroll position as 0-100. Pages that fit on screen report 100.
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }
        // Always within 0..=100
        #[allow(clippy::cast_possible_truncation)]
        {
            ((self.offset * 100 + max_offset / 2) / max_offset).min(100) as u8
        }
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub const fn page_up(&mut self) {
        self.scroll_up(self.page_step());
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.page_step());
    }

    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    pub const fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Put `line` at the top of the pane, as far as the page allows.
    pub fn go_to_line(&mut self, line: usize) {
        self.offset = line.min(self.max_offset());
    }

    /// Scroll the minimum amount needed for `line` to be on screen.
    pub fn reveal(&mut self, line: usize) {
        if line < self.offset {
            self.offset = line;
        } else if self.height > 0 && line >= self.offset + self.height as usize {
            self.go_to_line(line + 1 - self.height as usize);
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the line count after a re-flow.
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    // Keep one line of context when paging.
    const fn page_step(&self) -> usize {
        let height = self.height as usize;
        if height > 2 { height - 1 } else { 1 }
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_page_fits_and_reports_full() {
        let vp = Viewport::new(80, 24, 10);
        assert_eq!(vp.visible_range(), 0..10);
        assert_eq!(vp.scroll_percent(), 100);
    }

    #[test]
    fn test_scroll_down_clamps_to_last_page() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(1000);
        assert_eq!(vp.offset(), 76);
        assert_eq!(vp.scroll_percent(), 100);
    }

    #[test]
    fn test_paging_keeps_one_line_of_context() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.page_down();
        assert_eq!(vp.offset(), 9);
        vp.page_up();
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_top_and_bottom() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.go_to_bottom();
        assert_eq!(vp.visible_range(), 76..100);
        vp.go_to_top();
        assert_eq!(vp.scroll_percent(), 0);
    }

    #[test]
    fn test_reveal_scrolls_minimally() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.reveal(5);
        assert_eq!(vp.offset(), 0);
        vp.reveal(30);
        assert_eq!(vp.offset(), 21);
        vp.reveal(3);
        assert_eq!(vp.offset(), 3);
    }

    #[test]
    fn test_shrinking_page_clamps_offset() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(80);
        vp.set_total_lines(30);
        assert_eq!(vp.offset(), 6);
        vp.set_total_lines(5);
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_resize_clamps_offset() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(50);
        vp.resize(80, 60);
        assert_eq!(vp.offset(), 40);
        assert_eq!(vp.width(), 80);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn offset_stays_within_page(
                total_lines in 0..5000usize,
                height in 1..100u16,
                down in 0..5000usize,
                shrink_to in 0..5000usize,
            ) {
                let mut vp = Viewport::new(80, height, total_lines);
                vp.scroll_down(down);
                vp.set_total_lines(shrink_to);

                let range = vp.visible_range();
                prop_assert!(range.start <= range.end);
                prop_assert!(range.end <= shrink_to);
                prop_assert!(vp.scroll_percent() <= 100);
            }

            #[test]
            fn reveal_puts_line_on_screen(
                total_lines in 1..5000usize,
                height in 1..100u16,
                line_seed in 0..5000usize,
            ) {
                let line = line_seed % total_lines;
                let mut vp = Viewport::new(80, height, total_lines);
                vp.reveal(line);
                prop_assert!(vp.visible_range().contains(&line));
            }
        }
    }
}
