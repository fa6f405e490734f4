//! Windowed rendering math.
//!
//! Only rows in `[start, end)` are materialized; the rest of the scroll height
//! is filled with padding so the scrollbar keeps its proportions.

pub const DEFAULT_ROW_HEIGHT: f64 = 32.0;
pub const DEFAULT_BUFFER_ROWS: usize = 20;
pub const DEFAULT_WINDOW_THRESHOLD: usize = 500;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowRange {
    pub start: usize,
    pub end: usize,
}

impl WindowRange {
    pub fn full(total: usize) -> Self {
        Self {
            start: 0,
            end: total,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// Index range to materialize for a scroll position, clipped to `[0, total]`.
pub fn compute(
    scroll_offset: f64,
    viewport_height: f64,
    row_height: f64,
    total: usize,
    buffer_rows: usize,
) -> WindowRange {
    if row_height <= 0.0 || !row_height.is_finite() {
        return WindowRange::full(total);
    }

    let first_row = (scroll_offset.max(0.0) / row_height).floor() as usize;
    let rows_in_view = (viewport_height.max(0.0) / row_height).ceil() as usize;

    let start = first_row.saturating_sub(buffer_rows).min(total);
    let end = start
        .saturating_add(rows_in_view)
        .saturating_add(buffer_rows.saturating_mul(2))
        .min(total);
    WindowRange { start, end }
}

/// Current window over the visible rows. Recomputations that land on the same
/// range leave the state untouched and report `false`.
#[derive(Clone, Debug, PartialEq)]
pub struct VirtualWindow {
    row_height: f64,
    buffer_rows: usize,
    threshold: usize,
    scroll_offset: f64,
    viewport_height: f64,
    total: usize,
    range: WindowRange,
}

impl Default for VirtualWindow {
    fn default() -> Self {
        Self::new(
            DEFAULT_ROW_HEIGHT,
            DEFAULT_BUFFER_ROWS,
            DEFAULT_WINDOW_THRESHOLD,
        )
    }
}

impl VirtualWindow {
    pub fn new(row_height: f64, buffer_rows: usize, threshold: usize) -> Self {
        Self {
            row_height,
            buffer_rows,
            threshold,
            scroll_offset: 0.0,
            viewport_height: 0.0,
            total: 0,
            range: WindowRange::default(),
        }
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn range(&self) -> WindowRange {
        self.range
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Windowing only kicks in once the row count exceeds the threshold.
    pub fn is_windowed(&self) -> bool {
        self.total > self.threshold
    }

    pub fn update(&mut self, scroll_offset: f64, viewport_height: f64, total: usize) -> bool {
        let next = if total > self.threshold {
            compute(
                scroll_offset,
                viewport_height,
                self.row_height,
                total,
                self.buffer_rows,
            )
        } else {
            WindowRange::full(total)
        };

        self.scroll_offset = scroll_offset;
        self.viewport_height = viewport_height;
        if next == self.range && total == self.total {
            return false;
        }

        self.total = total;
        self.range = next;
        true
    }

    /// Recomputes for a new row count at the current scroll position.
    pub fn set_total(&mut self, total: usize) -> bool {
        self.update(self.scroll_offset, self.viewport_height, total)
    }

    pub fn reset_to_top(&mut self, total: usize) -> bool {
        self.update(0.0, self.viewport_height, total)
    }

    /// Heights of the spacer above and below the materialized rows.
    pub fn padding(&self) -> (f64, f64) {
        let top = self.range.start as f64 * self.row_height;
        let bottom = self.total.saturating_sub(self.range.end) as f64 * self.row_height;
        (top, bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_around_row_one_hundred() {
        let range = compute(3200.0, 640.0, 32.0, 1000, 20);
        assert_eq!(range, WindowRange { start: 80, end: 140 });
    }

    #[test]
    fn window_clips_at_both_ends() {
        assert_eq!(compute(0.0, 640.0, 32.0, 1000, 20).start, 0);
        assert_eq!(compute(0.0, 640.0, 32.0, 1000, 20).end, 60);

        let tail = compute(31_900.0, 640.0, 32.0, 1000, 20);
        assert_eq!(tail.end, 1000);
        assert!(tail.start < tail.end);

        let past_end = compute(1_000_000.0, 640.0, 32.0, 1000, 20);
        assert_eq!(past_end, WindowRange { start: 1000, end: 1000 });
    }

    #[test]
    fn below_threshold_everything_materializes() {
        let mut window = VirtualWindow::default();
        assert!(window.update(3200.0, 640.0, 300));
        assert_eq!(window.range(), WindowRange::full(300));
        assert_eq!(window.padding(), (0.0, 0.0));
        assert!(!window.is_windowed());
    }

    #[test]
    fn unchanged_range_is_not_a_state_change() {
        let mut window = VirtualWindow::default();
        assert!(window.update(3200.0, 640.0, 1000));
        // Row 100 + a few pixels still starts at row 100.
        assert!(!window.update(3210.0, 640.0, 1000));
        assert_eq!(window.range(), WindowRange { start: 80, end: 140 });
        assert!(window.update(3232.0, 640.0, 1000));
        assert_eq!(window.range(), WindowRange { start: 81, end: 141 });
    }

    #[test]
    fn padding_preserves_scroll_height() {
        let mut window = VirtualWindow::default();
        window.update(3200.0, 640.0, 1000);
        let (top, bottom) = window.padding();
        assert_eq!(top, 80.0 * 32.0);
        assert_eq!(bottom, 860.0 * 32.0);
    }

    #[test]
    fn reset_to_top_keeps_viewport() {
        let mut window = VirtualWindow::default();
        window.update(3200.0, 640.0, 1000);
        assert!(window.reset_to_top(800));
        assert_eq!(window.range(), WindowRange { start: 0, end: 60 });
    }

    #[test]
    fn growing_past_threshold_uses_latest_scroll_position() {
        let mut window = VirtualWindow::default();
        assert!(window.update(0.0, 640.0, 400));
        assert!(!window.update(3200.0, 640.0, 400));
        assert!(window.set_total(1000));
        assert_eq!(window.range(), WindowRange { start: 80, end: 140 });
    }

    #[test]
    fn zero_row_height_falls_back_to_full_range() {
        assert_eq!(compute(100.0, 640.0, 0.0, 700, 20), WindowRange::full(700));
    }
}
