//! Screen geometry for the stacked window list.
//!
//! Windows are stacked top to bottom. Each region owns `height` text rows
//! starting at `y`, followed by a single mode line row. The last terminal row
//! is the message line, so for `n` regions on a terminal of `rows` rows:
//! `sum(height) + n + 1 == rows`.
//!
//! Coordinates are terminal cells (`u16`) to line up with the frame and
//! writer APIs.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutRegion {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl LayoutRegion {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn mode_line_row(&self) -> u16 {
        self.y + self.height
    }

    /// True for the text rows and the mode line of this region.
    pub fn owns_row(&self, row: u16) -> bool {
        row >= self.y && row <= self.mode_line_row()
    }
}

#[derive(Debug, Clone)]
pub struct Layout {
    regions: Vec<LayoutRegion>,
    message_row: u16,
}

impl Layout {
    /// One window spanning the terminal above the message line.
    pub fn single(width: u16, height: u16) -> Self {
        Self {
            regions: vec![LayoutRegion::new(0, 0, width, height.saturating_sub(2))],
            message_row: height.saturating_sub(1),
        }
    }

    /// `count` windows sharing the terminal evenly; earlier windows take the
    /// remainder rows. `None` when every window cannot get at least one text
    /// row plus its mode line.
    pub fn stacked(width: u16, height: u16, count: usize) -> Option<Self> {
        let available = usize::from(height.saturating_sub(1));
        if count == 0 || available < count * 2 {
            return None;
        }
        let base = available / count;
        let extra = available % count;
        let mut regions = Vec::with_capacity(count);
        let mut y = 0usize;
        for i in 0..count {
            let slice = base + usize::from(i < extra);
            regions.push(LayoutRegion::new(0, y as u16, width, (slice - 1) as u16));
            y += slice;
        }
        Some(Self {
            regions,
            message_row: height - 1,
        })
    }

    pub fn from_regions(regions: Vec<LayoutRegion>, message_row: u16) -> Self {
        Self {
            regions,
            message_row,
        }
    }

    /// First region; the only one for a single-window layout.
    pub fn primary(&self) -> &LayoutRegion {
        &self.regions[0]
    }

    pub fn regions(&self) -> &[LayoutRegion] {
        &self.regions
    }

    pub fn message_row(&self) -> u16 {
        self.message_row
    }

    /// Hit-test a screen row: `(region index, text row within region)`.
    ///
    /// A mode line row maps to the last text row of its region. Rows below
    /// every region (the message line) map to the last text row of the last
    /// region.
    pub fn region_at_row(&self, row: u16) -> Option<(usize, u16)> {
        let last_row = |r: &LayoutRegion| r.height.saturating_sub(1);
        for (idx, region) in self.regions.iter().enumerate() {
            if region.owns_row(row) {
                return Some((idx, (row - region.y).min(last_row(region))));
            }
        }
        let idx = self.regions.len().checked_sub(1)?;
        Some((idx, last_row(&self.regions[idx])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_layout_invariants() {
        let l = Layout::single(80, 24);
        assert_eq!(l.regions().len(), 1);
        let r = l.primary();
        assert_eq!(r.x, 0);
        assert_eq!(r.y, 0);
        assert_eq!(r.width, 80);
        assert_eq!(r.height, 22);
        assert_eq!(r.mode_line_row(), 22);
        assert_eq!(l.message_row(), 23);
    }

    #[test]
    fn stacked_rows_account_for_every_terminal_row() {
        for count in 1..=5usize {
            let l = Layout::stacked(80, 24, count).unwrap();
            let text: usize = l.regions().iter().map(|r| r.height as usize).sum();
            assert_eq!(text + count + 1, 24, "count={count}");
            let last = l.regions().last().unwrap();
            assert_eq!(last.mode_line_row() + 1, l.message_row());
        }
    }

    #[test]
    fn stacked_refuses_too_many_windows() {
        assert!(Layout::stacked(80, 5, 2).is_some());
        assert!(Layout::stacked(80, 4, 2).is_none());
        assert!(Layout::stacked(80, 24, 0).is_none());
    }

    #[test]
    fn hit_testing_clamps_mode_and_message_rows() {
        let l = Layout::stacked(80, 24, 2).unwrap();
        // regions: y0 h11 (mode 11), y12 h10 (mode 22), message 23
        assert_eq!(l.region_at_row(3), Some((0, 3)));
        assert_eq!(l.region_at_row(11), Some((0, 10)));
        assert_eq!(l.region_at_row(12), Some((1, 0)));
        assert_eq!(l.region_at_row(22), Some((1, 9)));
        assert_eq!(l.region_at_row(23), Some((1, 9)));
        assert_eq!(l.region_at_row(200), Some((1, 9)));
    }
}
