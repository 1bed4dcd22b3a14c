// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render context — the surface, the palette and the pagination decisions
// every block renderer shares.

use std::ops::Range;

use folio_core::Palette;
use tracing::debug;

use super::surface::Surface;

/// Tolerance when comparing cursor positions.
const EPSILON: f32 = 0.01;

/// Snapshot of where the renderer stands on the current page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    /// 1-based page number.
    pub page: usize,
    pub y: f32,
    /// Lowest y content may reach on this page.
    pub limit: f32,
    /// y where content began on this page.
    pub top: f32,
    pub page_width: f32,
    pub left_margin: f32,
    pub right_margin: f32,
}

impl LayoutCursor {
    /// Vertical space left on the current page.
    pub fn remaining(&self) -> f32 {
        self.limit - self.y
    }

    /// Vertical space a fresh page offers.
    pub fn page_capacity(&self) -> f32 {
        self.limit - self.top
    }

    /// Nothing has been drawn below the page's content top yet.
    pub fn at_page_top(&self) -> bool {
        (self.y - self.top).abs() < EPSILON
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - self.left_margin - self.right_margin
    }
}

/// Geometry of a box made of fixed-height lines, such as a code block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBox {
    pub line_height: f32,
    /// Vertical padding above plus below the lines.
    pub padding: f32,
    pub min_height: f32,
}

impl LineBox {
    /// Height of a box holding `lines` lines.
    pub fn height(&self, lines: usize) -> f32 {
        (lines as f32 * self.line_height + self.padding).max(self.min_height)
    }

    /// Most lines that fit in `space`.
    fn lines_within(&self, space: f32) -> usize {
        let usable = space - self.padding;
        if usable < self.line_height {
            0
        } else {
            (usable / self.line_height + EPSILON) as usize
        }
    }
}

/// State shared across block renderers for one document.
pub struct RenderContext<'a, S: Surface> {
    pub surface: &'a mut S,
    pub palette: &'a Palette,
}

impl<'a, S: Surface> RenderContext<'a, S> {
    pub fn new(surface: &'a mut S, palette: &'a Palette) -> Self {
        Self { surface, palette }
    }

    pub fn cursor(&self) -> LayoutCursor {
        LayoutCursor {
            page: self.surface.page_no(),
            y: self.surface.current_y(),
            limit: self.surface.page_break_trigger(),
            top: self.surface.content_top(),
            page_width: self.surface.page_width(),
            left_margin: self.surface.left_margin(),
            right_margin: self.surface.right_margin(),
        }
    }

    /// Whether `height` fits below the cursor on the current page.
    pub fn fits(&self, height: f32) -> bool {
        self.surface.current_y() + height <= self.surface.page_break_trigger() + EPSILON
    }

    pub fn new_page(&mut self) {
        self.surface.add_page();
        debug!(page = self.surface.page_no(), "explicit page break");
    }

    /// Make room for a block of `height`: break to a new page unless it fits
    /// here or the page is still empty.
    pub fn reserve(&mut self, height: f32) {
        if !self.fits(height) && !self.cursor().at_page_top() {
            self.new_page();
        }
    }

    /// Lay out `total` lines inside boxes of shape `shape`, splitting across
    /// pages when needed.
    ///
    /// The whole box is kept together when it fits on the current page, or on
    /// a fresh one. Only a box taller than a whole page is split, each page
    /// getting as many lines as it holds. `draw` receives the line range,
    /// the box top and the box height and must leave the cursor anywhere;
    /// the cursor is moved below the box afterwards. `on_break` runs after
    /// every page break this call makes (to repeat a table header, say).
    pub fn paginate_lines<D, B>(&mut self, total: usize, shape: LineBox, mut draw: D, mut on_break: B)
    where
        D: FnMut(&mut Self, Range<usize>, f32, f32),
        B: FnMut(&mut Self),
    {
        let whole = shape.height(total);
        // A fresh page is one nothing but `on_break` has drawn on.
        let mut fresh = self.cursor().at_page_top();
        if !self.fits(whole) {
            let cursor = self.cursor();
            let fits_fresh_page = whole <= cursor.page_capacity() + EPSILON;
            let nothing_fits_here = shape.lines_within(cursor.remaining()) == 0;
            if !fresh && (fits_fresh_page || nothing_fits_here) {
                self.new_page();
                on_break(self);
                fresh = true;
            }
        }

        let mut start = 0;
        loop {
            let rest = total - start;
            let top = self.surface.current_y();
            let rest_height = shape.height(rest);

            if self.fits(rest_height) || rest == 0 {
                draw(self, start..total, top, rest_height);
                self.surface.set_y(top + rest_height);
                return;
            }

            let mut take = shape.lines_within(self.cursor().remaining()).min(rest);
            if take == 0 {
                if !fresh {
                    self.new_page();
                    on_break(self);
                    fresh = true;
                    continue;
                }
                // Even a fresh page cannot hold a single line; draw one anyway.
                take = 1;
            }

            let height = shape.height(take);
            draw(self, start..start + take, top, height);
            start += take;
            if start == total {
                self.surface.set_y(top + height);
                return;
            }
            debug!(drawn = start, total, "box continues on next page");
            self.new_page();
            on_break(self);
            fresh = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::canvas::Canvas;
    use folio_core::RenderConfig;

    const SHAPE: LineBox = LineBox {
        line_height: 5.0,
        padding: 8.0,
        min_height: 12.0,
    };

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new(&RenderConfig::default());
        canvas.add_page();
        canvas
    }

    #[test]
    fn line_box_height_has_minimum() {
        assert_eq!(SHAPE.height(0), 12.0);
        assert_eq!(SHAPE.height(10), 58.0);
    }

    #[test]
    fn small_box_stays_on_page() {
        let mut surface = canvas();
        let palette = Palette::default();
        let mut ctx = RenderContext::new(&mut surface, &palette);
        let mut calls = Vec::new();
        ctx.paginate_lines(3, SHAPE, |_, range, top, h| calls.push((range, top, h)), |_| {});
        assert_eq!(calls, vec![(0..3, 20.0, 23.0)]);
        assert_eq!(ctx.surface.current_y(), 43.0);
        assert_eq!(ctx.surface.page_no(), 1);
    }

    #[test]
    fn box_moves_whole_to_next_page() {
        let mut surface = canvas();
        let palette = Palette::default();
        let mut ctx = RenderContext::new(&mut surface, &palette);
        ctx.surface.set_y(230.0);
        let mut calls = Vec::new();
        let mut breaks = 0;
        ctx.paginate_lines(
            6,
            SHAPE,
            |c, range, top, _| calls.push((c.surface.page_no(), range, top)),
            |_| breaks += 1,
        );
        assert_eq!(breaks, 1);
        assert_eq!(calls, vec![(2, 0..6, 20.0)]);
    }

    #[test]
    fn tall_box_is_split_across_pages() {
        let mut surface = canvas();
        let palette = Palette::default();
        let mut ctx = RenderContext::new(&mut surface, &palette);
        // 234mm of usable height holds 45 lines per page.
        let mut calls = Vec::new();
        ctx.paginate_lines(
            100,
            SHAPE,
            |c, range, _, _| calls.push((c.surface.page_no(), range)),
            |_| {},
        );
        assert_eq!(calls, vec![(1, 0..45), (2, 45..90), (3, 90..100)]);
    }

    #[test]
    fn break_handler_filling_the_page_still_makes_progress() {
        let mut surface = canvas();
        let palette = Palette::default();
        let mut ctx = RenderContext::new(&mut surface, &palette);
        ctx.surface.set_y(250.0);
        let mut calls = Vec::new();
        ctx.paginate_lines(
            3,
            SHAPE,
            |c, range, _, _| calls.push((c.surface.page_no(), range)),
            // Leaves 1mm, less than any line needs.
            |c| {
                let y = c.surface.page_break_trigger() - 1.0;
                c.surface.set_y(y);
            },
        );
        assert_eq!(calls, vec![(2, 0..1), (3, 1..2), (4, 2..3)]);
        assert_eq!(ctx.surface.page_no(), 4);
    }

    #[test]
    fn reserve_breaks_only_when_needed() {
        let mut surface = canvas();
        let palette = Palette::default();
        let mut ctx = RenderContext::new(&mut surface, &palette);
        ctx.reserve(500.0);
        assert_eq!(ctx.surface.page_no(), 1, "empty page never breaks");
        ctx.surface.set_y(200.0);
        ctx.reserve(40.0);
        assert_eq!(ctx.surface.page_no(), 1);
        ctx.reserve(60.0);
        assert_eq!(ctx.surface.page_no(), 2);
    }
}
