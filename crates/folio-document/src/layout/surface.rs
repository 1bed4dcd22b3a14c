// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drawing surface capability consumed by the renderer.
//
// Coordinates are millimetres from the top-left corner of the page. The
// surface owns a write position (x, y) that text blocks and cells advance,
// and it breaks to a new page by itself when wrapped text would cross the
// bottom margin.

use folio_core::Rgb;

/// Base-14 font families the renderer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Helvetica,
    Courier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn is_bold(self) -> bool {
        matches!(self, Self::Bold | Self::BoldItalic)
    }
}

/// A font selection: family, style and size in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub family: FontFamily,
    pub style: FontStyle,
    pub size: f32,
}

impl Font {
    pub const fn new(family: FontFamily, style: FontStyle, size: f32) -> Self {
        Self {
            family,
            style,
            size,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(FontFamily::Helvetica, FontStyle::Regular, 10.0)
    }
}

/// Horizontal alignment of text inside a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// Page canvas with a write cursor, font state and automatic page breaks.
pub trait Surface {
    /// Close the current page (if any) and start a new one with the cursor at
    /// the top margin. Page decoration is drawn as part of the transition.
    fn add_page(&mut self);

    /// 1-based number of the current page; 0 before the first page.
    fn page_no(&self) -> usize;

    fn set_font(&mut self, font: Font);
    fn font(&self) -> Font;
    fn set_text_color(&mut self, color: Rgb);
    fn set_fill_color(&mut self, color: Rgb);
    fn set_draw_color(&mut self, color: Rgb);
    fn set_line_width(&mut self, width: f32);

    /// Width of `text` in the current font.
    fn text_width(&self, text: &str) -> f32;

    /// Lines `text` would occupy in a text block `width` wide (0 = up to the
    /// right margin) in the current font.
    fn wrap_text(&self, width: f32, text: &str) -> Vec<String>;

    /// Single-line cell at the cursor, optionally filled. Advances x by
    /// `width` (0 = up to the right margin).
    fn draw_cell(&mut self, width: f32, height: f32, text: &str, align: Align, fill: bool);

    /// Wrapped text block at the cursor. Each line advances y by
    /// `line_height`; lines that would cross the bottom margin move to a new
    /// page. Leaves x at the left margin.
    fn draw_text_block(&mut self, width: f32, line_height: f32, text: &str);

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, filled: bool);
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);

    fn x(&self) -> f32;
    fn set_x(&mut self, x: f32);
    fn current_y(&self) -> f32;
    /// Move to `y` and return x to the left margin.
    fn set_y(&mut self, y: f32);

    fn set_xy(&mut self, x: f32, y: f32) {
        self.set_y(y);
        self.set_x(x);
    }

    /// Line feed: x to the left margin, y down by `height`.
    fn ln(&mut self, height: f32) {
        let y = self.current_y() + height;
        self.set_y(y);
    }

    fn page_width(&self) -> f32;
    fn page_height(&self) -> f32;
    fn left_margin(&self) -> f32;
    fn right_margin(&self) -> f32;

    /// y beyond which nothing may be drawn (page height minus bottom margin).
    fn page_break_trigger(&self) -> f32;

    /// y where content started on the current page, below any header.
    fn content_top(&self) -> f32;

    /// Width between the margins.
    fn content_width(&self) -> f32 {
        self.page_width() - self.left_margin() - self.right_margin()
    }
}
