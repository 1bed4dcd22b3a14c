// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recording canvas — the concrete drawing surface.
//
// Drawing calls are resolved to absolute `DrawOp`s (top-left origin, mm) and
// collected per page. The PDF writer turns finished pages into printpdf
// operations; tests inspect them directly.

use folio_core::{RenderConfig, Rgb};
use tracing::debug;

use super::metrics;
use super::surface::{Align, Font, FontFamily, FontStyle, Surface};

/// Horizontal padding inside cells and text blocks.
pub const CELL_MARGIN: f32 = 1.0;

const HEADER_FONT: Font = Font::new(FontFamily::Helvetica, FontStyle::Italic, 8.0);
const HEADER_CELL_HEIGHT: f32 = 6.0;
/// Gap between the top margin and the first content line under a header.
const HEADER_SPACING: f32 = 4.0;
const FOOTER_FONT: Font = Font::new(FontFamily::Helvetica, FontStyle::Regular, 9.0);
/// Footer cell top, measured up from the bottom edge.
const FOOTER_OFFSET: f32 = 15.0;
const FOOTER_CELL_HEIGHT: f32 = 10.0;

/// A resolved drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// One line of text with its baseline at `baseline`.
    Text {
        x: f32,
        baseline: f32,
        font: Font,
        color: Rgb,
        text: String,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
        filled: bool,
        line_width: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb,
        width: f32,
    },
}

/// One finished (or in-progress) page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text of every text operation, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text.contains(needle))
    }
}

/// Running header and footer rules.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDecoration {
    /// Header text; no header when `None`.
    pub header: Option<String>,
    /// First page (1-based) that carries the header.
    pub header_from_page: usize,
    pub page_numbers: bool,
    pub color: Rgb,
}

impl PageDecoration {
    fn header_for(&self, page_no: usize) -> Option<&str> {
        self.header
            .as_deref()
            .filter(|_| page_no >= self.header_from_page)
    }
}

/// Recording implementation of [`Surface`].
pub struct Canvas {
    width: f32,
    height: f32,
    margin: f32,
    bottom_margin: f32,
    decoration: PageDecoration,

    pages: Vec<Page>,
    x: f32,
    y: f32,
    content_top: f32,

    font: Font,
    text_color: Rgb,
    fill_color: Rgb,
    draw_color: Rgb,
    line_width: f32,
}

impl Canvas {
    /// Canvas with the geometry and decoration described by `config`. No page
    /// exists until [`Surface::add_page`] is called.
    pub fn new(config: &RenderConfig) -> Self {
        let (width, height) = config.paper_size.dimensions_mm();
        Self {
            width: width as f32,
            height: height as f32,
            margin: config.margin_mm,
            bottom_margin: config.bottom_margin_mm,
            decoration: PageDecoration {
                header: config.title.clone(),
                header_from_page: config.header_from_page,
                page_numbers: config.page_numbers,
                color: config.palette.gray,
            },
            pages: Vec::new(),
            x: config.margin_mm,
            y: config.margin_mm,
            content_top: config.margin_mm,
            font: Font::default(),
            text_color: Rgb::BLACK,
            fill_color: Rgb::WHITE,
            draw_color: Rgb::BLACK,
            line_width: 0.2,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Close the last page and hand over every page. A document with no
    /// content still yields one (decorated) page.
    pub fn finish(mut self) -> Vec<Page> {
        if self.pages.is_empty() {
            self.add_page();
        }
        self.draw_footer();
        self.pages
    }

    fn push(&mut self, op: DrawOp) {
        if self.pages.is_empty() {
            self.add_page();
        }
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Baseline for text vertically centred in a box of `height` at `top`.
    fn baseline(&self, font: Font, top: f32, height: f32) -> f32 {
        top + 0.5 * height + 0.3 * metrics::font_size_mm(font)
    }

    /// Text operation for a cell `width` wide at (`x`, `y`).
    fn cell_text(&self, x: f32, y: f32, width: f32, height: f32, text: &str, align: Align) -> Option<DrawOp> {
        if text.is_empty() {
            return None;
        }
        let text_x = match align {
            Align::Left => x + CELL_MARGIN,
            Align::Center => x + (width - self.text_width(text)) / 2.0,
        };
        Some(DrawOp::Text {
            x: text_x,
            baseline: self.baseline(self.font, y, height),
            font: self.font,
            color: self.text_color,
            text: text.to_owned(),
        })
    }

    /// Effective width for a cell or block starting at the cursor.
    fn resolve_width(&self, width: f32) -> f32 {
        if width > 0.0 {
            width
        } else {
            self.width - self.margin - self.x
        }
    }

    /// Start a new page if a unit of `height` at the cursor would cross the
    /// bottom margin, keeping the cursor's x. A line already at the top of a
    /// page is drawn there; breaking again could not make it fit.
    fn break_if_needed(&mut self, height: f32) {
        let at_top = self.y <= self.content_top + 0.01;
        if self.y + height > self.page_break_trigger() && !self.pages.is_empty() && !at_top {
            let x = self.x;
            self.add_page();
            self.x = x;
        }
    }

    /// Draw `text` as a centred decoration cell spanning the content width.
    fn decoration_cell(&mut self, font: Font, y: f32, height: f32, text: &str) {
        let saved_font = self.font;
        let saved_color = self.text_color;
        self.font = font;
        self.text_color = self.decoration.color;
        let op = self.cell_text(
            self.margin,
            y,
            self.width - 2.0 * self.margin,
            height,
            text,
            Align::Center,
        );
        if let (Some(op), Some(page)) = (op, self.pages.last_mut()) {
            page.ops.push(op);
        }
        self.font = saved_font;
        self.text_color = saved_color;
    }

    fn draw_header(&mut self) {
        let page_no = self.page_no();
        if let Some(text) = self.decoration.header_for(page_no).map(str::to_owned) {
            self.decoration_cell(HEADER_FONT, self.y, HEADER_CELL_HEIGHT, &text);
            self.y += HEADER_SPACING;
        }
    }

    fn draw_footer(&mut self) {
        if self.decoration.page_numbers {
            let label = self.page_no().to_string();
            let y = self.height - FOOTER_OFFSET;
            self.decoration_cell(FOOTER_FONT, y, FOOTER_CELL_HEIGHT, &label);
        }
    }
}

impl Surface for Canvas {
    fn add_page(&mut self) {
        if !self.pages.is_empty() {
            self.draw_footer();
        }
        let number = self.pages.len() + 1;
        self.pages.push(Page {
            number,
            width: self.width,
            height: self.height,
            ops: Vec::new(),
        });
        self.x = self.margin;
        self.y = self.margin;
        self.draw_header();
        self.content_top = self.y;
        debug!(page = number, "page started");
    }

    fn page_no(&self) -> usize {
        self.pages.len()
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn font(&self) -> Font {
        self.font
    }

    fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.fill_color = color;
    }

    fn set_draw_color(&mut self, color: Rgb) {
        self.draw_color = color;
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn text_width(&self, text: &str) -> f32 {
        metrics::text_width(self.font, text)
    }

    fn wrap_text(&self, width: f32, text: &str) -> Vec<String> {
        let width = self.resolve_width(width);
        metrics::wrap_text(self.font, text, width - 2.0 * CELL_MARGIN)
    }

    fn draw_cell(&mut self, width: f32, height: f32, text: &str, align: Align, fill: bool) {
        self.break_if_needed(height);
        let width = self.resolve_width(width);
        if fill {
            let rect = DrawOp::Rect {
                x: self.x,
                y: self.y,
                width,
                height,
                color: self.fill_color,
                filled: true,
                line_width: self.line_width,
            };
            self.push(rect);
        }
        if let Some(op) = self.cell_text(self.x, self.y, width, height, text, align) {
            self.push(op);
        }
        self.x += width;
    }

    fn draw_text_block(&mut self, width: f32, line_height: f32, text: &str) {
        let width = self.resolve_width(width);
        for line in self.wrap_text(width, text) {
            self.break_if_needed(line_height);
            if let Some(op) = self.cell_text(self.x, self.y, width, line_height, &line, Align::Left) {
                self.push(op);
            }
            self.y += line_height;
        }
        self.x = self.margin;
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, filled: bool) {
        let color = if filled {
            self.fill_color
        } else {
            self.draw_color
        };
        self.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            color,
            filled,
            line_width: self.line_width,
        });
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color: self.draw_color,
            width: self.line_width,
        });
    }

    fn x(&self) -> f32 {
        self.x
    }

    fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    fn current_y(&self) -> f32 {
        self.y
    }

    fn set_y(&mut self, y: f32) {
        self.x = self.margin;
        self.y = y;
    }

    fn page_width(&self) -> f32 {
        self.width
    }

    fn page_height(&self) -> f32 {
        self.height
    }

    fn left_margin(&self) -> f32 {
        self.margin
    }

    fn right_margin(&self) -> f32 {
        self.margin
    }

    fn page_break_trigger(&self) -> f32 {
        self.height - self.bottom_margin
    }

    fn content_top(&self) -> f32 {
        self.content_top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas_with_title(title: &str) -> Canvas {
        let config = RenderConfig {
            title: Some(title.into()),
            ..RenderConfig::default()
        };
        Canvas::new(&config)
    }

    #[test]
    fn header_starts_on_second_page() {
        let mut canvas = canvas_with_title("Design Notes");
        canvas.add_page();
        assert_eq!(canvas.current_y(), 20.0);
        canvas.add_page();
        assert_eq!(canvas.current_y(), 24.0);
        assert_eq!(canvas.content_top(), 24.0);

        let pages = canvas.finish();
        assert_eq!(pages.len(), 2);
        assert!(!pages[0].contains_text("Design Notes"));
        assert!(pages[1].contains_text("Design Notes"));
    }

    #[test]
    fn every_page_gets_its_number() {
        let mut canvas = Canvas::new(&RenderConfig::default());
        canvas.add_page();
        canvas.add_page();
        canvas.add_page();
        let pages = canvas.finish();
        for page in &pages {
            let label = page.number.to_string();
            assert!(page.texts().any(|t| t == label), "page {} unnumbered", page.number);
        }
    }

    #[test]
    fn finish_without_pages_yields_one_page() {
        let pages = Canvas::new(&RenderConfig::default()).finish();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
    }

    #[test]
    fn text_block_breaks_at_bottom_margin() {
        let mut canvas = Canvas::new(&RenderConfig::default());
        canvas.add_page();
        canvas.set_y(canvas.page_break_trigger() - 6.0);
        canvas.draw_text_block(0.0, 5.0, "first line\nsecond line");
        assert_eq!(canvas.page_no(), 2);
        assert!(canvas.pages()[0].contains_text("first line"));
        assert!(canvas.pages()[1].contains_text("second line"));
    }

    #[test]
    fn cell_advances_x_and_fills() {
        let mut canvas = Canvas::new(&RenderConfig::default());
        canvas.add_page();
        canvas.set_fill_color(Rgb(1, 2, 3));
        canvas.draw_cell(30.0, 7.0, "Col", Align::Left, true);
        assert_eq!(canvas.x(), 50.0);
        let ops = &canvas.pages()[0].ops;
        assert!(matches!(ops[0], DrawOp::Rect { color: Rgb(1, 2, 3), filled: true, .. }));
        assert!(matches!(&ops[1], DrawOp::Text { text, .. } if text == "Col"));
    }

    #[test]
    fn centred_text_is_centred() {
        let mut canvas = Canvas::new(&RenderConfig::default());
        canvas.add_page();
        canvas.draw_cell(100.0, 10.0, "mid", Align::Center, false);
        let width = canvas.text_width("mid");
        match &canvas.pages()[0].ops[0] {
            DrawOp::Text { x, .. } => assert!((x - (20.0 + (100.0 - width) / 2.0)).abs() < 1e-4),
            other => panic!("unexpected op {other:?}"),
        }
    }
}
