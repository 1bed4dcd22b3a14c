// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Block renderer — draws each block type onto the surface.
//
// One block at a time, in document order. Heights that can be known up front
// (code, quotes, table rows) are measured before drawing so the page-break
// decision happens first; running text leans on the surface's own breaks.

use folio_core::Rgb;
use tracing::{debug, instrument};

use super::context::{LineBox, RenderContext};
use super::surface::{Align, Font, FontFamily, FontStyle, Surface};
use super::table;
use crate::markdown::Block;
use crate::markdown::encoding::to_latin1;

const BODY_FONT: Font = Font::new(FontFamily::Helvetica, FontStyle::Regular, 10.0);
const BODY_LINE_HEIGHT: f32 = 5.5;
const PARAGRAPH_SPACING: f32 = 2.0;

/// Extra left offset for every list item.
const LIST_BASE_INDENT: f32 = 4.0;
/// Horizontal offset per nesting level; two whitespace characters make a level.
const LIST_INDENT_STEP: f32 = 4.0;
const LIST_ITEM_SPACING: f32 = 1.0;

const QUOTE_FONT: Font = Font::new(FontFamily::Helvetica, FontStyle::Italic, 9.5);
const QUOTE_BOX: LineBox = LineBox {
    line_height: 5.0,
    padding: 6.0,
    min_height: 16.0,
};
const QUOTE_BAR_WIDTH: f32 = 2.5;
const QUOTE_TEXT_INSET: f32 = 8.0;
const QUOTE_TEXT_RIGHT_PAD: f32 = 4.0;
const QUOTE_SPACING_BEFORE: f32 = 3.0;
const QUOTE_SPACING_AFTER: f32 = 2.0;

const CODE_FONT: Font = Font::new(FontFamily::Courier, FontStyle::Regular, 8.0);
const CODE_BOX: LineBox = LineBox {
    line_height: 4.5,
    padding: 8.0,
    min_height: 12.0,
};
const CODE_TEXT_INSET: f32 = 5.0;
const CODE_SPACING_BEFORE: f32 = 2.0;
const CODE_TAB: &str = "    ";

const RULE_SPACING: f32 = 5.0;
const RULE_WIDTH: f32 = 0.5;

/// Per-level heading style.
struct HeadingStyle {
    size: f32,
    line_height: f32,
    before: f32,
    after: f32,
    color: Rgb,
    /// Colour, thickness and offset below the text.
    rule: Option<(Rgb, f32, f32)>,
}

fn heading_style(ctx: &RenderContext<'_, impl Surface>, level: u8) -> HeadingStyle {
    let palette = ctx.palette;
    match level {
        1 => HeadingStyle {
            size: 24.0,
            line_height: 11.0,
            before: 0.0,
            after: 8.0,
            color: palette.navy,
            rule: Some((palette.accent, 1.2, 2.0)),
        },
        2 => HeadingStyle {
            size: 15.0,
            line_height: 8.0,
            before: 6.0,
            after: 5.0,
            color: palette.navy,
            rule: Some((palette.divider, 0.5, 1.0)),
        },
        3 => HeadingStyle {
            size: 12.0,
            line_height: 7.0,
            before: 4.0,
            after: 2.0,
            color: palette.dark_blue,
            rule: None,
        },
        _ => HeadingStyle {
            size: 10.5,
            line_height: 6.0,
            before: 2.0,
            after: 2.0,
            color: palette.slate,
            rule: None,
        },
    }
}

/// Draw one block.
#[instrument(level = "trace", skip_all, fields(kind = block.kind()))]
pub fn render_block<S: Surface>(ctx: &mut RenderContext<'_, S>, block: &Block) {
    if ctx.surface.page_no() == 0 {
        ctx.surface.add_page();
    }
    match block {
        Block::Heading { level, text } => heading(ctx, *level, text),
        Block::Paragraph { text } => paragraph(ctx, text),
        Block::BulletItem { indent_units, text } => list_item(ctx, "-", *indent_units, text),
        Block::NumberedItem {
            number,
            indent_units,
            text,
        } => list_item(ctx, &format!("{number}."), *indent_units, text),
        Block::CodeBlock { lines } => code_block(ctx, lines),
        Block::Blockquote { text } => blockquote(ctx, text),
        Block::Table { headers, rows } => table::render_table(ctx, headers, rows),
        Block::HorizontalRule => rule(ctx),
    }
}

/// Full-width line at `y`.
fn full_width_line<S: Surface>(ctx: &mut RenderContext<'_, S>, y: f32) {
    let left = ctx.surface.left_margin();
    let right = ctx.surface.page_width() - ctx.surface.right_margin();
    ctx.surface.draw_line(left, y, right, y);
}

fn heading<S: Surface>(ctx: &mut RenderContext<'_, S>, level: u8, text: &str) {
    let style = heading_style(ctx, level);
    let surface = &mut *ctx.surface;

    surface.ln(style.before);
    surface.set_font(Font::new(FontFamily::Helvetica, FontStyle::Bold, style.size));
    surface.set_text_color(style.color);

    // The heading and its rule go to the next page together.
    let lines = surface.wrap_text(0.0, text).len().max(1);
    let rule_height = style.rule.map_or(0.0, |(_, width, offset)| offset + width);
    ctx.reserve(lines as f32 * style.line_height + rule_height);
    ctx.surface.draw_text_block(0.0, style.line_height, text);

    if let Some((color, width, offset)) = style.rule {
        ctx.surface.set_draw_color(color);
        ctx.surface.set_line_width(width);
        let y = ctx.surface.current_y() + offset;
        full_width_line(ctx, y);
    }
    ctx.surface.ln(style.after);
}

fn paragraph<S: Surface>(ctx: &mut RenderContext<'_, S>, text: &str) {
    ctx.surface.set_font(BODY_FONT);
    ctx.surface.set_text_color(ctx.palette.body);
    ctx.surface.draw_text_block(0.0, BODY_LINE_HEIGHT, text);
    ctx.surface.ln(PARAGRAPH_SPACING);
}

/// Left offset of a list item relative to the margin.
pub fn list_indent(indent_units: usize) -> f32 {
    LIST_BASE_INDENT + (indent_units / 2) as f32 * LIST_INDENT_STEP
}

fn list_item<S: Surface>(
    ctx: &mut RenderContext<'_, S>,
    marker: &str,
    indent_units: usize,
    text: &str,
) {
    let surface = &mut *ctx.surface;
    let x = surface.left_margin() + list_indent(indent_units);
    let width = surface.page_width() - surface.right_margin() - x;

    surface.set_x(x);
    surface.set_font(BODY_FONT);
    surface.set_text_color(ctx.palette.body);
    surface.draw_text_block(width, BODY_LINE_HEIGHT, &format!("{marker}  {text}"));
    surface.ln(LIST_ITEM_SPACING);
}

fn blockquote<S: Surface>(ctx: &mut RenderContext<'_, S>, text: &str) {
    ctx.surface.ln(QUOTE_SPACING_BEFORE);
    ctx.surface.set_font(QUOTE_FONT);

    let x = ctx.surface.left_margin();
    let width = ctx.surface.content_width();
    let text_width = width - QUOTE_TEXT_INSET - QUOTE_TEXT_RIGHT_PAD;
    let lines = ctx.surface.wrap_text(text_width, text);
    debug!(lines = lines.len(), "blockquote measured");

    ctx.paginate_lines(
        lines.len(),
        QUOTE_BOX,
        |ctx, range, top, height| {
            let palette = ctx.palette;
            let surface = &mut *ctx.surface;
            surface.set_fill_color(palette.light_bg);
            surface.draw_rect(x, top, width, height, true);
            surface.set_fill_color(palette.accent);
            surface.draw_rect(x, top, QUOTE_BAR_WIDTH, height, true);

            surface.set_font(QUOTE_FONT);
            surface.set_text_color(palette.dark_blue);
            surface.set_y(top + QUOTE_BOX.padding / 2.0);
            for line in &lines[range] {
                surface.set_x(x + QUOTE_TEXT_INSET);
                surface.draw_text_block(text_width, QUOTE_BOX.line_height, line);
            }
        },
        |_| {},
    );
    ctx.surface.ln(QUOTE_SPACING_AFTER);
}

fn code_block<S: Surface>(ctx: &mut RenderContext<'_, S>, lines: &[String]) {
    ctx.surface.ln(CODE_SPACING_BEFORE);

    let printable: Vec<String> = lines
        .iter()
        .map(|line| to_latin1(&line.replace('\t', CODE_TAB)))
        .collect();
    let x = ctx.surface.left_margin();
    let width = ctx.surface.content_width();

    ctx.paginate_lines(
        printable.len(),
        CODE_BOX,
        |ctx, range, top, height| {
            let palette = ctx.palette;
            let surface = &mut *ctx.surface;
            surface.set_fill_color(palette.code_block_bg);
            surface.draw_rect(x, top, width, height, true);

            surface.set_font(CODE_FONT);
            surface.set_text_color(palette.code_block_fg);
            let mut y = top + CODE_BOX.padding / 2.0;
            for line in &printable[range] {
                surface.set_xy(x + CODE_TEXT_INSET, y);
                surface.draw_cell(0.0, CODE_BOX.line_height, line, Align::Left, false);
                y += CODE_BOX.line_height;
            }
        },
        |_| {},
    );
}

fn rule<S: Surface>(ctx: &mut RenderContext<'_, S>) {
    ctx.surface.ln(RULE_SPACING);
    ctx.surface.set_draw_color(ctx.palette.rule);
    ctx.surface.set_line_width(RULE_WIDTH);
    let y = ctx.surface.current_y();
    full_width_line(ctx, y);
    ctx.surface.ln(RULE_SPACING);
}
