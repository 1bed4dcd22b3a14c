// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Table layout — column widths, measured row heights and per-row page breaks
// with the header repeated on every continuation page.

use folio_core::Rgb;
use tracing::{debug, warn};

use super::context::{LineBox, RenderContext};
use super::surface::{Align, Font, FontFamily, FontStyle, Surface};
use crate::markdown::inline::strip_code_ticks;

const HEADER_FONT: Font = Font::new(FontFamily::Helvetica, FontStyle::Bold, 8.5);
const CELL_FONT: Font = Font::new(FontFamily::Helvetica, FontStyle::Regular, 8.5);
const HEADER_HEIGHT: f32 = 7.0;
const ROW_BOX: LineBox = LineBox {
    line_height: 5.0,
    padding: 0.0,
    min_height: 6.0,
};
/// Narrow first column used for wide tables (usually an index or id).
const FIRST_COLUMN_MAX: f32 = 20.0;
const FIRST_COLUMN_SHARE: f32 = 0.08;
const THREE_COLUMN_SPLIT: [f32; 3] = [0.25, 0.45, 0.30];
const SPACING_BEFORE: f32 = 3.0;
const SPACING_AFTER: f32 = 4.0;

/// Column widths for a table of `columns` columns across `available` mm.
pub fn column_widths(columns: usize, available: f32) -> Vec<f32> {
    match columns {
        0 => Vec::new(),
        3 => THREE_COLUMN_SPLIT.iter().map(|share| available * share).collect(),
        n if n >= 4 => {
            let first = FIRST_COLUMN_MAX.min(available * FIRST_COLUMN_SHARE);
            let rest = (available - first) / (n - 1) as f32;
            std::iter::once(first)
                .chain(std::iter::repeat_n(rest, n - 1))
                .collect()
        }
        n => vec![available / n as f32; n],
    }
}

/// Fit a data row to `columns` cells: missing cells are empty, surplus cells
/// are folded into the last column so no text is lost.
pub fn fit_row(row: &[String], columns: usize) -> Vec<String> {
    let mut cells: Vec<String> = row.iter().map(|cell| strip_code_ticks(cell.trim())).collect();
    if cells.len() > columns && columns > 0 {
        warn!(
            cells = cells.len(),
            columns, "table row wider than its header; folding surplus cells"
        );
        let surplus = cells.split_off(columns);
        let last = &mut cells[columns - 1];
        for extra in surplus {
            last.push_str(" | ");
            last.push_str(&extra);
        }
    }
    cells.resize(columns, String::new());
    cells
}

fn draw_header<S: Surface>(ctx: &mut RenderContext<'_, S>, headers: &[String], widths: &[f32]) {
    if headers.is_empty() {
        return;
    }
    let fill = ctx.palette.table_header;
    let surface = &mut *ctx.surface;
    surface.set_font(HEADER_FONT);
    surface.set_fill_color(fill);
    surface.set_text_color(Rgb::WHITE);
    for (header, width) in headers.iter().zip(widths) {
        surface.draw_cell(*width, HEADER_HEIGHT, header.trim(), Align::Left, true);
    }
    surface.ln(HEADER_HEIGHT);
}

/// Draw a table block.
pub fn render_table<S: Surface>(ctx: &mut RenderContext<'_, S>, headers: &[String], rows: &[Vec<String>]) {
    ctx.surface.ln(SPACING_BEFORE);

    let columns = if headers.is_empty() {
        rows.iter().map(Vec::len).max().unwrap_or(0)
    } else {
        headers.len()
    };
    if columns == 0 {
        return;
    }

    let left = ctx.surface.left_margin();
    let available = ctx.surface.content_width();
    let widths = column_widths(columns, available);
    let offsets: Vec<f32> = widths
        .iter()
        .scan(0.0, |acc, width| {
            let offset = *acc;
            *acc += width;
            Some(offset)
        })
        .collect();
    debug!(columns, rows = rows.len(), ?widths, "table layout");

    // Keep the header with at least the first row.
    ctx.surface.set_font(CELL_FONT);
    let first_row = rows
        .first()
        .map(|row| measure_row(ctx, &fit_row(row, columns), &widths).len_max())
        .unwrap_or(0);
    let header_height = if headers.is_empty() { 0.0 } else { HEADER_HEIGHT };
    ctx.reserve(header_height + ROW_BOX.height(first_row.max(1)));
    draw_header(ctx, headers, &widths);

    for (index, row) in rows.iter().enumerate() {
        let cells = fit_row(row, columns);
        ctx.surface.set_font(CELL_FONT);
        let measured = measure_row(ctx, &cells, &widths);
        let fill = if index % 2 == 1 {
            ctx.palette.table_alt
        } else {
            Rgb::WHITE
        };

        ctx.paginate_lines(
            measured.len_max(),
            ROW_BOX,
            |ctx, range, top, height| {
                let body = ctx.palette.body;
                let surface = &mut *ctx.surface;
                surface.set_fill_color(fill);
                surface.draw_rect(left, top, available, height, true);
                surface.set_font(CELL_FONT);
                surface.set_text_color(body);
                for (column, lines) in measured.0.iter().enumerate() {
                    let x = left + offsets[column];
                    let visible = lines.iter().skip(range.start).take(range.len());
                    for (k, line) in visible.enumerate() {
                        surface.set_xy(x, top + k as f32 * ROW_BOX.line_height);
                        surface.draw_cell(widths[column], ROW_BOX.line_height, line, Align::Left, false);
                    }
                }
            },
            |ctx| draw_header(ctx, headers, &widths),
        );
    }

    ctx.surface.ln(SPACING_AFTER);
}

/// Wrapped lines of every cell in a row.
struct MeasuredRow(Vec<Vec<String>>);

impl MeasuredRow {
    /// Line count of the tallest cell.
    fn len_max(&self) -> usize {
        self.0.iter().map(Vec::len).max().unwrap_or(1).max(1)
    }
}

fn measure_row<S: Surface>(ctx: &RenderContext<'_, S>, cells: &[String], widths: &[f32]) -> MeasuredRow {
    MeasuredRow(
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| ctx.surface.wrap_text(*width, cell))
            .collect(),
    )
}
