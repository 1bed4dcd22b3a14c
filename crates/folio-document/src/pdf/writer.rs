// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — typeset markdown into a paginated PDF using `printpdf` 0.8.
//
// Layout happens on a recording `Canvas` (top-left origin, millimetres). Each
// finished page's draw operations are then translated into printpdf `Op`s,
// whose coordinate space is bottom-left origin in points. The saved bytes go
// through `normalize` so text is single-byte and the output is reproducible.

use std::path::Path;

use folio_core::error::{FolioError, Result};
use folio_core::{RenderConfig, Rgb};
use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage, PdfSaveOptions,
    PdfWarnMsg, Point, Polygon, PolygonRing, Pt, TextItem, WindingOrder,
};
use tracing::{debug, info, instrument, warn};

use crate::layout::canvas::{Canvas, DrawOp, Page};
use crate::layout::context::RenderContext;
use crate::layout::renderer::render_block;
use crate::layout::surface::{Font, FontFamily, FontStyle};
use crate::markdown::scan;

use super::normalize::normalize;

/// Turns markdown documents into PDF bytes or files.
pub struct PdfWriter {
    config: RenderConfig,
}

impl PdfWriter {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Set the running header / document title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.config.title = Some(title.into());
    }

    /// Scan and lay out `markdown`, returning the finished pages.
    ///
    /// Blocks are rendered as the scanner yields them; nothing but the block
    /// in flight and the pages so far is held in memory.
    #[instrument(skip(self, markdown), fields(input_len = markdown.len()))]
    pub fn layout(&self, markdown: &str) -> Vec<Page> {
        let mut canvas = Canvas::new(&self.config);
        let mut blocks = 0usize;
        {
            let mut ctx = RenderContext::new(&mut canvas, &self.config.palette);
            for block in scan(markdown) {
                render_block(&mut ctx, &block);
                blocks += 1;
            }
        }
        let pages = canvas.finish();
        debug!(blocks, pages = pages.len(), "layout complete");
        pages
    }

    /// Render `markdown` to PDF bytes.
    #[instrument(skip(self, markdown), fields(input_len = markdown.len()))]
    pub fn render_markdown(&self, markdown: &str) -> Result<Vec<u8>> {
        let pages = self.layout(markdown);
        self.render_pages(&pages)
    }

    /// Serialise already laid-out pages.
    pub fn render_pages(&self, pages: &[Page]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(FolioError::PdfError("document has no pages".into()));
        }
        let title = self.config.title.as_deref().unwrap_or("Folio Document");
        let mut doc = PdfDocument::new(title);
        let pdf_pages: Vec<PdfPage> = pages.iter().map(to_pdf_page).collect();
        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let saved = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings");
        }
        let bytes = normalize(&saved, title)?;
        info!(pages = pages.len(), bytes = bytes.len(), "PDF rendered");
        Ok(bytes)
    }

    /// Render `markdown` and write the PDF to `path`.
    pub fn write_markdown_to_file(&self, markdown: &str, path: impl AsRef<Path>) -> Result<usize> {
        let pages = self.layout(markdown);
        let bytes = self.render_pages(&pages)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!(pages = pages.len(), "Wrote PDF to {}", path.as_ref().display());
        Ok(pages.len())
    }

    /// Convert the markdown file at `input` into a PDF at `output`, returning
    /// the page count. The source is read in full before any layout starts.
    #[instrument(skip(self, input, output), fields(input = %input.as_ref().display()))]
    pub fn convert_file(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<usize> {
        let input = input.as_ref();
        let markdown = std::fs::read_to_string(input)
            .map_err(|err| FolioError::source_read(input.display().to_string(), err))?;
        self.write_markdown_to_file(&markdown, output)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

// -- Draw op translation ------------------------------------------------------

fn builtin_font(font: Font) -> BuiltinFont {
    match (font.family, font.style) {
        (FontFamily::Helvetica, FontStyle::Regular) => BuiltinFont::Helvetica,
        (FontFamily::Helvetica, FontStyle::Bold) => BuiltinFont::HelveticaBold,
        (FontFamily::Helvetica, FontStyle::Italic) => BuiltinFont::HelveticaOblique,
        (FontFamily::Helvetica, FontStyle::BoldItalic) => BuiltinFont::HelveticaBoldOblique,
        (FontFamily::Courier, FontStyle::Regular) => BuiltinFont::Courier,
        (FontFamily::Courier, FontStyle::Bold) => BuiltinFont::CourierBold,
        (FontFamily::Courier, FontStyle::Italic) => BuiltinFont::CourierOblique,
        (FontFamily::Courier, FontStyle::BoldItalic) => BuiltinFont::CourierBoldOblique,
    }
}

fn pdf_color(color: Rgb) -> Color {
    let (r, g, b) = color.to_unit();
    Color::Rgb(printpdf::Rgb {
        r,
        g,
        b,
        icc_profile: None,
    })
}

/// Flips top-left millimetre coordinates into PDF points.
struct PageSpace {
    height: f32,
}

impl PageSpace {
    fn point(&self, x: f32, y: f32) -> Point {
        Point {
            x: Mm(x).into_pt(),
            y: Mm(self.height - y).into_pt(),
        }
    }

    fn line_point(&self, x: f32, y: f32) -> LinePoint {
        LinePoint {
            p: self.point(x, y),
            bezier: false,
        }
    }
}

fn to_pdf_page(page: &Page) -> PdfPage {
    let space = PageSpace {
        height: page.height,
    };
    let mut ops = Vec::with_capacity(page.ops.len() * 3);
    for op in &page.ops {
        push_ops(&mut ops, &space, op);
    }
    PdfPage::new(Mm(page.width), Mm(page.height), ops)
}

fn push_ops(ops: &mut Vec<Op>, space: &PageSpace, op: &DrawOp) {
    match op {
        DrawOp::Text {
            x,
            baseline,
            font,
            color,
            text,
        } => {
            let builtin = builtin_font(*font);
            ops.push(Op::SetFillColor {
                col: pdf_color(*color),
            });
            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: space.point(*x, *baseline),
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(font.size),
                font: builtin,
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(text.clone())],
                font: builtin,
            });
            ops.push(Op::EndTextSection);
        }
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            color,
            filled,
            line_width,
        } => {
            let mode = if *filled {
                ops.push(Op::SetFillColor {
                    col: pdf_color(*color),
                });
                PaintMode::Fill
            } else {
                ops.push(Op::SetOutlineColor {
                    col: pdf_color(*color),
                });
                ops.push(Op::SetOutlineThickness {
                    pt: Mm(*line_width).into_pt(),
                });
                PaintMode::Stroke
            };
            let corners = [(*x, *y), (x + width, *y), (x + width, y + height), (*x, y + height)];
            ops.push(Op::DrawPolygon {
                polygon: Polygon {
                    rings: vec![PolygonRing {
                        points: corners
                            .iter()
                            .map(|(cx, cy)| space.line_point(*cx, *cy))
                            .collect(),
                    }],
                    mode,
                    winding_order: WindingOrder::NonZero,
                },
            });
        }
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            width,
        } => {
            ops.push(Op::SetOutlineColor {
                col: pdf_color(*color),
            });
            ops.push(Op::SetOutlineThickness {
                pt: Mm(*width).into_pt(),
            });
            ops.push(Op::DrawLine {
                line: Line {
                    points: vec![space.line_point(*x1, *y1), space.line_point(*x2, *y2)],
                    is_closed: false,
                },
            });
        }
    }
}
