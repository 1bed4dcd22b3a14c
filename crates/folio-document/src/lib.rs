// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-document — Markdown typesetting for Folio.
//
// Scans markdown into blocks line by line, lays the blocks out on paginated
// pages (headings, lists, quotes, code, tables, rules), and writes the pages as
// PDF. Also hosts the background-removal tool for document images.

pub mod image;
pub mod layout;
pub mod markdown;
pub mod pdf;

// Re-export the primary types so callers can use `folio_document::PdfWriter` etc.
pub use image::{BackgroundRemover, BackgroundReport};
pub use layout::{Canvas, Page, RenderContext, Surface};
pub use markdown::{Block, BlockScanner, scan};
pub use pdf::PdfWriter;
