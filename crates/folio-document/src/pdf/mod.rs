// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — serialising laid-out pages with printpdf.

mod normalize;
pub mod writer;

pub use writer::PdfWriter;
