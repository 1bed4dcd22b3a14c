// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout module — font metrics, the drawing surface, pagination and the
// per-block renderers.

pub mod canvas;
pub mod context;
pub mod metrics;
pub mod renderer;
pub mod surface;
pub mod table;

pub use canvas::{Canvas, DrawOp, Page};
pub use context::{LayoutCursor, LineBox, RenderContext};
pub use renderer::render_block;
pub use surface::{Align, Font, FontFamily, FontStyle, Surface};
