// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — background removal for figures embedded in documents.

pub mod transparency;

pub use transparency::{BackgroundRemover, BackgroundReport};
