// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Markdown module — line scanner, block model and inline cleanup.

pub mod block;
pub mod encoding;
pub mod inline;
pub mod scanner;

pub use block::Block;
pub use inline::clean_inline;
pub use scanner::{BlockScanner, ScannerMode, scan};
