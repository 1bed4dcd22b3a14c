// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inline cleanup: emphasis, inline code and links are flattened to plain text.

use std::sync::LazyLock;

use regex::Regex;

use super::encoding::to_latin1;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid bold regex"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("valid italic regex"));
static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid code span regex"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid link regex"));

/// Flatten inline markup and map the result onto the output encoding.
///
/// Bold is removed before italic so `**x**` never leaves stray asterisks.
/// The result is trimmed.
pub fn clean_inline(text: &str) -> String {
    let text = BOLD.replace_all(text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = strip_code_ticks(&text);
    let text = LINK.replace_all(&text, "$1");
    to_latin1(&text).trim().to_owned()
}

/// Remove the backticks around inline code spans, leaving their content.
pub fn strip_code_ticks(text: &str) -> String {
    CODE.replace_all(text, "$1").into_owned()
}
