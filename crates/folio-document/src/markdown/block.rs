// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Block values emitted by the scanner.

/// One classified unit of document content.
///
/// Text fields have already been through inline cleanup and are safe for the
/// single-byte output encoding. Code block lines are the exception: they are
/// kept exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `#` to `####` heading. `level` is always in `1..=4`.
    Heading { level: u8, text: String },
    Paragraph { text: String },
    /// `indent_units` counts leading whitespace characters.
    BulletItem { indent_units: usize, text: String },
    /// `number` is the digit string as written, never renumbered.
    NumberedItem {
        number: String,
        indent_units: usize,
        text: String,
    },
    CodeBlock { lines: Vec<String> },
    /// Contiguous `>` lines joined with single spaces.
    Blockquote { text: String },
    /// Rows may be shorter or longer than `headers`.
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    HorizontalRule,
}

impl Block {
    /// Short name used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::Paragraph { .. } => "paragraph",
            Self::BulletItem { .. } => "bullet",
            Self::NumberedItem { .. } => "numbered",
            Self::CodeBlock { .. } => "code",
            Self::Blockquote { .. } => "blockquote",
            Self::Table { .. } => "table",
            Self::HorizontalRule => "rule",
        }
    }

    /// Every piece of text the block carries, in reading order.
    #[cfg(test)]
    pub fn text_fragments(&self) -> Vec<&str> {
        match self {
            Self::Heading { text, .. }
            | Self::Paragraph { text }
            | Self::BulletItem { text, .. }
            | Self::Blockquote { text } => vec![text.as_str()],
            Self::NumberedItem { number, text, .. } => vec![number.as_str(), text.as_str()],
            Self::CodeBlock { lines } => lines.iter().map(String::as_str).collect(),
            Self::Table { headers, rows } => headers
                .iter()
                .chain(rows.iter().flatten())
                .map(String::as_str)
                .collect(),
            Self::HorizontalRule => Vec::new(),
        }
    }
}
