// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line scanner — classifies markdown lines into blocks.
//
// Code fences, tables and blockquotes span several lines, so the scanner keeps
// one buffering mode at a time and releases the finished block when the
// terminating line (closing fence, blank line, foreign line) arrives. Blocks
// are yielded lazily through `Iterator`.

use std::collections::VecDeque;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace, warn};

use super::block::Block;
use super::inline::clean_inline;

static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-{3,}$").expect("valid rule regex"));
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,4})\s+(.+)").expect("valid heading regex"));
static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)(\d+)\.\s+(.+)").expect("valid numbered regex"));
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[-*]\s+(.+)").expect("valid bullet regex"));
static CHECKBOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[ x/]\]\s*").expect("valid checkbox regex"));
static SEPARATOR_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-:]+$").expect("valid separator regex"));

const FENCE: &str = "```";

/// The scanner's buffering state. Only one multi-line block can be open.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum ScannerMode {
    #[default]
    Normal,
    /// Inside a fence; raw lines collected so far.
    InCodeBlock(Vec<String>),
    InTable {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Cleaned `>` lines collected so far.
    InBlockquote(Vec<String>),
}

impl ScannerMode {
    /// Turn the open buffer into its block, if there is one.
    fn into_block(self) -> Option<Block> {
        match self {
            Self::Normal => None,
            Self::InCodeBlock(lines) => Some(Block::CodeBlock { lines }),
            Self::InTable { headers, rows } => Some(Block::Table { headers, rows }),
            Self::InBlockquote(lines) => Some(Block::Blockquote {
                text: lines.join(" "),
            }),
        }
    }
}

/// Lazy block sequence over an ordered sequence of lines.
///
/// ```ignore
/// for block in BlockScanner::new(markdown.lines()) {
///     renderer.render(&block);
/// }
/// ```
pub struct BlockScanner<I> {
    lines: I,
    mode: ScannerMode,
    /// Blocks classified but not yet yielded. One line can finish a buffered
    /// block and produce a new one, so this holds at most two.
    pending: VecDeque<Block>,
    line_no: usize,
    done: bool,
}

impl<I, S> BlockScanner<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub fn new(lines: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            lines: lines.into_iter(),
            mode: ScannerMode::Normal,
            pending: VecDeque::with_capacity(2),
            line_no: 0,
            done: false,
        }
    }

    /// The current buffering state.
    pub fn mode(&self) -> &ScannerMode {
        &self.mode
    }

    /// Close whatever buffer is open and queue its block.
    fn flush(&mut self) {
        if let Some(block) = std::mem::take(&mut self.mode).into_block() {
            trace!(kind = block.kind(), line = self.line_no, "flushed buffered block");
            self.pending.push_back(block);
        }
    }

    fn emit(&mut self, block: Block) {
        self.pending.push_back(block);
    }

    /// Classify one physical line.
    fn feed(&mut self, line: &str) {
        self.line_no += 1;
        let trimmed = line.trim();

        // Rule 1: fences toggle code mode, and nothing else applies inside.
        if trimmed.starts_with(FENCE) {
            self.toggle_fence();
            return;
        }
        if let ScannerMode::InCodeBlock(buffer) = &mut self.mode {
            buffer.push(line.to_owned());
            return;
        }

        // Rule 2: blank lines only separate.
        if trimmed.is_empty() {
            self.flush();
            return;
        }

        // Rule 3: blockquote lines.
        if let Some(marker) = trimmed.strip_prefix('>') {
            self.quote_line(marker);
            return;
        }
        if matches!(self.mode, ScannerMode::InBlockquote(_)) {
            self.flush();
        }

        // Rule 4: pipe rows.
        if line.contains('|') && !trimmed.starts_with('#') {
            self.table_line(line);
            return;
        }
        if matches!(self.mode, ScannerMode::InTable { .. }) {
            self.flush();
        }

        // Rules 5 to 9: single-line blocks.
        if let Some(block) = classify_single_line(line, trimmed) {
            self.emit(block);
        }
    }

    fn toggle_fence(&mut self) {
        match std::mem::take(&mut self.mode) {
            ScannerMode::InCodeBlock(lines) => {
                debug!(lines = lines.len(), line = self.line_no, "code fence closed");
                self.emit(Block::CodeBlock { lines });
            }
            open => {
                self.mode = open;
                self.flush();
                self.mode = ScannerMode::InCodeBlock(Vec::new());
            }
        }
    }

    fn quote_line(&mut self, after_marker: &str) {
        let content = clean_inline(after_marker.trim_start());
        match &mut self.mode {
            ScannerMode::InBlockquote(buffer) => {
                if !content.is_empty() {
                    buffer.push(content);
                }
            }
            _ => {
                self.flush();
                if !content.is_empty() {
                    self.mode = ScannerMode::InBlockquote(vec![content]);
                }
            }
        }
    }

    fn table_line(&mut self, line: &str) {
        let fields: Vec<&str> = line
            .split('|')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .collect();

        if fields.iter().all(|field| SEPARATOR_CELL.is_match(field)) {
            trace!(line = self.line_no, "table separator row skipped");
            return;
        }

        let cells: Vec<String> = fields.into_iter().map(clean_inline).collect();
        match &mut self.mode {
            ScannerMode::InTable { rows, .. } => rows.push(cells),
            _ => {
                self.mode = ScannerMode::InTable {
                    headers: cells,
                    rows: Vec::new(),
                };
            }
        }
    }

    /// End of input: release whatever is still buffered.
    fn finish(&mut self) {
        if let ScannerMode::InCodeBlock(lines) = &self.mode {
            warn!(
                lines = lines.len(),
                "code fence never closed; remaining lines kept as code"
            );
        }
        self.flush();
        self.done = true;
    }
}

impl<I, S> Iterator for BlockScanner<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        loop {
            if let Some(block) = self.pending.pop_front() {
                return Some(block);
            }
            if self.done {
                return None;
            }
            match self.lines.next() {
                Some(line) => self.feed(line.as_ref()),
                None => self.finish(),
            }
        }
    }
}

/// Scan a whole document held in memory.
pub fn scan(text: &str) -> BlockScanner<std::str::Lines<'_>> {
    BlockScanner::new(text.lines())
}

/// Rules 5 to 9, in precedence order.
fn classify_single_line(line: &str, trimmed: &str) -> Option<Block> {
    if HORIZONTAL_RULE.is_match(trimmed) {
        return Some(Block::HorizontalRule);
    }

    if let Some(caps) = HEADING.captures(line) {
        return Some(Block::Heading {
            level: caps[1].len() as u8,
            text: clean_inline(&caps[2]),
        });
    }

    if let Some(caps) = NUMBERED.captures(line) {
        return Some(Block::NumberedItem {
            number: caps[2].to_owned(),
            indent_units: caps[1].chars().count(),
            text: clean_inline(&caps[3]),
        });
    }

    if let Some(caps) = BULLET.captures(line) {
        let text = clean_inline(&caps[2]);
        let text = CHECKBOX.replace(&text, "").into_owned();
        return Some(Block::BulletItem {
            indent_units: caps[1].chars().count(),
            text,
        });
    }

    let text = clean_inline(line);
    (!text.is_empty()).then_some(Block::Paragraph { text })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(text: &str) -> Vec<Block> {
        scan(text).collect()
    }

    fn paragraph(text: &str) -> Block {
        Block::Paragraph { text: text.into() }
    }

    #[test]
    fn heading_levels_and_cleanup() {
        assert_eq!(
            blocks("## Scope"),
            vec![Block::Heading {
                level: 2,
                text: "Scope".into()
            }]
        );
        assert_eq!(
            blocks("#### **Bold** *and* italic"),
            vec![Block::Heading {
                level: 4,
                text: "Bold and italic".into()
            }]
        );
    }

    #[test]
    fn five_hashes_is_not_a_heading() {
        assert_eq!(blocks("##### deep"), vec![paragraph("##### deep")]);
    }

    #[test]
    fn checkbox_bullets_lose_their_marker() {
        assert_eq!(
            blocks("- [x] Done task\n- [ ] Open task\n* [/] Half task"),
            vec![
                Block::BulletItem {
                    indent_units: 0,
                    text: "Done task".into()
                },
                Block::BulletItem {
                    indent_units: 0,
                    text: "Open task".into()
                },
                Block::BulletItem {
                    indent_units: 0,
                    text: "Half task".into()
                },
            ]
        );
    }

    #[test]
    fn list_indentation_is_counted() {
        assert_eq!(
            blocks("  - nested\n    12. deeper"),
            vec![
                Block::BulletItem {
                    indent_units: 2,
                    text: "nested".into()
                },
                Block::NumberedItem {
                    number: "12".into(),
                    indent_units: 4,
                    text: "deeper".into()
                },
            ]
        );
    }

    #[test]
    fn numbers_are_kept_verbatim() {
        let out = blocks("1. one\n1. again\n007. bond");
        let numbers: Vec<&str> = out
            .iter()
            .map(|b| match b {
                Block::NumberedItem { number, .. } => number.as_str(),
                other => panic!("unexpected block {other:?}"),
            })
            .collect();
        assert_eq!(numbers, vec!["1", "1", "007"]);
    }

    #[test]
    fn rule_wins_over_bullet() {
        assert_eq!(blocks("---\n - item"), vec![
            Block::HorizontalRule,
            Block::BulletItem {
                indent_units: 1,
                text: "item".into()
            }
        ]);
    }

    #[test]
    fn code_block_keeps_lines_verbatim() {
        let out = blocks("```rust\n  let x = **1**;\n\n> not a quote\n```\nafter");
        assert_eq!(
            out,
            vec![
                Block::CodeBlock {
                    lines: vec![
                        "  let x = **1**;".into(),
                        "".into(),
                        "> not a quote".into()
                    ]
                },
                paragraph("after"),
            ]
        );
    }

    #[test]
    fn unclosed_fence_swallows_the_rest() {
        let out = blocks("intro\n```\n# heading\n| a | b |\n\n- item");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], paragraph("intro"));
        assert_eq!(
            out[1],
            Block::CodeBlock {
                lines: vec!["# heading".into(), "| a | b |".into(), "".into(), "- item".into()]
            }
        );
    }

    #[test]
    fn blockquote_lines_are_joined() {
        let out = blocks("> first **line**\n>\n>   second line\n\nnext");
        assert_eq!(
            out,
            vec![
                Block::Blockquote {
                    text: "first line second line".into()
                },
                paragraph("next"),
            ]
        );
    }

    #[test]
    fn blockquote_flushes_on_foreign_line() {
        let out = blocks("> quote\nplain");
        assert_eq!(
            out,
            vec![
                Block::Blockquote {
                    text: "quote".into()
                },
                paragraph("plain")
            ]
        );
    }

    #[test]
    fn table_with_separator() {
        let out = blocks("| Name | Role |\n|:---|---:|\n| Ada | `eng` |\n| Linus | ops |\n\nafter");
        assert_eq!(
            out,
            vec![
                Block::Table {
                    headers: vec!["Name".into(), "Role".into()],
                    rows: vec![
                        vec!["Ada".into(), "eng".into()],
                        vec!["Linus".into(), "ops".into()]
                    ],
                },
                paragraph("after"),
            ]
        );
    }

    #[test]
    fn separator_never_becomes_a_row() {
        let out = blocks("|---|---|\n| a | b |\n|---|---|\n| c | d |");
        assert_eq!(
            out,
            vec![Block::Table {
                headers: vec!["a".into(), "b".into()],
                rows: vec![vec!["c".into(), "d".into()]],
            }]
        );
    }

    #[test]
    fn table_closes_on_non_pipe_line() {
        let out = blocks("| a |\n| b |\n## Next");
        assert_eq!(
            out,
            vec![
                Block::Table {
                    headers: vec!["a".into()],
                    rows: vec![vec!["b".into()]],
                },
                Block::Heading {
                    level: 2,
                    text: "Next".into()
                },
            ]
        );
    }

    #[test]
    fn heading_with_pipe_is_a_heading() {
        assert_eq!(
            blocks("# In | Out"),
            vec![Block::Heading {
                level: 1,
                text: "In | Out".into()
            }]
        );
    }

    #[test]
    fn fence_flushes_open_table() {
        let out = blocks("| a | b |\n```\ncode\n```");
        assert_eq!(
            out,
            vec![
                Block::Table {
                    headers: vec!["a".into(), "b".into()],
                    rows: vec![],
                },
                Block::CodeBlock {
                    lines: vec!["code".into()]
                },
            ]
        );
    }

    #[test]
    fn quote_flushes_open_table() {
        let out = blocks("| a |\n> said");
        assert_eq!(
            out,
            vec![
                Block::Table {
                    headers: vec!["a".into()],
                    rows: vec![],
                },
                Block::Blockquote {
                    text: "said".into()
                },
            ]
        );
    }

    #[test]
    fn end_of_input_flushes_buffers() {
        assert_eq!(
            blocks("> trailing quote"),
            vec![Block::Blockquote {
                text: "trailing quote".into()
            }]
        );
        assert_eq!(
            blocks("| x |"),
            vec![Block::Table {
                headers: vec!["x".into()],
                rows: vec![],
            }]
        );
    }

    #[test]
    fn no_text_line_is_lost() {
        let source = "# Title\n\nIntro **text**.\n- bullet one\n2. second\n> quoted\n\n| h1 | h2 |\n| c1 | c2 |\n\n```\nraw `code`\n```\n---\nclosing";
        let out = blocks(source);
        let emitted: Vec<&str> = out.iter().flat_map(|b| b.text_fragments()).collect();
        let joined = emitted.join(" ");
        for word in [
            "Title", "Intro", "text.", "bullet", "one", "second", "quoted", "h1", "h2", "c1",
            "c2", "raw `code`", "closing",
        ] {
            assert!(joined.contains(word), "lost {word:?} in {joined:?}");
        }
        assert!(out.contains(&Block::HorizontalRule));
    }

    #[test]
    fn blank_lines_produce_nothing() {
        assert!(blocks("\n   \n\t\n").is_empty());
    }

    #[test]
    fn scanner_is_lazy() {
        let mut scanner = BlockScanner::new(["```", "a"].into_iter());
        assert_eq!(scanner.mode(), &ScannerMode::Normal);
        assert_eq!(
            scanner.next(),
            Some(Block::CodeBlock {
                lines: vec!["a".into()]
            })
        );
        assert_eq!(scanner.next(), None);
        assert_eq!(scanner.next(), None);
    }

    #[test]
    fn crlf_input_is_handled() {
        assert_eq!(
            blocks("# Title\r\n\r\nbody\r\n"),
            vec![
                Block::Heading {
                    level: 1,
                    text: "Title".into()
                },
                paragraph("body"),
            ]
        );
    }
}
