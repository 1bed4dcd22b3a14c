// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mapping onto the single-byte (Latin-1) output encoding used by the built-in
// PDF fonts.

/// What happens to one input character on its way to the output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoded {
    /// Representable as is.
    Keep(char),
    /// Not representable; written as this ASCII approximation.
    Replace(&'static str),
    /// Not representable and no approximation exists.
    Drop,
}

/// Approximations for the non-Latin-1 characters that turn up in technical
/// prose. Anything not listed here is dropped.
const SUBSTITUTIONS: &[(char, &str)] = &[
    ('\u{2014}', "-"),   // em dash
    ('\u{2013}', "-"),   // en dash
    ('\u{2018}', "'"),   // left single quote
    ('\u{2019}', "'"),   // right single quote
    ('\u{201C}', "\""),  // left double quote
    ('\u{201D}', "\""),  // right double quote
    ('\u{2022}', "-"),   // bullet
    ('\u{2192}', "->"),  // rightwards arrow
    ('\u{2026}', "..."), // ellipsis
    ('\u{2713}', "[x]"), // check mark
    ('\u{2717}', "[ ]"), // ballot x
];

/// Classify a single character.
///
/// The C1 control range 0x80-0x9F is dropped: those bytes are glyphs in the
/// fonts' WinAnsi encoding, not the control characters Latin-1 names.
pub fn encode_char(ch: char) -> Encoded {
    match u32::from(ch) {
        0x80..=0x9F => return Encoded::Drop,
        0x00..=0xFF => return Encoded::Keep(ch),
        _ => {}
    }
    SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == ch)
        .map_or(Encoded::Drop, |(_, to)| Encoded::Replace(*to))
}

/// Rewrite `text` so every character is representable in Latin-1.
pub fn to_latin1(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match encode_char(ch) {
            Encoded::Keep(c) => out.push(c),
            Encoded::Replace(s) => out.push_str(s),
            Encoded::Drop => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_is_kept() {
        assert_eq!(encode_char('a'), Encoded::Keep('a'));
        assert_eq!(encode_char('é'), Encoded::Keep('é'));
        assert_eq!(encode_char('\u{00FF}'), Encoded::Keep('\u{00FF}'));
    }

    #[test]
    fn known_symbols_are_substituted() {
        assert_eq!(encode_char('\u{2014}'), Encoded::Replace("-"));
        assert_eq!(encode_char('\u{2192}'), Encoded::Replace("->"));
        assert_eq!(
            to_latin1("\u{201C}done\u{201D} \u{2713} \u{2026}"),
            "\"done\" [x] ..."
        );
    }

    #[test]
    fn c1_controls_are_dropped() {
        assert_eq!(encode_char('\u{0085}'), Encoded::Drop);
        assert_eq!(to_latin1("a\u{0080}b\u{009F}c"), "abc");
        assert_eq!(encode_char('\u{00A0}'), Encoded::Keep('\u{00A0}'));
    }

    #[test]
    fn unknown_symbols_are_dropped() {
        assert_eq!(encode_char('\u{1F680}'), Encoded::Drop);
        assert_eq!(to_latin1("ship \u{1F680}it"), "ship it");
    }
}
