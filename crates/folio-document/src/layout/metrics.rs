// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Glyph widths for the PDF base-14 fonts used by the renderer, and a
// measured word wrapper built on them.
//
// Widths are the Adobe AFM advance widths in 1/1000 em for the printable
// ASCII range. Accented Latin-1 letters take the width of their base letter;
// anything else above 0x7E falls back to an average width. The oblique faces
// share the upright metrics.

use super::surface::{Font, FontFamily};

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const COURIER_WIDTH: u16 = 600;
const FALLBACK_WIDTH: u16 = 556;

/// Advance width of `ch` in 1/1000 em.
fn glyph_width(font: Font, ch: char) -> u16 {
    if font.family == FontFamily::Courier {
        return COURIER_WIDTH;
    }
    let table = if font.style.is_bold() {
        &HELVETICA_BOLD
    } else {
        &HELVETICA
    };
    match u32::from(ch) {
        code @ 0x20..=0x7E => table[(code - 0x20) as usize],
        // Tabs and other controls measure as a space.
        0x00..=0x1F => table[0],
        _ => base_letter(ch)
            .map_or(FALLBACK_WIDTH, |base| table[(u32::from(base) - 0x20) as usize]),
    }
}

/// ASCII letter whose advance width an accented Latin-1 letter shares.
fn base_letter(ch: char) -> Option<char> {
    let base = match ch {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ñ' => 'n',
        'ò'..='ö' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(base)
}

/// Width of `text` in millimetres when set in `font`.
pub fn text_width(font: Font, text: &str) -> f32 {
    let units: u32 = text.chars().map(|ch| u32::from(glyph_width(font, ch))).sum();
    units as f32 / 1000.0 * font.size / PT_PER_MM
}

/// Font size converted to millimetres.
pub fn font_size_mm(font: Font) -> f32 {
    font.size / PT_PER_MM
}

/// Break `text` into lines no wider than `max_width` mm.
///
/// Explicit newlines always break. Words wider than a whole line are split
/// between characters. Empty input yields a single empty line so callers can
/// rely on at least one line of height.
pub fn wrap_text(font: Font, text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let space = text_width(font, " ");

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in paragraph.split_whitespace() {
            let word_width = text_width(font, word);

            if word_width > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let (full, rest) = break_word(font, word, max_width);
                lines.extend(full);
                current_width = text_width(font, &rest);
                current = rest;
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if current_width + space + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_owned()));
                current_width = word_width;
            }
        }

        lines.push(current);
    }

    lines
}

/// Split an over-long word into full-width chunks plus the remainder.
fn break_word(font: Font, word: &str, max_width: f32) -> (Vec<String>, String) {
    let mut full = Vec::new();
    let mut chunk = String::new();
    let mut width = 0.0_f32;

    for ch in word.chars() {
        let ch_width = text_width(font, ch.encode_utf8(&mut [0; 4]));
        // Always keep one character per line so the loop makes progress.
        if width + ch_width > max_width && !chunk.is_empty() {
            full.push(std::mem::take(&mut chunk));
            width = 0.0;
        }
        chunk.push(ch);
        width += ch_width;
    }

    (full, chunk)
}
