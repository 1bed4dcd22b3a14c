// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Folio: paper sizes and the colour palette.

use serde::{Deserialize, Serialize};

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    #[default]
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Tabloid => (279, 432),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

impl std::str::FromStr for PaperSize {
    type Err = String;

    /// Parse a paper keyword (`a4`, `letter`, ...) or `WIDTHxHEIGHT` in mm.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "a3" => Ok(Self::A3),
            "a5" => Ok(Self::A5),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            "tabloid" => Ok(Self::Tabloid),
            other => {
                let (w, h) = other
                    .split_once('x')
                    .ok_or_else(|| format!("unknown paper size: {s}"))?;
                let width_mm = w.trim().parse().map_err(|_| format!("bad width in {s}"))?;
                let height_mm = h.trim().parse().map_err(|_| format!("bad height in {s}"))?;
                Ok(Self::Custom {
                    width_mm,
                    height_mm,
                })
            }
        }
    }
}

/// An 8-bit-per-channel RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Channels scaled to `0.0..=1.0`, the form PDF colour operators take.
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

/// Every colour the renderer uses, grouped by role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Level 1 and 2 headings.
    pub navy: Rgb,
    /// Heading accent rule and blockquote bar.
    pub accent: Rgb,
    /// Level 3 headings and blockquote text.
    pub dark_blue: Rgb,
    /// Level 4 headings.
    pub slate: Rgb,
    /// Body text.
    pub body: Rgb,
    /// Blockquote background.
    pub light_bg: Rgb,
    /// Table header fill.
    pub table_header: Rgb,
    /// Alternate table row fill.
    pub table_alt: Rgb,
    /// Running header and footer text.
    pub gray: Rgb,
    /// Divider beneath level 2 headings.
    pub divider: Rgb,
    pub code_block_bg: Rgb,
    pub code_block_fg: Rgb,
    /// Horizontal rules.
    pub rule: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            navy: Rgb(22, 33, 62),
            accent: Rgb(159, 160, 206),
            dark_blue: Rgb(44, 62, 107),
            slate: Rgb(74, 85, 104),
            body: Rgb(26, 26, 46),
            light_bg: Rgb(244, 245, 251),
            table_header: Rgb(44, 62, 107),
            table_alt: Rgb(248, 249, 252),
            gray: Rgb(120, 120, 140),
            divider: Rgb(220, 220, 230),
            code_block_bg: Rgb(30, 30, 46),
            code_block_fg: Rgb(205, 214, 244),
            rule: Rgb(216, 218, 232),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_keywords_parse_case_insensitively() {
        assert_eq!("A4".parse::<PaperSize>(), Ok(PaperSize::A4));
        assert_eq!("letter".parse::<PaperSize>(), Ok(PaperSize::Letter));
    }

    #[test]
    fn custom_paper_parses_width_by_height() {
        assert_eq!(
            "100x150".parse::<PaperSize>(),
            Ok(PaperSize::Custom {
                width_mm: 100,
                height_mm: 150
            })
        );
        assert!("huge".parse::<PaperSize>().is_err());
        assert!("10xabc".parse::<PaperSize>().is_err());
    }

    #[test]
    fn unit_channels() {
        let (r, g, b) = Rgb(255, 0, 51).to_unit();
        assert_eq!(r, 1.0);
        assert_eq!(g, 0.0);
        assert!((b - 0.2).abs() < 1e-6);
    }
}
