// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render and image-tool configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::types::{PaperSize, Palette};

/// Running header spacing, table header band and one table row, in mm.
pub const MIN_CONTENT_HEIGHT_MM: f32 = 4.0 + 7.0 + 6.0;

/// Page geometry, decoration and colours for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Paper size for every page.
    pub paper_size: PaperSize,
    /// Left, right and top margin in mm.
    pub margin_mm: f32,
    /// Distance from the bottom edge at which content breaks to a new page.
    pub bottom_margin_mm: f32,
    /// Running header text and PDF title.
    pub title: Option<String>,
    /// First page (1-based) that carries the running header.
    pub header_from_page: usize,
    /// Print the page number in the footer of every page.
    pub page_numbers: bool,
    pub palette: Palette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::Letter,
            margin_mm: 20.0,
            bottom_margin_mm: 25.0,
            title: None,
            header_from_page: 2,
            page_numbers: true,
            palette: Palette::default(),
        }
    }
}

impl RenderConfig {
    /// Parse a JSON configuration. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Reject geometry that leaves no room for content: the page must hold the
    /// running header, a table header and one table row.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.paper_size.dimensions_mm();
        if self.margin_mm < 0.0 || self.bottom_margin_mm < 0.0 {
            return Err(FolioError::Config("margins must not be negative".into()));
        }
        if 2.0 * self.margin_mm >= width as f32 {
            return Err(FolioError::Config(format!(
                "margin {}mm leaves no width on a {}mm page",
                self.margin_mm, width
            )));
        }
        let content_height = height as f32 - self.margin_mm - self.bottom_margin_mm;
        if content_height < MIN_CONTENT_HEIGHT_MM {
            return Err(FolioError::Config(format!(
                "margins leave {content_height}mm of a {height}mm page; at least {MIN_CONTENT_HEIGHT_MM}mm is needed"
            )));
        }
        Ok(())
    }
}

/// Settings for the background-removal tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransparencyConfig {
    /// Per-channel distance (exclusive) from the background colour that still
    /// counts as background.
    pub tolerance: u8,
}

impl Default for TransparencyConfig {
    fn default() -> Self {
        Self { tolerance: 30 }
    }
}
