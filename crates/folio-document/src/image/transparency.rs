// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background removal — clears every pixel close to the top-left corner colour
// so logos and diagrams can sit on any page background.

use std::path::Path;

use folio_core::TransparencyConfig;
use folio_core::error::{FolioError, Result};
use image::{ImageFormat, Rgba, RgbaImage};
use tracing::{debug, info, instrument};

/// Colour written over cleared pixels.
pub const CLEARED: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// What a background removal pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundReport {
    /// Sampled background colour; `None` for an empty image.
    pub background: Option<Rgba<u8>>,
    pub cleared: u64,
    pub total: u64,
}

/// Makes near-background pixels transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundRemover {
    tolerance: u8,
}

impl BackgroundRemover {
    pub fn new(tolerance: u8) -> Self {
        Self { tolerance }
    }

    pub fn from_config(config: &TransparencyConfig) -> Self {
        Self::new(config.tolerance)
    }

    pub fn tolerance(&self) -> u8 {
        self.tolerance
    }

    /// Whether `pixel` is within tolerance of `background` on every channel.
    pub fn matches(&self, background: Rgba<u8>, pixel: Rgba<u8>) -> bool {
        background.0[..3]
            .iter()
            .zip(&pixel.0[..3])
            .all(|(bg, px)| bg.abs_diff(*px) < self.tolerance)
    }

    /// Clear the background of `image` in place.
    pub fn apply(&self, image: &mut RgbaImage) -> BackgroundReport {
        let total = u64::from(image.width()) * u64::from(image.height());
        if total == 0 {
            return BackgroundReport {
                background: None,
                cleared: 0,
                total,
            };
        }

        let background = *image.get_pixel(0, 0);
        let mut cleared = 0u64;
        for pixel in image.pixels_mut() {
            if self.matches(background, *pixel) {
                *pixel = CLEARED;
                cleared += 1;
            }
        }
        debug!(?background, cleared, total, "background cleared");
        BackgroundReport {
            background: Some(background),
            cleared,
            total,
        }
    }

    /// Load the image at `path`, clear its background and overwrite it as PNG.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), tolerance = self.tolerance))]
    pub fn process_file(&self, path: impl AsRef<Path>) -> Result<BackgroundReport> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|err| {
            FolioError::ImageError(format!("failed to open {}: {}", path.display(), err))
        })?;
        let mut rgba = decoded.to_rgba8();
        let report = self.apply(&mut rgba);

        rgba.save_with_format(path, ImageFormat::Png).map_err(|err| {
            FolioError::ImageError(format!("failed to write {}: {}", path.display(), err))
        })?;
        info!(
            cleared = report.cleared,
            total = report.total,
            "Wrote transparent PNG to {}",
            path.display()
        );
        Ok(report)
    }
}

impl Default for BackgroundRemover {
    fn default() -> Self {
        Self::from_config(&TransparencyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logo() -> RgbaImage {
        // White canvas with a near-white speck and a dark square.
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 0, Rgba([240, 250, 235, 255]));
        for (x, y) in [(2, 2), (2, 3), (3, 2), (3, 3)] {
            img.put_pixel(x, y, Rgba([20, 30, 40, 255]));
        }
        img
    }

    #[test]
    fn clears_pixels_near_background() {
        let mut img = logo();
        let report = BackgroundRemover::default().apply(&mut img);
        assert_eq!(report.background, Some(Rgba([255, 255, 255, 255])));
        assert_eq!(report.total, 16);
        assert_eq!(report.cleared, 12);
        assert_eq!(*img.get_pixel(1, 0), CLEARED);
        assert_eq!(*img.get_pixel(2, 2), Rgba([20, 30, 40, 255]));
    }

    #[test]
    fn tolerance_is_strict() {
        let remover = BackgroundRemover::new(30);
        let bg = Rgba([100, 100, 100, 255]);
        assert!(remover.matches(bg, Rgba([129, 71, 100, 255])));
        assert!(!remover.matches(bg, Rgba([130, 100, 100, 255])));
        assert!(!remover.matches(bg, Rgba([100, 100, 70, 255])));
    }

    #[test]
    fn alpha_is_ignored_when_matching() {
        let remover = BackgroundRemover::new(5);
        assert!(remover.matches(Rgba([9, 9, 9, 255]), Rgba([9, 9, 9, 0])));
    }

    #[test]
    fn zero_tolerance_clears_nothing() {
        let mut img = logo();
        let report = BackgroundRemover::new(0).apply(&mut img);
        assert_eq!(report.cleared, 0);
        assert_eq!(img, logo());
    }

    #[test]
    fn empty_image_is_unchanged() {
        let mut img = RgbaImage::new(0, 0);
        let report = BackgroundRemover::default().apply(&mut img);
        assert_eq!(report.background, None);
        assert_eq!(report.total, 0);
    }

    #[test]
    fn process_file_overwrites_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        logo().save(&path).unwrap();

        let report = BackgroundRemover::default().process_file(&path).unwrap();
        assert_eq!(report.cleared, 12);

        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(*reloaded.get_pixel(0, 0), CLEARED);
        assert_eq!(*reloaded.get_pixel(3, 3), Rgba([20, 30, 40, 255]));
    }

    #[test]
    fn unreadable_file_is_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        std::fs::write(&path, b"plain text").unwrap();
        let err = BackgroundRemover::default().process_file(&path).unwrap_err();
        assert!(matches!(err, FolioError::ImageError(_)));
    }
}
