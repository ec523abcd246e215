// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image boundary — decode reference and target photos, and encode or save
// rectified pages and diagnostic masks. Uses the `image` crate.

use std::path::Path;

use folio_core::error::{FolioError, Result};
use folio_core::types::Stage;
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use tracing::{debug, info, instrument};

/// A single decoded image at the edge of the pipeline.
///
/// ```ignore
/// let swatch = ImageProcessor::open("bluesample.png")?;
/// let extractor = PageExtractor::new(swatch.as_dynamic(), PipelineConfig::default())?;
/// ```
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    /// The decoded image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            FolioError::input(
                Stage::ImageIo,
                format!("failed to open {}: {}", path.as_ref().display(), err),
            )
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data).map_err(|err| {
            FolioError::input(Stage::ImageIo, format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Wrap a rectified page.
    pub fn from_rgb(image: RgbImage) -> Self {
        Self {
            image: DynamicImage::ImageRgb8(image),
        }
    }

    /// Wrap a likelihood map or mask.
    pub fn from_luma(image: GrayImage) -> Self {
        Self {
            image: DynamicImage::ImageLuma8(image),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| FolioError::ImageError(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Write the image to a file. The format is inferred from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.save(path.as_ref()).map_err(|err| {
            FolioError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn png_bytes_decode_back() {
        let page = RgbImage::from_pixel(7, 5, Rgb([12, 34, 56]));
        let bytes = ImageProcessor::from_rgb(page).to_png_bytes().unwrap();
        let decoded = ImageProcessor::from_bytes(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (7, 5));
        assert_eq!(decoded.into_dynamic().to_rgb8().get_pixel(6, 4).0, [12, 34, 56]);
    }

    #[test]
    fn garbage_bytes_are_an_input_error() {
        let err = ImageProcessor::from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, FolioError::Input { stage: Stage::ImageIo, .. }));
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageProcessor::open(dir.path().join("absent.png")).err().unwrap();
        assert_eq!(err.stage(), Stage::ImageIo);
    }

    #[test]
    fn mask_saves_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        let mut mask = GrayImage::new(4, 4);
        mask.put_pixel(2, 1, Luma([255]));
        ImageProcessor::from_luma(mask).save(&path).unwrap();

        let reopened = ImageProcessor::open(&path).unwrap().into_dynamic().to_luma8();
        assert_eq!(reopened.get_pixel(2, 1).0[0], 255);
        assert_eq!(reopened.get_pixel(0, 0).0[0], 0);
    }
}
