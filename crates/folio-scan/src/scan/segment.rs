// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Segmentation — histogram back-projection, binary thresholding and
// morphological closing.

use folio_core::PipelineConfig;
use folio_core::error::{FolioError, Result};
use folio_core::types::Stage;
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};
use tracing::{debug, info, instrument};

use super::color_model::ColorModel;
use super::hls::{color_pixels, rgb_to_hls};

/// Foreground value of a binary mask.
pub const FOREGROUND: u8 = 255;
/// Background value of a binary mask.
pub const BACKGROUND: u8 = 0;

/// Output of one segmentation run.
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Per-pixel model likelihood in [0, 255].
    pub likelihood: GrayImage,
    /// Thresholded and closed mask with values in {0, 255}.
    pub mask: GrayImage,
}

/// Separates page pixels from background using a [`ColorModel`].
#[derive(Debug, Clone, Copy)]
pub struct Segmenter<'m> {
    model: &'m ColorModel,
    threshold_cutoff: u8,
    morph_radius: u8,
    morph_iterations: u32,
}

impl<'m> Segmenter<'m> {
    /// Create a segmenter using the thresholding and closing parameters of
    /// `config`.
    pub fn new(model: &'m ColorModel, config: &PipelineConfig) -> Self {
        Self {
            model,
            threshold_cutoff: config.threshold_cutoff,
            morph_radius: config.morph_radius(),
            morph_iterations: config.morph_iterations,
        }
    }

    /// Segment a decoded target image.
    pub fn segment(&self, target: &DynamicImage) -> Result<Segmentation> {
        let rgb = color_pixels(target, Stage::Segmentation)?;
        self.segment_rgb(&rgb)
    }

    /// Segment RGB pixels. An empty target is an input error.
    #[instrument(skip(self, target), fields(width = target.width(), height = target.height()))]
    pub fn segment_rgb(&self, target: &RgbImage) -> Result<Segmentation> {
        if target.width() == 0 || target.height() == 0 {
            return Err(FolioError::input(
                Stage::Segmentation,
                format!("target is {}x{}", target.width(), target.height()),
            ));
        }
        let likelihood = back_project(self.model, target);
        let binary = threshold(&likelihood, self.threshold_cutoff);
        debug!(
            cutoff = self.threshold_cutoff,
            foreground = foreground_count(&binary),
            "Likelihood thresholded"
        );
        let mask = close(&binary, self.morph_radius, self.morph_iterations);
        info!(
            foreground = foreground_count(&mask),
            "Segmentation complete"
        );
        Ok(Segmentation { likelihood, mask })
    }
}

/// Look up every pixel's quantized HLS colour in `model`.
pub fn back_project(model: &ColorModel, target: &RgbImage) -> GrayImage {
    let mut out = GrayImage::new(target.width(), target.height());
    for (dst, src) in out.pixels_mut().zip(target.pixels()) {
        *dst = Luma([model.likelihood(rgb_to_hls(src.0))]);
    }
    out
}

/// Binary threshold: likelihoods strictly above `cutoff` become foreground.
pub fn threshold(likelihood: &GrayImage, cutoff: u8) -> GrayImage {
    let (width, height) = likelihood.dimensions();
    let mut output = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let val = likelihood.get_pixel(x, y).0[0];
            let binary = if val > cutoff { FOREGROUND } else { BACKGROUND };
            output.put_pixel(x, y, Luma([binary]));
        }
    }

    output
}

/// Morphological closing with a `(2 * radius + 1)` square element: the mask
/// is dilated `iterations` times, then eroded `iterations` times.
pub fn close(mask: &GrayImage, radius: u8, iterations: u32) -> GrayImage {
    let mut closed = mask.clone();
    for _ in 0..iterations {
        closed = dilate(&closed, Norm::LInf, radius);
    }
    for _ in 0..iterations {
        closed = erode(&closed, Norm::LInf, radius);
    }
    closed
}

/// Number of non-zero pixels.
pub fn foreground_count(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p.0[0] != BACKGROUND).count()
}
