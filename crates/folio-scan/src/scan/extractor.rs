// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page extraction pipeline — colour model → segmentation → quadrangle →
// page mask → rectification, configured by a single `PipelineConfig`.

use std::path::Path;

use folio_core::PipelineConfig;
use folio_core::error::Result;
use folio_core::types::{Quadrangle, Stage};
use image::{DynamicImage, GrayImage, RgbImage};
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::image::processor::ImageProcessor;

use super::color_model::ColorModel;
use super::hls::color_pixels;
use super::mask::{apply_mask, page_mask};
use super::quadrangle::extract_quadrangle;
use super::rectify::Rectifier;
use super::segment::Segmenter;

/// Everything one extraction produced.
#[derive(Debug, Clone)]
pub struct PageExtraction {
    /// Back-projected model likelihood.
    pub likelihood: GrayImage,
    /// Thresholded, closed foreground mask.
    pub mask: GrayImage,
    /// Page corners used for masking and rectification.
    pub quadrangle: Quadrangle,
    /// Whether `quadrangle` is the bounding-box substitute for a degenerate
    /// extremal quadrangle.
    pub bounding_box_fallback: bool,
    /// Filled quadrangle, when page masking is enabled.
    pub page_mask: Option<GrayImage>,
    /// The deskewed page, when rectification is enabled.
    pub page: Option<RgbImage>,
}

/// Locates and deskews pages whose colour matches a reference swatch.
///
/// The colour model is built once and only read afterwards, so one extractor
/// can process any number of targets, including in parallel via
/// [`PageExtractor::extract_batch`].
///
/// ```ignore
/// let extractor = PageExtractor::open("swatch.png", PipelineConfig::default())?;
/// let result = extractor.extract_path("BookView09.JPG")?;
/// ImageProcessor::from_rgb(result.page.unwrap()).save("page.png")?;
/// ```
#[derive(Debug, Clone)]
pub struct PageExtractor {
    model: ColorModel,
    config: PipelineConfig,
}

impl PageExtractor {
    // -- Construction ---------------------------------------------------------

    /// Validate `config` and build the colour model from a decoded reference.
    #[instrument(skip_all)]
    pub fn new(reference: &DynamicImage, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let model = ColorModel::from_reference(reference, config.num_bins)?;
        Ok(Self { model, config })
    }

    /// Load the reference swatch from a file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: PipelineConfig) -> Result<Self> {
        let reference = ImageProcessor::open(path)?;
        Self::new(reference.as_dynamic(), config)
    }

    /// Reuse an existing colour model. `config.num_bins` is ignored in favour
    /// of the model's own bin count.
    pub fn from_model(model: ColorModel, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { model, config })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn model(&self) -> &ColorModel {
        &self.model
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // -- Extraction -----------------------------------------------------------

    /// Run the full pipeline on one decoded target.
    ///
    /// 1. Segment the target against the colour model
    /// 2. Reduce the mask to its extremal quadrangle, substituting the
    ///    foreground bounding box for a degenerate one if configured
    /// 3. Optionally black out everything outside the quadrangle
    /// 4. Optionally warp the quadrangle onto its output canvas
    #[instrument(skip_all, fields(width = target.width(), height = target.height()))]
    pub fn extract(&self, target: &DynamicImage) -> Result<PageExtraction> {
        let rgb = color_pixels(target, Stage::Segmentation)?;

        let segmentation = Segmenter::new(&self.model, &self.config).segment_rgb(&rgb)?;
        let extremes = extract_quadrangle(&segmentation.mask)?;

        let (quadrangle, bounding_box_fallback) =
            if extremes.is_degenerate() && self.config.bounding_box_fallback {
                let bbox = extremes.bounding_box();
                warn!(
                    top = %extremes.top,
                    bottom = %extremes.bottom,
                    left = %extremes.left,
                    right = %extremes.right,
                    "Extremal quadrangle is degenerate; using the foreground bounding box"
                );
                (bbox, true)
            } else {
                (extremes, false)
            };

        let filled = self
            .config
            .mask_page
            .then(|| page_mask(rgb.width(), rgb.height(), &quadrangle));

        let page = if self.config.rectify {
            let source = match &filled {
                Some(mask) => apply_mask(&rgb, mask)?,
                None => rgb,
            };
            Some(Rectifier::new(self.config.interpolation).rectify(&source, &quadrangle)?)
        } else {
            None
        };

        info!(
            top = %quadrangle.top,
            right = %quadrangle.right,
            bottom = %quadrangle.bottom,
            left = %quadrangle.left,
            rectified = page.is_some(),
            "Page extracted"
        );

        Ok(PageExtraction {
            likelihood: segmentation.likelihood,
            mask: segmentation.mask,
            quadrangle,
            bounding_box_fallback,
            page_mask: filled,
            page,
        })
    }

    /// Load a target from a file and extract its page.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn extract_path(&self, path: impl AsRef<Path>) -> Result<PageExtraction> {
        let target = ImageProcessor::open(path)?;
        self.extract(target.as_dynamic())
    }

    /// Extract every target in parallel. Results keep the input order and
    /// each target succeeds or fails independently.
    #[instrument(skip_all, fields(count = targets.len()))]
    pub fn extract_batch(&self, targets: &[DynamicImage]) -> Vec<Result<PageExtraction>> {
        let results: Vec<Result<PageExtraction>> =
            targets.par_iter().map(|target| self.extract(target)).collect();
        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(total = results.len(), failed, "Batch extraction complete");
        results
    }
}
