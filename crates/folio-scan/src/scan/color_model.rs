// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colour appearance model — a normalized joint HLS histogram built from a
// reference swatch of the page colour.

use folio_core::config::MAX_BINS;
use folio_core::error::{FolioError, Result};
use folio_core::types::Stage;
use image::{DynamicImage, RgbImage};
use tracing::{debug, info, instrument};

use super::hls::{color_pixels, rgb_to_hls};

/// Joint hue/lightness/saturation histogram normalized to unit L2 norm.
///
/// Each channel's [0, 255] range is split into `num_bins` equal-width bins;
/// a cell holds the relative weight of reference pixels falling into that
/// (hue, lightness, saturation) triple. Every weight lies in [0, 1].
/// Immutable once built, so one model can serve many segmentations.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorModel {
    num_bins: u16,
    weights: Vec<f32>,
}

impl ColorModel {
    // -- Construction ---------------------------------------------------------

    /// Build a model from a decoded reference image.
    ///
    /// Fails with an input error if the reference is empty or has no colour
    /// channels.
    #[instrument(skip(reference), fields(width = reference.width(), height = reference.height()))]
    pub fn from_reference(reference: &DynamicImage, num_bins: u16) -> Result<Self> {
        let rgb = color_pixels(reference, Stage::ColorModel)?;
        Self::from_rgb(&rgb, num_bins)
    }

    /// Build a model from RGB reference pixels.
    #[instrument(skip(reference), fields(width = reference.width(), height = reference.height()))]
    pub fn from_rgb(reference: &RgbImage, num_bins: u16) -> Result<Self> {
        if reference.width() == 0 || reference.height() == 0 {
            return Err(FolioError::input(
                Stage::ColorModel,
                "reference image has zero pixels",
            ));
        }
        if num_bins == 0 || num_bins > MAX_BINS {
            return Err(FolioError::InvalidConfig {
                parameter: "num_bins",
                value: num_bins.to_string(),
                reason: "must be between 1 and 64",
            });
        }

        let bins = num_bins as usize;
        let mut counts = vec![0u64; bins * bins * bins];
        for pixel in reference.pixels() {
            let [h, l, s] = rgb_to_hls(pixel.0);
            let idx = cell_index(bins, bin_of(h, bins), bin_of(l, bins), bin_of(s, bins));
            counts[idx] += 1;
        }

        let norm = counts
            .iter()
            .map(|&c| (c as f64) * (c as f64))
            .sum::<f64>()
            .sqrt();
        let weights: Vec<f32> = counts
            .iter()
            .map(|&c| ((c as f64) / norm).min(1.0) as f32)
            .collect();

        let occupied = counts.iter().filter(|&&c| c > 0).count();
        debug!(occupied, cells = counts.len(), "Histogram accumulated");
        info!(num_bins, "Colour model built");

        Ok(Self { num_bins, weights })
    }

    // -- Accessors ------------------------------------------------------------

    /// Bins per channel.
    pub fn num_bins(&self) -> u16 {
        self.num_bins
    }

    /// All cell weights, hue-major then lightness then saturation.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight of the cell at the given bin coordinates, or `None` when any
    /// coordinate is outside `0..num_bins`.
    pub fn weight(&self, hue_bin: usize, lightness_bin: usize, saturation_bin: usize) -> Option<f32> {
        let bins = self.num_bins as usize;
        if hue_bin >= bins || lightness_bin >= bins || saturation_bin >= bins {
            return None;
        }
        self.weights
            .get(cell_index(bins, hue_bin, lightness_bin, saturation_bin))
            .copied()
    }

    /// Bin that an 8-bit channel value falls into. 255 lands in the last bin.
    pub fn bin(&self, value: u8) -> usize {
        bin_of(value, self.num_bins as usize)
    }

    // -- Back-projection ------------------------------------------------------

    /// Likelihood of an 8-bit HLS triple, scaled to [0, 255].
    pub fn likelihood(&self, hls: [u8; 3]) -> u8 {
        let weight = self
            .weight(self.bin(hls[0]), self.bin(hls[1]), self.bin(hls[2]))
            .unwrap_or(0.0);
        (weight * 255.0).round().clamp(0.0, 255.0) as u8
    }
}

fn bin_of(value: u8, bins: usize) -> usize {
    ((value as usize * bins) / 255).min(bins - 1)
}

fn cell_index(bins: usize, hue_bin: usize, lightness_bin: usize, saturation_bin: usize) -> usize {
    (hue_bin * bins + lightness_bin) * bins + saturation_bin
}
