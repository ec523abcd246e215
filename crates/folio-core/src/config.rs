// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::types::Interpolation;

/// Largest per-channel bin count accepted; the joint histogram holds
/// `num_bins^3` cells.
pub const MAX_BINS: u16 = 64;

/// Largest closing element accepted. Its radius stays below `u8::MAX`,
/// which morphology treats as "every pixel is within reach".
pub const MAX_KERNEL_SIZE: u32 = 509;

/// Tunable parameters for page extraction.
///
/// Every field has a default, so a JSON file only needs to name the values
/// it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Histogram bins per HLS channel.
    pub num_bins: u16,
    /// Likelihoods strictly above this value become foreground (legacy
    /// values: 25 or 123).
    pub threshold_cutoff: u8,
    /// Side of the square closing element. Must be odd.
    pub morph_kernel_size: u32,
    /// Closing iterations; 0 skips closing entirely.
    pub morph_iterations: u32,
    /// Resampling used by the rectifier.
    pub interpolation: Interpolation,
    /// Black out everything outside the page quadrangle before rectifying.
    pub mask_page: bool,
    /// Run the rectifier. When false only the masks and quadrangle are
    /// produced.
    pub rectify: bool,
    /// Replace a degenerate extremal quadrangle with the foreground bounding
    /// box instead of failing.
    pub bounding_box_fallback: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            num_bins: 10,
            threshold_cutoff: 25,
            morph_kernel_size: 5,
            morph_iterations: 1,
            interpolation: Interpolation::Bilinear,
            mask_page: true,
            rectify: true,
            bounding_box_fallback: true,
        }
    }
}

impl PipelineConfig {
    /// Check value ranges that the type system cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.num_bins == 0 || self.num_bins > MAX_BINS {
            return Err(FolioError::InvalidConfig {
                parameter: "num_bins",
                value: self.num_bins.to_string(),
                reason: "must be between 1 and 64",
            });
        }
        if self.morph_kernel_size % 2 == 0 {
            return Err(FolioError::InvalidConfig {
                parameter: "morph_kernel_size",
                value: self.morph_kernel_size.to_string(),
                reason: "must be odd",
            });
        }
        if self.morph_kernel_size > MAX_KERNEL_SIZE {
            return Err(FolioError::InvalidConfig {
                parameter: "morph_kernel_size",
                value: self.morph_kernel_size.to_string(),
                reason: "must not exceed 509",
            });
        }
        Ok(())
    }

    /// Radius of the closing element (`morph_kernel_size / 2`).
    pub fn morph_radius(&self) -> u8 {
        u8::try_from(self.morph_kernel_size / 2).unwrap_or(u8::MAX)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_legacy_pipeline() {
        let config = PipelineConfig::default();
        assert_eq!(config.num_bins, 10);
        assert_eq!(config.threshold_cutoff, 25);
        assert_eq!(config.morph_kernel_size, 5);
        assert_eq!(config.morph_iterations, 1);
        assert_eq!(config.morph_radius(), 2);
        assert_eq!(config.interpolation, Interpolation::Bilinear);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn even_kernel_is_rejected() {
        let config = PipelineConfig {
            morph_kernel_size: 4,
            ..PipelineConfig::default()
        };
        match config.validate() {
            Err(FolioError::InvalidConfig { parameter, .. }) => {
                assert_eq!(parameter, "morph_kernel_size")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn kernel_limit_keeps_radius_below_saturation() {
        let largest = PipelineConfig {
            morph_kernel_size: MAX_KERNEL_SIZE,
            ..PipelineConfig::default()
        };
        assert!(largest.validate().is_ok());
        assert_eq!(largest.morph_radius(), 254);

        let too_large = PipelineConfig {
            morph_kernel_size: MAX_KERNEL_SIZE + 2,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            too_large.validate(),
            Err(FolioError::InvalidConfig { parameter: "morph_kernel_size", .. })
        ));
    }

    #[test]
    fn zero_bins_are_rejected() {
        let config = PipelineConfig {
            num_bins: 0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "threshold_cutoff": 123, "interpolation": "nearest" }"#)
                .unwrap();
        assert_eq!(config.threshold_cutoff, 123);
        assert_eq!(config.interpolation, Interpolation::Nearest);
        assert_eq!(config.num_bins, 10);
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.json");
        let config = PipelineConfig {
            threshold_cutoff: 123,
            rectify: false,
            ..PipelineConfig::default()
        };
        config.to_json_file(&path).unwrap();
        let loaded = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn invalid_file_config_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "morph_kernel_size": 6 }"#).unwrap();
        assert!(matches!(
            PipelineConfig::from_json_file(&path),
            Err(FolioError::InvalidConfig { .. })
        ));
    }
}
