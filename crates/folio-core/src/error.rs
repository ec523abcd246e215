// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use thiserror::Error;

use crate::types::Stage;

/// Top-level error type for all Folio operations.
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Pipeline errors --
    #[error("{stage}: unusable input image: {reason}")]
    Input { stage: Stage, reason: String },

    #[error("segmentation produced no foreground pixels ({width}x{height} mask)")]
    EmptyRegion { width: u32, height: u32 },

    #[error("page quadrangle is degenerate: {0}")]
    DegenerateQuadrangle(String),

    #[error("computed output size {width}x{height} is not a usable canvas")]
    InvalidSize { width: i64, height: i64 },

    // -- Configuration --
    #[error("invalid configuration: {parameter} = {value} ({reason})")]
    InvalidConfig {
        parameter: &'static str,
        value: String,
        reason: &'static str,
    },

    // -- Image boundary --
    #[error("image encoding failed: {0}")]
    ImageError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FolioError {
    /// Shorthand for an [`FolioError::Input`] raised by `stage`.
    pub fn input(stage: Stage, reason: impl Into<String>) -> Self {
        Self::Input {
            stage,
            reason: reason.into(),
        }
    }

    /// The pipeline stage that raised this error.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Input { stage, .. } => *stage,
            Self::EmptyRegion { .. } => Stage::QuadrangleExtraction,
            Self::DegenerateQuadrangle(_) | Self::InvalidSize { .. } => Stage::Rectification,
            Self::InvalidConfig { .. } | Self::Serialization(_) => Stage::Configuration,
            Self::ImageError(_) | Self::Io(_) => Stage::ImageIo,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;
