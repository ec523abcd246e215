// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page scanning pipeline — colour model, segmentation, quadrangle
// extraction, page masking, homography and rectification.

pub mod color_model;
pub mod extractor;
pub mod hls;
pub mod homography;
pub mod mask;
pub mod quadrangle;
pub mod rectify;
pub mod segment;

pub use color_model::ColorModel;
pub use extractor::{PageExtraction, PageExtractor};
pub use homography::Homography;
pub use quadrangle::extract_quadrangle;
pub use rectify::Rectifier;
pub use segment::{Segmentation, Segmenter};
