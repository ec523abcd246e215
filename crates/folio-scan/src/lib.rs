// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-scan — Locate a colour-distinct page in a photograph and deskew it.
//
// Provides the image boundary (decode, encode, save) and the scanning pipeline
// (HLS colour model, back-projection segmentation, extremal quadrangle,
// page masking, four-point homography and rectification).

pub mod image;
pub mod scan;

// Re-export the primary structs so callers can use `folio_scan::PageExtractor` etc.
pub use self::image::processor::ImageProcessor;
pub use scan::color_model::ColorModel;
pub use scan::extractor::{PageExtraction, PageExtractor};
pub use scan::rectify::Rectifier;
pub use scan::segment::Segmenter;
