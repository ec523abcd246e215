// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrangle extraction — reduce a binary page mask to its four extremal
// foreground points in a single row-major scan.

use folio_core::error::{FolioError, Result};
use folio_core::types::{PixelPoint, Quadrangle};
use image::GrayImage;
use tracing::{debug, instrument};

/// Scan state: nothing seen yet, or the running extremes.
enum Extremes {
    Unseeded,
    Seeded(Quadrangle),
}

/// Find the topmost, bottommost, leftmost and rightmost foreground pixels.
///
/// Any non-zero pixel counts as foreground. The first foreground pixel in
/// row-major order seeds all four points; each later pixel replaces `top`
/// or else `bottom` when its row is strictly beyond the current extreme,
/// and `left` or else `right` likewise for its column. Ties therefore keep
/// the earliest scanned pixel, which for an axis-aligned rectangle puts
/// `top` and `left` on the same corner.
///
/// Returns [`FolioError::EmptyRegion`] when the mask has no foreground.
#[instrument(skip(mask), fields(width = mask.width(), height = mask.height()))]
pub fn extract_quadrangle(mask: &GrayImage) -> Result<Quadrangle> {
    let mut state = Extremes::Unseeded;

    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel.0[0] == 0 {
            continue;
        }
        let point = PixelPoint::new(x, y);
        match state {
            Extremes::Unseeded => state = Extremes::Seeded(Quadrangle::seeded(point)),
            Extremes::Seeded(ref mut q) => {
                if y < q.top.y {
                    q.top = point;
                } else if y > q.bottom.y {
                    q.bottom = point;
                }

                if x < q.left.x {
                    q.left = point;
                } else if x > q.right.x {
                    q.right = point;
                }
            }
        }
    }

    match state {
        Extremes::Seeded(q) => {
            debug!(
                top = %q.top,
                bottom = %q.bottom,
                left = %q.left,
                right = %q.right,
                "Quadrangle extracted"
            );
            Ok(q)
        }
        Extremes::Unseeded => Err(FolioError::EmptyRegion {
            width: mask.width(),
            height: mask.height(),
        }),
    }
}
