// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rectification — size the output canvas from the quadrangle, solve the
// page homography and resample the source through it.

use folio_core::error::{FolioError, Result};
use folio_core::types::{Interpolation, Quadrangle};
use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation as WarpInterpolation, warp_into};
use tracing::{debug, info, instrument};

use super::homography::Homography;

/// Warps the page quadrangle onto an axis-aligned canvas.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rectifier {
    interpolation: Interpolation,
}

impl Rectifier {
    pub fn new(interpolation: Interpolation) -> Self {
        Self { interpolation }
    }

    /// Produce the deskewed page.
    ///
    /// ## Pipeline
    ///
    /// 1. Reject quadrangles with coincident corners or three collinear
    ///    corners
    /// 2. Size the canvas from two adjacent edges (see [`output_size`])
    /// 3. Map top, right, bottom, left onto the canvas corners clockwise
    ///    from the origin
    /// 4. Resample; samples falling outside the source are black
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn rectify(&self, image: &RgbImage, quadrangle: &Quadrangle) -> Result<RgbImage> {
        if quadrangle.is_degenerate() {
            return Err(FolioError::DegenerateQuadrangle(format!(
                "corners top {} right {} bottom {} left {} do not span an area",
                quadrangle.top, quadrangle.right, quadrangle.bottom, quadrangle.left
            )));
        }

        let (out_w, out_h) = output_size(quadrangle)?;
        let homography = page_homography(quadrangle, out_w, out_h)?;
        debug!(matrix = ?homography.matrix(), "Page homography solved");
        let projection = homography.to_projection().ok_or_else(|| {
            FolioError::DegenerateQuadrangle("page homography is not invertible".into())
        })?;

        let interpolation = match self.interpolation {
            Interpolation::Nearest => WarpInterpolation::Nearest,
            Interpolation::Bilinear => WarpInterpolation::Bilinear,
        };
        let mut output = RgbImage::new(out_w, out_h);
        warp_into(image, &projection, interpolation, Rgb([0u8, 0, 0]), &mut output);

        info!(out_w, out_h, "Page rectified");
        Ok(output)
    }
}

/// Output canvas size: width is the `left`–`bottom` edge and height the
/// `bottom`–`right` edge, both truncated to whole pixels.
///
/// Opposite edges are not averaged, so the result is only as rectangular
/// as the quadrangle. A canvas narrower than two pixels on either axis
/// cannot hold distinct corners and is reported as an invalid size.
pub fn output_size(quadrangle: &Quadrangle) -> Result<(u32, u32)> {
    let width = quadrangle.left.distance(&quadrangle.bottom).floor() as i64;
    let height = quadrangle.bottom.distance(&quadrangle.right).floor() as i64;
    debug!(width, height, "Output size computed");

    if width < 2 || height < 2 {
        return Err(FolioError::InvalidSize { width, height });
    }
    let width = u32::try_from(width).map_err(|_| FolioError::InvalidSize { width, height })?;
    let height = u32::try_from(height).map_err(|_| FolioError::InvalidSize {
        width: width as i64,
        height,
    })?;
    Ok((width, height))
}

/// Homography taking top, right, bottom and left onto `(0, 0)`,
/// `(width-1, 0)`, `(width-1, height-1)` and `(0, height-1)`.
pub fn page_homography(quadrangle: &Quadrangle, width: u32, height: u32) -> Result<Homography> {
    let src = quadrangle.winding().map(|p| p.as_f64());
    let right = width.saturating_sub(1) as f64;
    let bottom = height.saturating_sub(1) as f64;
    let dst = [[0.0, 0.0], [right, 0.0], [right, bottom], [0.0, bottom]];

    Homography::from_correspondences(&src, &dst).ok_or_else(|| {
        FolioError::DegenerateQuadrangle(format!(
            "no projective transform maps {src:?} onto a {width}x{height} canvas"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::quadrangle::extract_quadrangle;
    use folio_core::types::PixelPoint;
    use image::{GrayImage, Luma};

    fn quad(top: (u32, u32), right: (u32, u32), bottom: (u32, u32), left: (u32, u32)) -> Quadrangle {
        Quadrangle {
            top: PixelPoint::new(top.0, top.1),
            right: PixelPoint::new(right.0, right.1),
            bottom: PixelPoint::new(bottom.0, bottom.1),
            left: PixelPoint::new(left.0, left.1),
        }
    }

    fn assert_near(pixel: &Rgb<u8>, expected: [u8; 3]) {
        for (got, want) in pixel.0.iter().zip(expected) {
            assert!(got.abs_diff(want) <= 2, "{:?} != {expected:?}", pixel.0);
        }
    }

    /// White filled rectangle `[x0, x1] x [y0, y1]` on black.
    fn white_rect(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if (x0..=x1).contains(&x) && (y0..=y1).contains(&y) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn size_uses_adjacent_edges() {
        // Diamond with edge length 50 * sqrt(2) = 70.7.
        let q = quad((60, 10), (110, 60), (60, 110), (10, 60));
        assert_eq!(output_size(&q).unwrap(), (70, 70));
    }

    #[test]
    fn size_of_bounding_box_matches_extent() {
        let q = quad((50, 100), (250, 100), (250, 300), (50, 300));
        assert_eq!(output_size(&q).unwrap(), (200, 200));
    }

    #[test]
    fn collapsed_edges_are_invalid_sizes() {
        // left and bottom coincide: zero width.
        let q = quad((5, 0), (9, 4), (5, 8), (5, 8));
        match output_size(&q) {
            Err(FolioError::InvalidSize { width, height }) => {
                assert_eq!(width, 0);
                assert!(height > 0);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn degenerate_quadrangle_is_rejected() {
        let image = RgbImage::new(50, 50);
        let q = quad((10, 10), (40, 10), (10, 30), (10, 10));
        let err = Rectifier::default().rectify(&image, &q).unwrap_err();
        assert!(matches!(err, FolioError::DegenerateQuadrangle(_)));

        let collinear = quad((0, 0), (10, 10), (20, 20), (0, 30));
        let err = Rectifier::default().rectify(&image, &collinear).unwrap_err();
        assert!(matches!(err, FolioError::DegenerateQuadrangle(_)));
    }

    #[test]
    fn homography_hits_canvas_corners() {
        let q = quad((60, 10), (110, 60), (60, 110), (10, 60));
        let h = page_homography(&q, 70, 70).unwrap();
        let expected = [[0.0, 0.0], [69.0, 0.0], [69.0, 69.0], [0.0, 69.0]];
        for (corner, want) in q.winding().iter().zip(expected) {
            let got = h.project(corner.as_f64()).unwrap();
            assert!((got[0] - want[0]).abs() < 1e-6 && (got[1] - want[1]).abs() < 1e-6);
        }
    }

    #[test]
    fn axis_aligned_round_trip() {
        let (x0, y0, x1, y1) = (30u32, 20u32, 129u32, 99u32);
        let image = white_rect(180, 140, x0, y0, x1, y1);
        let q = quad((x0, y0), (x1, y0), (x1, y1), (x0, y1));

        for interpolation in [Interpolation::Nearest, Interpolation::Bilinear] {
            let page = Rectifier::new(interpolation).rectify(&image, &q).unwrap();
            let (w, h) = page.dimensions();
            assert!((w as i64 - 100).abs() <= 1, "width {w}");
            assert!((h as i64 - 80).abs() <= 1, "height {h}");
            // The interior of the canvas is all page.
            assert_near(page.get_pixel(w / 2, h / 2), [255, 255, 255]);
            assert_near(page.get_pixel(2, 2), [255, 255, 255]);
        }
    }

    #[test]
    fn rectangle_mask_round_trip() {
        let (x0, y0, x1, y1) = (30u32, 20u32, 129u32, 99u32);
        let mask = GrayImage::from_fn(180, 140, |x, y| {
            if (x0..=x1).contains(&x) && (y0..=y1).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        });

        let extremes = extract_quadrangle(&mask).unwrap();
        assert!(extremes.is_degenerate());
        let q = extremes.bounding_box();

        let image = white_rect(180, 140, x0, y0, x1, y1);
        let page = Rectifier::default().rectify(&image, &q).unwrap();
        let (w, h) = page.dimensions();
        assert!((w as i64 - 100).abs() <= 1, "width {w}");
        assert!((h as i64 - 80).abs() <= 1, "height {h}");
        assert_near(page.get_pixel(w / 2, h / 2), [255, 255, 255]);
    }

    #[test]
    fn rotated_page_is_straightened() {
        // A 60x60 square rotated 45 degrees, drawn as a filled diamond.
        let image = RgbImage::from_fn(120, 120, |x, y| {
            let d = (x as i32 - 60).abs() + (y as i32 - 60).abs();
            if d <= 42 { Rgb([0, 0, 255]) } else { Rgb([255, 255, 255]) }
        });
        let q = quad((60, 18), (102, 60), (60, 102), (18, 60));
        let page = Rectifier::new(Interpolation::Bilinear)
            .rectify(&image, &q)
            .unwrap();
        assert_eq!(page.dimensions(), (59, 59));
        assert_near(page.get_pixel(29, 29), [0, 0, 255]);
        assert_near(page.get_pixel(5, 50), [0, 0, 255]);
    }
}
