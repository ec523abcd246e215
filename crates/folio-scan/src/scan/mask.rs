// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mask composition — fill the page quadrangle into a full-resolution mask,
// isolate the page pixels, and draw diagnostic overlays.

use folio_core::error::{FolioError, Result};
use folio_core::types::{PixelPoint, Quadrangle, Stage};
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use tracing::{debug, instrument};

use super::segment::{BACKGROUND, FOREGROUND};

/// Rasterize the quadrangle (outline included) onto a `width` x `height`
/// background canvas.
///
/// Vertices are visited top → left → bottom → right. Coincident vertices
/// are merged, so a collapsed quadrangle still fills the segment or pixel it
/// reduces to.
#[instrument(skip(quadrangle))]
pub fn page_mask(width: u32, height: u32, quadrangle: &Quadrangle) -> GrayImage {
    let mut mask = GrayImage::from_pixel(width, height, Luma([BACKGROUND]));
    let fill = Luma([FOREGROUND]);

    let mut vertices: Vec<Point<i32>> = Vec::with_capacity(4);
    for corner in [quadrangle.top, quadrangle.left, quadrangle.bottom, quadrangle.right] {
        let p = to_point(corner);
        if vertices.last() != Some(&p) {
            vertices.push(p);
        }
    }
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    match vertices.as_slice() {
        [] => {}
        [only] => {
            if only.x >= 0 && only.y >= 0 && (only.x as u32) < width && (only.y as u32) < height {
                mask.put_pixel(only.x as u32, only.y as u32, fill);
            }
        }
        [a, b] => draw_line_segment_mut(
            &mut mask,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            fill,
        ),
        polygon => draw_polygon_mut(&mut mask, polygon, fill),
    }

    debug!(vertices = vertices.len(), "Page mask filled");
    mask
}

/// Keep `image` pixels where `mask` is non-zero and black out the rest.
pub fn apply_mask(image: &RgbImage, mask: &GrayImage) -> Result<RgbImage> {
    if image.dimensions() != mask.dimensions() {
        return Err(FolioError::input(
            Stage::MaskComposition,
            format!(
                "mask is {}x{} but image is {}x{}",
                mask.width(),
                mask.height(),
                image.width(),
                image.height()
            ),
        ));
    }

    let mut out = RgbImage::new(image.width(), image.height());
    for ((dst, src), m) in out.pixels_mut().zip(image.pixels()).zip(mask.pixels()) {
        if m.0[0] != BACKGROUND {
            *dst = *src;
        }
    }
    Ok(out)
}

/// Copy of `image` with the quadrangle outline and corner markers drawn in
/// `color`.
pub fn annotate_quadrangle(image: &RgbImage, quadrangle: &Quadrangle, color: Rgb<u8>) -> RgbImage {
    let mut canvas = image.clone();
    let corners = quadrangle.winding();
    for (i, from) in corners.iter().enumerate() {
        let to = corners[(i + 1) % corners.len()];
        draw_line_segment_mut(
            &mut canvas,
            (from.x as f32, from.y as f32),
            (to.x as f32, to.y as f32),
            color,
        );
    }
    for corner in corners {
        let p = to_point(corner);
        draw_filled_circle_mut(&mut canvas, (p.x, p.y), 3, color);
    }
    canvas
}

fn to_point(p: PixelPoint) -> Point<i32> {
    Point::new(p.x as i32, p.y as i32)
}
