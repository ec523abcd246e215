// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Folio page extractor.

use serde::{Deserialize, Serialize};

/// An integer pixel position. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
}

impl PixelPoint {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` in pixels.
    pub fn distance(&self, other: &PixelPoint) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Position as floating-point `(x, y)`.
    pub fn as_f64(&self) -> [f64; 2] {
        [self.x as f64, self.y as f64]
    }
}

impl std::fmt::Display for PixelPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Four extremal foreground points approximating a page's corners.
///
/// `top` and `bottom` carry the smallest and largest row, `left` and `right`
/// the smallest and largest column. Going around the page the corners are
/// visited as top → right → bottom → left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quadrangle {
    pub top: PixelPoint,
    pub bottom: PixelPoint,
    pub left: PixelPoint,
    pub right: PixelPoint,
}

impl Quadrangle {
    /// A quadrangle whose four points all sit on `point`.
    pub const fn seeded(point: PixelPoint) -> Self {
        Self {
            top: point,
            bottom: point,
            left: point,
            right: point,
        }
    }

    /// Corners in winding order: top, right, bottom, left.
    pub fn winding(&self) -> [PixelPoint; 4] {
        [self.top, self.right, self.bottom, self.left]
    }

    /// The axis-aligned box spanned by the four extremes, expressed as a
    /// quadrangle with the same winding: top-left, top-right, bottom-right,
    /// bottom-left.
    pub fn bounding_box(&self) -> Quadrangle {
        let min_x = self.left.x;
        let max_x = self.right.x;
        let min_y = self.top.y;
        let max_y = self.bottom.y;
        Quadrangle {
            top: PixelPoint::new(min_x, min_y),
            right: PixelPoint::new(max_x, min_y),
            bottom: PixelPoint::new(max_x, max_y),
            left: PixelPoint::new(min_x, max_y),
        }
    }

    /// Whether two corners coincide or three of them are collinear, in which
    /// case no projective transform maps the quadrangle onto a rectangle.
    pub fn is_degenerate(&self) -> bool {
        let corners = self.winding();
        for i in 0..4 {
            for j in (i + 1)..4 {
                if corners[i] == corners[j] {
                    return true;
                }
            }
        }
        // Every triple of a four-point set leaves out exactly one corner.
        (0..4).any(|skip| {
            let triple: Vec<&PixelPoint> = corners
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != skip)
                .map(|(_, p)| p)
                .collect();
            cross(triple[0], triple[1], triple[2]) == 0
        })
    }
}

/// Z component of `(b - a) x (c - a)`; zero when the points are collinear.
fn cross(a: &PixelPoint, b: &PixelPoint, c: &PixelPoint) -> i64 {
    let (ax, ay) = (a.x as i64, a.y as i64);
    let (bx, by) = (b.x as i64, b.y as i64);
    let (cx, cy) = (c.x as i64, c.y as i64);
    (bx - ax) * (cy - ay) - (by - ay) * (cx - ax)
}

/// Resampling scheme used when warping the page onto its output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
}

/// Pipeline stages, used to attribute errors and log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Loading, decoding or encoding images.
    ImageIo,
    /// Validating or loading the pipeline configuration.
    Configuration,
    /// Building the colour histogram from the reference sample.
    ColorModel,
    /// Back-projection, thresholding and closing.
    Segmentation,
    /// Reducing the mask to four extremal points.
    QuadrangleExtraction,
    /// Filling the quadrangle and masking the source image.
    MaskComposition,
    /// Homography solve and resampling.
    Rectification,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ImageIo => "image I/O",
            Self::Configuration => "configuration",
            Self::ColorModel => "colour model",
            Self::Segmentation => "segmentation",
            Self::QuadrangleExtraction => "quadrangle extraction",
            Self::MaskComposition => "mask composition",
            Self::Rectification => "rectification",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(top: (u32, u32), right: (u32, u32), bottom: (u32, u32), left: (u32, u32)) -> Quadrangle {
        Quadrangle {
            top: PixelPoint::new(top.0, top.1),
            right: PixelPoint::new(right.0, right.1),
            bottom: PixelPoint::new(bottom.0, bottom.1),
            left: PixelPoint::new(left.0, left.1),
        }
    }

    #[test]
    fn distance_is_euclidean() {
        let a = PixelPoint::new(0, 0);
        let b = PixelPoint::new(3, 4);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn diamond_is_not_degenerate() {
        let q = quad((50, 0), (100, 50), (50, 100), (0, 50));
        assert!(!q.is_degenerate());
    }

    #[test]
    fn coincident_corners_are_degenerate() {
        // Axis-aligned rectangle scanned row-major: top and left coincide.
        let q = quad((10, 10), (40, 10), (10, 30), (10, 10));
        assert!(q.is_degenerate());
    }

    #[test]
    fn collinear_corners_are_degenerate() {
        let q = quad((0, 0), (10, 10), (20, 20), (0, 30));
        assert!(q.is_degenerate());
    }

    #[test]
    fn bounding_box_spans_the_extremes() {
        let q = quad((10, 10), (40, 10), (10, 30), (10, 10));
        let bbox = q.bounding_box();
        assert_eq!(bbox.top, PixelPoint::new(10, 10));
        assert_eq!(bbox.right, PixelPoint::new(40, 10));
        assert_eq!(bbox.bottom, PixelPoint::new(40, 30));
        assert_eq!(bbox.left, PixelPoint::new(10, 30));
        assert!(!bbox.is_degenerate());
    }

    #[test]
    fn interpolation_serializes_lowercase() {
        let json = serde_json::to_string(&Interpolation::Nearest).unwrap();
        assert_eq!(json, "\"nearest\"");
        assert_eq!(Interpolation::default(), Interpolation::Bilinear);
    }
}
