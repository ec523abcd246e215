// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Exact four-point homography.

use imageproc::geometric_transformations::Projection;
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

/// Smallest |det(H)| accepted as a proper projective transform.
const MIN_DETERMINANT: f64 = 1e-12;

/// A 3×3 projective transform mapping source points onto destination points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    matrix: Matrix3<f64>,
}

impl Homography {
    /// Solve the homography with `h33 = 1` that maps each `src[i]` onto
    /// `dst[i]` exactly.
    ///
    /// Returns `None` when three of the points on either side are collinear
    /// or the 8×8 system is otherwise singular.
    pub fn from_correspondences(src: &[[f64; 2]; 4], dst: &[[f64; 2]; 4]) -> Option<Self> {
        if has_collinear_triple(src) || has_collinear_triple(dst) {
            return None;
        }

        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();

        for i in 0..4 {
            let [x, y] = src[i];
            let [u, v] = dst[i];
            let r = 2 * i;

            a[(r, 0)] = x;
            a[(r, 1)] = y;
            a[(r, 2)] = 1.0;
            a[(r, 6)] = -u * x;
            a[(r, 7)] = -u * y;
            b[r] = u;

            a[(r + 1, 3)] = x;
            a[(r + 1, 4)] = y;
            a[(r + 1, 5)] = 1.0;
            a[(r + 1, 6)] = -v * x;
            a[(r + 1, 7)] = -v * y;
            b[r + 1] = v;
        }

        let h = a.lu().solve(&b)?;
        let matrix = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);
        let det = matrix.determinant();
        if !det.is_finite() || det.abs() < MIN_DETERMINANT {
            return None;
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(Self { matrix })
    }

    /// The row-major 3×3 matrix.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Map a point. `None` if it lands on the line at infinity.
    pub fn project(&self, p: [f64; 2]) -> Option<[f64; 2]> {
        let v = self.matrix * Vector3::new(p[0], p[1], 1.0);
        if v[2].abs() < 1e-15 {
            return None;
        }
        Some([v[0] / v[2], v[1] / v[2]])
    }

    /// Convert to the single-precision projection used by the warping
    /// routines.
    pub fn to_projection(&self) -> Option<Projection> {
        let m = &self.matrix;
        Projection::from_matrix([
            m[(0, 0)] as f32,
            m[(0, 1)] as f32,
            m[(0, 2)] as f32,
            m[(1, 0)] as f32,
            m[(1, 1)] as f32,
            m[(1, 2)] as f32,
            m[(2, 0)] as f32,
            m[(2, 1)] as f32,
            m[(2, 2)] as f32,
        ])
    }
}

/// Whether any three of the four points lie on one line, measured relative
/// to the spread of the points.
fn has_collinear_triple(points: &[[f64; 2]; 4]) -> bool {
    let extent = points
        .iter()
        .flat_map(|p| p.iter())
        .fold(0.0f64, |acc, v| acc.max(v.abs()))
        .max(1.0);
    let tolerance = 1e-9 * extent * extent;
    (0..4).any(|skip| {
        let triple: Vec<[f64; 2]> = (0..4).filter(|&i| i != skip).map(|i| points[i]).collect();
        let [a, b, c] = [triple[0], triple[1], triple[2]];
        let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
        cross.abs() <= tolerance
    })
}
