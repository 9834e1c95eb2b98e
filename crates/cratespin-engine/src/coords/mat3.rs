use core::ops::Mul;

use super::Vec2;

/// Row-major 3×3 homogeneous 2D transform.
///
/// Points transform as column vectors: `p' = M * (x, y, 1)`. The GPU-side
/// column layout is a render-layer concern; this type stays row-major so the
/// rows read the way the math is written.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3 {
    pub rows: [[f32; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        rows: [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
    };

    /// Counter-clockwise rotation about the origin by `angle` radians.
    ///
    /// `rotation(0.0)` is exactly [`Mat3::IDENTITY`].
    pub fn rotation(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Mat3 {
            rows: [
                [cos, -sin, 0.0],
                [sin, cos, 0.0],
                [0.0, 0.0, 1.0],
            ],
        }
    }

    /// Transforms a point, treating it as the column vector `(x, y, 1)`.
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let r = &self.rows;
        Vec2::new(
            r[0][0] * p.x + r[0][1] * p.y + r[0][2],
            r[1][0] * p.x + r[1][1] * p.y + r[1][2],
        )
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        let mut rows = [[0.0; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.rows[i][k] * rhs.rows[k][j]).sum();
            }
        }
        Mat3 { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-5;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < TOL, "{a} !~ {b}");
    }

    fn assert_mat_close(a: Mat3, b: Mat3) {
        for i in 0..3 {
            for j in 0..3 {
                assert_close(a.rows[i][j], b.rows[i][j]);
            }
        }
    }

    /// Angles covering [0, 2π) without landing only on axis multiples.
    fn sample_angles() -> impl Iterator<Item = f32> {
        (0..64).map(|i| i as f32 * core::f32::consts::TAU / 64.0)
    }

    // ── identity ──────────────────────────────────────────────────────────

    #[test]
    fn rotation_by_zero_is_exactly_identity() {
        assert_eq!(Mat3::rotation(0.0), Mat3::IDENTITY);
    }

    // ── orthonormality ────────────────────────────────────────────────────

    #[test]
    fn rotation_block_is_orthonormal() {
        for angle in sample_angles() {
            let m = Mat3::rotation(angle).rows;

            let row0 = Vec2::new(m[0][0], m[0][1]);
            let row1 = Vec2::new(m[1][0], m[1][1]);

            assert_close(row0.length(), 1.0);
            assert_close(row1.length(), 1.0);
            assert_close(row0.dot(row1), 0.0);

            let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
            assert_close(det, 1.0);
        }
    }

    #[test]
    fn rotation_keeps_the_homogeneous_row_and_column() {
        for angle in sample_angles() {
            let m = Mat3::rotation(angle).rows;
            assert_eq!(m[2], [0.0, 0.0, 1.0]);
            assert_eq!(m[0][2], 0.0);
            assert_eq!(m[1][2], 0.0);
        }
    }

    // ── round trip ────────────────────────────────────────────────────────

    #[test]
    fn rotation_composed_with_its_inverse_is_identity() {
        for angle in sample_angles() {
            let round_trip = Mat3::rotation(angle) * Mat3::rotation(-angle);
            assert_mat_close(round_trip, Mat3::IDENTITY);
        }
    }

    // ── point transform ───────────────────────────────────────────────────

    #[test]
    fn quarter_turn_maps_x_axis_to_y_axis() {
        let m = Mat3::rotation(core::f32::consts::FRAC_PI_2);
        let p = m.transform_point(Vec2::new(1.0, 0.0));
        assert_close(p.x, 0.0);
        assert_close(p.y, 1.0);
    }

    #[test]
    fn identity_leaves_points_untouched() {
        let p = Vec2::new(0.25, -0.75);
        assert_eq!(Mat3::IDENTITY.transform_point(p), p);
    }
}
