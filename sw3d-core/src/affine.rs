/// Affine matrices for 3D object transforms and 2D surface mapping
use nalgebra::{Matrix3, Matrix4};
use std::ops::Mul;

use crate::vector::{Vec2, Vec3};

/// A 3x4 affine matrix: a linear 3x3 block plus a translation column.
///
/// The implicit fourth row is always `[0, 0, 0, 1]`, so composing or
/// inverting these never introduces projective terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix {
    linear: Matrix3<f64>,
    translation: Vec3,
}

impl AffineMatrix {
    pub fn identity() -> Self {
        Self {
            linear: Matrix3::identity(),
            translation: Vec3::zeros(),
        }
    }

    /// Builds a matrix from its 12 coefficients in row-major order:
    /// `[e0 e1 e2 e3; e4 e5 e6 e7; e8 e9 e10 e11]`, where `e3`, `e7`, `e11`
    /// are the translation.
    pub fn from_coefficients(e: [f64; 12]) -> Self {
        Self {
            linear: Matrix3::new(e[0], e[1], e[2], e[4], e[5], e[6], e[8], e[9], e[10]),
            translation: Vec3::new(e[3], e[7], e[11]),
        }
    }

    pub fn from_parts(linear: Matrix3<f64>, translation: Vec3) -> Self {
        Self { linear, translation }
    }

    /// Rotation of `theta` radians about the x axis (right handed)
    pub fn rotation_x(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_parts(
            Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c),
            Vec3::zeros(),
        )
    }

    /// Rotation of `theta` radians about the y axis (right handed)
    pub fn rotation_y(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_parts(
            Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c),
            Vec3::zeros(),
        )
    }

    /// Rotation of `theta` radians about the z axis (right handed)
    pub fn rotation_z(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_parts(
            Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0),
            Vec3::zeros(),
        )
    }

    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self::from_parts(Matrix3::identity(), Vec3::new(dx, dy, dz))
    }

    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self::from_parts(Matrix3::from_diagonal(&Vec3::new(sx, sy, sz)), Vec3::zeros())
    }

    pub fn linear_mut(&mut self) -> &mut Matrix3<f64> {
        &mut self.linear
    }

    /// The 12 coefficients in row-major order
    #[rustfmt::skip]
    pub fn coefficients(&self) -> [f64; 12] {
        let m = &self.linear;
        let t = &self.translation;
        [
            m[(0, 0)], m[(0, 1)], m[(0, 2)], t.x,
            m[(1, 0)], m[(1, 1)], m[(1, 2)], t.y,
            m[(2, 0)], m[(2, 1)], m[(2, 2)], t.z,
        ]
    }

    /// The equivalent 4x4 homogeneous matrix
    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        let mut result = self.linear.to_homogeneous();
        result[(0, 3)] = self.translation.x;
        result[(1, 3)] = self.translation.y;
        result[(2, 3)] = self.translation.z;
        result
    }

    /// Transpose of the adjoint of the linear block, without translation.
    ///
    /// This maps surface normals correctly under non-uniform scale. The
    /// division by the determinant is skipped, so results are off by a
    /// positive factor (for orientation-preserving matrices) and callers
    /// normalize them.
    pub fn trans_adjoint(&self) -> Self {
        // Columns of the cofactor matrix are cross products of column pairs
        let c0 = self.linear.column(0).into_owned();
        let c1 = self.linear.column(1).into_owned();
        let c2 = self.linear.column(2).into_owned();
        Self::from_parts(
            Matrix3::from_columns(&[c1.cross(&c2), c2.cross(&c0), c0.cross(&c1)]),
            Vec3::zeros(),
        )
    }

    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        self.linear * point + self.translation
    }

    /// Transforms `point` into `dst` and returns it, avoiding a fresh value
    /// in hot loops.
    pub fn transform_point_to<'a>(&self, point: &Vec3, dst: &'a mut Vec3) -> &'a mut Vec3 {
        let m = &self.linear;
        let t = &self.translation;
        dst.x = m[(0, 0)] * point.x + m[(0, 1)] * point.y + m[(0, 2)] * point.z + t.x;
        dst.y = m[(1, 0)] * point.x + m[(1, 1)] * point.y + m[(1, 2)] * point.z + t.y;
        dst.z = m[(2, 0)] * point.x + m[(2, 1)] * point.y + m[(2, 2)] * point.z + t.z;
        dst
    }

    /// Transforms a direction, ignoring translation
    pub fn transform_vector(&self, vector: &Vec3) -> Vec3 {
        self.linear * vector
    }
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for AffineMatrix {
    type Output = AffineMatrix;

    /// `a * b` applies `b` first, then `a`
    fn mul(self, rhs: AffineMatrix) -> AffineMatrix {
        &self * &rhs
    }
}

impl<'a, 'b> Mul<&'b AffineMatrix> for &'a AffineMatrix {
    type Output = AffineMatrix;

    fn mul(self, rhs: &'b AffineMatrix) -> AffineMatrix {
        AffineMatrix {
            linear: self.linear * rhs.linear,
            translation: self.linear * rhs.translation + self.translation,
        }
    }
}

/// A 2D affine transform in canvas convention:
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine2D {
    pub fn identity() -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 }
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self { e: dx, f: dy, ..Self::identity() }
    }

    /// Solves the affine map sending the three `src` points onto the three
    /// `dst` points.
    ///
    /// Collinear `src` points make the denominator zero and the coefficients
    /// non-finite.
    pub fn map_triangle(src: [Vec2; 3], dst: [Vec2; 3]) -> Self {
        let du1 = src[1].x - src[0].x;
        let dv1 = src[1].y - src[0].y;
        let du2 = src[2].x - src[0].x;
        let dv2 = src[2].y - src[0].y;

        let dx1 = dst[1].x - dst[0].x;
        let dy1 = dst[1].y - dst[0].y;
        let dx2 = dst[2].x - dst[0].x;
        let dy2 = dst[2].y - dst[0].y;

        let denom = du1 * dv2 - du2 * dv1;

        let a = (dx1 * dv2 - dx2 * dv1) / denom;
        let c = (dx2 * du1 - dx1 * du2) / denom;
        let b = (dy1 * dv2 - dy2 * dv1) / denom;
        let d = (dy2 * du1 - dy1 * du2) / denom;

        Self {
            a,
            b,
            c,
            d,
            e: dst[0].x - a * src[0].x - c * src[0].y,
            f: dst[0].y - b * src[0].x - d * src[0].y,
        }
    }

    pub fn apply(&self, point: &Vec2) -> Vec2 {
        Vec2::new(
            self.a * point.x + self.c * point.y + self.e,
            self.b * point.x + self.d * point.y + self.f,
        )
    }
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Affine2D {
    type Output = Affine2D;

    /// `p * q` applies `q` first, then `p`
    fn mul(self, q: Affine2D) -> Affine2D {
        let p = self;
        Affine2D {
            a: p.a * q.a + p.c * q.b,
            b: p.b * q.a + p.d * q.b,
            c: p.a * q.c + p.c * q.d,
            d: p.b * q.c + p.d * q.d,
            e: p.a * q.e + p.c * q.f + p.e,
            f: p.b * q.e + p.d * q.f + p.f,
        }
    }
}
