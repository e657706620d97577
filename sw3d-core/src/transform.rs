/// Mutable 3D transforms built up by composition
use nalgebra::Matrix3;

use crate::affine::AffineMatrix;
use crate::vector::Vec3;

/// A mutable wrapper around one affine matrix.
///
/// Plain operations (`rotate_x`, `translate`, `scale`, ...) compose the new
/// operation on the right, so it applies in object-local space before
/// whatever the transform already does. The `_pre` variants compose on the
/// left, applying after the existing transform.
///
/// Cloning gives an independent copy, which is how transform stacks save
/// and restore state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    matrix: AffineMatrix,
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_matrix(matrix: AffineMatrix) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &AffineMatrix {
        &self.matrix
    }

    pub fn set_matrix(&mut self, matrix: AffineMatrix) {
        self.matrix = matrix;
    }

    /// Back to identity
    pub fn reset(&mut self) {
        self.matrix = AffineMatrix::identity();
    }

    pub fn multiply(&mut self, matrix: &AffineMatrix) {
        self.matrix = &self.matrix * matrix;
    }

    pub fn multiply_pre(&mut self, matrix: &AffineMatrix) {
        self.matrix = matrix * &self.matrix;
    }

    pub fn rotate_x(&mut self, theta: f64) {
        self.multiply(&AffineMatrix::rotation_x(theta));
    }

    pub fn rotate_y(&mut self, theta: f64) {
        self.multiply(&AffineMatrix::rotation_y(theta));
    }

    pub fn rotate_z(&mut self, theta: f64) {
        self.multiply(&AffineMatrix::rotation_z(theta));
    }

    pub fn rotate_x_pre(&mut self, theta: f64) {
        self.multiply_pre(&AffineMatrix::rotation_x(theta));
    }

    pub fn rotate_y_pre(&mut self, theta: f64) {
        self.multiply_pre(&AffineMatrix::rotation_y(theta));
    }

    pub fn rotate_z_pre(&mut self, theta: f64) {
        self.multiply_pre(&AffineMatrix::rotation_z(theta));
    }

    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.multiply(&AffineMatrix::translation(dx, dy, dz));
    }

    pub fn translate_pre(&mut self, dx: f64, dy: f64, dz: f64) {
        self.multiply_pre(&AffineMatrix::translation(dx, dy, dz));
    }

    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) {
        self.multiply(&AffineMatrix::scale(sx, sy, sz));
    }

    pub fn scale_pre(&mut self, sx: f64, sy: f64, sz: f64) {
        self.multiply_pre(&AffineMatrix::scale(sx, sy, sz));
    }

    /// Replaces the linear block with the rows `u`, `v`, `w` (a direction
    /// cosine matrix); translation is left untouched.
    pub fn set_basis(&mut self, u: &Vec3, v: &Vec3, w: &Vec3) {
        *self.matrix.linear_mut() = Matrix3::new(u.x, u.y, u.z, v.x, v.y, v.z, w.x, w.y, w.z);
    }

    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        self.matrix.transform_point(point)
    }
}
