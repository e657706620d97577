/// Multi-step face extrusion
use log::debug;

use crate::geometry::{QuadFace, Shape};
use crate::transform::Transform;
use crate::vector::{unit, Vec3};

/// Pushes selected faces outward in `count` steps, building side walls.
///
/// Step `k` moves the face by `distance / count` along its normal turned
/// by `k` increments of `rotation`, so the path length over all steps is
/// always `distance`. The face's corners are turned the same way and
/// scaled by `scale` raised to the `k`th power, so repeated steps curl and
/// taper. After extrusion each selected face index refers to the cap of the
/// last step.
pub struct Extruder {
    selector: Box<dyn Fn(usize) -> bool>,
    count: usize,
    distance: f64,
    rotation: Vec3,
    scale: Vec3,
}

impl Extruder {
    /// Extrudes every face once by a distance of 1
    pub fn new() -> Self {
        Self {
            selector: Box::new(|_| true),
            count: 1,
            distance: 1.0,
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    /// Only faces whose index passes `selector` are extruded
    pub fn select_with<F>(mut self, selector: F) -> Self
    where
        F: Fn(usize) -> bool + 'static,
    {
        self.selector = Box::new(selector);
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Total distance travelled over all steps
    pub fn distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Rotation per step, in radians about each axis.
    ///
    /// Step `k` is turned by `k * x`, `k * y` and `k * z`, applied about z
    /// first, then y, then x.
    pub fn rotation(mut self, x: f64, y: f64, z: f64) -> Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    /// Scale per step along each axis
    pub fn scale(mut self, x: f64, y: f64, z: f64) -> Self {
        self.scale = Vec3::new(x, y, z);
        self
    }

    /// Extrudes the selected faces of `shape`; returns how many were
    /// extruded
    pub fn extrude(&self, shape: &mut Shape) -> usize {
        if self.count == 0 {
            return 0;
        }

        shape.ensure_meta();
        let step_distance = self.distance / self.count as f64;
        let original_len = shape.faces().len();
        let mut extruded = 0;

        for index in 0..original_len {
            if !(self.selector)(index) {
                continue;
            }

            let face = shape.faces()[index];
            let meta = *face.cached_meta();
            let normal = unit(&(meta.normal1 + meta.normal2));
            let mut corners: Vec<usize> = face.indices().collect();
            let inner: Vec<Vec3> = corners
                .iter()
                .map(|&i| shape.vertices()[i] - meta.centroid)
                .collect();

            let mut centroid = meta.centroid;

            for step_number in 1..=self.count {
                let turn = self.turn_at(step_number);
                let mut step = turn;
                let power = step_number as i32;
                step.scale(
                    self.scale.x.powi(power),
                    self.scale.y.powi(power),
                    self.scale.z.powi(power),
                );

                centroid += turn.transform_point(&normal) * step_distance;
                let next: Vec<usize> = inner
                    .iter()
                    .map(|offset| shape.push_vertex(centroid + step.transform_point(offset)))
                    .collect();

                let n = corners.len();
                for k in 0..n {
                    let j = (k + 1) % n;
                    shape.push_face(QuadFace::quad(corners[k], corners[j], next[j], next[k]));
                }
                corners = next;
            }

            shape.faces_mut()[index] = QuadFace::from_corners(&corners);
            extruded += 1;
        }

        shape.rebuild_meta();
        debug!(
            "extruded {} faces in {} steps; shape now has {} faces",
            extruded,
            self.count,
            shape.faces().len()
        );
        extruded
    }

    /// Accumulated rotation of step `k`
    fn turn_at(&self, k: usize) -> Transform {
        let k = k as f64;
        let mut turn = Transform::new();
        turn.rotate_x(self.rotation.x * k);
        turn.rotate_y(self.rotation.y * k);
        turn.rotate_z(self.rotation.z * k);
        turn
    }
}

impl Default for Extruder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{make_cube, make_octahedron};
    use approx::assert_relative_eq;

    #[test]
    fn test_extrude_single_quad() {
        let mut shape = make_cube(1.0);
        // +z face
        let extruded = Extruder::new()
            .select_with(|index| index == 4)
            .count(3)
            .distance(3.0)
            .extrude(&mut shape);

        assert_eq!(extruded, 1);
        assert_eq!(shape.faces().len(), 6 + 3 * 4);
        assert_eq!(shape.vertices().len(), 8 + 3 * 4);

        // The face index now holds the outer cap built last
        let cap = shape.faces()[4];
        assert!(!cap.is_triangle());
        assert!(cap.indices().all(|i| i >= 16 && i < 20));
        let meta = cap.cached_meta();
        assert_relative_eq!(meta.centroid, Vec3::new(0.0, 0.0, 4.0), epsilon = 1e-12);
        assert_relative_eq!(meta.normal1, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-12);

        // Unselected faces are untouched
        assert_eq!(shape.faces()[0].indices().collect::<Vec<_>>(), vec![0, 1, 2, 3]);

        // Side walls face outward
        for face in &shape.faces()[6..] {
            let meta = face.cached_meta();
            let radial = Vec3::new(meta.centroid.x, meta.centroid.y, 0.0);
            assert!(radial.dot(&meta.normal1) > 0.0);
        }
    }

    #[test]
    fn test_extrude_triangles() {
        let mut shape = make_octahedron();
        let extruded = Extruder::new().count(2).distance(0.5).extrude(&mut shape);
        assert_eq!(extruded, 8);
        assert_eq!(shape.faces().len(), 8 + 8 * 2 * 3);
        assert!(shape.faces()[..8].iter().all(|f| f.is_triangle()));
    }

    #[test]
    fn test_extrude_with_scale_tapers() {
        let mut shape = make_cube(1.0);
        Extruder::new()
            .select_with(|index| index == 4)
            .count(2)
            .distance(2.0)
            .scale(0.5, 0.5, 0.5)
            .extrude(&mut shape);

        let cap = shape.faces()[4];
        let corner = shape.vertices()[cap.i0];
        // Corners shrink by 0.5 per step, travel stays the full distance
        assert_relative_eq!(corner.x.abs(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(cap.cached_meta().centroid.z, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extrude_non_uniform_scale_keeps_straight_travel() {
        let mut shape = make_cube(1.0);
        // +x face, squashed along its own normal
        Extruder::new()
            .select_with(|index| index == 0)
            .distance(1.0)
            .scale(0.5, 1.0, 1.0)
            .extrude(&mut shape);
        assert_relative_eq!(
            shape.faces()[0].cached_meta().centroid,
            Vec3::new(2.0, 0.0, 0.0),
            epsilon = 1e-12
        );

        let mut shape = make_cube(1.0);
        // +z face, narrowed along x only
        Extruder::new()
            .select_with(|index| index == 4)
            .count(2)
            .distance(2.0)
            .scale(0.5, 1.0, 1.0)
            .extrude(&mut shape);
        let cap = shape.faces()[4];
        assert_relative_eq!(cap.cached_meta().centroid, Vec3::new(0.0, 0.0, 3.0), epsilon = 1e-12);
        for corner in shape.face_vertices(&cap) {
            assert_relative_eq!(corner.x.abs(), 0.25, epsilon = 1e-12);
            assert_relative_eq!(corner.y.abs(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_extrude_with_rotation_twists() {
        let mut shape = make_cube(1.0);
        Extruder::new()
            .select_with(|index| index == 4)
            .count(1)
            .distance(1.0)
            .rotation(0.0, 0.0, std::f64::consts::FRAC_PI_4)
            .extrude(&mut shape);

        let cap = shape.faces()[4];
        for corner in shape.face_vertices(&cap) {
            // Square corners rotated 45 degrees land on the axes
            assert!(corner.x.abs() < 1e-9 || corner.y.abs() < 1e-9);
            assert_relative_eq!(corner.z, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_extrude_multi_axis_rotation_scales_angles() {
        let mut shape = make_cube(1.0);
        let start: Vec<Vec3> = shape.face_vertices(&shape.faces()[4]).copied().collect();
        let old_centroid = Vec3::new(0.0, 0.0, 1.0);
        Extruder::new()
            .select_with(|index| index == 4)
            .count(2)
            .distance(2.0)
            .rotation(0.4, 0.6, 0.8)
            .extrude(&mut shape);

        // The cap is turned by twice each angle, not by the per-step turn squared
        let mut expected = Transform::new();
        expected.rotate_x(0.8);
        expected.rotate_y(1.2);
        expected.rotate_z(1.6);

        let cap = shape.faces()[4];
        let centroid = cap.cached_meta().centroid;
        for (corner, original) in shape.face_vertices(&cap).zip(&start) {
            let offset = original - old_centroid;
            assert_relative_eq!(
                corner - centroid,
                expected.transform_point(&offset),
                epsilon = 1e-12
            );
        }

        let mut squared = Transform::new();
        for _ in 0..2 {
            squared.rotate_x(0.4);
            squared.rotate_y(0.6);
            squared.rotate_z(0.8);
        }
        let offset = start[0] - old_centroid;
        assert!(
            (squared.transform_point(&offset) - expected.transform_point(&offset)).norm() > 1e-2
        );

        // Two unit steps in different directions
        let travelled = (centroid - old_centroid).norm();
        assert!(travelled > 1.0 && travelled < 2.0);
    }

    #[test]
    fn test_zero_count_is_no_op() {
        let mut shape = make_cube(1.0);
        assert_eq!(Extruder::new().count(0).extrude(&mut shape), 0);
        assert_eq!(shape.faces().len(), 6);
    }
}
