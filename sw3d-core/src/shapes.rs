/// Procedural mesh builders
///
/// Every builder returns a shape with counter-clockwise, outward-facing
/// faces and freshly built metadata.
use std::f64::consts::PI;

use crate::affine::AffineMatrix;
use crate::geometry::{QuadFace, Shape};
use crate::vector::Vec3;

/// A single quad through four points, in winding order
pub fn make_plane(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Shape {
    Shape::from_parts(vec![p0, p1, p2, p3], vec![QuadFace::quad(0, 1, 2, 3)])
}

/// An axis-aligned box centered on the origin, from half extents
pub fn make_box(w: f64, h: f64, d: f64) -> Shape {
    let vertices = vec![
        Vec3::new(w, h, -d),   // 0
        Vec3::new(w, h, d),    // 1
        Vec3::new(w, -h, d),   // 2
        Vec3::new(w, -h, -d),  // 3
        Vec3::new(-w, h, -d),  // 4
        Vec3::new(-w, h, d),   // 5
        Vec3::new(-w, -h, d),  // 6
        Vec3::new(-w, -h, -d), // 7
    ];
    let faces = vec![
        QuadFace::quad(0, 1, 2, 3), // +x
        QuadFace::quad(4, 7, 6, 5), // -x
        QuadFace::quad(0, 4, 5, 1), // +y
        QuadFace::quad(3, 2, 6, 7), // -y
        QuadFace::quad(1, 5, 6, 2), // +z
        QuadFace::quad(0, 3, 7, 4), // -z
    ];
    Shape::from_parts(vertices, faces)
}

/// A cube centered on the origin with half extent `w`
pub fn make_cube(w: f64) -> Shape {
    make_box(w, w, w)
}

/// A box with a rectangular hole through it along z.
///
/// `w`, `h`, `d` are the outer half extents; `hole_w`, `hole_h` the hole's
/// half extents, which must be smaller than `w` and `h`. The result is a
/// ring of 16 quads: front, back, outer sides and inner walls.
pub fn make_box_with_hole(w: f64, h: f64, d: f64, hole_w: f64, hole_h: f64) -> Shape {
    // Corners counter-clockwise seen from +z
    const CORNERS: [(f64, f64); 4] = [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)];

    let mut vertices = Vec::with_capacity(16);
    for (rw, rh) in [(w, h), (hole_w, hole_h)] {
        for z in [d, -d] {
            for (sx, sy) in CORNERS {
                vertices.push(Vec3::new(sx * rw, sy * rh, z));
            }
        }
    }

    let outer_front = |k: usize| k % 4;
    let outer_back = |k: usize| 4 + k % 4;
    let inner_front = |k: usize| 8 + k % 4;
    let inner_back = |k: usize| 12 + k % 4;

    let mut faces = Vec::with_capacity(16);
    for k in 0..4 {
        faces.push(QuadFace::quad(
            outer_front(k),
            outer_front(k + 1),
            inner_front(k + 1),
            inner_front(k),
        ));
        faces.push(QuadFace::quad(
            outer_back(k),
            inner_back(k),
            inner_back(k + 1),
            outer_back(k + 1),
        ));
        faces.push(QuadFace::quad(
            outer_front(k),
            outer_back(k),
            outer_back(k + 1),
            outer_front(k + 1),
        ));
        faces.push(QuadFace::quad(
            inner_front(k),
            inner_front(k + 1),
            inner_back(k + 1),
            inner_back(k),
        ));
    }

    Shape::from_parts(vertices, faces)
}

/// A sphere tessellated by latitude and longitude.
///
/// The poles are single vertices fanned out with triangles; everything else
/// is quads. Needs `lats >= 2` and `longs >= 3`.
pub fn make_sphere(radius: f64, lats: usize, longs: usize) -> Shape {
    debug_assert!(lats >= 2 && longs >= 3);

    let mut vertices = Vec::with_capacity(2 + (lats - 1) * longs);
    vertices.push(Vec3::new(0.0, radius, 0.0));
    for i in 1..lats {
        let theta = PI * i as f64 / lats as f64;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for j in 0..longs {
            let phi = 2.0 * PI * j as f64 / longs as f64;
            let (sin_phi, cos_phi) = phi.sin_cos();
            vertices.push(Vec3::new(
                radius * sin_theta * cos_phi,
                radius * cos_theta,
                radius * sin_theta * sin_phi,
            ));
        }
    }
    vertices.push(Vec3::new(0.0, -radius, 0.0));

    let north = 0;
    let south = vertices.len() - 1;
    let ring = |i: usize, j: usize| 1 + (i - 1) * longs + j % longs;

    let mut faces = Vec::with_capacity(lats * longs);
    for j in 0..longs {
        faces.push(QuadFace::triangle(north, ring(1, j + 1), ring(1, j)));
    }
    for i in 1..lats - 1 {
        for j in 0..longs {
            faces.push(QuadFace::quad(
                ring(i, j),
                ring(i, j + 1),
                ring(i + 1, j + 1),
                ring(i + 1, j),
            ));
        }
    }
    for j in 0..longs {
        faces.push(QuadFace::triangle(ring(lats - 1, j), ring(lats - 1, j + 1), south));
    }

    Shape::from_parts(vertices, faces)
}

/// A unit octahedron: 6 vertices on the axes, 8 triangles
pub fn make_octahedron() -> Shape {
    let vertices = vec![
        Vec3::new(1.0, 0.0, 0.0),  // 0 +x
        Vec3::new(-1.0, 0.0, 0.0), // 1 -x
        Vec3::new(0.0, 1.0, 0.0),  // 2 +y
        Vec3::new(0.0, -1.0, 0.0), // 3 -y
        Vec3::new(0.0, 0.0, 1.0),  // 4 +z
        Vec3::new(0.0, 0.0, -1.0), // 5 -z
    ];
    let faces = vec![
        QuadFace::triangle(4, 0, 2),
        QuadFace::triangle(0, 5, 2),
        QuadFace::triangle(5, 1, 2),
        QuadFace::triangle(1, 4, 2),
        QuadFace::triangle(0, 4, 3),
        QuadFace::triangle(5, 0, 3),
        QuadFace::triangle(1, 5, 3),
        QuadFace::triangle(4, 1, 3),
    ];
    Shape::from_parts(vertices, faces)
}

/// A height field `z = f(x, y)` over a grid of `steps` x `steps` quads,
/// facing +z
pub fn make_xy_function<F>(f: F, x_range: (f64, f64), y_range: (f64, f64), steps: usize) -> Shape
where
    F: Fn(f64, f64) -> f64,
{
    debug_assert!(steps >= 1);

    let (x_min, x_max) = x_range;
    let (y_min, y_max) = y_range;
    let columns = steps + 1;

    let mut vertices = Vec::with_capacity(columns * columns);
    for row in 0..columns {
        let y = y_min + (y_max - y_min) * row as f64 / steps as f64;
        for column in 0..columns {
            let x = x_min + (x_max - x_min) * column as f64 / steps as f64;
            vertices.push(Vec3::new(x, y, f(x, y)));
        }
    }

    let index = |row: usize, column: usize| row * columns + column;
    let mut faces = Vec::with_capacity(steps * steps);
    for row in 0..steps {
        for column in 0..steps {
            faces.push(QuadFace::quad(
                index(row, column),
                index(row, column + 1),
                index(row + 1, column + 1),
                index(row + 1, column),
            ));
        }
    }

    Shape::from_parts(vertices, faces)
}

/// Applies `matrix` to every vertex of `shape`
pub fn transform_shape(shape: &mut Shape, matrix: &AffineMatrix) {
    for vertex in shape.vertices_mut().iter_mut() {
        *vertex = matrix.transform_point(vertex);
    }
    shape.rebuild_meta();
}
