/// In-place mesh operators: triangulation, subdivision, smoothing and
/// face explosion
///
/// Each operator leaves the shape with rebuilt metadata.
use log::debug;
use std::collections::HashMap;

use crate::geometry::{QuadFace, Shape};
use crate::vector::{average, lerp, Vec3};

/// Splits every quad along its 0-2 diagonal.
///
/// The original face keeps `(i0, i1, i2)` and a new triangle `(i0, i2, i3)`
/// is appended. Shapes without quads are left as they are.
pub fn triangulate(shape: &mut Shape) {
    let faces = shape.faces_mut();
    let original_len = faces.len();
    for index in 0..original_len {
        if let Some(i3) = faces[index].i3 {
            let QuadFace { i0, i1, i2, .. } = faces[index];
            faces.push(QuadFace::triangle(i0, i2, i3));
            faces[index] = QuadFace::triangle(i0, i1, i2);
        }
    }
    shape.rebuild_meta();
}

/// New vertices created during one subdivision pass, keyed by the sorted
/// source vertices they average, so neighbouring faces share them
struct MidpointCache {
    edges: HashMap<(usize, usize), usize>,
}

impl MidpointCache {
    fn new() -> Self {
        Self { edges: HashMap::new() }
    }

    fn midpoint(&mut self, vertices: &mut Vec<Vec3>, a: usize, b: usize) -> usize {
        let key = if a < b { (a, b) } else { (b, a) };
        *self.edges.entry(key).or_insert_with(|| {
            let midpoint = (vertices[a] + vertices[b]) / 2.0;
            vertices.push(midpoint);
            vertices.len() - 1
        })
    }
}

fn push_centroid(vertices: &mut Vec<Vec3>, face: &QuadFace) -> usize {
    let existing: &[Vec3] = vertices;
    let centroid = average(face.indices().map(|i| &existing[i]));
    vertices.push(centroid);
    vertices.len() - 1
}

/// Splits every face into quads around new edge-midpoint and centroid
/// vertices: a quad becomes 4 quads, a triangle becomes 3.
pub fn linear_subdivide(shape: &mut Shape) {
    let faces = std::mem::take(shape.faces_mut());
    let vertices = shape.vertices_mut();
    let mut cache = MidpointCache::new();
    let mut subdivided = Vec::with_capacity(faces.len() * 4);

    for face in &faces {
        let center = push_centroid(vertices, face);
        let corners: Vec<usize> = face.indices().collect();
        let count = corners.len();
        let mids: Vec<usize> = (0..count)
            .map(|k| cache.midpoint(vertices, corners[k], corners[(k + 1) % count]))
            .collect();

        // Corner k keeps the quad (corner, next midpoint, center, previous midpoint)
        for k in 0..count {
            let previous = mids[(k + count - 1) % count];
            subdivided.push(QuadFace::quad(corners[k], mids[k], center, previous));
        }
    }

    debug!(
        "linear_subdivide: {} faces -> {} faces, {} vertices",
        faces.len(),
        subdivided.len(),
        vertices.len()
    );
    *shape.faces_mut() = subdivided;
    shape.rebuild_meta();
}

/// Splits every triangle into 4 triangles around its edge midpoints.
/// Quads are triangulated first.
pub fn linear_subdivide_tri(shape: &mut Shape) {
    if shape.faces().iter().any(|face| !face.is_triangle()) {
        triangulate(shape);
    }

    let faces = std::mem::take(shape.faces_mut());
    let vertices = shape.vertices_mut();
    let mut cache = MidpointCache::new();
    let mut subdivided = Vec::with_capacity(faces.len() * 4);

    for face in &faces {
        let (a, b, c) = (face.i0, face.i1, face.i2);
        let ab = cache.midpoint(vertices, a, b);
        let bc = cache.midpoint(vertices, b, c);
        let ca = cache.midpoint(vertices, c, a);

        subdivided.push(QuadFace::triangle(a, ab, ca));
        subdivided.push(QuadFace::triangle(ab, b, bc));
        subdivided.push(QuadFace::triangle(ca, bc, c));
        subdivided.push(QuadFace::triangle(ab, bc, ca));
    }

    debug!(
        "linear_subdivide_tri: {} faces -> {} faces, {} vertices",
        faces.len(),
        subdivided.len(),
        vertices.len()
    );
    *shape.faces_mut() = subdivided;
    shape.rebuild_meta();
}

/// Relaxes every vertex towards the average centroid of the faces using it.
///
/// `amount` 0 leaves the shape unchanged, 1 moves vertices all the way.
/// All vertices move at once from the pre-smoothing positions. Vertices no
/// face references stay where they are.
pub fn average_smooth(shape: &mut Shape, amount: f64) {
    shape.ensure_meta();

    let mut sums = vec![Vec3::zeros(); shape.vertices().len()];
    let mut counts = vec![0usize; shape.vertices().len()];
    for face in shape.faces() {
        let centroid = face.cached_meta().centroid;
        for index in face.indices() {
            sums[index] += centroid;
            counts[index] += 1;
        }
    }

    let vertices = shape.vertices_mut();
    for ((vertex, sum), count) in vertices.iter_mut().zip(&sums).zip(&counts) {
        if *count > 0 {
            *vertex = lerp(vertex, &(sum / *count as f64), amount);
        }
    }
    shape.rebuild_meta();
}

/// Gives every face its own private copy of its corner vertices
pub fn explode_faces(shape: &mut Shape) {
    let old_vertices = std::mem::take(shape.vertices_mut());
    let faces = shape.faces_mut();
    let mut vertices = Vec::with_capacity(faces.len() * 4);

    for face in faces.iter_mut() {
        let corners: Vec<usize> = face
            .indices()
            .map(|index| {
                vertices.push(old_vertices[index]);
                vertices.len() - 1
            })
            .collect();
        *face = QuadFace::from_corners(&corners);
    }

    *shape.vertices_mut() = vertices;
    shape.rebuild_meta();
}
