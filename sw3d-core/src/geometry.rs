/// Geometry primitives: colours, faces, shapes and texture mappings
use serde::{Deserialize, Serialize};

use crate::vector::{unit, Vec2, Vec3};

/// An RGBA colour with floating point channels.
///
/// `r`, `g` and `b` are normally in `[0, 1]`; `a` is alpha. Colours are
/// plain values, so render state captured into a draw buffer never changes
/// behind its back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Inverts the colour channels in place, leaving alpha alone
    pub fn invert(&mut self) {
        self.r = 1.0 - self.r;
        self.g = 1.0 - self.g;
        self.b = 1.0 - self.b;
    }

    /// The colour with its colour channels scaled by `intensity`
    pub fn tinted(&self, intensity: f64) -> Self {
        Self {
            r: self.r * intensity,
            g: self.g * intensity,
            b: self.b * intensity,
            a: self.a,
        }
    }
}

/// Precomputed per-face data used for sorting, culling and shading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMeta {
    pub centroid: Vec3,
    /// Unit normal of the triangle (0, 1, 2)
    pub normal1: Vec3,
    /// Unit normal of the triangle (0, 2, 3), or `normal1` for triangles
    pub normal2: Vec3,
}

impl Default for FaceMeta {
    fn default() -> Self {
        Self {
            centroid: Vec3::zeros(),
            normal1: Vec3::zeros(),
            normal2: Vec3::zeros(),
        }
    }
}

/// A quad face, or a triangle when `i3` is `None`.
///
/// Indices refer to the owning shape's vertex list. Corners wind
/// counter-clockwise when viewed from the front of the face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadFace {
    pub i0: usize,
    pub i1: usize,
    pub i2: usize,
    pub i3: Option<usize>,
    meta: FaceMeta,
}

impl QuadFace {
    pub fn quad(i0: usize, i1: usize, i2: usize, i3: usize) -> Self {
        Self { i0, i1, i2, i3: Some(i3), meta: FaceMeta::default() }
    }

    pub fn triangle(i0: usize, i1: usize, i2: usize) -> Self {
        Self { i0, i1, i2, i3: None, meta: FaceMeta::default() }
    }

    /// Builds a face from 3 or 4 corner indices
    pub fn from_corners(corners: &[usize]) -> Self {
        debug_assert!(corners.len() == 3 || corners.len() == 4);
        match corners {
            [i0, i1, i2] => Self::triangle(*i0, *i1, *i2),
            _ => Self::quad(corners[0], corners[1], corners[2], corners[3]),
        }
    }

    pub fn is_triangle(&self) -> bool {
        self.i3.is_none()
    }

    pub fn corner_count(&self) -> usize {
        if self.is_triangle() { 3 } else { 4 }
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> {
        [self.i0, self.i1, self.i2].into_iter().chain(self.i3)
    }

    /// Cached metadata; only meaningful when the owning shape is not dirty
    pub fn cached_meta(&self) -> &FaceMeta {
        &self.meta
    }

    /// Computes centroid and normals from the current vertex positions
    pub fn compute_meta(&self, vertices: &[Vec3]) -> FaceMeta {
        debug_assert!(self.indices().all(|i| i < vertices.len()));

        let v0 = &vertices[self.i0];
        let v1 = &vertices[self.i1];
        let v2 = &vertices[self.i2];
        let normal1 = unit(&(v1 - v0).cross(&(v2 - v0)));

        match self.i3 {
            None => FaceMeta {
                centroid: (v0 + v1 + v2) / 3.0,
                normal1,
                normal2: normal1,
            },
            Some(i3) => {
                let v3 = &vertices[i3];
                FaceMeta {
                    centroid: (v0 + v1 + v2 + v3) / 4.0,
                    normal1,
                    normal2: unit(&(v2 - v0).cross(&(v3 - v0))),
                }
            }
        }
    }
}

/// A mesh of vertices and the faces that index into them.
///
/// Faces share vertices by index. Any edit through `vertices_mut`,
/// `faces_mut` or the `push_*` methods marks the face metadata dirty;
/// `face_meta` then recomputes on the fly until `ensure_meta` or
/// `rebuild_meta` refreshes the cache.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    vertices: Vec<Vec3>,
    faces: Vec<QuadFace>,
    dirty: bool,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a shape and its metadata from vertices and faces
    pub fn from_parts(vertices: Vec<Vec3>, faces: Vec<QuadFace>) -> Self {
        let mut shape = Self { vertices, faces, dirty: true };
        shape.rebuild_meta();
        shape
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[QuadFace] {
        &self.faces
    }

    pub fn vertices_mut(&mut self) -> &mut Vec<Vec3> {
        self.dirty = true;
        &mut self.vertices
    }

    pub fn faces_mut(&mut self) -> &mut Vec<QuadFace> {
        self.dirty = true;
        &mut self.faces
    }

    /// Appends a vertex and returns its index
    pub fn push_vertex(&mut self, vertex: Vec3) -> usize {
        self.dirty = true;
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    /// Appends a face and returns its index
    pub fn push_face(&mut self, face: QuadFace) -> usize {
        self.dirty = true;
        self.faces.push(face);
        self.faces.len() - 1
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recomputes the centroid and normals of every face
    pub fn rebuild_meta(&mut self) {
        let vertices = &self.vertices;
        for face in &mut self.faces {
            face.meta = face.compute_meta(vertices);
        }
        self.dirty = false;
    }

    /// Rebuilds the metadata only if something changed since the last build
    pub fn ensure_meta(&mut self) {
        if self.dirty {
            self.rebuild_meta();
        }
    }

    /// Metadata for one face, valid regardless of the dirty state
    pub fn face_meta(&self, index: usize) -> FaceMeta {
        let face = &self.faces[index];
        if self.dirty {
            face.compute_meta(&self.vertices)
        } else {
            face.meta
        }
    }

    /// Positions of a face's corners
    pub fn face_vertices(&self, face: &QuadFace) -> impl Iterator<Item = &Vec3> + '_ {
        face.indices().map(move |i| &self.vertices[i])
    }
}

/// An opaque image handle plus the texture coordinates of each face corner.
///
/// Coordinates are in the image's own units (usually pixels); the fourth
/// pair is ignored for triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo<I> {
    pub image: I,
    pub coords: [Vec2; 4],
}

impl<I> TextureInfo<I> {
    pub fn new(image: I, coords: [Vec2; 4]) -> Self {
        Self { image, coords }
    }
}
