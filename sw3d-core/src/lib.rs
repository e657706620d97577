/// SW3D Core Library - Software 3D to 2D rendering pipeline
///
/// Meshes and bezier paths are transformed, culled, projected and
/// depth-sorted here, then drawn through any 2D vector surface that
/// implements [`Surface`]. Mesh builders and operators live alongside.

pub mod affine;
pub mod config;
pub mod extrude;
pub mod geometry;
pub mod mesh_ops;
pub mod path;
pub mod path_utils;
pub mod projection;
pub mod renderer;
pub mod shapes;
pub mod stl;
pub mod surface;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use affine::{Affine2D, AffineMatrix};
pub use config::{ConfigError, RenderConfig};
pub use extrude::Extruder;
pub use geometry::{FaceMeta, QuadFace, Rgba, Shape, TextureInfo};
pub use path::{Curve, Path};
pub use projection::{Camera, Viewport};
pub use renderer::{DrawRecord, FaceAction, PathOptions, RenderState, Renderer};
pub use stl::StlError;
pub use surface::{CommandRecorder, DrawCommand, Surface};
pub use transform::Transform;
pub use vector::{Vec2, Vec3};
