/// Camera and pinhole projection onto the drawing surface
use crate::transform::Transform;
use crate::vector::{unit, Vec2, Vec3};

/// Camera configuration for 3D rendering.
///
/// `transform` maps world space into camera space, where the camera sits at
/// the origin looking down -z with +y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub transform: Transform,
    pub focal_length: f64,
}

impl Camera {
    pub fn new(focal_length: f64) -> Self {
        debug_assert!(focal_length > 0.0);
        Self {
            transform: Transform::new(),
            focal_length,
        }
    }

    /// Places the camera at `eye` looking towards `target`.
    ///
    /// `up` must not be parallel to the viewing direction.
    pub fn look_at(&mut self, eye: &Vec3, target: &Vec3, up: &Vec3) {
        let w = unit(&(eye - target));
        let u = unit(&up.cross(&w));
        let v = w.cross(&u);

        self.transform.reset();
        self.transform.set_basis(&u, &v, &w);
        let offset = -self.transform.transform_point(eye);
        self.transform.translate_pre(offset.x, offset.y, offset.z);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Surface dimensions and the projection derived from them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
    scale: f64,
    x_offset: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scale: height / 2.0,
            x_offset: width / 2.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Projects a camera-space point to surface coordinates.
    ///
    /// The surface's y axis points down. A point with `z == 0` projects to a
    /// non-finite position; buffered faces never get here because the
    /// renderer culls anything with `z >= -1`.
    pub fn project(&self, point: &Vec3, focal_length: f64) -> Vec2 {
        let perspective = focal_length / -point.z;
        Vec2::new(
            point.x * perspective * self.scale + self.x_offset,
            point.y * perspective * -self.scale + self.scale,
        )
    }
}
