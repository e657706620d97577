/// Point and vector helpers on top of nalgebra
///
/// Positions and directions share one type; the library never needs the
/// affine point/vector distinction nalgebra's `Point3` enforces, and faces
/// average and offset positions freely.
use nalgebra::{Vector2, Vector3};

/// A 2D surface-space point or vector
pub type Vec2 = Vector2<f64>;

/// A 3D object, world or camera space point or vector
pub type Vec3 = Vector3<f64>;

/// Unit vector in the direction of `v`.
///
/// A zero vector yields non-finite components; callers keep degenerate input
/// out of this path.
pub fn unit(v: &Vec3) -> Vec3 {
    v / v.norm()
}

/// Linear interpolation from `a` (t = 0) to `b` (t = 1)
pub fn lerp(a: &Vec3, b: &Vec3, t: f64) -> Vec3 {
    a + (b - a) * t
}

/// Unweighted average of a set of points
pub fn average<'a, I>(points: I) -> Vec3
where
    I: IntoIterator<Item = &'a Vec3>,
{
    let mut sum = Vec3::zeros();
    let mut count = 0usize;
    for point in points {
        sum += point;
        count += 1;
    }
    sum / count as f64
}

/// Moves `a` and `b` apart by `distance` each along the line joining them.
///
/// Used in place on projected polygons to hide hairline seams between
/// adjacent filled faces.
pub fn push_apart(a: &mut Vec2, b: &mut Vec2, distance: f64) {
    let delta = *b - *a;
    let length = delta.norm();
    if length == 0.0 {
        return;
    }
    let step = delta * (distance / length);
    *b += step;
    *a -= step;
}
