/// Path builders and curve fitting
use crate::path::{Curve, Path};
use crate::vector::Vec3;

/// Control point offset for a half circle of unit diameter drawn as one
/// cubic arc. `4/3` of the radius puts the arc's midpoint exactly on the
/// circle.
pub const CIRCLE_KAPPA: f64 = 2.0 / 3.0;

/// A straight segment from `p0` to `p1`, as a cubic whose controls sit on
/// the endpoints
pub fn make_line(p0: Vec3, p1: Vec3) -> Path {
    Path {
        points: vec![p0, p1],
        curves: vec![Curve::cubic(0, 1, 1)],
        starting_point: Some(0),
    }
}

/// A closed circle of unit diameter around the origin in the XY plane,
/// made from two cubic half-circle arcs.
///
/// Starts and ends on point 0 at `(0.5, 0, 0)`.
pub fn make_circle() -> Path {
    let k = CIRCLE_KAPPA;
    Path {
        points: vec![
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(0.5, k, 0.0),
            Vec3::new(-0.5, k, 0.0),
            Vec3::new(-0.5, 0.0, 0.0),
            Vec3::new(-0.5, -k, 0.0),
            Vec3::new(0.5, -k, 0.0),
        ],
        curves: vec![Curve::cubic(1, 2, 3), Curve::cubic(4, 5, 0)],
        starting_point: Some(0),
    }
}

/// `count` unit-diameter rings in the XZ plane, descending one unit along
/// -y per ring as a single continuous helix
pub fn make_spiral(count: usize) -> Path {
    let k = CIRCLE_KAPPA;
    let mut path = Path {
        points: Vec::with_capacity(1 + count * 6),
        curves: Vec::with_capacity(count * 2),
        starting_point: Some(0),
    };
    path.points.push(Vec3::new(0.5, 0.0, 0.0));

    for half in 0..count * 2 {
        let y0 = -0.5 * half as f64;
        let y1 = y0 - 0.5;
        // Even halves sweep through +z, odd halves back through -z
        let (x, z) = if half % 2 == 0 { (0.5, k) } else { (-0.5, -k) };

        let base = path.points.len();
        path.points.push(Vec3::new(x, y0, z));
        path.points.push(Vec3::new(-x, y1, z));
        path.points.push(Vec3::new(-x, y1, 0.0));
        path.curves.push(Curve::cubic(base, base + 1, base + 2));
    }

    path
}

/// The control point of the quadratic from `p0` to `p2` that passes
/// through `p1` at `t = 0.5`
pub fn fit_quadratic_to_points(p0: &Vec3, p1: &Vec3, p2: &Vec3) -> Vec3 {
    p1 * 2.0 - (p0 + p2) * 0.5
}
