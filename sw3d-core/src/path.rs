/// Piecewise bezier paths in object space
use crate::vector::Vec3;

/// One bezier segment of a path.
///
/// All fields are indices into the owning path's point list. A curve starts
/// where the previous curve (or the path's starting point) ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Quadratic { control: usize, end: usize },
    Cubic { control1: usize, control2: usize, end: usize },
}

impl Curve {
    pub fn quadratic(control: usize, end: usize) -> Self {
        Curve::Quadratic { control, end }
    }

    pub fn cubic(control1: usize, control2: usize, end: usize) -> Self {
        Curve::Cubic { control1, control2, end }
    }

    /// Index of the point this curve ends on
    pub fn end(&self) -> usize {
        match *self {
            Curve::Quadratic { end, .. } | Curve::Cubic { end, .. } => end,
        }
    }

    /// Evaluates the curve at `t` in `[0, 1]`, starting from `start`
    pub fn point_at(&self, start: &Vec3, points: &[Vec3], t: f64) -> Vec3 {
        let mt = 1.0 - t;
        match *self {
            Curve::Quadratic { control, end } => {
                start * (mt * mt) + points[control] * (2.0 * mt * t) + points[end] * (t * t)
            }
            Curve::Cubic { control1, control2, end } => {
                start * (mt * mt * mt)
                    + points[control1] * (3.0 * mt * mt * t)
                    + points[control2] * (3.0 * mt * t * t)
                    + points[end] * (t * t * t)
            }
        }
    }
}

/// A continuous poly-curve.
///
/// Tracing begins at `points[starting_point]`, or at the object-space
/// origin when no starting point is set, and follows the curves in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub points: Vec<Vec3>,
    pub curves: Vec<Curve>,
    pub starting_point: Option<usize>,
}

impl Path {
    /// The point tracing begins from
    pub fn start(&self) -> Vec3 {
        match self.starting_point {
            Some(index) => self.points[index],
            None => Vec3::zeros(),
        }
    }

    /// Start point of every curve, in order
    pub fn curve_starts(&self) -> Vec<Vec3> {
        let mut current = self.start();
        let mut starts = Vec::with_capacity(self.curves.len());
        for curve in &self.curves {
            starts.push(current);
            current = self.points[curve.end()];
        }
        starts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_implicit_origin_start() {
        let path = Path {
            points: vec![Vec3::new(1.0, 1.0, 0.0), Vec3::new(2.0, 0.0, 0.0)],
            curves: vec![Curve::quadratic(0, 1)],
            starting_point: None,
        };
        assert_eq!(path.start(), Vec3::zeros());
        assert_relative_eq!(
            path.curves[0].point_at(&path.start(), &path.points, 0.5),
            Vec3::new(1.0, 0.5, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_cubic_end_points() {
        let points = vec![
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ];
        let curve = Curve::cubic(0, 1, 2);
        let start = Vec3::zeros();
        assert_relative_eq!(curve.point_at(&start, &points, 0.0), start, epsilon = 1e-12);
        assert_relative_eq!(curve.point_at(&start, &points, 1.0), points[2], epsilon = 1e-12);
        assert_eq!(curve.end(), 2);
    }
}
