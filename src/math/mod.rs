/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns the point on segment `a`–`b` closest to `point`.
#[must_use]
pub fn closest_point_on_segment(point: &Point3, a: &Point3, b: &Point3) -> Point3 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        // Degenerate segment (zero length).
        return *a;
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Returns the midpoint between two points.
#[must_use]
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    Point3::from((a.coords + b.coords) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn closest_point_clamps_to_segment_ends() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);

        let inside = closest_point_on_segment(&Point3::new(1.0, 3.0, 0.0), &a, &b);
        assert_relative_eq!(inside, Point3::new(1.0, 0.0, 0.0));

        let beyond = closest_point_on_segment(&Point3::new(5.0, 1.0, 0.0), &a, &b);
        assert_relative_eq!(beyond, b);
    }

    #[test]
    fn degenerate_segment_returns_start() {
        let a = Point3::new(1.0, 1.0, 1.0);
        let p = closest_point_on_segment(&Point3::new(4.0, 0.0, 0.0), &a, &a);
        assert_relative_eq!(p, a);
    }
}
