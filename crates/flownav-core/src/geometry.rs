//! Heading and angle math shared by the planner and the pilot.

use glam::DVec3;
use std::f64::consts::PI;

/// Heading of a vector's planar (x, y) projection, in radians.
///
/// Convention used throughout: yaw 0 faces +X, positive angles turn
/// counter-clockwise about +Z.
pub fn planar_heading(v: DVec3) -> f64 {
    v.y.atan2(v.x)
}

/// Normalize an angle to (-PI, PI]. Angles already in range pass through
/// untouched.
pub fn normalize_angle(angle: f64) -> f64 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    PI - (PI - angle).rem_euclid(2.0 * PI)
}

/// Signed shortest rotation taking heading `from` onto heading `to`.
pub fn shortest_rotation(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}

/// Convert radians to the centidegree unit used by the actuation protocol.
pub fn radians_to_centidegrees(angle: f64) -> i32 {
    (angle.to_degrees() * 100.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn heading_follows_planar_projection() {
        assert_eq!(planar_heading(DVec3::new(1.0, 0.0, 0.0)), 0.0);
        assert_eq!(planar_heading(DVec3::new(0.0, 1.0, 3.0)), FRAC_PI_2);
        assert_eq!(planar_heading(DVec3::new(0.0, -2.0, -1.0)), -FRAC_PI_2);
        assert!((planar_heading(DVec3::new(-1.0, 0.0, 0.0)) - PI).abs() < 1e-12);
    }

    #[test]
    fn normalize_wraps_into_half_open_range() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(PI), PI);
        assert_eq!(normalize_angle(-PI), PI);
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((normalize_angle(1.5 * PI) + 0.5 * PI).abs() < 1e-12);
        assert!((normalize_angle(-2.5 * PI) + 0.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn normalize_is_exact_for_in_range_angles() {
        let angle = 4.0_f64.atan2(5.0);
        assert_eq!(normalize_angle(angle), angle);
    }

    #[test]
    fn shortest_rotation_picks_the_near_side() {
        let rot = shortest_rotation(0.9 * PI, -0.9 * PI);
        assert!((rot - 0.2 * PI).abs() < 1e-12);
        let rot = shortest_rotation(-0.9 * PI, 0.9 * PI);
        assert!((rot + 0.2 * PI).abs() < 1e-12);
    }

    #[test]
    fn centidegree_conversion_rounds() {
        assert_eq!(radians_to_centidegrees(PI), 18000);
        assert_eq!(radians_to_centidegrees(FRAC_PI_2), 9000);
        assert_eq!(radians_to_centidegrees(0.0), 0);
    }
}
