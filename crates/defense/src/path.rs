//! Arc-length parameterized polyline that enemies walk along

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    start: Vec2,
    end: Vec2,
    length: f32,
    /// Distance along the path where this segment begins
    start_distance: f32,
}

impl Segment {
    fn end_distance(&self) -> f32 {
        self.start_distance + self.length
    }

    /// Distance from `point` to the closest point on this segment
    fn distance_to(&self, point: Vec2) -> f32 {
        let along = self.end - self.start;
        let t = ((point - self.start).dot(along) / along.length_squared()).clamp(0.0, 1.0);
        point.distance(self.start + along * t)
    }
}

/// Immutable path built once from waypoints
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    points: Vec<Vec2>,
    segments: Vec<Segment>,
    total_length: f32,
}

impl Path {
    /// Precompute segment lengths and cumulative distances.
    ///
    /// Zero-length segments (repeated waypoints) are skipped.
    pub fn new(points: Vec<Vec2>) -> Self {
        let mut segments = Vec::with_capacity(points.len().saturating_sub(1));
        let mut total_length = 0.0;

        for pair in points.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let length = start.distance(end);
            if length == 0.0 {
                continue;
            }
            segments.push(Segment {
                start,
                end,
                length,
                start_distance: total_length,
            });
            total_length += length;
        }

        Self {
            points,
            segments,
            total_length,
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Where enemies enter the field
    pub fn start(&self) -> Vec2 {
        self.points.first().copied().unwrap_or(Vec2::ZERO)
    }

    /// Position `distance` units along the path (clamped to its ends)
    pub fn point_at_distance(&self, distance: f32) -> Vec2 {
        let Some(last) = self.segments.last() else {
            return self.start();
        };

        let d = distance.clamp(0.0, self.total_length);
        for segment in &self.segments {
            if d <= segment.end_distance() {
                let t = (d - segment.start_distance) / segment.length;
                return segment.start.lerp(segment.end, t);
            }
        }

        last.end
    }

    /// Shortest distance from `point` to any segment; infinite for an empty path
    pub fn distance_to_point(&self, point: Vec2) -> f32 {
        self.segments
            .iter()
            .map(|segment| segment.distance_to(point))
            .fold(f32::INFINITY, f32::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefenseConfig;

    fn square() -> Path {
        Path::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 50.0),
        ])
    }

    #[test]
    fn endpoints_match_waypoints() {
        let path = square();
        assert_eq!(path.total_length(), 150.0);
        assert_eq!(path.point_at_distance(0.0), Vec2::new(0.0, 0.0));
        assert_eq!(path.point_at_distance(150.0), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn distance_is_clamped() {
        let path = square();
        assert_eq!(path.point_at_distance(-10.0), Vec2::new(0.0, 0.0));
        assert_eq!(path.point_at_distance(1_000.0), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn continuous_across_segment_boundary() {
        let path = square();
        let before = path.point_at_distance(100.0 - 0.01);
        let at = path.point_at_distance(100.0);
        let after = path.point_at_distance(100.0 + 0.01);
        assert_eq!(at, Vec2::new(100.0, 0.0));
        assert!(before.distance(at) < 0.02);
        assert!(after.distance(at) < 0.02);
    }

    #[test]
    fn default_path_length() {
        let path = Path::new(DefenseConfig::default().waypoints);
        assert_eq!(path.total_length(), 1580.0);
        assert_eq!(path.point_at_distance(250.0), Vec2::new(210.0, 90.0));
    }

    #[test]
    fn repeated_waypoints_are_skipped() {
        let path = Path::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 40.0),
        ]);
        assert_eq!(path.total_length(), 40.0);
        assert_eq!(path.point_at_distance(20.0), Vec2::new(0.0, 20.0));
    }

    #[test]
    fn distance_to_point_uses_closest_segment() {
        let path = square();
        assert_eq!(path.distance_to_point(Vec2::new(50.0, 10.0)), 10.0);
        assert_eq!(path.distance_to_point(Vec2::new(130.0, 25.0)), 30.0);
        // Past the end of a segment the distance is to its endpoint.
        assert_eq!(path.distance_to_point(Vec2::new(-3.0, -4.0)), 5.0);
    }

    #[test]
    fn empty_path() {
        let path = Path::new(vec![Vec2::new(5.0, 5.0)]);
        assert_eq!(path.total_length(), 0.0);
        assert_eq!(path.point_at_distance(10.0), Vec2::new(5.0, 5.0));
        assert_eq!(path.distance_to_point(Vec2::ZERO), f32::INFINITY);

        let path = Path::new(Vec::new());
        assert_eq!(path.point_at_distance(1.0), Vec2::ZERO);
    }
}
