//! Polygon capture: clicked ground points and closure detection

use shared::{Point2D, CLOSE_DISTANCE};

/// Result of feeding one click into the capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Point appended, outline still open
    Appended,
    /// Point appended and it closed the outline
    Closed,
    /// Outline already closed; the click changed nothing
    Ignored,
}

/// The closure rule: more than two points, last within `CLOSE_DISTANCE` of first
pub fn closes_shape(points: &[[f64; 2]]) -> bool {
    if points.len() <= 2 {
        return false;
    }
    let first = Point2D::from(points[0]);
    let last = Point2D::from(points[points.len() - 1]);
    first.distance_to(&last) < CLOSE_DISTANCE
}

/// Ordered ground points (X/Z) plus the one-way closed flag
#[derive(Debug, Default, Clone)]
pub struct CaptureState {
    points: Vec<[f64; 2]>,
    closed: bool,
    /// Incremented on every change, for render caches
    version: u64,
}

impl CaptureState {
    /// Feed a ground hit. Appends while open; once closed, clicks are ignored.
    pub fn push_point(&mut self, p: [f64; 2]) -> CaptureEvent {
        if self.closed {
            tracing::debug!("Click at ({:.3}, {:.3}) after closure ignored", p[0], p[1]);
            return CaptureEvent::Ignored;
        }

        self.points.push(p);
        self.version += 1;

        if closes_shape(&self.points) {
            self.closed = true;
            tracing::info!("Outline closed with {} points", self.points.len());
            CaptureEvent::Closed
        } else {
            tracing::debug!("Point {} at ({:.3}, {:.3})", self.points.len(), p[0], p[1]);
            CaptureEvent::Appended
        }
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Points to draw as the preview polyline: only while open, with at least two points
    pub fn outline(&self) -> Option<&[[f64; 2]]> {
        if self.closed || self.points.len() < 2 {
            None
        } else {
            Some(&self.points)
        }
    }

    pub fn to_points2d(&self) -> Vec<Point2D> {
        self.points.iter().copied().map(Point2D::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_points_never_close() {
        assert!(!closes_shape(&[[0.0, 0.0], [0.0, 0.0]]));
        assert!(!closes_shape(&[[0.0, 0.0]]));
        assert!(!closes_shape(&[]));
    }

    #[test]
    fn test_closure_threshold_is_strict() {
        assert!(closes_shape(&[[0.0, 0.0], [1.0, 0.0], [0.19, 0.0]]));
        assert!(!closes_shape(&[[0.0, 0.0], [1.0, 0.0], [0.2, 0.0]]));
        assert!(!closes_shape(&[[0.0, 0.0], [1.0, 0.0], [0.5, 0.5]]));
    }

    #[test]
    fn test_closure_rule_over_sequences() {
        // Closure iff len > 2 and |first - last| < 0.2, for a sweep of last points
        let base = [[0.0, 0.0], [3.0, 0.0], [3.0, 3.0]];
        for i in 0..=40 {
            let d = i as f64 * 0.01;
            let mut pts = base.to_vec();
            pts.push([d, 0.0]);
            assert_eq!(closes_shape(&pts), d < 0.2, "d = {d}");
        }
    }

    #[test]
    fn test_push_until_closed() {
        let mut c = CaptureState::default();
        assert_eq!(c.push_point([0.0, 0.0]), CaptureEvent::Appended);
        assert_eq!(c.push_point([2.0, 0.0]), CaptureEvent::Appended);
        assert_eq!(c.push_point([2.0, 2.0]), CaptureEvent::Appended);
        assert!(!c.is_closed());
        assert_eq!(c.push_point([0.05, 0.05]), CaptureEvent::Closed);
        assert!(c.is_closed());
        assert_eq!(c.len(), 4);
    }

    #[test]
    fn test_clicks_after_closure_ignored() {
        let mut c = CaptureState::default();
        for p in [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.1]] {
            c.push_point(p);
        }
        assert!(c.is_closed());
        let v = c.version();
        assert_eq!(c.push_point([4.0, 4.0]), CaptureEvent::Ignored);
        assert_eq!(c.push_point([0.0, 0.0]), CaptureEvent::Ignored);
        assert!(c.is_closed());
        assert_eq!(c.len(), 4);
        assert_eq!(c.version(), v);
    }

    #[test]
    fn test_second_point_near_start_does_not_close() {
        let mut c = CaptureState::default();
        c.push_point([0.0, 0.0]);
        assert_eq!(c.push_point([0.1, 0.0]), CaptureEvent::Appended);
        assert!(!c.is_closed());
    }

    #[test]
    fn test_outline_visibility() {
        let mut c = CaptureState::default();
        assert!(c.outline().is_none());
        c.push_point([0.0, 0.0]);
        assert!(c.outline().is_none());
        c.push_point([1.0, 0.0]);
        assert_eq!(c.outline().map(|o| o.len()), Some(2));
        c.push_point([1.0, 1.0]);
        c.push_point([0.0, 0.0]);
        assert!(c.outline().is_none());
    }
}
