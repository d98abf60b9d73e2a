use crate::algorithms::preceding_index_search;
use crate::errors::GeometryError;
use crate::geometry::common::IndexAndFraction;
use crate::geometry::distances2::dist;
use ncollide2d::na::Point2;
use ncollide2d::shape::Polyline;

/// A Curve2 is a 2 dimensional polygonal chain in which its points are connected, parameterized
/// by cumulative arc length. It is what the panel solver resamples so that its resolution is
/// decoupled from however many points the caller's geometry contained.
pub struct Curve2 {
    line: Polyline<f64>,
    lengths: Vec<f64>,
    is_closed: bool,
}

impl Curve2 {
    fn last_vi(&self) -> usize {
        self.line.points().len() - 1
    }

    pub fn length(&self) -> f64 {
        *self.lengths.last().unwrap_or(&0.0)
    }

    /// Finds the edge containing the point at arc length `l` (clamped to the curve) and the
    /// fraction of the way along that edge. At `l >= length` this is the last edge at 1.0.
    pub fn at_length(&self, l: f64) -> IndexAndFraction {
        let d = l.clamp(0.0, self.length());
        let index = preceding_index_search(&self.lengths, d);

        if index >= self.last_vi() {
            IndexAndFraction::new(self.last_vi() - 1, 1.0)
        } else {
            let f = (d - self.lengths[index]) / (self.lengths[index + 1] - self.lengths[index]);
            IndexAndFraction::new(index, f)
        }
    }

    pub fn point_at(&self, l: f64) -> Point2<f64> {
        let IndexAndFraction { i, f } = self.at_length(l);
        let p = self.line.points()[i];
        let v = self.line.points()[i + 1] - p;
        p + f * v
    }

    /// Places `segments + 1` nodes at uniform arc length intervals from the start of the curve to
    /// its end. On a closed curve the final node is set to exactly the first one.
    pub fn resample_uniform(&self, segments: usize) -> Vec<Point2<f64>> {
        let total = self.length();
        let mut nodes: Vec<Point2<f64>> = (0..=segments)
            .map(|k| self.point_at(total * k as f64 / segments as f64))
            .collect();

        if self.is_closed {
            if let Some(first) = nodes.first().copied() {
                nodes[segments] = first;
            }
        }

        nodes
    }

    /// Builds a curve from points, removing adjacent duplicates within `tol`. With
    /// `force_closed` the first point is appended when the ends do not already coincide.
    pub fn from_points(
        points: &[Point2<f64>],
        tol: f64,
        force_closed: bool,
    ) -> Result<Self, GeometryError> {
        let mut pts = points.to_vec();
        pts.dedup_by(|a, b| dist(a, b) <= tol);

        if pts.len() < 2 {
            return Err(GeometryError::NotEnoughPoints {
                found: pts.len(),
                required: 2,
            });
        }

        if let (true, Some(start), Some(end)) = (force_closed, pts.first(), pts.last()) {
            if dist(start, end) > tol {
                pts.push(*start);
            }
        }

        let is_closed = pts.len() > 2 && dist(&pts[0], &pts[pts.len() - 1]) <= tol;

        // Edge i joins vertex i with vertex i + 1 because no explicit indices are given
        let line = Polyline::new(pts, None);

        let mut lengths: Vec<f64> = vec![0.0];
        for w in line.points().windows(2) {
            let d = dist(&w[0], &w[1]);
            lengths.push(d + lengths.last().unwrap_or(&0.0));
        }

        Ok(Curve2 {
            line,
            lengths,
            is_closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn sample1() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
    }

    fn sample2() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]
    }

    fn sample_points(p: &[(f64, f64)]) -> Vec<Point2<f64>> {
        p.iter().map(|(a, b)| Point2::new(*a, *b)).collect()
    }

    #[test]
    fn test_create_open() {
        let points = sample_points(&sample1());
        let curve = Curve2::from_points(&points, 1e-6, false).unwrap();

        assert!(!curve.is_closed);
        assert_relative_eq!(3.0, curve.length(), epsilon = 1e-10);
    }

    #[test]
    fn test_create_force_closed() {
        let points = sample_points(&sample1());
        let curve = Curve2::from_points(&points, 1e-6, true).unwrap();

        assert!(curve.is_closed);
        assert_eq!(4, curve.line.edges().len());
        assert_relative_eq!(4.0, curve.length(), epsilon = 1e-10);
    }

    #[test]
    fn test_create_naturally_closed() {
        let points = sample_points(&sample2());
        let curve = Curve2::from_points(&points, 1e-6, false).unwrap();

        assert!(curve.is_closed);
        assert_relative_eq!(4.0, curve.length(), epsilon = 1e-10);
    }

    #[test]
    fn test_duplicates_removed() {
        let points = sample_points(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.0, 1e-9), (1.0, 1.0)]);
        let curve = Curve2::from_points(&points, 1e-6, false).unwrap();
        assert_eq!(3, curve.line.points().len());
    }

    #[test]
    fn test_not_enough_points() {
        let points = sample_points(&[(0.0, 0.0), (0.0, 0.0)]);
        let result = Curve2::from_points(&points, 1e-6, false);
        assert!(matches!(
            result,
            Err(GeometryError::NotEnoughPoints { found: 1, .. })
        ));
    }

    #[test_case(0.5, 0, 0.5)]
    #[test_case(-0.5, 0, 0.0)]
    #[test_case(0.0, 0, 0.0)]
    #[test_case(5.0, 3, 1.0)]
    #[test_case(2.0, 2, 0.0)]
    #[test_case(2.25, 2, 0.25)]
    fn test_lengths(l: f64, ei: usize, ef: f64) {
        let points = sample_points(&sample1());
        let curve = Curve2::from_points(&points, 1e-6, true).unwrap();

        let r = curve.at_length(l);
        assert_eq!(ei, r.i);
        assert_relative_eq!(ef, r.f, epsilon = 1e-8);
    }

    #[test_case(0.5, (0.5, 0.0))]
    #[test_case(-0.5, (0.0, 0.0))]
    #[test_case(0.0, (0.0, 0.0))]
    #[test_case(5.0, (0.0, 0.0))]
    #[test_case(2.0, (1.0, 1.0))]
    #[test_case(2.25, (0.75, 1.0))]
    fn test_points_at_length(l: f64, e: (f64, f64)) {
        let points = sample_points(&sample1());
        let curve = Curve2::from_points(&points, 1e-6, true).unwrap();
        let result = curve.point_at(l);

        assert_relative_eq!(e.0, result.x, epsilon = 1e-8);
        assert_relative_eq!(e.1, result.y, epsilon = 1e-8);
    }

    #[test]
    fn test_resample_uniform_closed() {
        let points = sample_points(&sample1());
        let curve = Curve2::from_points(&points, 1e-6, true).unwrap();
        let nodes = curve.resample_uniform(8);

        assert_eq!(9, nodes.len());
        assert_eq!(nodes[0], nodes[8]);
        for w in nodes.windows(2) {
            assert_relative_eq!(0.5, dist(&w[0], &w[1]), epsilon = 1e-10);
        }
    }
}
