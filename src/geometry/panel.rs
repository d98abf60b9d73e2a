use crate::errors::GeometryError;
use crate::geometry::distances2::{dist, mid_point};
use crate::serialize::{Point2f64, Vector2f64};
use itertools::Itertools;
use ncollide2d::na::{Point2, Vector2};
use serde::Serialize;

/// A straight segment of the discretized boundary carrying a uniform-strength singularity.
///
/// The outward normal assumes the counter-clockwise traversal that `ClosedPolygon` guarantees:
/// it is the tangent turned clockwise by a right angle.
#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    #[serde(with = "Point2f64")]
    pub start: Point2<f64>,

    #[serde(with = "Point2f64")]
    pub end: Point2<f64>,

    pub length: f64,

    #[serde(with = "Vector2f64")]
    pub tangent: Vector2<f64>,

    #[serde(with = "Vector2f64")]
    pub normal: Vector2<f64>,

    /// Control point where boundary conditions are enforced
    #[serde(with = "Point2f64")]
    pub midpoint: Point2<f64>,
}

impl Panel {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Panel {
        let length = dist(&start, &end);
        let tangent = (end - start) / length;
        Panel {
            start,
            end,
            length,
            tangent,
            normal: Vector2::new(tangent.y, -tangent.x),
            midpoint: mid_point(&start, &end),
        }
    }

    /// The panel's inward normal, which completes the right-handed local frame whose x axis is
    /// the tangent.
    pub fn inward(&self) -> Vector2<f64> {
        -self.normal
    }

    /// Build one panel per consecutive pair of nodes. A closed chain of `n + 1` nodes yields `n`
    /// panels in the same order.
    pub fn from_nodes(nodes: &[Point2<f64>], tol: f64) -> Result<Vec<Panel>, GeometryError> {
        nodes
            .iter()
            .tuple_windows()
            .enumerate()
            .map(|(index, (a, b))| {
                if dist(a, b) <= tol {
                    Err(GeometryError::ZeroLengthPanel { index })
                } else {
                    Ok(Panel::new(*a, *b))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test_case((0.0, 0.0), (0.0, 1.0), (1.0, 0.0))]
    #[test_case((1.0, 0.0), (0.0, 0.0), (0.0, 1.0))]
    #[test_case((0.0, 0.0), (1.0, 0.0), (0.0, -1.0))]
    fn test_outward_normal(a: (f64, f64), b: (f64, f64), n: (f64, f64)) {
        let panel = Panel::new(Point2::new(a.0, a.1), Point2::new(b.0, b.1));
        assert_relative_eq!(n.0, panel.normal.x, epsilon = 1e-12);
        assert_relative_eq!(n.1, panel.normal.y, epsilon = 1e-12);
        assert_relative_eq!(0.0, panel.normal.dot(&panel.tangent), epsilon = 1e-12);
        assert_relative_eq!(-n.0, panel.inward().x, epsilon = 1e-12);
    }

    #[test]
    fn test_geometry() {
        let panel = Panel::new(Point2::new(1.0, 1.0), Point2::new(4.0, 5.0));
        assert_relative_eq!(5.0, panel.length, epsilon = 1e-12);
        assert_relative_eq!(0.6, panel.tangent.x, epsilon = 1e-12);
        assert_relative_eq!(0.8, panel.tangent.y, epsilon = 1e-12);
        assert_relative_eq!(2.5, panel.midpoint.x, epsilon = 1e-12);
        assert_relative_eq!(3.0, panel.midpoint.y, epsilon = 1e-12);
    }

    #[test]
    fn test_from_nodes_rejects_zero_length() {
        let nodes = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let result = Panel::from_nodes(&nodes, 1e-9);
        assert!(matches!(
            result,
            Err(GeometryError::ZeroLengthPanel { index: 1 })
        ));
    }

    #[test]
    fn test_from_nodes_count() {
        let nodes = vec![
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(-1.0, 0.0),
            Point2::new(0.0, -1.0),
            Point2::new(1.0, 0.0),
        ];
        let panels = Panel::from_nodes(&nodes, 1e-9).unwrap();
        assert_eq!(4, panels.len());
        // Counter-clockwise square: normals point away from the origin
        for p in panels.iter() {
            assert!(p.normal.dot(&p.midpoint.coords) > 0.0);
        }
    }
}
