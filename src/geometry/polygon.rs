use crate::errors::GeometryError;
use crate::geometry::distances2::{dist, mid_point, signed_area};
use crate::geometry::panel::Panel;
use crate::serialize::serialize_points;
use itertools::Itertools;
use ncollide2d::na::Point2;
use serde::Serialize;
use tracing::trace;

/// Default distance under which two points are considered the same node.
pub const DEFAULT_TOL: f64 = 1e-9;

/// Relative area (against the squared bounding box diagonal) under which a polygon is treated as
/// having no interior.
const DEGENERATE_AREA: f64 = 1e-12;

/// A closed airfoil contour, traversed counter-clockwise and starting at the trailing edge node.
///
/// The ring is stored without repeating its first point; `closed_points` returns it with the
/// closing point appended. Traversal goes from the trailing edge over the upper surface to the
/// leading edge and back along the lower surface, so the first and last edges are the ones
/// adjacent to the trailing edge.
#[derive(Debug, Clone, Serialize)]
pub struct ClosedPolygon {
    #[serde(serialize_with = "serialize_points")]
    vertices: Vec<Point2<f64>>,
    area: f64,
    reversed: bool,
}

impl ClosedPolygon {
    /// Create a closed polygon from a ring of points. Adjacent duplicates and a closing point
    /// equal to the first one are removed, the winding is made counter-clockwise and the ring is
    /// rotated so that it starts at the trailing edge.
    pub fn from_points(points: &[Point2<f64>], tol: f64) -> Result<ClosedPolygon, GeometryError> {
        if let Some(index) = points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(GeometryError::NonFinite { index });
        }

        let mut vertices = points.to_vec();
        vertices.dedup_by(|a, b| dist(a, b) <= tol);
        if vertices.len() > 1 && dist(&vertices[0], &vertices[vertices.len() - 1]) <= tol {
            vertices.pop();
        }

        if vertices.len() < 3 {
            return Err(GeometryError::NotEnoughPoints {
                found: vertices.len(),
                required: 3,
            });
        }

        let mut area = signed_area(&vertices);
        let extent = bounding_diagonal(&vertices);
        if area.abs() <= DEGENERATE_AREA * extent * extent {
            return Err(GeometryError::Degenerate { area });
        }

        let reversed = area < 0.0;
        if reversed {
            vertices[1..].reverse();
            area = -area;
        }

        let start = trailing_edge_index(&mut vertices, tol);
        vertices.rotate_left(start);

        Ok(ClosedPolygon {
            vertices,
            area,
            reversed,
        })
    }

    /// The ring without its closing point
    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    /// The ring with the first point repeated at the end
    pub fn closed_points(&self) -> Vec<Point2<f64>> {
        let mut points = self.vertices.clone();
        points.push(self.vertices[0]);
        points
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Enclosed area, always positive after the winding correction
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Whether the input ring was clockwise and had to be reversed
    pub fn was_reversed(&self) -> bool {
        self.reversed
    }

    pub fn trailing_edge(&self) -> Point2<f64> {
        self.vertices[0]
    }

    /// The vertex farthest from the trailing edge
    pub fn leading_edge(&self) -> Point2<f64> {
        let te = self.trailing_edge();
        self.vertices
            .iter()
            .copied()
            .max_by(|a, b| dist(a, &te).total_cmp(&dist(b, &te)))
            .unwrap_or(te)
    }

    /// Chordwise extent of the polygon, max x minus min x
    pub fn chord(&self) -> f64 {
        x_extent(&self.vertices)
    }

    /// Total length of the boundary
    pub fn perimeter(&self) -> f64 {
        self.closed_points()
            .iter()
            .tuple_windows()
            .map(|(a, b)| dist(a, b))
            .sum()
    }

    /// One panel per polygon edge, in traversal order.
    pub fn panels(&self) -> Result<Vec<Panel>, GeometryError> {
        Panel::from_nodes(&self.closed_points(), DEFAULT_TOL)
    }
}

/// Max x minus min x over a set of points
fn x_extent(points: &[Point2<f64>]) -> f64 {
    points
        .iter()
        .map(|p| p.x)
        .minmax_by(|a, b| a.total_cmp(b))
        .into_option()
        .map_or(0.0, |(lo, hi)| hi - lo)
}

fn bounding_diagonal(points: &[Point2<f64>]) -> f64 {
    let ys = points
        .iter()
        .map(|p| p.y)
        .minmax_by(|a, b| a.total_cmp(b))
        .into_option()
        .map_or(0.0, |(lo, hi)| hi - lo);
    x_extent(points).hypot(ys)
}

/// Finds the trailing edge node, the vertex with the largest x. Two adjacent vertices sharing the
/// largest x (an open or blunt trailing edge) get their midpoint inserted between them, which
/// becomes the trailing edge. With more ties the vertex nearest the mean y of the tied set wins.
fn trailing_edge_index(vertices: &mut Vec<Point2<f64>>, tol: f64) -> usize {
    let n = vertices.len();
    let x_max = vertices
        .iter()
        .map(|p| p.x)
        .fold(f64::NEG_INFINITY, f64::max);
    let tied: Vec<usize> = (0..n).filter(|&i| x_max - vertices[i].x <= tol).collect();
    trace!(tied = tied.len(), "trailing edge candidates");

    if let &[a, b] = tied.as_slice() {
        if b == a + 1 {
            let m = mid_point(&vertices[a], &vertices[b]);
            vertices.insert(b, m);
            return b;
        }
        if a == 0 && b == n - 1 {
            let m = mid_point(&vertices[b], &vertices[a]);
            vertices.push(m);
            return n;
        }
    }

    let mean_y = tied.iter().map(|&i| vertices[i].y).sum::<f64>() / tied.len() as f64;
    tied.iter()
        .copied()
        .min_by(|&i, &j| {
            let di = (vertices[i].y - mean_y).abs();
            let dj = (vertices[j].y - mean_y).abs();
            di.total_cmp(&dj).then(i.cmp(&j))
        })
        .unwrap_or(0)
}
