use crate::algorithms::{interp, linspace};
use crate::errors::GeometryError;
use crate::geometry::distances2::dist;
use crate::geometry::polygon::ClosedPolygon;
use itertools::Itertools;
use ncollide2d::na::Point2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Number of points of the uniform x grid caller surfaces are resampled onto before stitching.
/// It is large enough that solver accuracy does not depend on how sparse the caller's grid was.
pub const DENSE_SOLVER_POINTS: usize = 801;

/// Upper and lower surface ordinates sampled at shared chordwise stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSamples {
    pub x: Vec<f64>,
    pub yu: Vec<f64>,
    pub yl: Vec<f64>,
}

impl SurfaceSamples {
    /// Checks that the three arrays have the same length, at least two entries and only finite
    /// values.
    pub fn new(x: Vec<f64>, yu: Vec<f64>, yl: Vec<f64>) -> Result<SurfaceSamples, GeometryError> {
        let samples = SurfaceSamples { x, yu, yl };
        samples.check_shape()?;

        let SurfaceSamples { x, yu, yl } = &samples;
        if let Some(index) =
            (0..x.len()).find(|&i| !(x[i].is_finite() && yu[i].is_finite() && yl[i].is_finite()))
        {
            return Err(GeometryError::NonFinite { index });
        }

        Ok(samples)
    }

    fn check_shape(&self) -> Result<(), GeometryError> {
        for (what, v) in [("upper surface", &self.yu), ("lower surface", &self.yl)] {
            if v.len() != self.x.len() {
                return Err(GeometryError::MismatchedLengths {
                    what,
                    expected: self.x.len(),
                    found: v.len(),
                });
            }
        }

        if self.x.len() < 2 {
            return Err(GeometryError::NotEnoughPoints {
                found: self.x.len(),
                required: 2,
            });
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// The same samples reordered by increasing x. The sort is stable, so stations sharing an x
    /// value keep their relative order.
    pub fn sorted(&self) -> SurfaceSamples {
        let order: Vec<usize> = (0..self.len())
            .sorted_by(|&a, &b| self.x[a].total_cmp(&self.x[b]))
            .collect();

        SurfaceSamples {
            x: order.iter().map(|&i| self.x[i]).collect(),
            yu: order.iter().map(|&i| self.yu[i]).collect(),
            yl: order.iter().map(|&i| self.yl[i]).collect(),
        }
    }

    /// Sorts the samples and linearly interpolates both surfaces onto `count` evenly spaced
    /// stations spanning the original x range. Both the samples and `count` need at least two
    /// stations.
    pub fn resampled(&self, count: usize) -> Result<SurfaceSamples, GeometryError> {
        self.check_shape()?;
        if count < 2 {
            return Err(GeometryError::NotEnoughPoints {
                found: count,
                required: 2,
            });
        }

        let s = self.sorted();
        let x = linspace(s.x[0], s.x[s.len() - 1], count);
        let yu = x.iter().map(|&q| interp(q, &s.x, &s.yu)).collect();
        let yl = x.iter().map(|&q| interp(q, &s.x, &s.yl)).collect();
        trace!(from = s.len(), to = count, "resampled surfaces");

        Ok(SurfaceSamples { x, yu, yl })
    }

    /// Mean of the upper and lower ordinates at every station
    pub fn camber(&self) -> Vec<f64> {
        self.yu
            .iter()
            .zip(self.yl.iter())
            .map(|(u, l)| 0.5 * (u + l))
            .collect()
    }

    /// Builds the closed ring: the upper surface from the first station to the last, then the
    /// lower surface back again without its end stations. A lower end station is kept only when
    /// it does not coincide with the upper one (open trailing edge or blunt nose).
    pub fn stitch(&self, tol: f64) -> Result<ClosedPolygon, GeometryError> {
        self.check_shape()?;
        let n = self.len();
        let mut ring: Vec<Point2<f64>> = Vec::with_capacity(2 * n);
        ring.extend((0..n).map(|i| Point2::new(self.x[i], self.yu[i])));

        if (self.yu[n - 1] - self.yl[n - 1]).abs() > tol {
            ring.push(Point2::new(self.x[n - 1], self.yl[n - 1]));
        }
        ring.extend((1..n - 1).rev().map(|i| Point2::new(self.x[i], self.yl[i])));
        if (self.yu[0] - self.yl[0]).abs() > tol {
            ring.push(Point2::new(self.x[0], self.yl[0]));
        }

        ClosedPolygon::from_points(&ring, tol)
    }
}

/// Stitch upper and lower surfaces that share the x grid into a closed polygon without
/// duplicating the leading or trailing edge node.
pub fn stitch_without_duplicates(
    x: &[f64],
    yu: &[f64],
    yl: &[f64],
    tol: f64,
) -> Result<ClosedPolygon, GeometryError> {
    SurfaceSamples::new(x.to_vec(), yu.to_vec(), yl.to_vec())?.stitch(tol)
}

/// Sort the caller's samples, resample them onto `dense_points` uniform stations and stitch.
pub fn prepare_solver_surface(
    x: &[f64],
    yu: &[f64],
    yl: &[f64],
    dense_points: usize,
    tol: f64,
) -> Result<ClosedPolygon, GeometryError> {
    SurfaceSamples::new(x.to_vec(), yu.to_vec(), yl.to_vec())?
        .resampled(dense_points)?
        .stitch(tol)
}

/// Build a closed polygon from separate upper and lower point sequences. Each may run in either
/// chordwise direction; both are oriented from the leading edge to the trailing edge, then the
/// lower surface is appended in reverse, skipping whichever of its ends coincides with the
/// corresponding upper end.
pub fn normalize(
    upper: &[Point2<f64>],
    lower: &[Point2<f64>],
    tol: f64,
) -> Result<ClosedPolygon, GeometryError> {
    for side in [upper, lower] {
        if side.len() < 2 {
            return Err(GeometryError::NotEnoughPoints {
                found: side.len(),
                required: 2,
            });
        }
    }

    let mut ring = leading_to_trailing(upper);
    let mut lower = leading_to_trailing(lower);
    lower.reverse();

    let skip_first = dist(&lower[0], &ring[ring.len() - 1]) <= tol;
    let skip_last = dist(&lower[lower.len() - 1], &ring[0]) <= tol;
    let end = if skip_last { lower.len() - 1 } else { lower.len() };
    let start = if skip_first { 1 } else { 0 };
    if start < end {
        ring.extend_from_slice(&lower[start..end]);
    }

    let polygon = ClosedPolygon::from_points(&ring, tol)?;
    debug!(
        vertices = polygon.len(),
        reversed = polygon.was_reversed(),
        "normalized airfoil contour"
    );

    Ok(polygon)
}

fn leading_to_trailing(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut result = points.to_vec();
    if result[0].x > result[result.len() - 1].x {
        result.reverse();
    }
    result
}
