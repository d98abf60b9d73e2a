use crate::geometry::panel::Panel;
use ncollide2d::na::{DMatrix, DVector, Point2, Vector2};
use rayon::prelude::*;
use std::f64::consts::PI;

/// Velocity induced at `p` by a unit-strength source distribution and by a unit-strength vortex
/// distribution along `panel`, returned as `(source, vortex)` in global coordinates.
///
/// The kernels are evaluated in the panel frame whose x axis runs along the tangent from the
/// start node and whose y axis is the inward normal. `on_panel` selects the limit approached from
/// the outside of the body for a point on the panel itself. Radii at or below
/// `singular_tol * length` drop the logarithmic term.
pub fn unit_velocities(
    panel: &Panel,
    p: &Point2<f64>,
    on_panel: bool,
    singular_tol: f64,
) -> (Vector2<f64>, Vector2<f64>) {
    let t = panel.tangent;
    let k = panel.inward();
    let l = panel.length;

    let r = p - panel.start;
    let x = r.dot(&t);
    let y = r.dot(&k);

    let phi = if on_panel {
        -PI
    } else {
        y.atan2(x - l) - y.atan2(x)
    };

    let r1 = x.hypot(y);
    let r2 = (x - l).hypot(y);
    let psi = if r1 > singular_tol * l && r2 > singular_tol * l {
        (r1 / r2).ln()
    } else {
        0.0
    };

    let su = psi / (2.0 * PI);
    let sv = phi / (2.0 * PI);
    let source = t * su + k * sv;
    let vortex = t * (-sv) + k * su;

    (source, vortex)
}

/// Influence coefficients of N panels on their own control points. Source terms are kept per
/// panel; the vortex strength is shared by every panel so its terms are summed per control point.
#[derive(Debug, Clone)]
pub struct Influence {
    /// Normal velocity at control point i from a unit source on panel j
    pub source_normal: DMatrix<f64>,

    /// Tangential velocity at control point i from a unit source on panel j
    pub source_tangent: DMatrix<f64>,

    /// Normal velocity at control point i from the unit vortex on all panels
    pub vortex_normal: DVector<f64>,

    /// Tangential velocity at control point i from the unit vortex on all panels
    pub vortex_tangent: DVector<f64>,
}

struct InfluenceRow {
    source_normal: Vec<f64>,
    source_tangent: Vec<f64>,
    vortex_normal: f64,
    vortex_tangent: f64,
}

fn influence_row(panels: &[Panel], i: usize, singular_tol: f64) -> InfluenceRow {
    let target = &panels[i];
    let mut row = InfluenceRow {
        source_normal: Vec::with_capacity(panels.len()),
        source_tangent: Vec::with_capacity(panels.len()),
        vortex_normal: 0.0,
        vortex_tangent: 0.0,
    };

    for (j, panel) in panels.iter().enumerate() {
        let (s, v) = unit_velocities(panel, &target.midpoint, i == j, singular_tol);
        row.source_normal.push(s.dot(&target.normal));
        row.source_tangent.push(s.dot(&target.tangent));
        row.vortex_normal += v.dot(&target.normal);
        row.vortex_tangent += v.dot(&target.tangent);
    }

    row
}

impl Influence {
    /// Evaluates every panel pair. Rows are independent of each other and are computed in
    /// parallel.
    pub fn build(panels: &[Panel], singular_tol: f64) -> Influence {
        let n = panels.len();
        let rows: Vec<InfluenceRow> = (0..n)
            .into_par_iter()
            .map(|i| influence_row(panels, i, singular_tol))
            .collect();

        Influence {
            source_normal: DMatrix::from_fn(n, n, |i, j| rows[i].source_normal[j]),
            source_tangent: DMatrix::from_fn(n, n, |i, j| rows[i].source_tangent[j]),
            vortex_normal: DVector::from_fn(n, |i, _| rows[i].vortex_normal),
            vortex_tangent: DVector::from_fn(n, |i, _| rows[i].vortex_tangent),
        }
    }

    pub fn size(&self) -> usize {
        self.vortex_normal.len()
    }
}
