use crate::errors::{AeroResult, GeometryError, SolverError, ValidationError};
use crate::geometry::curve2::Curve2;
use crate::geometry::panel::Panel;
use crate::geometry::polygon::{ClosedPolygon, DEFAULT_TOL};
use crate::solvers::influence::Influence;
use ncollide2d::na::{DMatrix, DVector, Vector2};
use serde::Serialize;
use tracing::{debug, debug_span, warn};

pub const MIN_PANEL_COUNT: usize = 10;
pub const MAX_PANEL_COUNT: usize = 2000;

/// Panel count from which the circulation and pressure lift are expected to agree
const LIFT_CHECK_PANELS: usize = 80;
const LIFT_CHECK_RELATIVE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelConfig {
    pub panel_count: usize,

    /// Freestream speed, also the reference speed of the pressure coefficient
    pub v_inf: f64,

    /// Distance under which nodes are considered coincident
    pub tol: f64,

    /// Relative threshold for singular values and for vanishing kernel radii
    pub singular_tol: f64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        PanelConfig {
            panel_count: 120,
            v_inf: 1.0,
            tol: DEFAULT_TOL,
            singular_tol: 1e-12,
        }
    }
}

impl PanelConfig {
    pub fn new(panel_count: usize, v_inf: f64) -> Self {
        PanelConfig {
            panel_count,
            v_inf,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_PANEL_COUNT..=MAX_PANEL_COUNT).contains(&self.panel_count) {
            return Err(ValidationError::PanelCount {
                count: self.panel_count,
                min: MIN_PANEL_COUNT,
                max: MAX_PANEL_COUNT,
            });
        }
        if !self.v_inf.is_finite() {
            return Err(ValidationError::NonFinite {
                what: "freestream velocity",
            });
        }
        if self.v_inf <= 0.0 {
            return Err(ValidationError::NonPositive {
                what: "freestream velocity",
                value: self.v_inf,
            });
        }

        Ok(())
    }
}

/// Result of a panel solve. Per-panel arrays all follow the panel order, which starts at the
/// trailing edge, runs over the upper surface to the leading edge and back along the lower one.
#[derive(Debug, Clone, Serialize)]
pub struct PanelSolution {
    pub alpha_deg: f64,
    pub v_inf: f64,
    pub chord: f64,
    pub panel_count: usize,

    #[serde(skip)]
    pub panels: Vec<Panel>,

    pub x_mid: Vec<f64>,
    pub y_mid: Vec<f64>,

    /// Arc length from the trailing edge to each control point
    pub s_mid: Vec<f64>,

    /// Surface velocity along each panel tangent
    pub vt: Vec<f64>,
    pub cp: Vec<f64>,

    pub source_strength: Vec<f64>,
    pub vortex_strength: f64,

    /// Bound circulation of each panel, clockwise positive
    pub circulation: Vec<f64>,
    pub total_circulation: f64,

    /// Lift coefficient from the total circulation
    pub cl: f64,

    /// Lift and drag coefficients from integrating the pressure around the contour
    pub cl_pressure: f64,
    pub cd_pressure: f64,
}

impl PanelSolution {
    /// Sum of the tangential velocities on the two trailing-edge panels. The Kutta condition
    /// drives it to zero since their tangents point in opposite directions.
    pub fn kutta_residual(&self) -> f64 {
        self.vt[0] + self.vt[self.vt.len() - 1]
    }

    pub fn cp_min(&self) -> f64 {
        self.cp.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

/// Solve the flow around `polygon` at `alpha_deg` degrees.
///
/// The contour is resampled into `panel_count` panels of equal arc length starting at the trailing
/// edge. Every panel carries its own constant source strength and all panels share one constant
/// vortex strength. Flow tangency at the N control points plus the Kutta condition on the two
/// trailing-edge panels give a square system of N + 1 equations, solved by SVD least squares.
pub fn solve(polygon: &ClosedPolygon, alpha_deg: f64, config: &PanelConfig) -> AeroResult<PanelSolution> {
    let _span = debug_span!("panel_solve", alpha_deg, panel_count = config.panel_count).entered();

    config.validate()?;
    if !alpha_deg.is_finite() {
        return Err(ValidationError::NonFinite {
            what: "angle of attack",
        }
        .into());
    }

    let n = config.panel_count;
    let curve = Curve2::from_points(&polygon.closed_points(), config.tol, true)?;
    let nodes = curve.resample_uniform(n);
    let panels = Panel::from_nodes(&nodes, config.tol)?;

    // Reference chord of the contour itself, the resampled nodes cut the leading edge
    let chord = polygon.chord();
    if chord <= config.tol {
        return Err(GeometryError::Degenerate {
            area: polygon.area(),
        }
        .into());
    }
    debug!(nodes = nodes.len(), chord, perimeter = curve.length(), "resampled contour");

    let alpha = alpha_deg.to_radians();
    let v_inf = config.v_inf;
    let freestream = Vector2::new(v_inf * alpha.cos(), v_inf * alpha.sin());

    let influence = Influence::build(&panels, config.singular_tol);
    let (a, b) = assemble(&panels, &influence, &freestream);
    let x = least_squares(a, &b, config.singular_tol)?;

    let sigma: Vec<f64> = x.rows(0, n).iter().copied().collect();
    let gamma = x[n];

    let vt: Vec<f64> = (0..n)
        .map(|i| {
            freestream.dot(&panels[i].tangent)
                + (0..n)
                    .map(|j| influence.source_tangent[(i, j)] * sigma[j])
                    .sum::<f64>()
                + gamma * influence.vortex_tangent[i]
        })
        .collect();
    let cp: Vec<f64> = vt.iter().map(|v| 1.0 - (v / v_inf).powi(2)).collect();

    let circulation: Vec<f64> = panels.iter().map(|p| -gamma * p.length).collect();
    let total_circulation: f64 = circulation.iter().sum();
    let cl = 2.0 * total_circulation / (v_inf * chord);

    let mut force = Vector2::new(0.0, 0.0);
    for (p, c) in panels.iter().zip(cp.iter()) {
        force -= p.normal * (c * p.length);
    }
    force /= chord;
    let cl_pressure = force.y * alpha.cos() - force.x * alpha.sin();
    let cd_pressure = force.x * alpha.cos() + force.y * alpha.sin();

    let mut s_mid = Vec::with_capacity(n);
    let mut s = 0.0;
    for p in panels.iter() {
        s_mid.push(s + 0.5 * p.length);
        s += p.length;
    }

    let diff = (cl - cl_pressure).abs();
    let scale = cl.abs().max(cl_pressure.abs());
    if n >= LIFT_CHECK_PANELS && scale > 1e-6 && diff > LIFT_CHECK_RELATIVE * scale {
        warn!(cl, cl_pressure, "circulation and pressure lift disagree");
    }
    debug!(cl, cl_pressure, cd_pressure, gamma, "panel method solved");

    Ok(PanelSolution {
        alpha_deg,
        v_inf,
        chord,
        panel_count: n,
        x_mid: panels.iter().map(|p| p.midpoint.x).collect(),
        y_mid: panels.iter().map(|p| p.midpoint.y).collect(),
        s_mid,
        vt,
        cp,
        source_strength: sigma,
        vortex_strength: gamma,
        circulation,
        total_circulation,
        cl,
        cl_pressure,
        cd_pressure,
        panels,
    })
}

/// Flow tangency rows for every control point followed by the Kutta row. The last unknown is the
/// shared vortex strength.
fn assemble(
    panels: &[Panel],
    influence: &Influence,
    freestream: &Vector2<f64>,
) -> (DMatrix<f64>, DVector<f64>) {
    let n = panels.len();
    let last = n - 1;

    let a = DMatrix::from_fn(n + 1, n + 1, |i, j| match (i < n, j < n) {
        (true, true) => influence.source_normal[(i, j)],
        (true, false) => influence.vortex_normal[i],
        (false, true) => influence.source_tangent[(0, j)] + influence.source_tangent[(last, j)],
        (false, false) => influence.vortex_tangent[0] + influence.vortex_tangent[last],
    });

    let b = DVector::from_fn(n + 1, |i, _| {
        if i < n {
            -freestream.dot(&panels[i].normal)
        } else {
            -(freestream.dot(&panels[0].tangent) + freestream.dot(&panels[last].tangent))
        }
    });

    (a, b)
}

fn least_squares(
    a: DMatrix<f64>,
    b: &DVector<f64>,
    singular_tol: f64,
) -> Result<DVector<f64>, SolverError> {
    let size = a.ncols();
    let svd = a.clone().svd(true, true);
    let eps = singular_tol * svd.singular_values.max();
    let rank = svd.rank(eps);
    if rank < size {
        return Err(SolverError::RankDeficient { rank, size });
    }

    let x = svd
        .solve(b, eps)
        .map_err(|e| SolverError::Decomposition(e.to_string()))?;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(SolverError::NonFiniteSolution);
    }

    debug!(rank, residual = (a * &x - b).norm(), "solved influence system");
    Ok(x)
}
