//! Two dimensional airfoil aerodynamics: contour normalization, thin-airfoil theory and a
//! source/vortex panel method.

use ncollide2d::na::Point2;

pub mod airfoil;
pub mod algorithms;
pub mod analysis;
pub mod errors;
pub mod geometry;
pub mod serialize;
pub mod solvers;

pub use analysis::{analyze, AnalysisReport, AnalyzeRequest};
pub use errors::{AeroError, AeroResult, GeometryError, SolverError, ValidationError};
pub use geometry::polygon::ClosedPolygon;
pub use solvers::panel::{PanelConfig, PanelSolution};
pub use solvers::thin_airfoil::{ThinAirfoilConfig, ThinAirfoilResult};

use airfoil::camber::CamberLine;
use geometry::polygon::DEFAULT_TOL;

/// Closed counter-clockwise contour from separate upper and lower surfaces, using the default
/// coincidence tolerance.
pub fn normalize_geometry(
    upper: &[Point2<f64>],
    lower: &[Point2<f64>],
) -> Result<ClosedPolygon, GeometryError> {
    geometry::normalize::normalize(upper, lower, DEFAULT_TOL)
}

/// Thin-airfoil solution for camber slopes sampled at strictly increasing stations.
pub fn solve_thin_airfoil(
    alpha_deg: f64,
    camber_x: &[f64],
    camber_slope: &[f64],
    angle_samples_deg: Option<&[f64]>,
) -> Result<ThinAirfoilResult, ValidationError> {
    let camber = CamberLine::new(camber_x.to_vec(), camber_slope.to_vec())?;
    solvers::thin_airfoil::solve(
        alpha_deg,
        &camber,
        angle_samples_deg,
        &ThinAirfoilConfig::default(),
    )
}

/// Panel method solution with default tolerances.
pub fn solve_panel_method(
    polygon: &ClosedPolygon,
    alpha_deg: f64,
    v_inf: f64,
    panel_count: usize,
) -> AeroResult<PanelSolution> {
    solvers::panel::solve(polygon, alpha_deg, &PanelConfig::new(panel_count, v_inf))
}
