use crate::airfoil::camber::CamberLine;
use crate::algorithms::{linspace, trapezoid};
use crate::errors::ValidationError;
use serde::Serialize;
use std::f64::consts::PI;
use tracing::{debug, debug_span};

/// Discretization of the angular integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThinAirfoilConfig {
    /// Number of nodes of the angular grid
    pub theta_points: usize,

    /// Distance the grid is kept away from theta = 0 and theta = pi
    pub endpoint_offset: f64,
}

impl Default for ThinAirfoilConfig {
    fn default() -> Self {
        ThinAirfoilConfig {
            theta_points: 2001,
            endpoint_offset: 1e-6,
        }
    }
}

impl ThinAirfoilConfig {
    pub fn new(theta_points: usize, endpoint_offset: f64) -> Self {
        ThinAirfoilConfig {
            theta_points,
            endpoint_offset,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.theta_points < 3 {
            return Err(ValidationError::PointCount {
                count: self.theta_points,
                min: 3,
            });
        }
        if !self.endpoint_offset.is_finite() {
            return Err(ValidationError::NonFinite {
                what: "theta endpoint offset",
            });
        }
        // At pi / 2 and beyond the grid would run from the trailing edge to the leading edge
        if !(0.0..PI / 2.0).contains(&self.endpoint_offset) {
            return Err(ValidationError::OutOfRange {
                what: "theta endpoint offset",
                value: self.endpoint_offset,
                min: 0.0,
                max: PI / 2.0,
            });
        }

        Ok(())
    }
}

/// Angles of the lift curve when the caller supplies none, -10 to 15 degrees
pub fn default_angles_deg() -> Vec<f64> {
    linspace(-10.0, 15.0, 30)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThinAirfoilResult {
    pub alpha_l0_rad: f64,
    pub alpha_l0_deg: f64,
    pub cl: f64,
    pub alpha_range_deg: Vec<f64>,
    pub cl_curve: Vec<f64>,
}

/// Glauert's integral for the zero-lift angle in radians,
/// `-(1/pi) * integral of dz/dx (cos(theta) - 1) over [0, pi]`, where the camber stations are
/// mapped onto `x = x0 + c (1 - cos(theta)) / 2`.
pub fn zero_lift_angle(
    camber: &CamberLine,
    config: &ThinAirfoilConfig,
) -> Result<f64, ValidationError> {
    config.validate()?;

    let x0 = camber.leading_edge();
    let c = camber.chord();
    let theta = linspace(
        config.endpoint_offset,
        PI - config.endpoint_offset,
        config.theta_points,
    );
    let integrand: Vec<f64> = theta
        .iter()
        .map(|t| {
            let x = x0 + c * (1.0 - t.cos()) / 2.0;
            camber.slope_at(x) * (t.cos() - 1.0)
        })
        .collect();

    Ok(-trapezoid(&theta, &integrand) / PI)
}

/// Lift coefficient `2 pi (alpha - alpha_l0)` with both angles in radians
pub fn lift_coefficient(alpha_rad: f64, alpha_l0_rad: f64) -> f64 {
    2.0 * PI * (alpha_rad - alpha_l0_rad)
}

/// Solves for the zero-lift angle and evaluates the lift coefficient at `alpha_deg` and at every
/// angle of `angles_deg` (or the default range). Angles must be non-decreasing.
pub fn solve(
    alpha_deg: f64,
    camber: &CamberLine,
    angles_deg: Option<&[f64]>,
    config: &ThinAirfoilConfig,
) -> Result<ThinAirfoilResult, ValidationError> {
    let _span = debug_span!("thin_airfoil", alpha_deg, stations = camber.len()).entered();

    if !alpha_deg.is_finite() {
        return Err(ValidationError::NonFinite {
            what: "angle of attack",
        });
    }

    let alpha_range_deg = match angles_deg {
        Some(a) => a.to_vec(),
        None => default_angles_deg(),
    };
    check_angles(&alpha_range_deg)?;

    let alpha_l0_rad = zero_lift_angle(camber, config)?;
    let cl = lift_coefficient(alpha_deg.to_radians(), alpha_l0_rad);
    let cl_curve = alpha_range_deg
        .iter()
        .map(|a| lift_coefficient(a.to_radians(), alpha_l0_rad))
        .collect();

    debug!(alpha_l0_deg = alpha_l0_rad.to_degrees(), cl, "thin airfoil solved");

    Ok(ThinAirfoilResult {
        alpha_l0_rad,
        alpha_l0_deg: alpha_l0_rad.to_degrees(),
        cl,
        alpha_range_deg,
        cl_curve,
    })
}

fn check_angles(angles: &[f64]) -> Result<(), ValidationError> {
    if angles.iter().any(|a| !a.is_finite()) {
        return Err(ValidationError::NonFinite {
            what: "lift curve angles",
        });
    }
    match (1..angles.len()).find(|&i| angles[i] < angles[i - 1]) {
        Some(index) => Err(ValidationError::UnsortedAngles { index }),
        None => Ok(()),
    }
}
