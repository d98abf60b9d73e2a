use crate::algorithms::{gradient, interp};
use crate::errors::{AeroResult, ValidationError};
use crate::geometry::normalize::SurfaceSamples;
use serde::Serialize;

/// Chordwise stations of a mean camber line and the camber slope dz/dx at each of them. Stations
/// are strictly increasing; the first one is taken as the leading edge and the last as the
/// trailing edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CamberLine {
    x: Vec<f64>,
    slope: Vec<f64>,
}

impl CamberLine {
    pub fn new(x: Vec<f64>, slope: Vec<f64>) -> Result<CamberLine, ValidationError> {
        if slope.len() != x.len() {
            return Err(ValidationError::MismatchedLengths {
                what: "camber slope",
                expected: x.len(),
                found: slope.len(),
            });
        }
        check_stations(&x)?;
        if slope.iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::NonFinite {
                what: "camber slope",
            });
        }

        Ok(CamberLine { x, slope })
    }

    /// Build the camber line from ordinates z(x), estimating the slope with central differences.
    pub fn from_ordinates(x: Vec<f64>, z: &[f64]) -> Result<CamberLine, ValidationError> {
        if z.len() != x.len() {
            return Err(ValidationError::MismatchedLengths {
                what: "camber ordinates",
                expected: x.len(),
                found: z.len(),
            });
        }
        check_stations(&x)?;
        if z.iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::NonFinite {
                what: "camber ordinates",
            });
        }

        let slope = gradient(&x, z);
        Ok(CamberLine { x, slope })
    }

    /// The camber line of a pair of sampled surfaces: both are resampled onto `dense_points`
    /// uniform stations and averaged.
    pub fn from_surfaces(samples: &SurfaceSamples, dense_points: usize) -> AeroResult<CamberLine> {
        if dense_points < 2 {
            return Err(ValidationError::NotEnoughCamberPoints {
                found: dense_points,
            }
            .into());
        }

        let dense = samples.resampled(dense_points)?;
        let z = dense.camber();
        Ok(CamberLine::from_ordinates(dense.x, &z)?)
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn slope(&self) -> &[f64] {
        &self.slope
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn leading_edge(&self) -> f64 {
        self.x[0]
    }

    pub fn chord(&self) -> f64 {
        self.x[self.x.len() - 1] - self.x[0]
    }

    /// Linearly interpolated slope, held constant outside the sampled range
    pub fn slope_at(&self, x: f64) -> f64 {
        interp(x, &self.x, &self.slope)
    }
}

fn check_stations(x: &[f64]) -> Result<(), ValidationError> {
    if x.len() < 2 {
        return Err(ValidationError::NotEnoughCamberPoints { found: x.len() });
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(ValidationError::NonFinite {
            what: "camber stations",
        });
    }
    if let Some(i) = (1..x.len()).find(|&i| x[i] <= x[i - 1]) {
        return Err(ValidationError::NonMonotonicCamber { index: i });
    }

    Ok(())
}
