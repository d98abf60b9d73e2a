use thiserror::Error;

/// Problems with the airfoil geometry itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("not enough points: found {found}, need at least {required}")]
    NotEnoughPoints { found: usize, required: usize },

    #[error("non-finite coordinate at point {index}")]
    NonFinite { index: usize },

    #[error("zero-length panel at index {index}")]
    ZeroLengthPanel { index: usize },

    #[error("degenerate polygon with signed area {area}")]
    Degenerate { area: f64 },

    #[error("mismatched lengths for {what}: expected {expected}, found {found}")]
    MismatchedLengths {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Caller-supplied parameters that are out of range or inconsistent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("angles must be sorted in ascending order (decrease at index {index})")]
    UnsortedAngles { index: usize },

    #[error("panel count {count} outside of the supported range {min}..={max}")]
    PanelCount { count: usize, min: usize, max: usize },

    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f64 },

    #[error("{what} must be finite")]
    NonFinite { what: &'static str },

    #[error("camber x must be strictly increasing (violated at index {index})")]
    NonMonotonicCamber { index: usize },

    #[error("camber line needs at least 2 samples, found {found}")]
    NotEnoughCamberPoints { found: usize },

    #[error("mismatched lengths for {what}: expected {expected}, found {found}")]
    MismatchedLengths {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{what} {value} outside of the half-open range [{min}, {max})")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("point count {count} is below the minimum of {min}")]
    PointCount { count: usize, min: usize },

    #[error("invalid NACA 4-digit code '{0}'")]
    InvalidNacaCode(String),

    #[error("unknown airfoil preset '{0}'")]
    UnknownPreset(String),
}

/// Failures of the dense linear solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("influence system is rank deficient: rank {rank} of {size}")]
    RankDeficient { rank: usize, size: usize },

    #[error("linear solve produced a non-finite solution")]
    NonFiniteSolution,

    #[error("decomposition failed: {0}")]
    Decomposition(String),
}

/// Any failure surfaced by the public entry points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AeroError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

pub type AeroResult<T> = Result<T, AeroError>;
