use crate::airfoil::camber::CamberLine;
use crate::errors::AeroResult;
use crate::geometry::normalize::{SurfaceSamples, DENSE_SOLVER_POINTS};
use crate::geometry::polygon::DEFAULT_TOL;
use crate::solvers::panel::{self, PanelConfig, PanelSolution};
use crate::solvers::thin_airfoil::{self, ThinAirfoilConfig, ThinAirfoilResult};
use serde::{Deserialize, Serialize};
use tracing::{debug_span, info};

fn default_alpha_deg() -> f64 {
    4.0
}

fn default_v_inf() -> f64 {
    1.0
}

fn default_panels() -> usize {
    120
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub x: Vec<f64>,
    pub yu: Vec<f64>,
    pub yl: Vec<f64>,

    #[serde(default = "default_alpha_deg")]
    pub alpha_deg: f64,

    #[serde(default = "default_v_inf", alias = "V_inf")]
    pub v_inf: f64,

    #[serde(default = "default_panels")]
    pub panels: usize,

    /// Angles of the thin-airfoil lift curve, the default range when absent
    #[serde(default)]
    pub angles_deg: Option<Vec<f64>>,
}

impl AnalyzeRequest {
    pub fn from_samples(samples: SurfaceSamples, alpha_deg: f64) -> AnalyzeRequest {
        AnalyzeRequest {
            x: samples.x,
            yu: samples.yu,
            yl: samples.yl,
            alpha_deg,
            v_inf: default_v_inf(),
            panels: default_panels(),
            angles_deg: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub alpha_deg: f64,
    pub cl_thin_airfoil: f64,
    pub cl_panel: f64,
    pub thin_airfoil: ThinAirfoilResult,
    pub panel: PanelSolution,
}

/// Sorts the samples by x and resamples both surfaces onto `DENSE_SOLVER_POINTS` uniform stations.
/// The stitched contour goes to the panel solver and the mean line to the thin-airfoil solver;
/// the two solves run in parallel.
pub fn analyze(request: &AnalyzeRequest) -> AeroResult<AnalysisReport> {
    let _span = debug_span!("analyze", alpha_deg = request.alpha_deg, panels = request.panels).entered();

    let samples = SurfaceSamples::new(request.x.clone(), request.yu.clone(), request.yl.clone())?;
    let dense = samples.resampled(DENSE_SOLVER_POINTS)?;
    let config = PanelConfig::new(request.panels, request.v_inf);

    let (panel_result, thin_result) = rayon::join(
        || -> AeroResult<PanelSolution> {
            let polygon = dense.stitch(DEFAULT_TOL)?;
            panel::solve(&polygon, request.alpha_deg, &config)
        },
        || -> AeroResult<ThinAirfoilResult> {
            let camber = CamberLine::from_ordinates(dense.x.clone(), &dense.camber())?;
            Ok(thin_airfoil::solve(
                request.alpha_deg,
                &camber,
                request.angles_deg.as_deref(),
                &ThinAirfoilConfig::default(),
            )?)
        },
    );
    let panel = panel_result?;
    let thin = thin_result?;

    info!(cl_thin_airfoil = thin.cl, cl_panel = panel.cl, "analysis complete");

    Ok(AnalysisReport {
        alpha_deg: request.alpha_deg,
        cl_thin_airfoil: thin.cl,
        cl_panel: panel.cl,
        thin_airfoil: thin,
        panel,
    })
}
