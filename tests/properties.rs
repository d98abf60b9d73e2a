use aerostack_rs::airfoil::camber::CamberLine;
use aerostack_rs::airfoil::generate::{Naca4Digit, TrailingEdge};
use aerostack_rs::geometry::normalize::{SurfaceSamples, DENSE_SOLVER_POINTS};
use aerostack_rs::geometry::polygon::{ClosedPolygon, DEFAULT_TOL};
use aerostack_rs::solvers::thin_airfoil::{self, ThinAirfoilConfig, ThinAirfoilResult};
use aerostack_rs::{
    analyze, normalize_geometry, solve_panel_method, AnalyzeRequest, GeometryError, PanelSolution,
};
use ncollide2d::na::Point2;
use approx::assert_relative_eq;
use std::f64::consts::PI;
use test_case::test_case;

fn sections(code: &str, trailing_edge: TrailingEdge) -> SurfaceSamples {
    Naca4Digit::from_code(code, 1.0)
        .expect("valid code")
        .with_trailing_edge(trailing_edge)
        .surfaces(200)
        .expect("enough points")
        .resampled(DENSE_SOLVER_POINTS)
        .expect("dense stations")
}

fn contour(code: &str, trailing_edge: TrailingEdge) -> ClosedPolygon {
    sections(code, trailing_edge)
        .stitch(DEFAULT_TOL)
        .expect("valid contour")
}

fn panel(code: &str, alpha_deg: f64, panels: usize) -> PanelSolution {
    solve_panel_method(&contour(code, TrailingEdge::Open), alpha_deg, 1.0, panels)
        .expect("panel solve")
}

fn thin(samples: &SurfaceSamples, alpha_deg: f64) -> ThinAirfoilResult {
    let camber = CamberLine::from_ordinates(samples.x.clone(), &samples.camber()).unwrap();
    thin_airfoil::solve(alpha_deg, &camber, None, &ThinAirfoilConfig::default()).unwrap()
}

#[test_case("0006")]
#[test_case("0012")]
#[test_case("0018")]
fn symmetric_section_has_no_zero_lift_angle(code: &str) {
    let result = thin(&sections(code, TrailingEdge::Open), 3.0);
    assert!(result.alpha_l0_rad.abs() < 1e-3);
}

#[test_case("0012")]
#[test_case("2412")]
#[test_case("6409")]
fn thin_airfoil_lift_curve_is_linear(code: &str) {
    let result = thin(&sections(code, TrailingEdge::Open), 0.0);
    let alphas = &result.alpha_range_deg;
    let cls = &result.cl_curve;

    for i in 1..alphas.len() {
        let expected = 2.0 * PI * (alphas[i] - alphas[0]).to_radians();
        assert_relative_eq!(expected, cls[i] - cls[0], epsilon = 1e-12);
    }
}

#[test]
fn reversed_winding_gives_the_same_lift() {
    let poly = contour("2412", TrailingEdge::Open);
    let mut ring = poly.closed_points();
    ring.reverse();
    let reversed = ClosedPolygon::from_points(&ring, DEFAULT_TOL).unwrap();

    assert!(reversed.was_reversed());
    assert_eq!(poly.vertices(), reversed.vertices());

    let a = solve_panel_method(&poly, 4.0, 1.0, 120).unwrap();
    let b = solve_panel_method(&reversed, 4.0, 1.0, 120).unwrap();
    assert_relative_eq!(a.cl.abs(), b.cl.abs(), epsilon = 1e-12);
    assert!(a.cl > 0.0);
}

#[test_case("0012", 4.0)]
#[test_case("2412", 4.0)]
#[test_case("4415", -2.0)]
fn trailing_edge_velocities_satisfy_kutta(code: &str, alpha_deg: f64) {
    let solution = panel(code, alpha_deg, 120);
    let upper = solution.vt[0];
    let lower = solution.vt[solution.vt.len() - 1];

    // Opposite tangent directions, same speed
    assert!((upper + lower).abs() < 1e-6);
    assert!(solution.kutta_residual().abs() < 1e-6);
}

#[test_case("0012", 4.0, 80)]
#[test_case("0012", 4.0, 120)]
#[test_case("2412", 4.0, 80)]
#[test_case("2412", 4.0, 160)]
fn circulation_and_pressure_lift_agree(code: &str, alpha_deg: f64, panels: usize) {
    let solution = panel(code, alpha_deg, panels);
    let diff = (solution.cl - solution.cl_pressure).abs();
    assert!(
        diff <= 0.03 * solution.cl.abs(),
        "cl {} cl_pressure {}",
        solution.cl,
        solution.cl_pressure
    );
}

#[test]
fn refinement_converges_on_symmetric_section() {
    let reference = panel("0012", 0.0, 320).cp_min();

    let mut last_error = f64::INFINITY;
    for panels in [40, 80, 160] {
        let solution = panel("0012", 0.0, panels);
        assert!(solution.cl.abs() < 1e-6);

        let error = (solution.cp_min() - reference).abs();
        assert!(error <= last_error, "{} panels: {} > {}", panels, error, last_error);
        last_error = error;
    }
    assert!(last_error < 0.01);
}

#[test]
fn symmetric_twelve_percent_at_zero_incidence() {
    let samples = Naca4Digit::from_code("0012", 1.0).unwrap().surfaces(200).unwrap();
    let report = analyze(&AnalyzeRequest::from_samples(samples, 0.0)).unwrap();

    assert_relative_eq!(0.0, report.cl_thin_airfoil, epsilon = 1e-9);
    assert!(report.cl_panel.abs() < 0.02);
}

// Thin-airfoil theory ignores thickness, which raises the inviscid lift of a 12% section. With
// the classic open trailing edge the blunt base adds a little more and the gap sits just above
// 10% at 120 panels.
#[test_case(TrailingEdge::Closed, 0.10)]
#[test_case(TrailingEdge::Open, 0.11)]
fn cambered_section_at_four_degrees(trailing_edge: TrailingEdge, relative: f64) {
    let samples = sections("2412", trailing_edge);
    let thin_result = thin(&samples, 4.0);
    let polygon = samples.stitch(DEFAULT_TOL).unwrap();
    let solution = solve_panel_method(&polygon, 4.0, 1.0, 120).unwrap();

    assert!(thin_result.alpha_l0_rad < 0.0);
    assert_relative_eq!(-2.077, thin_result.alpha_l0_deg, epsilon = 0.02);
    assert!(
        (thin_result.cl - solution.cl).abs() <= relative * solution.cl.abs(),
        "thin {} panel {}",
        thin_result.cl,
        solution.cl
    );
}

#[test]
fn analyze_matches_direct_solves() {
    let raw = Naca4Digit::from_code("2412", 1.0).unwrap().surfaces(200).unwrap();
    let mut request = AnalyzeRequest::from_samples(raw, 4.0);
    request.panels = 80;
    let report = analyze(&request).unwrap();

    let direct = panel("2412", 4.0, 80);
    assert_eq!(direct.cl, report.cl_panel);
    assert_eq!(thin(&sections("2412", TrailingEdge::Open), 4.0).cl, report.cl_thin_airfoil);
}

#[test]
fn separate_surfaces_match_shared_grid() {
    let samples = sections("2412", TrailingEdge::Open);
    let upper: Vec<Point2<f64>> = (0..samples.len())
        .map(|i| Point2::new(samples.x[i], samples.yu[i]))
        .collect();
    // Lower surface handed over from the trailing edge forward
    let lower: Vec<Point2<f64>> = (0..samples.len())
        .rev()
        .map(|i| Point2::new(samples.x[i], samples.yl[i]))
        .collect();

    let poly = normalize_geometry(&upper, &lower).unwrap();
    let stitched = contour("2412", TrailingEdge::Open);
    assert_eq!(stitched.vertices(), poly.vertices());

    let a = solve_panel_method(&poly, 4.0, 1.0, 120).unwrap();
    let b = solve_panel_method(&stitched, 4.0, 1.0, 120).unwrap();
    assert_eq!(a.cl, b.cl);
}

#[test]
fn separate_surfaces_need_two_points_each() {
    let upper = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
    assert_eq!(
        Err(GeometryError::NotEnoughPoints {
            found: 0,
            required: 2
        }),
        normalize_geometry(&upper, &[]).map(|p| p.len())
    );
}
