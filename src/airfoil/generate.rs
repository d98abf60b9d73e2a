use crate::airfoil::camber::CamberLine;
use crate::errors::ValidationError;
use crate::geometry::normalize::SurfaceSamples;
use ncollide2d::na::Point2;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::f64::consts::PI;
use tracing::trace;

/// Capacity of a `GeometryCache` built with `Default`
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// An AirfoilGenerator is an entity which can generate the x, y position of the mean camber line
/// and the airfoil thickness at fractions of the chord. This provides the information necessary
/// for a generator to compute the airfoil surfaces.
pub trait AirfoilGenerator {
    /// Return a 2D point with the position of the camber line at a fraction from 0.0 to 1.0
    fn camber_line(&self, x: f64) -> Point2<f64>;

    /// Return the full thickness of the airfoil with respect to the camber line at a fraction from
    /// 0.0 to 1.0
    fn thickness(&self, x: f64) -> f64;
}

/// Whether the last thickness coefficient leaves the classic small trailing edge gap or closes it
/// to zero thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrailingEdge {
    #[default]
    Open,
    Closed,
}

impl TrailingEdge {
    fn x4_coefficient(&self) -> f64 {
        match self {
            TrailingEdge::Open => 0.1015,
            TrailingEdge::Closed => 0.1036,
        }
    }
}

/// Section properties of a NACA 4-digit airfoil, in percent of the chord.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NacaMetrics {
    pub max_camber_pct: f64,
    pub max_camber_x_pct: f64,
    pub max_thickness_pct: f64,
}

/// A generator for a NACA 4-digit airfoil of the form MPTT, where M is the maximum camber P is the
/// location of the maximum camber, and TT is the maximum thickness of the airfoil as a fraction of
/// the chord.  For example, a NACA 2412 airfoil has a 2% camber at 40% of the chord and a max
/// thickness which is 12% of the chord length.
#[derive(Debug, Clone, PartialEq)]
pub struct Naca4Digit {
    t: f64,
    chord_len: f64,
    m: f64,
    p: f64,
    trailing_edge: TrailingEdge,
}

impl Naca4Digit {
    /// Create a new NACA 4 digit generator with the classic open trailing edge.
    ///
    /// # Arguments
    ///
    /// * `t_max` - the maximum thickness of the airfoil as a fraction of the chord length. For
    /// instance, on a NACA 2412 t_max should be 0.12
    ///
    /// * `chord_len` - the actual length of the airfoil chord
    ///
    /// * `max_camber` - The max camber as a fraction, for example on a NACA 2412 this value should
    /// be set to 0.02
    ///
    /// * `max_camber_chord` - The location of the max camber as a fraction of chord length. For
    /// example on a NACA 2412 this values should be 0.4
    pub fn new(t_max: f64, chord_len: f64, max_camber: f64, max_camber_chord: f64) -> Naca4Digit {
        Naca4Digit {
            t: t_max,
            chord_len,
            m: max_camber,
            p: max_camber_chord,
            trailing_edge: TrailingEdge::Open,
        }
    }

    /// Parse a four character code such as "2412". The chord must be positive and finite.
    pub fn from_code(code: &str, chord_len: f64) -> Result<Naca4Digit, ValidationError> {
        let digits: Vec<u32> = code.chars().filter_map(|c| c.to_digit(10)).collect();
        if code.len() != 4 || digits.len() != 4 {
            return Err(ValidationError::InvalidNacaCode(code.to_string()));
        }
        if !chord_len.is_finite() {
            return Err(ValidationError::NonFinite { what: "chord" });
        }
        if chord_len <= 0.0 {
            return Err(ValidationError::NonPositive {
                what: "chord",
                value: chord_len,
            });
        }

        Ok(Naca4Digit::new(
            (digits[2] * 10 + digits[3]) as f64 / 100.0,
            chord_len,
            digits[0] as f64 / 100.0,
            digits[1] as f64 / 10.0,
        ))
    }

    pub fn with_trailing_edge(mut self, trailing_edge: TrailingEdge) -> Naca4Digit {
        self.trailing_edge = trailing_edge;
        self
    }

    pub fn chord_len(&self) -> f64 {
        self.chord_len
    }

    pub fn trailing_edge(&self) -> TrailingEdge {
        self.trailing_edge
    }

    fn is_symmetric(&self) -> bool {
        self.p < 1e-6 || self.m == 0.0
    }

    fn half_thickness(&self, x: f64) -> f64 {
        5.0 * self.t
            * self.chord_len
            * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x * x + 0.2843 * x.powi(3)
                - self.trailing_edge.x4_coefficient() * x.powi(4))
    }

    /// Slope of the camber line dz/dx at a fraction of the chord. It is dimensionless, so it does
    /// not depend on the chord length.
    pub fn camber_slope(&self, x: f64) -> f64 {
        if self.is_symmetric() {
            0.0
        } else if x < self.p {
            2.0 * self.m / self.p.powf(2.0) * (self.p - x)
        } else {
            2.0 * self.m / (1.0 - self.p).powf(2.0) * (self.p - x)
        }
    }

    /// Upper and lower ordinates on a shared, cosine spaced x grid running from the leading edge
    /// to the trailing edge. The surfaces are offset vertically from the camber line by half the
    /// thickness so that both sides can be sampled at the same stations.
    pub fn surfaces(&self, n_points: usize) -> Result<SurfaceSamples, ValidationError> {
        if n_points < 3 {
            return Err(ValidationError::PointCount {
                count: n_points,
                min: 3,
            });
        }

        let mut samples = SurfaceSamples {
            x: Vec::with_capacity(n_points),
            yu: Vec::with_capacity(n_points),
            yl: Vec::with_capacity(n_points),
        };
        for f in cosine_fractions(n_points) {
            let c = self.camber_line(f);
            let yt = self.half_thickness(f);
            samples.x.push(c.x);
            samples.yu.push(c.y + yt);
            samples.yl.push(c.y - yt);
        }

        Ok(samples)
    }

    /// The analytic camber slope sampled at cosine spaced stations
    pub fn camber(&self, n_points: usize) -> Result<CamberLine, ValidationError> {
        if n_points < 3 {
            return Err(ValidationError::PointCount {
                count: n_points,
                min: 3,
            });
        }

        let fractions = cosine_fractions(n_points);
        let slope = fractions.iter().map(|&f| self.camber_slope(f)).collect();
        let x = fractions.iter().map(|f| f * self.chord_len).collect();
        CamberLine::new(x, slope)
    }

    pub fn metrics(&self) -> NacaMetrics {
        NacaMetrics {
            max_camber_pct: round3(self.m * 100.0),
            max_camber_x_pct: round3(self.p * 100.0),
            max_thickness_pct: round3(self.t * 100.0),
        }
    }
}

impl AirfoilGenerator for Naca4Digit {
    fn camber_line(&self, x: f64) -> Point2<f64> {
        let y = if self.is_symmetric() {
            0.0
        } else if x < self.p {
            (self.m / self.p.powf(2.0)) * (2.0 * self.p * x - x.powf(2.0))
        } else {
            (self.m / (1.0 - self.p).powf(2.0))
                * ((1.0 - 2.0 * self.p) + 2.0 * self.p * x - x.powf(2.0))
        };

        Point2::new(x * self.chord_len, y * self.chord_len)
    }

    fn thickness(&self, x: f64) -> f64 {
        2.0 * self.half_thickness(x)
    }
}

/// Chord fractions 0.5 (1 - cos(beta)) for beta evenly spaced on [0, pi], clustering stations
/// at both edges.
fn cosine_fractions(n_points: usize) -> Vec<f64> {
    let last = (n_points - 1) as f64;
    (0..n_points)
        .map(|i| 0.5 * (1.0 - (PI * i as f64 / last).cos()))
        .collect()
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    code: String,
    chord_bits: u64,
    n_points: usize,
    trailing_edge: TrailingEdge,
}

impl CacheKey {
    fn new(code: &str, chord_len: f64, n_points: usize, trailing_edge: TrailingEdge) -> CacheKey {
        CacheKey {
            code: code.to_string(),
            chord_bits: chord_len.to_bits(),
            n_points,
            trailing_edge,
        }
    }
}

/// Memoizes sampled NACA surfaces by code, chord, point count and trailing edge. Holds at most
/// `capacity` entries and evicts the oldest insertion first.
#[derive(Debug, Clone)]
pub struct GeometryCache {
    capacity: usize,
    entries: HashMap<CacheKey, SurfaceSamples>,
    order: VecDeque<CacheKey>,
}

impl Default for GeometryCache {
    fn default() -> Self {
        GeometryCache::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl GeometryCache {
    pub fn new(capacity: usize) -> GeometryCache {
        GeometryCache {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(
        &self,
        code: &str,
        chord_len: f64,
        n_points: usize,
        trailing_edge: TrailingEdge,
    ) -> bool {
        self.entries
            .contains_key(&CacheKey::new(code, chord_len, n_points, trailing_edge))
    }

    /// Returns the cached surfaces for the key, generating and storing them on a miss. Failed
    /// generations are not cached.
    pub fn get_or_generate(
        &mut self,
        code: &str,
        chord_len: f64,
        n_points: usize,
        trailing_edge: TrailingEdge,
    ) -> Result<SurfaceSamples, ValidationError> {
        let key = CacheKey::new(code, chord_len, n_points, trailing_edge);
        if let Some(hit) = self.entries.get(&key) {
            trace!(code, chord_len, n_points, "geometry cache hit");
            return Ok(hit.clone());
        }

        let samples = Naca4Digit::from_code(code, chord_len)?
            .with_trailing_edge(trailing_edge)
            .surfaces(n_points)?;
        if self.capacity == 0 {
            return Ok(samples);
        }

        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(old) => {
                    self.entries.remove(&old);
                }
                None => break,
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, samples.clone());

        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test_case(1.000000, 0.001260)]
    #[test_case(0.840000, 0.021694)]
    #[test_case(0.680000, 0.038557)]
    #[test_case(0.520000, 0.051635)]
    #[test_case(0.360000, 0.059263)]
    #[test_case(0.200000, 0.057375)]
    #[test_case(0.040000, 0.032277)]
    fn test_naca_4_thickness(x: f64, e: f64) {
        let naca = Naca4Digit::new(0.12, 1.0, 0.0, 0.0);
        let result = naca.thickness(x);
        assert_relative_eq!(e * 2.0, result, epsilon = 1e-3);
    }

    #[test_case(1.000000, 0.001260)]
    #[test_case(0.520000, 0.051635)]
    #[test_case(0.040000, 0.032277)]
    fn test_naca_4_thickness_scaled(x: f64, e: f64) {
        let naca = Naca4Digit::new(0.12, 2.0, 0.0, 0.0);
        let result = naca.thickness(x);
        assert_relative_eq!(e * 4.0, result, epsilon = 1e-3);
    }

    #[test]
    fn test_closed_trailing_edge() {
        let naca = Naca4Digit::new(0.12, 1.0, 0.0, 0.0).with_trailing_edge(TrailingEdge::Closed);
        assert_relative_eq!(0.0, naca.thickness(1.0), epsilon = 1e-4);
        assert!(Naca4Digit::new(0.12, 1.0, 0.0, 0.0).thickness(1.0) > 2e-3);
    }

    #[test_case(1.0000, 0.0013)]
    #[test_case(0.9000, 0.0208)]
    #[test_case(0.7000, 0.0518)]
    #[test_case(0.5000, 0.0724)]
    #[test_case(0.3000, 0.0788)]
    #[test_case(0.2000, 0.0726)]
    #[test_case(0.1000, 0.0563)]
    fn test_naca_4_camber(x: f64, e: f64) {
        let naca = Naca4Digit::new(0.12, 1.0, 0.02, 0.4);
        let t = naca.thickness(x) / 2.0;
        let p = naca.camber_line(x);
        assert_relative_eq!(e, t + p.y, epsilon = 1e-3);
    }

    #[test_case(0.1)]
    #[test_case(0.3)]
    #[test_case(0.55)]
    #[test_case(0.9)]
    fn test_camber_slope_matches_line(x: f64) {
        let naca = Naca4Digit::new(0.12, 1.0, 0.04, 0.4);
        let h = 1e-6;
        let fd = (naca.camber_line(x + h).y - naca.camber_line(x - h).y) / (2.0 * h);
        assert_relative_eq!(fd, naca.camber_slope(x), epsilon = 1e-7);
    }

    #[test]
    fn test_from_code() {
        let naca = Naca4Digit::from_code("2412", 1.0).unwrap();
        assert_eq!(Naca4Digit::new(0.12, 1.0, 0.02, 0.4), naca);
        assert_eq!(
            NacaMetrics {
                max_camber_pct: 2.0,
                max_camber_x_pct: 40.0,
                max_thickness_pct: 12.0
            },
            naca.metrics()
        );
    }

    #[test_case("241")]
    #[test_case("24120")]
    #[test_case("24a2")]
    #[test_case("")]
    fn test_invalid_code(code: &str) {
        assert_eq!(
            Err(ValidationError::InvalidNacaCode(code.to_string())),
            Naca4Digit::from_code(code, 1.0)
        );
    }

    #[test]
    fn test_invalid_chord() {
        assert!(matches!(
            Naca4Digit::from_code("0012", 0.0),
            Err(ValidationError::NonPositive { what: "chord", .. })
        ));
    }

    #[test]
    fn test_surfaces_cosine_grid() {
        let naca = Naca4Digit::from_code("0012", 2.0).unwrap();
        let s = naca.surfaces(5).unwrap();

        assert_eq!(5, s.len());
        assert_relative_eq!(0.0, s.x[0], epsilon = 1e-15);
        assert_relative_eq!(2.0 * 0.5 * (1.0 - (PI / 4.0).cos()), s.x[1], epsilon = 1e-12);
        assert_relative_eq!(1.0, s.x[2], epsilon = 1e-12);
        assert_relative_eq!(2.0, s.x[4], epsilon = 1e-12);
        for i in 0..5 {
            assert_relative_eq!(s.yu[i], -s.yl[i], epsilon = 1e-15);
        }
    }

    #[test]
    fn test_surfaces_too_few_points() {
        let naca = Naca4Digit::from_code("0012", 1.0).unwrap();
        assert_eq!(
            Err(ValidationError::PointCount { count: 2, min: 3 }),
            naca.surfaces(2)
        );
    }

    #[test]
    fn test_cache_bounded() {
        let open = TrailingEdge::Open;
        let mut cache = GeometryCache::new(2);
        let first = cache.get_or_generate("0012", 1.0, 20, open).unwrap();
        cache.get_or_generate("2412", 1.0, 20, open).unwrap();
        assert_eq!(first, cache.get_or_generate("0012", 1.0, 20, open).unwrap());
        assert_eq!(2, cache.len());

        cache.get_or_generate("4412", 1.0, 20, open).unwrap();
        assert_eq!(2, cache.len());
        assert!(!cache.contains("0012", 1.0, 20, open));
        assert!(cache.contains("2412", 1.0, 20, open));
        assert!(cache.contains("4412", 1.0, 20, open));
    }

    #[test]
    fn test_cache_keys_trailing_edge() {
        let mut cache = GeometryCache::default();
        let open = cache.get_or_generate("0012", 1.0, 20, TrailingEdge::Open).unwrap();
        let closed = cache.get_or_generate("0012", 1.0, 20, TrailingEdge::Closed).unwrap();

        assert_eq!(2, cache.len());
        assert!(open.yu[19] > 1e-3);
        assert_relative_eq!(0.0, closed.yu[19], epsilon = 1e-4);
    }

    #[test]
    fn test_cache_skips_failures() {
        let mut cache = GeometryCache::default();
        assert!(cache.get_or_generate("12", 1.0, 20, TrailingEdge::Open).is_err());
        assert!(cache.is_empty());
    }
}
