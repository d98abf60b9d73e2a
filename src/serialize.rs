use ncollide2d::na::{Point2, Vector2};
use serde::{Serialize, Serializer};

#[derive(Serialize)]
#[serde(remote = "Point2<f64>")]
pub struct Point2f64 {
    x: f64,
    y: f64,
}

#[derive(Serialize)]
#[serde(remote = "Vector2<f64>")]
pub struct Vector2f64 {
    x: f64,
    y: f64,
}

/// Serializes a slice of points as a sequence of `{"x": .., "y": ..}` objects, for use with
/// `#[serde(serialize_with = "serialize_points")]`.
pub fn serialize_points<S: Serializer>(
    points: &[Point2<f64>],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Wrapped(#[serde(with = "Point2f64")] Point2<f64>);

    serializer.collect_seq(points.iter().map(|p| Wrapped(*p)))
}
