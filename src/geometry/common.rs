/// A position along a polyline expressed as an edge index and the fraction (0 to 1) of the way
/// from that edge's first vertex to its second.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IndexAndFraction {
    pub i: usize,
    pub f: f64,
}

impl IndexAndFraction {
    pub fn new(i: usize, f: f64) -> Self {
        Self { i, f }
    }
}
