pub mod common;
pub mod curve2;
pub mod distances2;
pub mod normalize;
pub mod panel;
pub mod polygon;
