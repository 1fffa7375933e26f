pub mod curve;
pub mod surface;

pub use curve::{Arc, Curve, Line};
pub use surface::{Plane, Surface};
