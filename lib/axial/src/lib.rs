mod axial;
mod plane;

pub use axial::{Axial, Cube};
pub use plane::{Convert, Plane};
