pub mod error;
pub mod lifecycle;
pub mod persist;
pub mod plugins;
pub mod resources;

pub use axial::{Axial, Convert, Cube, Plane};

pub mod prelude {
    pub use crate::{
        error::EditorError,
        lifecycle::{spawn_load, Assignment, CellPreview, ContentLifecycleManager, Instantiate, LoadEvent, LoadTask},
        persist::{CellData, MapData},
        plugins::*,
        resources::*,
        Axial,
    };
}
