use axial::Plane;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Grid configuration for the editing plane
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Resource, Serialize)]
pub struct GridConfig {
    /// Number of rings drawn by the grid overlay (default: 5)
    pub grid_size: u8,
    /// Hex size relative to the normalized plane (default: 0.1)
    pub cell_size: f32,
    /// Half the side length of the plane in world units (default: 5.0)
    pub extent: f32,
    /// World Y of the plane, cell centres sit here (default: 0.0)
    pub elevation: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size: 5,
            cell_size: 0.1,
            extent: 5.0,
            elevation: 0.,
        }
    }
}

impl GridConfig {
    /// Validates the configuration and builds the projection plane from it.
    pub fn plane(&self) -> Result<Plane, EditorError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.) {
            return Err(EditorError::InvalidConfiguration(
                format!("cell size must be positive, got {}", self.cell_size)));
        }
        if !(self.extent.is_finite() && self.extent > 0.) {
            return Err(EditorError::InvalidConfiguration(
                format!("plane extent must be positive, got {}", self.extent)));
        }
        if self.grid_size == 0 {
            return Err(EditorError::InvalidConfiguration("grid size must be at least 1".into()));
        }
        if !self.elevation.is_finite() {
            return Err(EditorError::InvalidConfiguration(
                format!("elevation must be finite, got {}", self.elevation)));
        }
        Ok(Plane::new(self.extent, self.cell_size, self.elevation))
    }
}
