use axial::Axial;
use bevy::prelude::*;

/// Outbound hover/selection notifications for whatever draws the grid.
///
/// A port is a last-value sink: a new value overwrites the old one, nothing is queued.
/// Deciding when a click deselects belongs to the caller.
pub trait GridFeedbackPort {
    fn set_hovered(&mut self, coord: Option<Axial>);
    fn set_selected(&mut self, coord: Option<Axial>);
}

/// Hover and selection state published to renderers.
///
/// Renderers read it as a resource and can react with `resource_changed::<GridFeedback>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Resource)]
pub struct GridFeedback {
    hovered: Option<Axial>,
    selected: Option<Axial>,
}

impl GridFeedback {
    pub fn hovered(&self) -> Option<Axial> { self.hovered }
    pub fn selected(&self) -> Option<Axial> { self.selected }
}

impl GridFeedbackPort for GridFeedback {
    fn set_hovered(&mut self, coord: Option<Axial>) {
        self.hovered = coord;
    }

    fn set_selected(&mut self, coord: Option<Axial>) {
        self.selected = coord;
    }
}
