// plugins/hex_map.rs:
// HexMapPlugin wires the editor core into the ECS
// - keeps the HexMap plane in step with the GridConfig resource
// - turns resolved pointer positions into hover/selection feedback (click again to deselect)
// - applies editor commands (assign/clear content) to the HexMap resource
// - pumps in-flight loads once a frame and forwards their outcomes as LoadEvent messages
// The HexMap resource is built by the app since only it knows the asset capability.

use std::marker::PhantomData;

use axial::Axial;
use bevy::prelude::*;

use crate::{
    lifecycle::{ContentLifecycleManager, Instantiate, LoadEvent},
    resources::{GridConfig, GridFeedback, GridFeedbackPort},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PointerKind {
    Move,
    PrimaryDown,
}

/// A pointer position already ray cast onto the grid plane, in plane-local space.
#[derive(Clone, Copy, Debug, Message)]
pub struct PointerInput {
    pub point: Vec3,
    pub kind: PointerKind,
}

/// Sent whenever a click changes the selected cell.
#[derive(Clone, Copy, Debug, Message, PartialEq)]
pub struct SelectionChanged {
    pub selected: Option<Axial>,
}

/// Edits requested by an editor panel.
#[derive(Clone, Debug, Message)]
pub enum EditorCommand<A: Clone + Send + Sync + 'static> {
    Assign { coord: Axial, content_id: String, label: String, asset: A },
    Clear { coord: Axial },
    ClearAll,
    SetPreview { coord: Axial, show: bool },
}

#[derive(Deref, DerefMut, Resource)]
pub struct HexMap<S: Instantiate>(pub ContentLifecycleManager<S>);

pub struct HexMapPlugin<S>(PhantomData<fn() -> S>);

impl<S> Default for HexMapPlugin<S> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<S: Instantiate> Plugin for HexMapPlugin<S> {
    fn build(&self, app: &mut App) {
        app.init_resource::<GridConfig>()
            .init_resource::<GridFeedback>()
            .add_message::<PointerInput>()
            .add_message::<SelectionChanged>()
            .add_message::<EditorCommand<S::Asset>>()
            .add_message::<LoadEvent>()
            .add_systems(Update, (
                apply_config::<S>.run_if(resource_changed::<GridConfig>),
                handle_pointer::<S>,
                apply_commands::<S>,
                pump_loads::<S>,
            ).chain());
    }
}

pub fn apply_config<S: Instantiate>(
    config: Res<GridConfig>,
    mut map: ResMut<HexMap<S>>,
) {
    match map.reconfigure(&config) {
        Ok(true) => info!("grid moved to cell size {} on extent {}", config.cell_size, config.extent),
        Ok(false) => {}
        Err(e) => warn!("{e}"),
    }
}

pub fn handle_pointer<S: Instantiate>(
    mut reader: MessageReader<PointerInput>,
    mut writer: MessageWriter<SelectionChanged>,
    mut feedback: ResMut<GridFeedback>,
    map: Res<HexMap<S>>,
) {
    for &PointerInput { point, kind } in reader.read() {
        let plane = map.plane();
        let coord = plane.contains(point).then(|| plane.point_to_hex(point));
        match kind {
            PointerKind::Move => {
                if feedback.hovered() != coord { feedback.set_hovered(coord) }
            }
            PointerKind::PrimaryDown => {
                let Some(coord) = coord else { continue };
                let selected = if feedback.selected() == Some(coord) { None } else { Some(coord) };
                feedback.set_selected(selected);
                writer.write(SelectionChanged { selected });
            }
        }
    }
}

pub fn apply_commands<S: Instantiate>(
    mut reader: MessageReader<EditorCommand<S::Asset>>,
    mut map: ResMut<HexMap<S>>,
) {
    for command in reader.read() {
        match command {
            EditorCommand::Assign { coord, content_id, label, asset } => {
                if let Err(e) = map.assign(*coord, content_id.clone(), label.clone(), asset.clone()) {
                    warn!("{e}");
                }
            }
            EditorCommand::Clear { coord } => {
                map.clear(*coord);
            }
            EditorCommand::ClearAll => {
                let count = map.clear_all();
                info!("cleared {count} cells");
            }
            EditorCommand::SetPreview { coord, show } => {
                map.set_show_preview(*coord, *show);
            }
        }
    }
}

pub fn pump_loads<S: Instantiate>(
    mut map: ResMut<HexMap<S>>,
    mut writer: MessageWriter<LoadEvent>,
) {
    if map.is_settled() { return }
    for event in map.pump() {
        writer.write(event);
    }
}

// ============================================================================
// Tests
// ============================================================================
