use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use axial::{Axial, Plane};
use bevy::{
    prelude::*,
    tasks::{block_on, futures_lite::future},
};
use log::{debug, warn};

use crate::{
    error::EditorError,
    lifecycle::spawner::{Instantiate, LoadTask},
    persist::{CellData, MapData},
    resources::{CellRecord, CellStore, GridConfig, Realization},
};

/// What `assign` did to the cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Assignment {
    /// The cell was empty.
    Placed,
    /// Previous content was released and replaced.
    Replaced,
    /// The same content was re-selected while loading or instantiated; nothing changed.
    Unchanged,
}

/// Outcome of a finished load, reported by [`ContentLifecycleManager::pump`].
#[derive(Debug, Message)]
pub enum LoadEvent {
    Instantiated { coord: Axial, content_id: String },
    /// Always an [`EditorError::InstantiationFailed`]; the record stays, unrealized.
    Failed(EditorError),
    /// The load was superseded or its cell changed underneath it; any result was released.
    Discarded { coord: Axial, content_id: String },
}

/// Read-only view of a cell for preview overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPreview<'a> {
    pub coord: Axial,
    pub label: &'a str,
    pub has_content: bool,
}

struct PendingLoad<R, E> {
    coord: Axial,
    content_id: String,
    ticket: u64,
    // only ever touched through &mut, the lock just makes the load shareable
    task: Mutex<LoadTask<R, E>>,
}

impl<R, E> PendingLoad<R, E> {
    fn poll(&mut self) -> Option<Result<R, E>> {
        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        block_on(future::poll_once(task))
    }
}

/// Owns the cell store and keeps at most one live representation per cell.
///
/// Loads are futures handed out by the [`Instantiate`] capability and polled by
/// [`pump`](Self::pump) from whoever owns the manager. A load is *superseded* when its
/// cell is reassigned or cleared before it finishes: it keeps running, but whatever it
/// produces is released on arrival instead of installed.
pub struct ContentLifecycleManager<S: Instantiate> {
    spawner: S,
    plane: Plane,
    store: CellStore<S::Asset, S::Representation>,
    pending: HashMap<Axial, PendingLoad<S::Representation, S::Error>>,
    superseded: Vec<PendingLoad<S::Representation, S::Error>>,
    next_ticket: u64,
}

impl<S: Instantiate> ContentLifecycleManager<S> {
    pub fn new(config: &GridConfig, spawner: S) -> Result<Self, EditorError> {
        Ok(Self {
            spawner,
            plane: config.plane()?,
            store: CellStore::new(),
            pending: HashMap::new(),
            superseded: Vec::new(),
            next_ticket: 0,
        })
    }

    pub fn plane(&self) -> &Plane { &self.plane }
    pub fn spawner(&self) -> &S { &self.spawner }
    pub fn store(&self) -> &CellStore<S::Asset, S::Representation> { &self.store }

    pub fn get(&self, coord: Axial) -> Option<&CellRecord<S::Asset, S::Representation>> {
        self.store.get(coord)
    }

    /// Loads still running, superseded ones included.
    pub fn in_flight(&self) -> usize {
        self.pending.len() + self.superseded.len()
    }

    pub fn is_settled(&self) -> bool {
        self.in_flight() == 0
    }

    /// Occupied cells flagged for preview, in no particular order.
    pub fn previews(&self) -> impl Iterator<Item = CellPreview<'_>> {
        self.store.iter()
            .filter(|(_, record)| record.show_preview)
            .map(|(coord, record)| CellPreview {
                coord,
                label: &record.label,
                has_content: record.has_content(),
            })
    }

    pub fn set_show_preview(&mut self, coord: Axial, show: bool) -> bool {
        let Some(record) = self.store.get_mut(coord) else { return false };
        record.show_preview = show;
        true
    }

    /// Puts content on a cell and starts loading its representation.
    pub fn assign(
        &mut self,
        coord: Axial,
        content_id: impl Into<String>,
        label: impl Into<String>,
        asset: S::Asset,
    ) -> Result<Assignment, EditorError> {
        let content_id = content_id.into();
        if !self.spawner.is_resolvable(&asset) {
            return Err(EditorError::AssetResolutionFailed { content_id });
        }

        if let Some(current) = self.store.get(coord) {
            if current.content_id == content_id && !matches!(current.realization, Realization::Unrealized) {
                debug!("{content_id} already on {coord}");
                return Ok(Assignment::Unchanged);
            }
        }

        self.supersede(coord);
        let assignment = match self.store.get_mut(coord) {
            Some(previous) => {
                if let Some(representation) = previous.take_representation() {
                    self.spawner.release(representation);
                }
                Assignment::Replaced
            }
            None => Assignment::Placed,
        };

        self.store.put(coord, CellRecord::new(content_id, label, asset));
        self.issue(coord);
        Ok(assignment)
    }

    /// Empties a cell, releasing its representation. Returns whether it was occupied.
    pub fn clear(&mut self, coord: Axial) -> bool {
        self.supersede(coord);
        let Some(record) = self.store.remove(coord) else { return false };
        self.finalize(record);
        true
    }

    /// Empties every cell. Returns how many were occupied.
    pub fn clear_all(&mut self) -> usize {
        self.superseded.extend(self.pending.drain().map(|(_, load)| load));
        let records = self.store.clear();
        let count = records.len();
        for (_, record) in records {
            self.finalize(record);
        }
        debug!("cleared {count} cells, {} loads left to discard", self.superseded.len());
        count
    }

    /// Issues loads for every cell that holds content without a representation.
    pub fn realize_all(&mut self) -> usize {
        let coords: Vec<Axial> = self.store.iter()
            .filter(|(coord, record)| {
                matches!(record.realization, Realization::Unrealized) && !self.pending.contains_key(coord)
            })
            .map(|(coord, _)| coord)
            .collect();
        for &coord in &coords {
            self.issue(coord);
        }
        coords.len()
    }

    /// Polls every running load once and applies whatever has finished.
    pub fn pump(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();

        let spawner = &mut self.spawner;
        self.superseded.retain_mut(|load| {
            let Some(result) = load.poll() else { return true };
            match result {
                Ok(representation) => spawner.release(representation),
                Err(e) => debug!("superseded load of {} at {} failed: {e}", load.content_id, load.coord),
            }
            events.push(LoadEvent::Discarded { coord: load.coord, content_id: load.content_id.clone() });
            false
        });

        let ready: Vec<_> = self.pending.iter_mut()
            .filter_map(|(&coord, load)| load.poll().map(|result| (coord, result)))
            .collect();
        for (coord, result) in ready {
            let Some(load) = self.pending.remove(&coord) else { continue };
            events.push(self.complete(load, result));
        }

        events
    }

    /// Moves the grid onto the plane described by `config`. Every cell is released and
    /// loaded again at its new centre. Returns whether the plane changed; an invalid config
    /// leaves the map as it was.
    pub fn reconfigure(&mut self, config: &GridConfig) -> Result<bool, EditorError> {
        let plane = config.plane()?;
        if plane == self.plane { return Ok(false) }
        self.plane = plane;

        let coords: Vec<Axial> = self.store.iter().map(|(coord, _)| coord).collect();
        for &coord in &coords {
            self.supersede(coord);
            let Some(record) = self.store.get_mut(coord) else { continue };
            if let Some(representation) = record.take_representation() {
                self.spawner.release(representation);
            }
            record.realization = Realization::Unrealized;
        }
        debug!("plane reconfigured, reloading {} cells", coords.len());
        self.realize_all();
        Ok(true)
    }

    /// Snapshot of every cell for persistence.
    pub fn capture(&self) -> MapData<S::Asset> {
        MapData::from_cells(self.store.iter().map(|(coord, record)| (coord, CellData {
            content_id: record.content_id.clone(),
            label: record.label.clone(),
            asset: record.asset.clone(),
            show_preview: record.show_preview,
        })))
    }

    /// Replaces every cell with `data` and starts loading them. Corrupt data is rejected
    /// before anything is touched. Returns how many cells were restored.
    pub fn restore(&mut self, data: MapData<S::Asset>) -> Result<usize, EditorError> {
        let cells = data.into_cells()?;
        self.clear_all();
        for (coord, cell) in cells {
            if !self.spawner.is_resolvable(&cell.asset) {
                warn!("{}", EditorError::AssetResolutionFailed { content_id: cell.content_id });
                continue;
            }
            let mut record = CellRecord::new(cell.content_id, cell.label, cell.asset);
            record.show_preview = cell.show_preview;
            self.store.put(coord, record);
        }
        Ok(self.realize_all())
    }

    fn issue(&mut self, coord: Axial) {
        let Some(record) = self.store.get_mut(coord) else { return };
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        record.realization = Realization::Loading(ticket);

        let task = self.spawner.instantiate(&record.asset, self.plane.hex_to_point(coord));
        let content_id = record.content_id.clone();
        debug!("loading {content_id} at {coord} (ticket {ticket})");
        let load = PendingLoad { coord, content_id, ticket, task: Mutex::new(task) };
        if let Some(stale) = self.pending.insert(coord, load) {
            self.superseded.push(stale);
        }
    }

    fn supersede(&mut self, coord: Axial) {
        let Some(load) = self.pending.remove(&coord) else { return };
        debug!("superseding {} at {coord} (ticket {})", load.content_id, load.ticket);
        self.superseded.push(load);
    }

    fn finalize(&mut self, mut record: CellRecord<S::Asset, S::Representation>) {
        if let Some(representation) = record.take_representation() {
            self.spawner.release(representation);
        }
    }

    fn complete(
        &mut self,
        load: PendingLoad<S::Representation, S::Error>,
        result: Result<S::Representation, S::Error>,
    ) -> LoadEvent {
        let PendingLoad { coord, content_id, ticket, .. } = load;
        let current = self.store.get_mut(coord).filter(|record| {
            record.content_id == content_id
                && matches!(record.realization, Realization::Loading(t) if t == ticket)
        });

        match (current, result) {
            (Some(record), Ok(representation)) => {
                record.realization = Realization::Instantiated(representation);
                debug!("{content_id} instantiated at {coord}");
                LoadEvent::Instantiated { coord, content_id }
            }
            (Some(record), Err(e)) => {
                record.realization = Realization::Unrealized;
                let error = EditorError::InstantiationFailed { coord, content_id, reason: e.to_string() };
                warn!("{error}");
                LoadEvent::Failed(error)
            }
            (None, Ok(representation)) => {
                self.spawner.release(representation);
                LoadEvent::Discarded { coord, content_id }
            }
            (None, Err(_)) => LoadEvent::Discarded { coord, content_id },
        }
    }
}
