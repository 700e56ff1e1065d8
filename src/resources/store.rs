use std::{collections::HashMap, mem};

use axial::Axial;
use derive_more::IntoIterator;

/// How far a cell's content has been realized in the world.
#[derive(Clone, Debug, PartialEq)]
pub enum Realization<R> {
    /// A load with this ticket is in flight.
    Loading(u64),
    /// The representation is alive and owned by the record.
    Instantiated(R),
    /// Content is assigned but not visually realized (failed load, or restored and not
    /// yet issued).
    Unrealized,
}

/// One occupied grid cell.
///
/// The asset handle is mandatory, unresolvable assets never make it into a record, so a
/// record without an asset can't own a representation.
#[derive(Clone, Debug)]
pub struct CellRecord<A, R> {
    /// Stable key of the content, used to spot the same content being re-selected
    pub content_id: String,
    /// Human readable name shown by overlays and panels
    pub label: String,
    /// Opaque handle to the content, only ever handed back to the asset capability
    pub asset: A,
    /// Whether preview overlays should draw this cell
    pub show_preview: bool,
    pub(crate) realization: Realization<R>,
}

impl<A, R> CellRecord<A, R> {
    pub fn new(content_id: impl Into<String>, label: impl Into<String>, asset: A) -> Self {
        Self {
            content_id: content_id.into(),
            label: label.into(),
            asset,
            show_preview: true,
            realization: Realization::Unrealized,
        }
    }

    pub fn realization(&self) -> &Realization<R> { &self.realization }

    pub fn representation(&self) -> Option<&R> {
        match &self.realization {
            Realization::Instantiated(representation) => Some(representation),
            _ => None,
        }
    }

    /// True once the representation is alive.
    pub fn has_content(&self) -> bool {
        matches!(self.realization, Realization::Instantiated(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.realization, Realization::Loading(_))
    }

    pub(crate) fn take_representation(&mut self) -> Option<R> {
        match mem::replace(&mut self.realization, Realization::Unrealized) {
            Realization::Instantiated(representation) => Some(representation),
            other => {
                self.realization = other;
                None
            }
        }
    }
}

/// Mapping from hex coordinate to cell record.
///
/// Purely a map: records displaced by `put`, `remove` or `clear` are handed back to the
/// caller and nothing they own is released here. Iteration order is unspecified.
#[derive(Clone, Debug, IntoIterator)]
pub struct CellStore<A, R> {
    #[into_iterator(owned, ref)]
    cells: HashMap<Axial, CellRecord<A, R>>,
}

impl<A, R> Default for CellStore<A, R> {
    fn default() -> Self {
        Self { cells: HashMap::new() }
    }
}

impl<A, R> CellStore<A, R> {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, coord: Axial) -> Option<&CellRecord<A, R>> {
        self.cells.get(&coord)
    }

    pub(crate) fn get_mut(&mut self, coord: Axial) -> Option<&mut CellRecord<A, R>> {
        self.cells.get_mut(&coord)
    }

    /// Inserts or overwrites, returning the displaced record untouched.
    pub fn put(&mut self, coord: Axial, record: CellRecord<A, R>) -> Option<CellRecord<A, R>> {
        self.cells.insert(coord, record)
    }

    pub fn remove(&mut self, coord: Axial) -> Option<CellRecord<A, R>> {
        self.cells.remove(&coord)
    }

    /// Empties the store, returning every record for the caller to finalize.
    pub fn clear(&mut self) -> Vec<(Axial, CellRecord<A, R>)> {
        self.cells.drain().collect()
    }

    pub fn contains(&self, coord: Axial) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Axial, &CellRecord<A, R>)> {
        self.cells.iter().map(|(&coord, record)| (coord, record))
    }
}
