//! Persisted form of the cell mapping.
//!
//! Cells are stored as two parallel sequences, coordinates and cell data, sorted by
//! coordinate so identical maps encode identically. Representations are never persisted;
//! restoring a map issues fresh loads.

use std::{collections::HashSet, fs, path::Path};

use axial::Axial;
use bincode::config;
use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::EditorError;

/// The persisted part of a cell record.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CellData<A> {
    pub content_id: String,
    pub label: String,
    pub asset: A,
    pub show_preview: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MapData<A> {
    coordinates: Vec<Axial>,
    cells: Vec<CellData<A>>,
}

impl<A> MapData<A> {
    pub fn from_cells(cells: impl IntoIterator<Item = (Axial, CellData<A>)>) -> Self {
        let mut cells: Vec<_> = cells.into_iter().collect();
        cells.sort_by_key(|(coord, _)| *coord);
        let (coordinates, cells) = cells.into_iter().unzip();
        Self { coordinates, cells }
    }

    /// Raw sequences as found on disk, checked only by [`into_cells`](Self::into_cells).
    pub fn from_parts(coordinates: Vec<Axial>, cells: Vec<CellData<A>>) -> Self {
        Self { coordinates, cells }
    }

    pub fn coordinates(&self) -> &[Axial] { &self.coordinates }
    pub fn cells(&self) -> &[CellData<A>] { &self.cells }

    /// Zips the sequences back together. Sequences of different length, or a coordinate
    /// listed twice, are corrupt.
    pub fn into_cells(self) -> Result<Vec<(Axial, CellData<A>)>, EditorError> {
        if self.coordinates.len() != self.cells.len() {
            return Err(EditorError::CorruptMapData {
                coordinates: self.coordinates.len(),
                cells: self.cells.len(),
            });
        }
        let mut seen = HashSet::with_capacity(self.coordinates.len());
        if let Some(&coord) = self.coordinates.iter().find(|&&coord| !seen.insert(coord)) {
            return Err(EditorError::DuplicateCoordinate { coord });
        }
        Ok(self.coordinates.into_iter().zip(self.cells).collect())
    }
}

impl<A: Serialize> MapData<A> {
    pub fn encode(&self) -> Result<Vec<u8>, EditorError> {
        Ok(bincode::serde::encode_to_vec(self, config::standard())?)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), EditorError> {
        let bytes = self.encode()?;
        fs::write(path.as_ref(), &bytes)?;
        debug!("wrote {} cells ({} bytes) to {}", self.cells.len(), bytes.len(), path.as_ref().display());
        Ok(())
    }
}

impl<A: DeserializeOwned> MapData<A> {
    pub fn decode(bytes: &[u8]) -> Result<Self, EditorError> {
        let (data, _) = bincode::serde::decode_from_slice(bytes, config::standard())?;
        Ok(data)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        Self::decode(&fs::read(path)?)
    }
}
