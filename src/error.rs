use axial::Axial;
use derive_more::{Display, Error};

/// Errors surfaced by the editor core.
///
/// Coordinate math and the cell store never fail; everything here comes from
/// configuration, asset handling or persisted data.
#[derive(Debug, Display, Error)]
pub enum EditorError {
    /// Grid configuration that cannot build a plane (non-positive cell size etc.)
    #[display("invalid configuration: {_0}")]
    InvalidConfiguration(#[error(not(source))] String),
    /// The asset handle given to `assign` is not resolvable; nothing was placed.
    #[display("asset for {content_id} could not be resolved")]
    AssetResolutionFailed { content_id: String },
    /// An asynchronous load finished with an error; the cell keeps its record.
    #[display("instantiating {content_id} at {coord} failed: {reason}")]
    InstantiationFailed { coord: Axial, content_id: String, reason: String },
    /// Persisted coordinate and cell sequences do not line up.
    #[display("corrupt map data: {coordinates} coordinates but {cells} cells")]
    CorruptMapData { coordinates: usize, cells: usize },
    /// Persisted data lists the same cell more than once.
    #[display("corrupt map data: {coord} appears more than once")]
    DuplicateCoordinate { coord: Axial },
    #[display("encoding map data failed: {_0}")]
    Encode(bincode::error::EncodeError),
    #[display("decoding map data failed: {_0}")]
    Decode(bincode::error::DecodeError),
    #[display("I/O error: {_0}")]
    Io(std::io::Error),
}

impl From<bincode::error::EncodeError> for EditorError {
    fn from(e: bincode::error::EncodeError) -> Self {
        EditorError::Encode(e)
    }
}

impl From<bincode::error::DecodeError> for EditorError {
    fn from(e: bincode::error::DecodeError) -> Self {
        EditorError::Decode(e)
    }
}

impl From<std::io::Error> for EditorError {
    fn from(e: std::io::Error) -> Self {
        EditorError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_display_invalid_configuration() {
        let err = EditorError::InvalidConfiguration("cell size must be positive, got 0".into());
        let msg = format!("{err}");
        assert!(msg.contains("invalid configuration"), "got: {msg}");
        assert!(msg.contains("got 0"), "got: {msg}");
    }

    #[test]
    fn test_display_instantiation_failed_names_cell() {
        let err = EditorError::InstantiationFailed {
            coord: Axial::new(1., -2.),
            content_id: "tree".into(),
            reason: "missing".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("(1, -2)"), "got: {msg}");
        assert!(msg.contains("tree"), "got: {msg}");
    }

    #[test]
    fn test_display_corrupt_map_data() {
        let err = EditorError::CorruptMapData { coordinates: 3, cells: 2 };
        let msg = format!("{err}");
        assert!(msg.contains("3 coordinates"), "got: {msg}");
        assert!(msg.contains("2 cells"), "got: {msg}");
    }

    #[test]
    fn test_display_duplicate_coordinate() {
        let err = EditorError::DuplicateCoordinate { coord: Axial::new(0., 2.) };
        let msg = format!("{err}");
        assert!(msg.contains("(0, 2)"), "got: {msg}");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_io_error_is_source() {
        let err: EditorError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, EditorError::Io(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_plain_variants_have_no_source() {
        let err = EditorError::AssetResolutionFailed { content_id: "rock".into() };
        assert!(err.source().is_none());
    }
}
