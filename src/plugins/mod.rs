pub mod hex_map;

pub use hex_map::{EditorCommand, HexMap, HexMapPlugin, PointerInput, PointerKind, SelectionChanged};
