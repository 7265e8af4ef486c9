//! Binary decoding of Roborock map snapshots
//!
//! - `reader` - bounds-checked little-endian primitives
//! - `block` - file header and block framing
//! - `image` - pixel-class raster rendering and room lookup
//! - `map_parser` - block payload decoding into [`crate::domain::MapData`]

pub mod block;
pub mod image;
pub mod map_parser;
pub mod reader;

pub use block::{Block, BlockIter, BlockType};
pub use image::{ImageParser, ParsedImage, RoomBounds};
pub use map_parser::{is_gzip, unpack_map, RoborockMapParser, CALIBRATION_CENTER, CALIBRATION_DIFF};
