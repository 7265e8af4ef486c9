//! Domain model - decoded map entities and release versions

pub mod geometry;
pub mod map_data;
pub mod obstacle;
pub mod version;

pub use geometry::{Area, Path, Point, Room, Wall, Zone};
pub use map_data::{
    image_to_map, map_to_image, CalibrationPoint, ImageData, ImageDimensions, MapData, MapHeader,
    TrimBox, MAP_UNITS_PER_PIXEL,
};
pub use obstacle::{obstacle_description, Obstacle, ObstacleDetails};
pub use version::{normalize_version, ReleaseVersion};
