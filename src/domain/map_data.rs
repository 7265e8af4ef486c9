use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::boundary::ParseWarning;
use crate::domain::geometry::{Area, Path, Point, Room, Wall, Zone};
use crate::domain::obstacle::Obstacle;
use crate::parser::image::room_at_pixel;
use crate::raster::RgbaImage;

/// Map units per image pixel
pub const MAP_UNITS_PER_PIXEL: f64 = 50.0;

/// Convert a map coordinate into image pixel space.
pub fn map_to_image(point: &Point) -> Point {
    Point::new(point.x / MAP_UNITS_PER_PIXEL, point.y / MAP_UNITS_PER_PIXEL)
}

/// Convert a single image pixel coordinate into map units.
pub fn image_to_map(value: f64) -> f64 {
    value * MAP_UNITS_PER_PIXEL
}

/// Values read from the file header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MapHeader {
    pub header_length: u16,
    pub major_version: u16,
    pub minor_version: u16,
    pub map_index: u32,
    pub map_sequence: u32,
}

/// Margins cut from each side of the source image, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrimBox {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

/// Geometry needed to map vacuum coordinates onto the rendered image
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageDimensions {
    pub top: u32,
    pub left: u32,
    pub height: u32,
    pub width: u32,
    pub scale: f64,
    pub trim: TrimBox,
}

impl ImageDimensions {
    pub fn trimmed_height(&self) -> u32 {
        self.height
            .saturating_sub(self.trim.top)
            .saturating_sub(self.trim.bottom)
    }

    /// Project a map coordinate onto the rendered (trimmed, flipped, scaled) image.
    pub fn to_image(&self, point: &Point) -> Point {
        let p = map_to_image(point);
        let px = p.x - self.left as f64 - self.trim.left as f64;
        let py = p.y - self.top as f64 - self.trim.bottom as f64;
        let flipped = self.trimmed_height() as f64 - 1.0 - py;
        Point::new(px * self.scale, flipped * self.scale)
    }
}

/// The floor image block after decoding
#[derive(Debug, Clone, Serialize)]
pub struct ImageData {
    /// Length of the raw pixel-class payload
    pub size: usize,
    pub top: u32,
    pub left: u32,
    pub height: u32,
    pub width: u32,
    pub dimensions: ImageDimensions,
    #[serde(skip)]
    pub image: Option<RgbaImage>,
    /// Raw pixel classes, row-major from the bottom row up
    #[serde(skip)]
    pub pixels: Vec<u8>,
}

impl ImageData {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.image.is_none()
    }
}

/// A vacuum-space point paired with where it lands on the image
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationPoint {
    pub vacuum: Point,
    pub map: Point,
}

/// Everything decoded from one map snapshot
#[derive(Debug, Clone, Serialize)]
pub struct MapData {
    pub header: MapHeader,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charger: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vacuum_position: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vacuum_room: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goto_path: Option<Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_path: Option<Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mop_path: Option<Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goto: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<Zone>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walls: Option<Vec<Wall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_go_areas: Option<Vec<Area>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_mopping_areas: Option<Vec<Area>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_carpet_areas: Option<Vec<Area>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obstacles: Option<Vec<Obstacle>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored_obstacles: Option<Vec<Obstacle>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obstacles_with_photo: Option<Vec<Obstacle>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored_obstacles_with_photo: Option<Vec<Obstacle>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<u8>>,
    #[serde(skip)]
    pub carpet_map: Option<BTreeSet<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms: Option<BTreeMap<u8, Room>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_points: Option<Vec<CalibrationPoint>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ParseWarning>,
    #[serde(skip)]
    calibration_center: f64,
    #[serde(skip)]
    calibration_diff: f64,
}

impl MapData {
    pub fn new(calibration_center: f64, calibration_diff: f64) -> Self {
        MapData {
            header: MapHeader::default(),
            is_valid: false,
            charger: None,
            vacuum_position: None,
            vacuum_room: None,
            path: None,
            goto_path: None,
            predicted_path: None,
            mop_path: None,
            goto: None,
            zones: None,
            walls: None,
            no_go_areas: None,
            no_mopping_areas: None,
            no_carpet_areas: None,
            obstacles: None,
            ignored_obstacles: None,
            obstacles_with_photo: None,
            ignored_obstacles_with_photo: None,
            blocks: None,
            carpet_map: None,
            image: None,
            rooms: None,
            calibration_points: None,
            warnings: Vec::new(),
            calibration_center,
            calibration_diff,
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.as_ref().map_or(false, |image| !image.is_empty())
    }

    /// Three reference points pairing vacuum coordinates with image coordinates.
    ///
    /// Returns `None` when there is no rendered image to calibrate against.
    pub fn calibration(&self) -> Option<Vec<CalibrationPoint>> {
        let image = self.image.as_ref().filter(|image| !image.is_empty())?;
        let center = self.calibration_center;
        let diff = self.calibration_diff;

        let points = [
            Point::new(center, center),
            Point::new(center + diff, center),
            Point::new(center, center + diff),
        ];
        Some(
            points
                .iter()
                .map(|vacuum| CalibrationPoint {
                    vacuum: *vacuum,
                    map: image.dimensions.to_image(vacuum),
                })
                .collect(),
        )
    }

    /// Room number under a map coordinate, if any.
    pub fn room_at(&self, point: &Point) -> Option<u8> {
        let image = self.image.as_ref()?;
        let p = map_to_image(point);
        let x = (p.x - image.left as f64).round() as i64;
        let y = (p.y - image.top as f64).round() as i64;
        room_at_pixel(&image.pixels, image.width, x, y)
    }
}
