//! Decoding of complete map snapshots into [`MapData`].

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use flate2::read::GzDecoder;
use tracing::{debug, trace, warn};

use crate::boundary::ParseWarning;
use crate::config::Config;
use crate::domain::{
    image_to_map, map_to_image, obstacle_description, Area, ImageData, ImageDimensions, MapData,
    Obstacle, ObstacleDetails, Path, Point, Room, Wall, Zone,
};
use crate::error::{MapError, Result};
use crate::parser::block::{read_map_header, Block, BlockIter, BlockType};
use crate::parser::image::ImageParser;
use crate::parser::reader::{slice_at, u16_at, u32_at, u8_at};

/// Map coordinate used as the calibration origin
pub const CALIBRATION_CENTER: f64 = 25500.0;
/// Offset of the second and third calibration points
pub const CALIBRATION_DIFF: f64 = 1000.0;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Whether the buffer starts with a gzip header.
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Decompress a gzip-wrapped map snapshot.
pub fn unpack_map(raw_encoded: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(raw_encoded);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| MapError::decompress(e.to_string()))?;
    Ok(out)
}

pub struct RoborockMapParser {
    image_parser: ImageParser,
}

impl RoborockMapParser {
    pub fn new(image_parser: ImageParser) -> Self {
        RoborockMapParser { image_parser }
    }

    pub fn from_config(config: &Config) -> Self {
        RoborockMapParser::new(ImageParser::new(
            config.colors.palette(),
            config.image.clone(),
        ))
    }

    /// Decode a snapshot, decompressing it first when it is gzip-wrapped.
    pub fn decode(&self, bytes: &[u8]) -> Result<MapData> {
        if is_gzip(bytes) {
            let raw = unpack_map(bytes)?;
            debug!(compressed = bytes.len(), raw = raw.len(), "unpacked map");
            self.parse(&raw)
        } else {
            self.parse(bytes)
        }
    }

    /// Decode an uncompressed snapshot.
    pub fn parse(&self, raw: &[u8]) -> Result<MapData> {
        let mut map = MapData::new(CALIBRATION_CENTER, CALIBRATION_DIFF);
        map.header = read_map_header(raw)?;
        debug!(
            major = map.header.major_version,
            minor = map.header.minor_version,
            index = map.header.map_index,
            sequence = map.header.map_sequence,
            "parsing map"
        );

        let mut image_block = None;
        for block in BlockIter::new(raw, map.header.header_length as usize) {
            let block = block?;
            trace!(
                block_type = %block.block_type,
                start = block.start,
                data_length = block.data_length,
                "decoding block"
            );

            match block.block_type {
                BlockType::Charger => map.charger = Some(parse_object_position(&block)?),
                BlockType::Image => image_block = Some(block),
                BlockType::RobotPosition => {
                    map.vacuum_position = Some(parse_object_position(&block)?)
                }
                BlockType::Path => map.path = Some(parse_path(&block, raw)?),
                BlockType::GotoPath => map.goto_path = Some(parse_path(&block, raw)?),
                BlockType::GotoPredictedPath => {
                    map.predicted_path = Some(parse_path(&block, raw)?)
                }
                BlockType::CurrentlyCleanedZones => map.zones = Some(parse_zones(&block)?),
                BlockType::GotoTarget => map.goto = Some(parse_goto_target(&block)?),
                BlockType::Digest => map.is_valid = true,
                BlockType::VirtualWalls => map.walls = Some(parse_walls(&block)?),
                BlockType::NoGoAreas => map.no_go_areas = Some(parse_areas(&block)?),
                BlockType::NoMoppingAreas => map.no_mopping_areas = Some(parse_areas(&block)?),
                BlockType::NoCarpetAreas => map.no_carpet_areas = Some(parse_areas(&block)?),
                BlockType::Obstacles => map.obstacles = Some(parse_obstacles(&block)?),
                BlockType::IgnoredObstacles => {
                    map.ignored_obstacles = Some(parse_obstacles(&block)?)
                }
                BlockType::ObstaclesWithPhoto => {
                    map.obstacles_with_photo = Some(parse_obstacles(&block)?)
                }
                BlockType::IgnoredObstaclesWithPhoto => {
                    map.ignored_obstacles_with_photo = Some(parse_obstacles(&block)?)
                }
                BlockType::Blocks => {
                    let count = block.record_count()?;
                    map.blocks = Some(block.data.iter().take(count).copied().collect());
                }
                BlockType::MopPath => match &map.path {
                    Some(path) => map.mop_path = Some(parse_mop_path(path, block.data)),
                    None => {
                        warn!("mop path block precedes path block");
                        map.warnings.push(ParseWarning::MopPathWithoutPath);
                    }
                },
                BlockType::CarpetMap => map.carpet_map = Some(parse_carpet_map(block.data)),
                BlockType::Unknown(code) => {
                    debug!(
                        block_type = code,
                        header_length = block.header_length,
                        data_length = block.data_length,
                        "unknown block type"
                    );
                    map.warnings.push(ParseWarning::UnknownBlock {
                        block_type: code,
                        header_length: block.header_length,
                        data_length: block.data_length,
                    });
                }
            }
        }

        if let Some(block) = image_block {
            self.apply_image(&block, &mut map)?;
        }

        if !map.is_valid {
            map.warnings.push(ParseWarning::MissingDigest);
        }
        Ok(map)
    }

    fn apply_image(&self, block: &Block<'_>, map: &mut MapData) -> Result<()> {
        let header_offset = |back: usize| {
            block.header_length.checked_sub(back).ok_or_else(|| {
                MapError::malformed(format!(
                    "image block header is {} bytes, too short for image geometry",
                    block.header_length
                ))
            })
        };
        let top = u32_at(block.header, header_offset(16)?)?;
        let left = u32_at(block.header, header_offset(12)?)?;
        let height = u32_at(block.header, header_offset(8)?)?;
        let width = u32_at(block.header, header_offset(4)?)?;

        let parsed = self
            .image_parser
            .parse(block.data, width, height, map.carpet_map.as_ref())?;

        let rooms: BTreeMap<u8, Room> = parsed
            .rooms
            .iter()
            .map(|(number, bounds)| {
                let room = Room::new(
                    image_to_map(bounds.x0 as f64 + left as f64),
                    image_to_map(bounds.y0 as f64 + top as f64),
                    image_to_map(bounds.x1 as f64 + left as f64),
                    image_to_map(bounds.y1 as f64 + top as f64),
                    *number,
                );
                (*number, room)
            })
            .collect();

        let image = ImageData {
            size: block.data_length,
            top,
            left,
            height,
            width,
            dimensions: ImageDimensions {
                top,
                left,
                height,
                width,
                scale: self.image_parser.config().scale,
                trim: parsed.trim,
            },
            image: parsed.image,
            pixels: block.data.to_vec(),
        };
        debug!(width, height, rooms = rooms.len(), "decoded map image");

        if image.is_empty() {
            map.warnings.push(ParseWarning::EmptyImage);
        }
        map.image = Some(image);
        map.rooms = Some(rooms);

        if map.has_image() && map.rooms.as_ref().map_or(false, |r| !r.is_empty()) {
            if let Some(position) = map.vacuum_position {
                if pixel_in_image(map, &position) {
                    map.vacuum_room = map.room_at(&position);
                } else {
                    map.warnings.push(ParseWarning::VacuumOutsideImage);
                }
            }
        }
        map.calibration_points = map.calibration();
        Ok(())
    }
}

fn pixel_in_image(map: &MapData, position: &Point) -> bool {
    let Some(image) = map.image.as_ref() else {
        return false;
    };
    let p = map_to_image(position);
    let x = (p.x - image.left as f64).round();
    let y = (p.y - image.top as f64).round();
    x >= 0.0 && y >= 0.0 && x < image.width as f64 && y < image.height as f64
}

fn parse_object_position(block: &Block<'_>) -> Result<Point> {
    let x = u32_at(block.data, 0x00)? as f64;
    let y = u32_at(block.data, 0x04)? as f64;
    if block.data_length > 8 {
        let mut angle = u32_at(block.data, 0x08)? as i64;
        if angle > 0xFF {
            angle = (angle & 0xFF) - 256;
        }
        Ok(Point::with_angle(x, y, angle as i32))
    } else {
        Ok(Point::new(x, y))
    }
}

fn parse_goto_target(block: &Block<'_>) -> Result<Point> {
    let x = u16_at(block.data, 0x00)? as f64;
    let y = u16_at(block.data, 0x02)? as f64;
    Ok(Point::new(x, y))
}

/// Path points live in the snapshot right after a fixed 0x14-byte header.
fn parse_path(block: &Block<'_>, raw: &[u8]) -> Result<Path> {
    let byte_length = u32_at(block.header, 0x04)? as usize;
    let point_length = u32_at(block.header, 0x08)?;
    let point_size = u32_at(block.header, 0x0C)?;
    let angle = u32_at(block.header, 0x10)?;

    let start = block.start + 0x14;
    let mut points = Vec::with_capacity(byte_length / 4);
    for pos in (start..start + byte_length).step_by(4) {
        let x = u16_at(raw, pos)? as f64;
        let y = u16_at(raw, pos + 2)? as f64;
        points.push(Point::new(x, y));
    }

    Ok(Path {
        point_length,
        point_size,
        angle,
        paths: vec![points],
    })
}

/// Keep only the path points selected by `mask`, splitting at each gap.
fn parse_mop_path(path: &Path, mask: &[u8]) -> Path {
    let selected = |i: usize| mask.get(i).map_or(false, |m| *m != 0);

    let mut segments = Vec::new();
    let mut points_num = 0;
    for source in &path.paths {
        let mut current = Vec::new();
        for (i, point) in source.iter().enumerate() {
            if selected(i) {
                current.push(*point);
                if i + 1 < mask.len() && mask[i + 1] == 0 {
                    points_num += current.len();
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
        points_num += current.len();
        segments.push(current);
    }

    Path {
        point_length: points_num as u32,
        point_size: path.point_size,
        angle: path.angle,
        paths: segments,
    }
}

fn parse_carpet_map(data: &[u8]) -> BTreeSet<usize> {
    data.iter()
        .enumerate()
        .filter(|(_, value)| **value != 0)
        .map(|(i, _)| i)
        .collect()
}

fn read_corners(data: &[u8], start: usize, corners: usize) -> Result<Vec<f64>> {
    (0..corners * 2)
        .map(|i| u16_at(data, start + i * 2).map(f64::from))
        .collect()
}

fn parse_zones(block: &Block<'_>) -> Result<Vec<Zone>> {
    let count = block.record_count()?;
    (0..count)
        .map(|i| -> Result<Zone> {
            let c = read_corners(block.data, i * 8, 2)?;
            Ok(Zone {
                x0: c[0],
                y0: c[1],
                x1: c[2],
                y1: c[3],
            })
        })
        .collect()
}

fn parse_walls(block: &Block<'_>) -> Result<Vec<Wall>> {
    let count = block.record_count()?;
    (0..count)
        .map(|i| -> Result<Wall> {
            let c = read_corners(block.data, i * 8, 2)?;
            Ok(Wall {
                x0: c[0],
                y0: c[1],
                x1: c[2],
                y1: c[3],
            })
        })
        .collect()
}

fn parse_areas(block: &Block<'_>) -> Result<Vec<Area>> {
    let count = block.record_count()?;
    (0..count)
        .map(|i| -> Result<Area> {
            let c = read_corners(block.data, i * 16, 4)?;
            Ok(Area {
                x0: c[0],
                y0: c[1],
                x1: c[2],
                y1: c[3],
                x2: c[4],
                y2: c[5],
                x3: c[6],
                y3: c[7],
            })
        })
        .collect()
}

/// Obstacle records grow with firmware versions; the record size is
/// inferred from the data length and the count.
fn parse_obstacles(block: &Block<'_>) -> Result<Vec<Obstacle>> {
    let count = block.record_count()?;
    if count == 0 {
        return Ok(Vec::new());
    }

    let record_size = block.data.len() / count;
    let data = block.data;
    let mut obstacles = Vec::with_capacity(count);
    for i in 0..count {
        let start = i * record_size;
        let x = u16_at(data, start)? as f64;
        let y = u16_at(data, start + 2)? as f64;

        let mut details = ObstacleDetails::default();
        if record_size >= 6 {
            let obstacle_type = u16_at(data, start + 4)?;
            details.obstacle_type = Some(obstacle_type);
            details.description = obstacle_description(obstacle_type).map(str::to_string);

            if record_size >= 10 {
                let u1 = u16_at(data, start + 6)? as f64;
                let u2 = u16_at(data, start + 8)? as f64;
                details.confidence_level = Some(if u2 == 0.0 { 0.0 } else { u1 * 10.0 / u2 });

                if record_size == 28 && u8_at(data, start + 12)? > 0 {
                    details.photo_name = Some(read_photo_name(data, start + 12)?);
                }
            }
        }
        obstacles.push(Obstacle { x, y, details });
    }
    Ok(obstacles)
}

fn read_photo_name(data: &[u8], start: usize) -> Result<String> {
    let bytes = slice_at(data, start, 16)?;
    let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    let name = &bytes[..end];
    if !name.is_ascii() {
        return Err(MapError::malformed(format!(
            "obstacle photo name at offset {} is not ASCII",
            start
        )));
    }
    Ok(name.iter().map(|b| *b as char).collect())
}
