//! Rendering of the pixel-class raster carried by the image block.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::config::ImageConfig;
use crate::domain::TrimBox;
use crate::error::{MapError, Result};
use crate::palette::{ColorsPalette, SupportedColor};
use crate::raster::RgbaImage;

pub const MAP_OUTSIDE: u8 = 0x00;
pub const MAP_WALL: u8 = 0x01;
pub const MAP_INSIDE: u8 = 0xFF;
pub const MAP_SCAN: u8 = 0x07;

/// Room number encoded in the upper five bits of a room pixel.
pub fn room_number(pixel: u8) -> u8 {
    pixel >> 3
}

fn is_room_pixel(pixel: u8) -> bool {
    pixel != MAP_INSIDE && pixel != MAP_SCAN && pixel & 0x07 == 7
}

/// Room number of the pixel at `(x, y)` in an unflipped raster.
///
/// Returns `None` for non-room pixels and for coordinates outside the raster.
pub fn room_at_pixel(data: &[u8], width: u32, x: i64, y: i64) -> Option<u8> {
    if x < 0 || y < 0 || x >= width as i64 {
        return None;
    }
    let index = usize::try_from(x + width as i64 * y).ok()?;
    let pixel = *data.get(index)?;
    is_room_pixel(pixel).then(|| room_number(pixel))
}

/// Bounding box of a room in source pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomBounds {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl RoomBounds {
    fn at(x: u32, y: u32) -> Self {
        RoomBounds {
            x0: x,
            y0: y,
            x1: x,
            y1: y,
        }
    }

    fn extend(&mut self, x: u32, y: u32) {
        self.x0 = self.x0.min(x);
        self.y0 = self.y0.min(y);
        self.x1 = self.x1.max(x);
        self.y1 = self.y1.max(y);
    }
}

/// Output of [`ImageParser::parse`]
#[derive(Debug, Clone)]
pub struct ParsedImage {
    /// `None` when the raster has no area left to draw
    pub image: Option<RgbaImage>,
    pub rooms: BTreeMap<u8, RoomBounds>,
    pub trim: TrimBox,
}

pub struct ImageParser {
    palette: ColorsPalette,
    config: ImageConfig,
}

impl ImageParser {
    pub fn new(palette: ColorsPalette, config: ImageConfig) -> Self {
        ImageParser { palette, config }
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// Pixel trims derived from the configured percentages.
    pub fn trim_for(&self, width: u32, height: u32) -> TrimBox {
        let pct = |percent: f64, size: u32| (percent * size as f64 / 100.0).floor().max(0.0) as u32;
        let trim = &self.config.trim;
        TrimBox {
            left: pct(trim.left, width),
            right: pct(trim.right, width),
            top: pct(trim.top, height),
            bottom: pct(trim.bottom, height),
        }
    }

    /// Render the raster and collect room bounding boxes.
    ///
    /// Source rows are stored bottom-up, so row `img_y` is drawn at
    /// `trimmed_height - img_y - 1`. Carpet pixels are drawn as a
    /// checkerboard over whatever class they cover.
    pub fn parse(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        carpet_map: Option<&BTreeSet<usize>>,
    ) -> Result<ParsedImage> {
        let trim = self.trim_for(width, height);
        let mut rooms = BTreeMap::new();

        if width == 0 || height == 0 {
            return Ok(ParsedImage {
                image: None,
                rooms,
                trim,
            });
        }

        let needed = width as usize * height as usize;
        if data.len() < needed {
            return Err(MapError::truncated(0, needed, data.len()));
        }

        let trimmed_width = width.saturating_sub(trim.left).saturating_sub(trim.right);
        let trimmed_height = height.saturating_sub(trim.top).saturating_sub(trim.bottom);
        if trimmed_width == 0 || trimmed_height == 0 {
            return Ok(ParsedImage {
                image: None,
                rooms,
                trim,
            });
        }

        let mut image = RgbaImage::new(trimmed_width, trimmed_height);
        for img_y in 0..trimmed_height {
            let src_y = img_y + trim.bottom;
            let row_offset = width as usize * src_y as usize;
            for img_x in 0..trimmed_width {
                let src_x = img_x + trim.left;
                // Rows keep the full raster width as stride; trim_left offsets the column.
                let idx = row_offset + src_x as usize;
                let pixel = data[idx];
                let x = img_x;
                let y = trimmed_height - img_y - 1;

                let is_carpet = carpet_map.map_or(false, |carpets| carpets.contains(&idx));
                let color = if is_carpet && (x + y) % 2 == 1 {
                    self.palette.color(SupportedColor::Carpets)
                } else {
                    match pixel {
                        MAP_OUTSIDE => self.palette.color(SupportedColor::MapOutside),
                        MAP_WALL => self.palette.color(SupportedColor::MapWall),
                        MAP_INSIDE => self.palette.color(SupportedColor::MapInside),
                        MAP_SCAN => self.palette.color(SupportedColor::Scan),
                        _ => match pixel & 0x07 {
                            0 => self.palette.color(SupportedColor::GreyWall),
                            1 => self.palette.color(SupportedColor::MapWallV2),
                            7 => {
                                let number = room_number(pixel);
                                rooms
                                    .entry(number)
                                    .and_modify(|bounds: &mut RoomBounds| bounds.extend(src_x, src_y))
                                    .or_insert_with(|| RoomBounds::at(src_x, src_y));
                                self.palette.room_color(number)
                            }
                            _ => self.palette.color(SupportedColor::Unknown),
                        },
                    }
                };
                image.put_pixel(x, y, color);
            }
        }

        let scale = self.config.scale;
        if (scale - 1.0).abs() > f64::EPSILON {
            let scaled_width = (trimmed_width as f64 * scale).floor() as u32;
            let scaled_height = (trimmed_height as f64 * scale).floor() as u32;
            trace!(scaled_width, scaled_height, "scaling map image");
            if scaled_width == 0 || scaled_height == 0 {
                return Ok(ParsedImage {
                    image: None,
                    rooms: BTreeMap::new(),
                    trim,
                });
            }
            image = image.resize(scaled_width, scaled_height);
        }

        Ok(ParsedImage {
            image: Some(image),
            rooms,
            trim,
        })
    }
}
