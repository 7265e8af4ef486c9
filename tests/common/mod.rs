// Shared fixtures for integration tests
#![allow(dead_code)]

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

pub const MAP_OUTSIDE: u8 = 0x00;
pub const MAP_WALL: u8 = 0x01;
pub const MAP_INSIDE: u8 = 0xFF;
pub const MAP_SCAN: u8 = 0x07;

pub fn room_pixel(number: u8) -> u8 {
    (number << 3) | 0x07
}

fn le16(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn le32(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Header bytes after the common 8-byte prefix, carrying a record count at 0x08
fn count_header(count: u16) -> Vec<u8> {
    let mut extra = count.to_le_bytes().to_vec();
    extra.extend_from_slice(&[0, 0]);
    extra
}

/// Assembles synthetic map snapshots block by block.
pub struct MapBuilder {
    major_version: u16,
    minor_version: u16,
    map_index: u32,
    map_sequence: u32,
    blocks: Vec<u8>,
}

impl MapBuilder {
    pub fn new() -> Self {
        MapBuilder {
            major_version: 1,
            minor_version: 0,
            map_index: 7,
            map_sequence: 42,
            blocks: Vec::new(),
        }
    }

    /// Append a block: type, header length, data length, extra header bytes, data.
    pub fn block(mut self, block_type: u16, header_extra: &[u8], data: &[u8]) -> Self {
        let header_length = (8 + header_extra.len()) as u16;
        self.blocks.extend_from_slice(&block_type.to_le_bytes());
        self.blocks.extend_from_slice(&header_length.to_le_bytes());
        self.blocks
            .extend_from_slice(&(data.len() as u32).to_le_bytes());
        self.blocks.extend_from_slice(header_extra);
        self.blocks.extend_from_slice(data);
        self
    }

    pub fn charger(self, x: u32, y: u32) -> Self {
        self.block(1, &[], &le32(&[x, y]))
    }

    pub fn robot(self, x: u32, y: u32, angle: u32) -> Self {
        self.block(8, &[], &le32(&[x, y, angle]))
    }

    pub fn path(self, block_type: u16, points: &[(u16, u16)]) -> Self {
        let extra = le32(&[points.len() as u32, 4, 0]);
        let data: Vec<u8> = points.iter().flat_map(|(x, y)| le16(&[*x, *y])).collect();
        self.block(block_type, &extra, &data)
    }

    pub fn goto_target(self, x: u16, y: u16) -> Self {
        self.block(7, &[], &le16(&[x, y]))
    }

    pub fn zones(self, block_type: u16, zones: &[[u16; 4]]) -> Self {
        let data: Vec<u8> = zones.iter().flat_map(|z| le16(z)).collect();
        self.block(block_type, &count_header(zones.len() as u16), &data)
    }

    pub fn areas(self, block_type: u16, areas: &[[u16; 8]]) -> Self {
        let data: Vec<u8> = areas.iter().flat_map(|a| le16(a)).collect();
        self.block(block_type, &count_header(areas.len() as u16), &data)
    }

    pub fn obstacles(self, block_type: u16, records: &[Vec<u16>]) -> Self {
        let data: Vec<u8> = records.iter().flat_map(|r| le16(r)).collect();
        self.block(block_type, &count_header(records.len() as u16), &data)
    }

    pub fn blocks(self, count: u16, data: &[u8]) -> Self {
        self.block(11, &count_header(count), data)
    }

    /// Image block with a 28-byte header; geometry sits in the last 16 bytes.
    pub fn image(self, top: u32, left: u32, height: u32, width: u32, pixels: &[u8]) -> Self {
        let mut extra = vec![0u8; 4];
        extra.extend(le32(&[top, left, height, width]));
        self.block(2, &extra, pixels)
    }

    pub fn carpet(self, mask: &[u8]) -> Self {
        self.block(17, &[], mask)
    }

    pub fn mop_path(self, mask: &[u8]) -> Self {
        self.block(18, &[], mask)
    }

    pub fn digest(self) -> Self {
        self.block(1024, &[], &[0u8; 20])
    }

    pub fn build(self) -> Vec<u8> {
        let mut raw = vec![0u8; 0x14];
        raw[0] = b'r';
        raw[1] = b'r';
        raw[0x02..0x04].copy_from_slice(&0x14u16.to_le_bytes());
        raw[0x08..0x0A].copy_from_slice(&self.major_version.to_le_bytes());
        raw[0x0A..0x0C].copy_from_slice(&self.minor_version.to_le_bytes());
        raw[0x0C..0x10].copy_from_slice(&self.map_index.to_le_bytes());
        raw[0x10..0x14].copy_from_slice(&self.map_sequence.to_le_bytes());
        raw.extend(self.blocks);
        raw
    }

    pub fn build_gz(self) -> Vec<u8> {
        gzip(&self.build())
    }
}

pub fn gzip(raw: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raw).expect("gzip write");
    encoder.finish().expect("gzip finish")
}

/// A 4x3 raster with two rooms, stored bottom row first:
///
/// ```text
/// row 2: wall  wall  wall  wall
/// row 1: in    r16   r17   r17
/// row 0: in    r16   r16   in
/// ```
pub fn sample_pixels() -> Vec<u8> {
    vec![
        MAP_INSIDE,
        room_pixel(16),
        room_pixel(16),
        MAP_INSIDE,
        MAP_INSIDE,
        room_pixel(16),
        room_pixel(17),
        room_pixel(17),
        MAP_WALL,
        MAP_WALL,
        MAP_WALL,
        MAP_WALL,
    ]
}

pub const IMAGE_TOP: u32 = 10;
pub const IMAGE_LEFT: u32 = 20;

/// A snapshot exercising every block type the parser understands.
pub fn full_map() -> MapBuilder {
    let mut carpet = vec![0u8; 12];
    carpet[3] = 1;

    MapBuilder::new()
        .charger(1000, 600)
        // Pixel (2, 1) of the image is room 17.
        .robot((IMAGE_LEFT + 2) * 50, (IMAGE_TOP + 1) * 50, 0xFFFF_FFA6)
        .path(3, &[(1000, 500), (1050, 500), (1100, 550)])
        .mop_path(&[1, 0, 1])
        .path(4, &[(1100, 550), (1150, 550)])
        .path(5, &[(1100, 550)])
        .zones(6, &[[1000, 500, 1100, 600]])
        .goto_target(1075, 525)
        .image(IMAGE_TOP, IMAGE_LEFT, 3, 4, &sample_pixels())
        .areas(9, &[[0, 0, 10, 0, 10, 10, 0, 10]])
        .zones(10, &[[0, 0, 50, 50], [50, 50, 100, 100]])
        .blocks(2, &[5, 6, 7])
        .areas(12, &[[1, 1, 2, 1, 2, 2, 1, 2]])
        .obstacles(13, &[vec![1000, 520, 3]])
        .obstacles(14, &[])
        .carpet(&carpet)
        .areas(19, &[[3, 3, 4, 3, 4, 4, 3, 4]])
        .digest()
}
