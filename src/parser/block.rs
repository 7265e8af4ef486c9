//! Block framing for Roborock map snapshots.
//!
//! A snapshot is a file header followed by a run of blocks. Every block has a
//! small header carrying its type and data length, followed by the data
//! itself. [`BlockIter`] walks the run and hands out borrowed [`Block`]s.

use std::fmt;

use crate::domain::MapHeader;
use crate::error::{MapError, Result};
use crate::parser::reader::{slice_at, u16_at, u32_at, u8_at};

/// Known block types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Charger,
    Image,
    Path,
    GotoPath,
    GotoPredictedPath,
    CurrentlyCleanedZones,
    GotoTarget,
    RobotPosition,
    NoGoAreas,
    VirtualWalls,
    Blocks,
    NoMoppingAreas,
    Obstacles,
    IgnoredObstacles,
    ObstaclesWithPhoto,
    IgnoredObstaclesWithPhoto,
    CarpetMap,
    MopPath,
    NoCarpetAreas,
    Digest,
    Unknown(u16),
}

impl From<u16> for BlockType {
    fn from(value: u16) -> Self {
        match value {
            1 => BlockType::Charger,
            2 => BlockType::Image,
            3 => BlockType::Path,
            4 => BlockType::GotoPath,
            5 => BlockType::GotoPredictedPath,
            6 => BlockType::CurrentlyCleanedZones,
            7 => BlockType::GotoTarget,
            8 => BlockType::RobotPosition,
            9 => BlockType::NoGoAreas,
            10 => BlockType::VirtualWalls,
            11 => BlockType::Blocks,
            12 => BlockType::NoMoppingAreas,
            13 => BlockType::Obstacles,
            14 => BlockType::IgnoredObstacles,
            15 => BlockType::ObstaclesWithPhoto,
            16 => BlockType::IgnoredObstaclesWithPhoto,
            17 => BlockType::CarpetMap,
            18 => BlockType::MopPath,
            19 => BlockType::NoCarpetAreas,
            1024 => BlockType::Digest,
            other => BlockType::Unknown(other),
        }
    }
}

impl BlockType {
    /// Wire value of this block type
    pub fn code(self) -> u16 {
        match self {
            BlockType::Charger => 1,
            BlockType::Image => 2,
            BlockType::Path => 3,
            BlockType::GotoPath => 4,
            BlockType::GotoPredictedPath => 5,
            BlockType::CurrentlyCleanedZones => 6,
            BlockType::GotoTarget => 7,
            BlockType::RobotPosition => 8,
            BlockType::NoGoAreas => 9,
            BlockType::VirtualWalls => 10,
            BlockType::Blocks => 11,
            BlockType::NoMoppingAreas => 12,
            BlockType::Obstacles => 13,
            BlockType::IgnoredObstacles => 14,
            BlockType::ObstaclesWithPhoto => 15,
            BlockType::IgnoredObstaclesWithPhoto => 16,
            BlockType::CarpetMap => 17,
            BlockType::MopPath => 18,
            BlockType::NoCarpetAreas => 19,
            BlockType::Digest => 1024,
            BlockType::Unknown(code) => code,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockType::Unknown(code) => write!(f, "unknown({})", code),
            known => write!(f, "{:?}({})", known, known.code()),
        }
    }
}

/// Read the file header that precedes the first block.
pub fn read_map_header(raw: &[u8]) -> Result<MapHeader> {
    Ok(MapHeader {
        header_length: u16_at(raw, 0x02)?,
        major_version: u16_at(raw, 0x08)?,
        minor_version: u16_at(raw, 0x0A)?,
        map_index: u32_at(raw, 0x0C)?,
        map_sequence: u32_at(raw, 0x10)?,
    })
}

/// One framed block borrowed from the raw snapshot
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    /// Absolute offset of the block header in the snapshot
    pub start: usize,
    pub block_type: BlockType,
    pub header_length: usize,
    pub data_length: usize,
    pub header: &'a [u8],
    pub data: &'a [u8],
}

impl<'a> Block<'a> {
    /// Record count stored at header offset 0x08
    pub fn record_count(&self) -> Result<usize> {
        Ok(u16_at(self.header, 0x08)? as usize)
    }
}

/// Iterator over the blocks of a snapshot.
///
/// Yields an error and then stops when a block runs past the end of the
/// buffer or would not advance the cursor.
pub struct BlockIter<'a> {
    raw: &'a [u8],
    position: usize,
    failed: bool,
}

impl<'a> BlockIter<'a> {
    pub fn new(raw: &'a [u8], first_block: usize) -> Self {
        BlockIter {
            raw,
            position: first_block,
            failed: false,
        }
    }

    fn read_block(&self) -> Result<(Block<'a>, usize)> {
        let start = self.position;
        let header_length = u16_at(self.raw, start + 0x02)? as usize;
        let header = slice_at(self.raw, start, header_length)?;
        let block_type = BlockType::from(u16_at(header, 0x00)?);
        let data_length = u32_at(header, 0x04)? as usize;
        let data = slice_at(self.raw, start + header_length, data_length)?;

        // The device advances by the low byte of the header length only.
        let step = data_length + u8_at(header, 0x02)? as usize;
        if step == 0 {
            return Err(MapError::malformed(format!(
                "block at offset {} has zero length",
                start
            )));
        }

        let block = Block {
            start,
            block_type,
            header_length,
            data_length,
            header,
            data,
        };
        Ok((block, start + step))
    }
}

impl<'a> Iterator for BlockIter<'a> {
    type Item = Result<Block<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.position >= self.raw.len() {
            return None;
        }

        match self.read_block() {
            Ok((block, next)) => {
                self.position = next;
                Some(Ok(block))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
