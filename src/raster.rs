//! Owned RGBA pixel buffer and PNG output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{MapError, Result};
use crate::palette::Color;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    buf: Vec<u8>,
}

impl RgbaImage {
    /// A fully transparent image
    pub fn new(width: u32, height: u32) -> Self {
        RgbaImage {
            width,
            height,
            buf: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize * self.width as usize + x as usize) * 4)
        } else {
            None
        }
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        let i = self.offset(x, y)?;
        Some(Color::rgba(
            self.buf[i],
            self.buf[i + 1],
            self.buf[i + 2],
            self.buf[i + 3],
        ))
    }

    /// Set a pixel. Coordinates outside the image are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.buf[i..i + 4].copy_from_slice(&color.to_array());
        }
    }

    /// Nearest-neighbor resize.
    pub fn resize(&self, width: u32, height: u32) -> RgbaImage {
        let mut out = RgbaImage::new(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }

        for y in 0..height {
            let src_y = ((y as u64 * self.height as u64) / height as u64) as u32;
            for x in 0..width {
                let src_x = ((x as u64 * self.width as u64) / width as u64) as u32;
                if let Some(color) = self.get_pixel(src_x, src_y) {
                    out.put_pixel(x, y, color);
                }
            }
        }
        out
    }

    /// Encode as an 8-bit RGBA PNG.
    pub fn write_png<W: Write>(&self, writer: W) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MapError::image("cannot encode an empty image"));
        }

        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.buf)?;
        writer.finish()?;
        Ok(())
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_png(BufWriter::new(file))
    }
}
