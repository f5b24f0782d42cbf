//! Doom picture format - column-run-length-encoded sprite graphics
//!
//! # Lump Format
//!
//! ```text
//! [Header: 8 bytes]
//!   Width: u16    Height: u16
//!   Left offset: i16    Top offset: i16   (pixels from the draw anchor)
//!
//! [Column offsets: width x u32]
//!   Offset of each column's first post, from the start of the lump
//!
//! [Posts, per column]
//!   Row start: u8 (0xFF terminates the column)
//!   Run length: u8
//!   1 padding byte, `length` palette indices, 1 padding byte
//! ```
//!
//! All integers little-endian. Rows not covered by any post are transparent;
//! decoded rasters mark them with [`TRANSPARENT_INDEX`].

use thiserror::Error;

/// Palette index standing in for rows no post covers.
///
/// The game palettes never draw with their last entry, so 0xFF is free to
/// act as the transparency marker throughout the pipeline.
pub const TRANSPARENT_INDEX: u8 = 0xFF;

/// Row-start value terminating a column's post list
const COLUMN_END: u8 = 0xFF;

/// Fixed header size in bytes
const HEADER_SIZE: usize = 8;

/// Picture decoding errors
#[derive(Error, Debug)]
pub enum PictureError {
    #[error("truncated picture: expected {expected} bytes, only {available} available")]
    Truncated { expected: usize, available: usize },

    #[error("column {column} offset {offset} is outside the {size}-byte lump")]
    ColumnOutOfBounds {
        column: usize,
        offset: usize,
        size: usize,
    },

    #[error("column {column} post at offset {offset} runs past the end of the lump")]
    TruncatedPost { column: usize, offset: usize },
}

pub type Result<T> = std::result::Result<T, PictureError>;

/// A decoded sprite picture: indexed pixels plus the draw-anchor offsets
#[derive(Debug, Clone)]
pub struct Picture {
    width: u16,
    height: u16,
    left_offset: i16,
    top_offset: i16,
    /// Row-major, row 0 at the top; gaps hold [`TRANSPARENT_INDEX`]
    pixels: Vec<u8>,
}

impl Picture {
    /// Decode a picture lump.
    ///
    /// Every read is bounds-checked against the lump; truncated or
    /// out-of-range post data is an error, never a panic. Post rows beyond
    /// the declared height are clipped silently, as the game's own renderer
    /// drops them.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(PictureError::Truncated {
                expected: HEADER_SIZE,
                available: data.len(),
            });
        }

        let width = u16::from_le_bytes([data[0], data[1]]);
        let height = u16::from_le_bytes([data[2], data[3]]);
        let left_offset = i16::from_le_bytes([data[4], data[5]]);
        let top_offset = i16::from_le_bytes([data[6], data[7]]);

        let table_end = HEADER_SIZE + width as usize * 4;
        if data.len() < table_end {
            return Err(PictureError::Truncated {
                expected: table_end,
                available: data.len(),
            });
        }

        let mut pixels = vec![TRANSPARENT_INDEX; width as usize * height as usize];
        for column in 0..width as usize {
            let entry = HEADER_SIZE + column * 4;
            let mut offset = u32::from_le_bytes([
                data[entry],
                data[entry + 1],
                data[entry + 2],
                data[entry + 3],
            ]) as usize;

            if offset >= data.len() {
                return Err(PictureError::ColumnOutOfBounds {
                    column,
                    offset,
                    size: data.len(),
                });
            }

            loop {
                let row_start = *data
                    .get(offset)
                    .ok_or(PictureError::TruncatedPost { column, offset })?;
                if row_start == COLUMN_END {
                    break;
                }

                let length = *data
                    .get(offset + 1)
                    .ok_or(PictureError::TruncatedPost { column, offset })?
                    as usize;

                // One padding byte before the run and one after it.
                let pixel_start = offset + 3;
                let pixel_end = pixel_start + length;
                if pixel_end + 1 > data.len() {
                    return Err(PictureError::TruncatedPost { column, offset });
                }

                for (i, &value) in data[pixel_start..pixel_end].iter().enumerate() {
                    let row = row_start as usize + i;
                    if row < height as usize {
                        pixels[row * width as usize + column] = value;
                    }
                }

                offset = pixel_end + 1;
            }
        }

        Ok(Self {
            width,
            height,
            left_offset,
            top_offset,
            pixels,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Pixels from the anchor to the sprite's left edge.
    pub fn left_offset(&self) -> i16 {
        self.left_offset
    }

    /// Pixels from the anchor to the sprite's top edge.
    pub fn top_offset(&self) -> i16 {
        self.top_offset
    }

    /// Palette index at (x, y), y counted from the top row.
    pub fn pixel(&self, x: u16, y: u16) -> u8 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}
