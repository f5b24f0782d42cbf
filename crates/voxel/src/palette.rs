//! 256-entry RGB palette shared by all views of a rotation set.

use thiserror::Error;

/// Bytes a packed palette occupies: 256 entries of 3 bytes each.
pub const PALETTE_BYTES: usize = 768;

/// Number of palette entries.
pub const PALETTE_SIZE: usize = 256;

#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("palette data is {actual} bytes, expected at least {PALETTE_BYTES}")]
    TooShort { actual: usize },
}

/// A single palette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// An indexed color table with one entry reserved for transparency.
///
/// Palette indices are stored per voxel and per raster pixel; the colors
/// here give them meaning at serialization time. The transparent entry
/// keeps its RGB value but carries zero alpha.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: [Rgba; PALETTE_SIZE],
    transparent: u8,
}

impl Palette {
    /// Builds a palette from packed RGB triplets, as found in a PLAYPAL
    /// lump. Only the first [`PALETTE_BYTES`] bytes are read; trailing
    /// alternate palettes are ignored.
    pub fn from_rgb_triplets(data: &[u8], transparent: u8) -> Result<Self, PaletteError> {
        if data.len() < PALETTE_BYTES {
            return Err(PaletteError::TooShort { actual: data.len() });
        }
        let mut colors: [Rgba; PALETTE_SIZE] = std::array::from_fn(|i| {
            Rgba::opaque(data[i * 3], data[i * 3 + 1], data[i * 3 + 2])
        });
        colors[transparent as usize].a = 0;
        Ok(Self { colors, transparent })
    }

    pub fn transparent_index(&self) -> u8 {
        self.transparent
    }

    pub fn color(&self, index: u8) -> Rgba {
        self.colors[index as usize]
    }

    pub fn colors(&self) -> &[Rgba; PALETTE_SIZE] {
        &self.colors
    }
}
