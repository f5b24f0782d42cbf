//! MagicaVoxel model writer.
//!
//! # File Format
//!
//! A model file is a RIFF-style chunk tree:
//!
//! ```text
//! "VOX " u32:version
//! "MAIN" u32:0 u32:children_bytes
//!   "SIZE" u32:12   u32:0 u32:x u32:y u32:z
//!   "XYZI" u32:size u32:0 u32:count (u8:x u8:y u8:z u8:color) * count
//!   "RGBA" u32:1024 u32:0 (u8:r u8:g u8:b u8:a) * 256
//! ```
//!
//! All integers are little-endian. Voxel coordinates are single bytes, so
//! volumes larger than 256 per side cannot be represented. Color indices
//! are written one-based; index 0 marks empty space.
//!
//! The MAIN children size and the XYZI sizes depend on the voxel count,
//! so they are written as zero placeholders and patched once the buffer
//! is complete.

use std::io::Write;
use std::path::Path;

use glam::UVec3;
use thiserror::Error;

use crate::palette::Palette;
use crate::volume::Volume;

pub mod constants {
    /// File magic.
    pub const MAGIC: &[u8; 4] = b"VOX ";
    /// Format version written.
    pub const VERSION: u32 = 150;
    /// Bytes preceding the MAIN chunk's children: magic, version, and
    /// the MAIN chunk header.
    pub const PREAMBLE_SIZE: usize = 20;
    /// Largest volume side the one-byte voxel coordinates can address.
    pub const MAX_DIMENSION: u32 = 256;

    pub const CHUNK_MAIN: &[u8; 4] = b"MAIN";
    pub const CHUNK_SIZE: &[u8; 4] = b"SIZE";
    pub const CHUNK_XYZI: &[u8; 4] = b"XYZI";
    pub const CHUNK_RGBA: &[u8; 4] = b"RGBA";
}

#[derive(Error, Debug)]
pub enum VoxError {
    #[error("volume size {0} exceeds the {max} voxel coordinate range", max = constants::MAX_DIMENSION)]
    OversizedVolume(UVec3),
    #[error("failed to write model: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VoxError>;

/// Serializes a volume's occupied voxels and palette as a single-model
/// file into `sink`.
pub fn write_model<W: Write>(sink: &mut W, volume: &Volume, palette: &Palette) -> Result<()> {
    let buffer = VoxWriter::new().serialize(volume, palette)?;
    sink.write_all(&buffer)?;
    Ok(())
}

/// Writes a volume to a model file at `path`. Nothing is created on disk
/// when serialization fails.
pub fn save_model(path: impl AsRef<Path>, volume: &Volume, palette: &Palette) -> Result<()> {
    let buffer = VoxWriter::new().serialize(volume, palette)?;
    std::fs::write(path.as_ref(), &buffer)?;
    tracing::debug!(path = %path.as_ref().display(), "wrote model");
    Ok(())
}

struct VoxWriter {
    buffer: Vec<u8>,
}

impl VoxWriter {
    fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    fn serialize(mut self, volume: &Volume, palette: &Palette) -> Result<Vec<u8>> {
        use constants::*;

        let size = volume.size();
        if size.max_element() > MAX_DIMENSION {
            return Err(VoxError::OversizedVolume(size));
        }

        self.buffer.extend_from_slice(MAGIC);
        self.push_u32(VERSION);

        self.buffer.extend_from_slice(CHUNK_MAIN);
        self.push_u32(0);
        let main_children_at = self.reserve_u32();

        self.buffer.extend_from_slice(CHUNK_SIZE);
        self.push_u32(12);
        self.push_u32(0);
        self.push_u32(size.x);
        self.push_u32(size.y);
        self.push_u32(size.z);

        self.buffer.extend_from_slice(CHUNK_XYZI);
        let xyzi_size_at = self.reserve_u32();
        self.push_u32(0);
        let count_at = self.reserve_u32();

        let mut count: u32 = 0;
        for (p, color) in volume.iter_occupied() {
            // Stored indices are one-based; 0 is reserved for empty.
            self.buffer
                .extend_from_slice(&[p.x as u8, p.y as u8, p.z as u8, color.wrapping_add(1)]);
            count += 1;
        }

        self.buffer.extend_from_slice(CHUNK_RGBA);
        self.push_u32(1024);
        self.push_u32(0);
        for color in palette.colors() {
            self.buffer
                .extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }

        let main_children = (self.buffer.len() - PREAMBLE_SIZE) as u32;
        self.patch_u32(main_children_at, main_children);
        self.patch_u32(xyzi_size_at, 4 + 4 * count);
        self.patch_u32(count_at, count);

        Ok(self.buffer)
    }

    fn push_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Pushes a placeholder and returns its offset for later patching.
    fn reserve_u32(&mut self) -> usize {
        let at = self.buffer.len();
        self.push_u32(0);
        at
    }

    fn patch_u32(&mut self, at: usize, value: u32) {
        self.buffer[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }
}
