//! WAD archive parsing - a directory of named binary lumps
//!
//! # File Format
//!
//! ```text
//! [Header: 12 bytes]
//!   Magic: 'IWAD' or 'PWAD'
//!   Lump count: u32 (little-endian)
//!   Directory offset: u32 (little-endian)
//!
//! [Lump data: variable]
//!
//! [Directory: 16 bytes per lump]
//!   Data offset: u32
//!   Data size: u32
//!   Name: 8 bytes, NUL-padded
//! ```
//!
//! Zero-size marker lumps delimit directory ranges; sprites live between
//! `S_START` and `S_END`.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// WAD parsing errors
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("failed to read archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid WAD magic: expected 'IWAD' or 'PWAD', found {found:?}")]
    InvalidMagic { found: [u8; 4] },

    #[error("truncated header: expected {expected} bytes, only {available} available")]
    TruncatedHeader { expected: usize, available: usize },

    #[error("directory out of bounds: {count} entries at offset {offset} in a {file_size}-byte file")]
    DirectoryOutOfBounds {
        offset: usize,
        count: usize,
        file_size: usize,
    },

    #[error("lump '{name}' out of bounds: offset {offset}, size {size} in a {file_size}-byte file")]
    LumpOutOfBounds {
        name: String,
        offset: usize,
        size: usize,
        file_size: usize,
    },
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

/// WAD file format constants
pub mod constants {
    /// Header size in bytes
    pub const HEADER_SIZE: usize = 12;

    /// Directory entry size in bytes
    pub const DIRECTORY_ENTRY_SIZE: usize = 16;

    /// Lump name field width in the directory
    pub const NAME_SIZE: usize = 8;

    /// Marker opening the sprite directory range
    pub const SPRITE_START: &str = "S_START";

    /// Marker closing the sprite directory range
    pub const SPRITE_END: &str = "S_END";
}

/// Archive kind, from the header magic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WadKind {
    /// Full game archive
    Iwad,
    /// Patch archive layered over a base game
    Pwad,
}

impl WadKind {
    pub fn name(&self) -> &'static str {
        match self {
            WadKind::Iwad => "IWAD",
            WadKind::Pwad => "PWAD",
        }
    }
}

/// One named blob from an archive directory
#[derive(Debug, Clone)]
pub struct Lump {
    /// Directory name, NUL padding stripped
    pub name: String,
    /// Raw contents
    pub data: Vec<u8>,
}

impl Lump {
    /// Marker lumps are zero-size and exist only to delimit directory ranges
    pub fn is_marker(&self) -> bool {
        self.data.is_empty()
    }
}

/// A parsed WAD archive
#[derive(Debug)]
pub struct Wad {
    kind: WadKind,
    source: PathBuf,
    lumps: Vec<Lump>,
}

impl Wad {
    /// Load and parse an archive from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let mut wad = Self::from_bytes(&data)?;
        wad.source = path.to_path_buf();
        tracing::debug!(
            source = %path.display(),
            kind = wad.kind.name(),
            lumps = wad.lumps.len(),
            "parsed archive"
        );
        Ok(wad)
    }

    /// Parse an archive from an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < constants::HEADER_SIZE {
            return Err(ArchiveError::TruncatedHeader {
                expected: constants::HEADER_SIZE,
                available: data.len(),
            });
        }

        let kind = match &data[0..4] {
            b"IWAD" => WadKind::Iwad,
            b"PWAD" => WadKind::Pwad,
            _ => {
                return Err(ArchiveError::InvalidMagic {
                    found: [data[0], data[1], data[2], data[3]],
                })
            }
        };

        let count = u32::from_le_bytes([data[4], data[5], data[6], data[7]]) as usize;
        let dir_offset = u32::from_le_bytes([data[8], data[9], data[10], data[11]]) as usize;

        let dir_end =
            dir_offset as u64 + count as u64 * constants::DIRECTORY_ENTRY_SIZE as u64;
        if dir_end > data.len() as u64 {
            return Err(ArchiveError::DirectoryOutOfBounds {
                offset: dir_offset,
                count,
                file_size: data.len(),
            });
        }

        let mut lumps = Vec::with_capacity(count);
        for i in 0..count {
            let entry = &data[dir_offset + i * constants::DIRECTORY_ENTRY_SIZE..]
                [..constants::DIRECTORY_ENTRY_SIZE];
            let offset = u32::from_le_bytes([entry[0], entry[1], entry[2], entry[3]]) as usize;
            let size = u32::from_le_bytes([entry[4], entry[5], entry[6], entry[7]]) as usize;
            let name = lump_name(&entry[8..constants::DIRECTORY_ENTRY_SIZE]);

            if offset as u64 + size as u64 > data.len() as u64 {
                return Err(ArchiveError::LumpOutOfBounds {
                    name,
                    offset,
                    size,
                    file_size: data.len(),
                });
            }

            lumps.push(Lump {
                name,
                data: data[offset..offset + size].to_vec(),
            });
        }

        Ok(Self {
            kind,
            source: PathBuf::new(),
            lumps,
        })
    }

    pub fn kind(&self) -> WadKind {
        self.kind
    }

    /// Path the archive was loaded from; empty for in-memory archives.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// All lumps in directory order.
    pub fn lumps(&self) -> &[Lump] {
        &self.lumps
    }

    /// First lump with this exact name.
    pub fn lump(&self, name: &str) -> Option<&Lump> {
        self.lumps.iter().find(|l| l.name == name)
    }

    /// Lumps strictly between two marker lumps, in directory order.
    ///
    /// A missing start marker means the range opens at the first lump; a
    /// missing end marker runs it to the last.
    pub fn lumps_between<'a>(&'a self, start: &str, end: &str) -> impl Iterator<Item = &'a Lump> {
        let from = self.marker_position(start).map_or(0, |i| i + 1);
        let to = self.marker_position(end).unwrap_or(self.lumps.len());
        self.lumps[from..to.max(from)].iter()
    }

    fn marker_position(&self, name: &str) -> Option<usize> {
        self.lumps.iter().position(|l| l.name == name)
    }
}

/// Ordered set of loaded archives.
///
/// The most recently loaded archive is searched first, so a patch WAD loaded
/// after the base game shadows its lumps.
#[derive(Debug, Default)]
pub struct WadCollection {
    wads: Vec<Wad>,
}

impl WadCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an archive from disk and place it ahead of those already loaded.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let wad = Wad::load(&path)?;
        tracing::info!(
            source = %wad.source().display(),
            kind = wad.kind().name(),
            lumps = wad.lumps().len(),
            "loaded archive"
        );
        self.push(wad);
        Ok(())
    }

    /// Insert an already-parsed archive ahead of those already loaded.
    pub fn push(&mut self, wad: Wad) {
        self.wads.insert(0, wad);
    }

    /// Archives in search order (most recently loaded first).
    pub fn wads(&self) -> &[Wad] {
        &self.wads
    }

    pub fn len(&self) -> usize {
        self.wads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wads.is_empty()
    }

    /// First lump with this exact name, in archive precedence order.
    pub fn find_lump(&self, name: &str) -> Option<&Lump> {
        self.wads.iter().find_map(|w| w.lump(name))
    }

    /// Lumps between two markers, walking every archive in precedence order.
    pub fn lumps_between<'a>(
        &'a self,
        start: &'a str,
        end: &'a str,
    ) -> impl Iterator<Item = &'a Lump> + 'a {
        self.wads.iter().flat_map(move |w| w.lumps_between(start, end))
    }

    /// Lumps between the sprite markers in every archive, patch archives first.
    pub fn sprite_lumps(&self) -> impl Iterator<Item = &Lump> + '_ {
        self.lumps_between(constants::SPRITE_START, constants::SPRITE_END)
    }
}

/// Directory names are 8 bytes, NUL-padded; anything after the first NUL is dropped.
fn lump_name(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
