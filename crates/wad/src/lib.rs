//! WAD archive reading - lump directories and sprite picture decoding
//!
//! A WAD file ("Where's All the Data") is the archive format of the classic
//! id-software games: a flat directory of named binary blobs called lumps.
//! This crate parses archives, stacks them into a [`WadCollection`] with
//! patch-over-base lookup precedence, and decodes the column-run-length
//! picture format used for sprite graphics.

pub mod archive;
pub mod picture;

pub use archive::{ArchiveError, Lump, Wad, WadCollection, WadKind};
pub use picture::{Picture, PictureError, TRANSPARENT_INDEX};
