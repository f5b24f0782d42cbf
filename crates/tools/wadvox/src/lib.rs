//! Internals of the `wadvox` converter.
//!
//! The tool loads a stack of WAD archives, composes each requested sprite
//! frame's eight rotations onto aligned canvases, sweeps them into a
//! voxel volume, and writes the result as a MagicaVoxel model.

pub mod config;
pub mod pipeline;
pub mod rotation;

pub use rotation::{RotationError, RotationSet};
